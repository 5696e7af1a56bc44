//! Store-safe key names derived from script file names
//!
//! `my_script.py` becomes `womMyScript`. Keys are not namespaced by source
//! path: two scripts reducing to the same key overwrite each other, last write
//! wins. Callers needing distinct keys pass an explicit override instead.

use regex::Regex;
use std::sync::LazyLock;

use super::script_type::{file_name, split_extension};

/// Prefixes that mark a key as ours
pub const APPROVED_PREFIXES: [&str; 3] = ["wom", "works", "dev"];

/// Used when a file name has nothing usable in it
pub const DEFAULT_KEY: &str = "womScript";

static KEY_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(wom|works|dev)[A-Za-z0-9]*$").expect("valid key pattern"));

/// Whether a key matches `^(wom|works|dev)[A-Za-z0-9]*$`
pub fn is_valid_key(key: &str) -> bool {
    KEY_PATTERN.is_match(key)
}

/// Derive a key from a script path
pub fn generate(path: &str) -> String {
    let (stem, _) = split_extension(file_name(path));

    let tokens: Vec<String> = stem
        .split(|c: char| c == '_' || c == '-' || c.is_whitespace())
        .map(|t| t.chars().filter(char::is_ascii_alphanumeric).collect::<String>())
        .filter(|t| !t.is_empty())
        .collect();

    let Some((first, rest)) = tokens.split_first() else {
        return DEFAULT_KEY.to_string();
    };

    let mut key = first.to_ascii_lowercase();
    for token in rest {
        key.push_str(&capitalize(token));
    }

    if APPROVED_PREFIXES.iter().any(|p| key.starts_with(p)) {
        key
    } else {
        format!("wom{}", upper_first(&key))
    }
}

/// First letter upper, rest lower
fn capitalize(token: &str) -> String {
    upper_first(&token.to_ascii_lowercase())
}

fn upper_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) => c.to_ascii_uppercase().to_string() + chars.as_str(),
        None => String::new(),
    }
}
