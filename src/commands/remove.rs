//! Remove command - Delete an entry from both context menus

use anyhow::{Context, Result};
use owo_colors::OwoColorize;

use super::utils;

/// Execute the remove command
///
/// A missing key is reported but is not an error.
pub fn execute(key: &str) -> Result<()> {
    let mut store = utils::open_store()?;
    let status = store
        .remove(key)
        .with_context(|| format!("Failed to remove {}", key))?;

    if status.is_not_found() {
        println!("{} {} (nothing removed)", "Not found:".yellow(), key);
        return Ok(());
    }

    let scopes = match (status.file, status.background) {
        (true, true) => "file and background menus",
        (true, false) => "file menu",
        _ => "background menu",
    };
    println!("{} {} from the {}", "Removed:".green(), key, scopes);

    Ok(())
}
