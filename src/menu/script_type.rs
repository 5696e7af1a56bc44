//! Script type detection from file extensions

use std::fmt;

/// How a registered script is launched
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ScriptType {
    Python,
    PowerShell,
    Batch,
    /// Also the fallback for unknown extensions
    #[default]
    Executable,
}

impl ScriptType {
    fn from_extension(ext: &str) -> Self {
        match ext.to_ascii_lowercase().as_str() {
            "py" => Self::Python,
            "ps1" => Self::PowerShell,
            "bat" | "cmd" => Self::Batch,
            _ => Self::Executable,
        }
    }
}

impl fmt::Display for ScriptType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Python => write!(f, "python"),
            Self::PowerShell => write!(f, "powershell"),
            Self::Batch => write!(f, "batch"),
            Self::Executable => write!(f, "executable"),
        }
    }
}

/// Final path component, treating both `/` and `\` as separators
///
/// Windows paths must split correctly even when handled on another host.
pub(crate) fn file_name(path: &str) -> &str {
    path.rsplit(['/', '\\']).next().unwrap_or(path)
}

/// Split a file name into (stem, extension); dotfiles have no extension
pub(crate) fn split_extension(name: &str) -> (&str, Option<&str>) {
    match name.rfind('.') {
        Some(pos) if pos > 0 => (&name[..pos], Some(&name[pos + 1..])),
        _ => (name, None),
    }
}

/// Classify a script by its extension (case-insensitive)
pub fn classify(path: &str) -> ScriptType {
    let (_, ext) = split_extension(file_name(path));
    ext.map(ScriptType::from_extension).unwrap_or_default()
}
