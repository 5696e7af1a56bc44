//! Icon token resolution

use std::path::Path;

use super::script_type::ScriptType;

pub const PYTHON_ICON: &str = r"C:\Windows\py.exe";
pub const POWERSHELL_ICON: &str = r"C:\Windows\System32\WindowsPowerShell\v1.0\powershell.exe";
pub const CMD_ICON: &str = r"C:\Windows\System32\cmd.exe";

/// Non-fatal problems found while resolving an icon
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IconWarning {
    /// The token looked like a path but nothing exists there
    MissingIconPath(String),
}

impl std::fmt::Display for IconWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingIconPath(p) => write!(f, "icon not found: {}, using default", p),
        }
    }
}

/// Outcome of resolving an icon token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IconResolution {
    /// `None` lets Explorer show the file's own icon
    pub path: Option<String>,
    pub warning: Option<IconWarning>,
}

impl IconResolution {
    fn plain(path: Option<&str>) -> Self {
        Self {
            path: path.map(str::to_string),
            warning: None,
        }
    }
}

/// Recognized icon tokens
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum IconKeyword {
    Auto,
    Python,
    PowerShell,
    Cmd,
    NoIcon,
}

impl IconKeyword {
    fn parse(token: &str) -> Option<Self> {
        match token.to_ascii_lowercase().as_str() {
            "" | "auto" => Some(Self::Auto),
            "python" | "py" => Some(Self::Python),
            "powershell" | "ps" => Some(Self::PowerShell),
            "cmd" | "batch" => Some(Self::Cmd),
            "none" => Some(Self::NoIcon),
            _ => None,
        }
    }
}

/// Default icon for a script type
pub fn default_icon(script_type: ScriptType) -> Option<&'static str> {
    match script_type {
        ScriptType::Python => Some(PYTHON_ICON),
        ScriptType::PowerShell => Some(POWERSHELL_ICON),
        ScriptType::Batch => Some(CMD_ICON),
        ScriptType::Executable => None,
    }
}

/// Resolve a keyword or path token to an icon path
///
/// Never fails. An arbitrary path is used verbatim when it exists; otherwise
/// the type default is returned together with a warning.
pub fn resolve(token: &str, script_type: ScriptType) -> IconResolution {
    let token = token.trim();

    match IconKeyword::parse(token) {
        Some(IconKeyword::Auto) => IconResolution::plain(default_icon(script_type)),
        Some(IconKeyword::Python) => IconResolution::plain(Some(PYTHON_ICON)),
        Some(IconKeyword::PowerShell) => IconResolution::plain(Some(POWERSHELL_ICON)),
        Some(IconKeyword::Cmd) => IconResolution::plain(Some(CMD_ICON)),
        Some(IconKeyword::NoIcon) => IconResolution::plain(None),
        None if Path::new(token).exists() => IconResolution::plain(Some(token)),
        None => {
            tracing::warn!(
                icon = token,
                fallback = ?default_icon(script_type),
                "Icon path does not exist, using type default"
            );
            IconResolution {
                path: default_icon(script_type).map(str::to_string),
                warning: Some(IconWarning::MissingIconPath(token.to_string())),
            }
        }
    }
}
