//! Registry locations and platform paths

use anyhow::{Context, Result};
use std::path::PathBuf;

use crate::store::RootScope;

/// Root every entry is written under. Per-user, so no elevation is needed.
pub const STORE_ROOT: RootScope = RootScope::CurrentUser;

/// Right-click on a folder item: HKCU\Software\Classes\Directory\shell
pub const FILE_SCOPE_KEY: &str = r"Software\Classes\Directory\shell";

/// Right-click on the empty area of an open folder
pub const BACKGROUND_SCOPE_KEY: &str = r"Software\Classes\Directory\Background\shell";

/// Explorer substitutes this with the folder the user acted on
pub const FOLDER_PLACEHOLDER: &str = "%V";

/// Environment variable holding a tracing filter directive
pub const LOG_ENV_VAR: &str = "WOM_LOG";

/// Get the default backups directory
/// - Windows: %LOCALAPPDATA%/wom-menu/backups/
/// - Linux: ~/.local/share/wom-menu/backups/
/// - macOS: ~/Library/Application Support/wom-menu/backups/
pub fn backups_dir() -> Result<PathBuf> {
    let data = dirs::data_local_dir().context("Could not determine local data directory")?;
    Ok(data.join("wom-menu").join("backups"))
}

/// Default file name for a backup taken now
pub fn default_backup_file() -> Result<PathBuf> {
    let stamp = chrono::Utc::now().format("%Y%m%d-%H%M%S");
    Ok(backups_dir()?.join(format!("context-menu-{}.json", stamp)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paths_exist() {
        // These should not panic
        let _ = backups_dir();
        let _ = default_backup_file();
    }

    #[test]
    fn test_default_backup_file_name() {
        if let Ok(path) = default_backup_file() {
            let name = path.file_name().unwrap().to_string_lossy().to_string();
            assert!(name.starts_with("context-menu-"));
            assert!(name.ends_with(".json"));
        }
    }

    #[test]
    fn test_scopes_are_siblings_under_classes() {
        assert!(FILE_SCOPE_KEY.starts_with(r"Software\Classes\"));
        assert!(BACKGROUND_SCOPE_KEY.starts_with(r"Software\Classes\"));
        assert_ne!(FILE_SCOPE_KEY, BACKGROUND_SCOPE_KEY);
    }
}
