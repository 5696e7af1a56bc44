//! Resolution pipeline: script type, command, icon, and key for one entry

pub mod command;
pub mod icon;
pub mod key_name;
pub mod script_type;

pub use script_type::{classify, ScriptType};

/// One logical context-menu action
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContextMenuEntry {
    pub key: String,
    pub title: String,
    /// Includes the `%V` folder placeholder
    pub command: String,
    pub icon_path: Option<String>,
    pub script_type: ScriptType,
    pub source_path: String,
}

impl ContextMenuEntry {
    /// Run the full pipeline for an absolute script path
    pub fn resolve(
        source_path: &str,
        title: &str,
        icon_token: &str,
    ) -> (Self, Option<icon::IconWarning>) {
        Self::resolve_with(source_path, title, icon_token, command::on_search_path)
    }

    /// Same as [`resolve`](Self::resolve) with a caller-supplied PATH probe
    pub fn resolve_with<F>(
        source_path: &str,
        title: &str,
        icon_token: &str,
        on_path: F,
    ) -> (Self, Option<icon::IconWarning>)
    where
        F: Fn(&str) -> bool,
    {
        let script_type = classify(source_path);
        let command = command::synthesize_with(script_type, source_path, on_path);
        let icon = icon::resolve(icon_token, script_type);
        let key = key_name::generate(source_path);

        let entry = Self {
            key,
            title: title.to_string(),
            command,
            icon_path: icon.path,
            script_type,
            source_path: source_path.to_string(),
        };
        (entry, icon.warning)
    }

    /// Rebuild an entry from persisted fields
    ///
    /// Script type and source come from parsing the command. Commands written
    /// by something else are kept verbatim and treated as executables.
    pub fn from_stored(key: &str, title: &str, command: &str, icon_path: Option<String>) -> Self {
        let (script_type, source_path) =
            command::parse_command(command).unwrap_or((ScriptType::Executable, String::new()));
        Self {
            key: key.to_string(),
            title: title.to_string(),
            command: command.to_string(),
            icon_path,
            script_type,
            source_path,
        }
    }
}
