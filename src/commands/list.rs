//! List command - Show every context-menu entry

use comfy_table::{presets::UTF8_FULL_CONDENSED, Cell, ContentArrangement, Table};
use owo_colors::OwoColorize;

use super::utils;
use wom_menu::store::ListedEntry;

/// Execute the list command
///
/// Store errors are reported on stderr; listing never fails the process.
pub fn execute() {
    let entries = match utils::open_store().and_then(|store| Ok(store.list()?)) {
        Ok(entries) => entries,
        Err(err) => {
            eprintln!("{} {:#}", "Error:".red(), err);
            return;
        }
    };
    println!("{}", format_entries(&entries));
}

/// Render entries as a table with a count footer
pub fn format_entries(entries: &[ListedEntry]) -> String {
    if entries.is_empty() {
        return "No context-menu entries found.".to_string();
    }

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        Cell::new("Key"),
        Cell::new("Title"),
        Cell::new("Scopes"),
        Cell::new("Managed"),
    ]);

    for entry in entries {
        let title = if entry.is_unlabeled() {
            "(unlabeled)".to_string()
        } else {
            entry.title.clone().unwrap_or_default()
        };
        let managed = if entry.is_managed() { "yes" } else { "-" };
        table.add_row(vec![
            Cell::new(&entry.key),
            Cell::new(title),
            Cell::new(entry.scopes_label()),
            Cell::new(managed),
        ]);
    }

    let incomplete = entries.iter().filter(|e| !e.is_complete()).count();
    let mut output = table.to_string();
    output.push_str(&format!("\n\n{} entries found", entries.len()));
    if incomplete > 0 {
        output.push_str(&format!(", {} in only one scope", incomplete));
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use wom_menu::menu::{ContextMenuEntry, ScriptType};
    use wom_menu::store::{Hive, MemoryHive, Scope};
    use wom_menu::EntryStore;

    fn listed() -> Vec<ListedEntry> {
        let mut store = EntryStore::new(MemoryHive::new());
        store
            .add(&ContextMenuEntry {
                key: "womSetup".to_string(),
                title: "Setup Project".to_string(),
                command: r#""py" "C:\tools\setup.py" "%V""#.to_string(),
                icon_path: None,
                script_type: ScriptType::Python,
                source_path: r"C:\tools\setup.py".to_string(),
            })
            .unwrap();
        let orphan = format!(r"{}\git_gui\command", Scope::File.root_key());
        store.hive_mut().set_value(&orphan, "", "git-gui.exe").unwrap();
        store.list().unwrap()
    }

    #[test]
    fn test_format_entries() {
        let output = format_entries(&listed());
        assert!(output.contains("womSetup"));
        assert!(output.contains("Setup Project"));
        assert!(output.contains("file+background"));
        assert!(output.contains("(unlabeled)"));
        assert!(output.contains("2 entries found, 1 in only one scope"));
    }

    #[test]
    fn test_format_empty() {
        assert_eq!(format_entries(&[]), "No context-menu entries found.");
    }
}
