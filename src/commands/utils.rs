//! Shared utilities for commands

use anyhow::Result;
use owo_colors::OwoColorize;

use wom_menu::menu::ContextMenuEntry;
use wom_menu::store::WriteStatus;
use wom_menu::EntryStore;

#[cfg(windows)]
pub type UserStore = EntryStore<wom_menu::store::registry::RegistryHive>;

#[cfg(not(windows))]
pub type UserStore = EntryStore<wom_menu::store::MemoryHive>;

/// Open the current user's context-menu store
#[cfg(windows)]
pub fn open_store() -> Result<UserStore> {
    let hive = wom_menu::store::registry::RegistryHive::open(wom_menu::config::STORE_ROOT);
    Ok(EntryStore::new(hive))
}

/// Open the current user's context-menu store
#[cfg(not(windows))]
pub fn open_store() -> Result<UserStore> {
    Err(wom_menu::MenuError::Unsupported(
        "Explorer context menus are only supported on Windows".to_string(),
    )
    .into())
}

/// Print the resolved fields of an entry
pub fn print_entry(entry: &ContextMenuEntry) {
    println!("  Key:     {}", entry.key);
    println!("  Title:   {}", entry.title);
    println!("  Type:    {}", entry.script_type);
    println!("  Command: {}", entry.command);
    match &entry.icon_path {
        Some(icon) => println!("  Icon:    {}", icon),
        None => println!("  Icon:    {}", "(file icon)".dimmed()),
    }
}

pub fn describe_write(status: WriteStatus) -> &'static str {
    match status {
        WriteStatus::Created => "created",
        WriteStatus::Overwritten => "overwritten",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_describe_write() {
        assert_eq!(describe_write(WriteStatus::Created), "created");
        assert_eq!(describe_write(WriteStatus::Overwritten), "overwritten");
    }

    #[cfg(not(windows))]
    #[test]
    fn test_open_store_unsupported() {
        let err = open_store().err().unwrap();
        assert!(err.to_string().contains("only supported on Windows"));
    }
}
