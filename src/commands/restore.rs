//! Restore command - Re-register entries from a backup file

use anyhow::Result;
use owo_colors::OwoColorize;
use std::path::Path;

use super::utils;
use wom_menu::backup::{self, BackupSnapshot};

/// Execute the restore command
pub fn execute(backup_file: &str, dry_run: bool) -> Result<()> {
    let path = Path::new(backup_file);

    if dry_run {
        let snapshot = BackupSnapshot::read(path)?;
        println!(
            "Backup from {} with {} entries:",
            snapshot.timestamp,
            snapshot.entries.len()
        );
        for entry in &snapshot.entries {
            println!("  -> {} ({})", entry.key, entry.title);
        }
        println!();
        println!("{}", "(DRY-RUN) No changes made.".blue());
        return Ok(());
    }

    let mut store = utils::open_store()?;
    let report = backup::restore(&mut store, path)?;

    if report.is_empty() {
        println!("{}", "Backup contains no entries; nothing restored.".yellow());
        return Ok(());
    }

    for (key, added) in &report.restored {
        println!("  -> {} ({})", key, utils::describe_write(added.file).green());
    }
    if report.duplicates > 0 {
        println!(
            "{} {} duplicate keys skipped (last occurrence kept)",
            "Note:".yellow(),
            report.duplicates
        );
    }
    println!(
        "{} {} entries from {}",
        "Restored:".green(),
        report.restored.len(),
        path.display()
    );

    Ok(())
}
