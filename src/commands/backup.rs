//! Backup command - Save registered entries to a JSON file

use anyhow::{Context, Result};
use owo_colors::OwoColorize;
use std::fs;
use std::path::PathBuf;

use super::utils;
use wom_menu::config;

/// Execute the backup command
pub fn execute(backup_file: Option<&str>) -> Result<()> {
    let path = match backup_file {
        Some(file) => PathBuf::from(file),
        None => {
            let dir = config::backups_dir()?;
            fs::create_dir_all(&dir)
                .with_context(|| format!("Failed to create {}", dir.display()))?;
            config::default_backup_file()?
        }
    };

    let store = utils::open_store()?;
    let report = wom_menu::backup::backup(&store, &path)?;

    for key in &report.skipped {
        println!("{} {} has no command and was left out", "Warning:".yellow(), key);
    }
    println!(
        "{} {} ({} entries)",
        "Created:".green(),
        report.path.display(),
        report.entries
    );

    Ok(())
}
