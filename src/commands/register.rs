//! Register command - Add a script to the context menus

use anyhow::{Context, Result};
use owo_colors::OwoColorize;
use std::path::PathBuf;

use super::utils;
use wom_menu::config;
use wom_menu::validate::{RegisterRequest, ValidationGate};

/// Execute the register command
pub fn execute(
    script: &str,
    title: &str,
    icon: &str,
    key: Option<String>,
    dry_run: bool,
) -> Result<()> {
    let request = RegisterRequest {
        script: PathBuf::from(script),
        title: title.to_string(),
        icon: icon.to_string(),
        key,
    };
    let gate = ValidationGate::new(config::STORE_ROOT);

    if dry_run {
        let prepared = gate.dry_run(&request)?;
        if let Some(warning) = &prepared.icon_warning {
            println!("{} {}", "Warning:".yellow(), warning);
        }
        println!("Would register:");
        utils::print_entry(&prepared.entry);
        println!();
        println!("{}", "(DRY-RUN) No changes made.".blue());
        return Ok(());
    }

    let mut store = utils::open_store()?;
    let (prepared, report) = gate
        .register(&mut store, &request)
        .with_context(|| format!("Failed to register {}", script))?;

    if let Some(warning) = &prepared.icon_warning {
        println!("{} {}", "Warning:".yellow(), warning);
    }

    let label = if report.is_new() {
        "Registered:".green().to_string()
    } else {
        "Updated:".green().to_string()
    };
    println!("{} {}", label, prepared.entry.title);
    utils::print_entry(&prepared.entry);
    println!(
        "  Scopes:  file ({}), background ({})",
        utils::describe_write(report.file),
        utils::describe_write(report.background)
    );

    Ok(())
}
