//! wom-menu: attach scripts to the Explorer right-click menu

use anyhow::Result;
use clap::{Parser, Subcommand};
use owo_colors::OwoColorize;

mod commands;

#[derive(Parser)]
#[command(name = "wom-menu")]
#[command(about = "Register scripts as Explorer context-menu actions", long_about = None)]
#[command(version)]
struct Cli {
    /// Show debug logging (overridden by WOM_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Add a script to the folder and folder-background menus
    Register {
        /// Script or executable to run
        script: String,

        /// Menu text shown in Explorer
        title: String,

        /// Icon: auto, python/py, powershell/ps, cmd/batch, none, or a file path
        #[arg(default_value = "auto")]
        icon: String,

        /// Use this key instead of one derived from the file name
        #[arg(long)]
        key: Option<String>,

        /// Show the resolved entry without writing it
        #[arg(short = 'n', long)]
        dry_run: bool,
    },

    /// List every entry in the folder and folder-background menus
    List,

    /// Remove an entry from both menus
    Remove {
        /// Entry key (see `list`)
        key: String,
    },

    /// Save registered entries to a JSON file
    Backup {
        /// Output file (defaults to the wom-menu backups directory)
        backup_file: Option<String>,
    },

    /// Re-register entries from a backup file
    Restore {
        /// Backup file to restore from
        backup_file: String,

        /// Show what would be restored without making changes
        #[arg(short = 'n', long)]
        dry_run: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    wom_menu::logging::init(cli.verbose);

    match cli.command {
        Commands::Register {
            script,
            title,
            icon,
            key,
            dry_run,
        } => {
            if dry_run {
                println!("{}", "(DRY-RUN MODE - no changes will be made)".blue());
            }
            commands::register::execute(&script, &title, &icon, key, dry_run)?;
        }

        Commands::List => {
            commands::list::execute();
        }

        Commands::Remove { key } => {
            commands::remove::execute(&key)?;
        }

        Commands::Backup { backup_file } => {
            commands::backup::execute(backup_file.as_deref())?;
        }

        Commands::Restore {
            backup_file,
            dry_run,
        } => {
            if dry_run {
                println!("{}", "(DRY-RUN MODE - no changes will be made)".blue());
            }
            commands::restore::execute(&backup_file, dry_run)?;
        }
    }

    Ok(())
}
