//! wom-menu library
//!
//! Registers scripts as Windows Explorer context-menu actions under the
//! per-user registry, mirrored into the folder and folder-background menus,
//! with JSON backup and restore.

pub mod backup;
pub mod config;
pub mod error;
pub mod logging;
pub mod menu;
pub mod store;
pub mod validate;

pub use error::{MenuError, Result};
pub use menu::{ContextMenuEntry, ScriptType};
pub use store::{EntryStore, Hive, Scope};
