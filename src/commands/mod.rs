//! CLI commands

pub mod backup;
pub mod list;
pub mod register;
pub mod remove;
pub mod restore;
pub mod utils;
