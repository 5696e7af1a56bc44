//! The hierarchical key-value store seam
//!
//! Paths are backslash-separated and relative to the hive root, matching the
//! Windows registry layout (`Software\Classes\Directory\shell\womSetup`).
//! The unnamed default value of a key is addressed with the empty name `""`.

use std::io;

/// Which top-level root a hive writes under
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RootScope {
    /// HKEY_CURRENT_USER, writable without elevation
    CurrentUser,
    /// HKEY_LOCAL_MACHINE, shared by all accounts
    LocalMachine,
}

impl std::fmt::Display for RootScope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::CurrentUser => write!(f, "HKEY_CURRENT_USER"),
            Self::LocalMachine => write!(f, "HKEY_LOCAL_MACHINE"),
        }
    }
}

/// Minimal registry-like operations used by [`EntryStore`](super::EntryStore)
pub trait Hive {
    fn root(&self) -> RootScope;

    /// Names of immediate children; empty when `path` does not exist
    fn subkeys(&self, path: &str) -> io::Result<Vec<String>>;

    fn key_exists(&self, path: &str) -> io::Result<bool>;

    /// String value, `None` when the key or the value is missing
    fn get_value(&self, path: &str, name: &str) -> io::Result<Option<String>>;

    /// Create `path` (and parents) if needed, then set the value
    fn set_value(&mut self, path: &str, name: &str, value: &str) -> io::Result<()>;

    /// Missing keys or values are not an error
    fn delete_value(&mut self, path: &str, name: &str) -> io::Result<()>;

    /// Delete `path` and everything below it; `false` when it did not exist
    fn delete_tree(&mut self, path: &str) -> io::Result<bool>;
}
