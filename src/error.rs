//! Error types for context-menu registration

use std::path::PathBuf;
use thiserror::Error;

use crate::store::Scope;

/// Errors raised by the I/O stages (store, backup, validation)
///
/// Classification, command synthesis, icon resolution, and key generation are
/// total and never produce one of these.
#[derive(Debug, Error)]
pub enum MenuError {
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Store access failed in {scope} scope ({target}): {source}")]
    StoreAccess {
        scope: Scope,
        target: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed backup file {}: {source}", path.display())]
    Serialization {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{0}")]
    Unsupported(String),
}

impl MenuError {
    pub(crate) fn store(scope: Scope, target: &str, source: std::io::Error) -> Self {
        MenuError::StoreAccess {
            scope,
            target: target.to_string(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, MenuError>;
