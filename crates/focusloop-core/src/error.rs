//! Core error types for focusloop-core.
//!
//! Everything fallible in the library reports through this hierarchy. Per
//! the countdown contract, none of these errors are fatal to the timer: the
//! engine itself never errors under valid input, and callers treat storage
//! and alert failures as warnings.

use std::path::PathBuf;
use thiserror::Error;

use crate::alerts::AlertError;

/// Top-level error type for focusloop-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// State store errors
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    /// Sound/notification delivery errors
    #[error("alert error: {0}")]
    Alert(#[from] AlertError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic errors with context
    #[error("{0}")]
    Custom(String),
}

/// State-store-specific errors.
#[derive(Error, Debug)]
pub enum StorageError {
    /// Could not resolve or create the data directory
    #[error("failed to resolve data directory: {0}")]
    DataDir(#[from] std::io::Error),

    /// Failed to open the store file
    #[error("failed to open state store at {path}: {source}")]
    OpenFailed {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    /// Query execution failed
    #[error("query failed: {0}")]
    QueryFailed(String),

    /// Store is locked by another process
    #[error("state store is locked")]
    Locked,
}

impl From<rusqlite::Error> for StorageError {
    fn from(err: rusqlite::Error) -> Self {
        match &err {
            rusqlite::Error::SqliteFailure(err, _msg) => {
                if err.code == rusqlite::ErrorCode::DatabaseLocked {
                    StorageError::Locked
                } else {
                    StorageError::QueryFailed(err.to_string())
                }
            }
            _ => StorageError::QueryFailed(err.to_string()),
        }
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
