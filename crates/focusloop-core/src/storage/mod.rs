//! Persistence: key-value state store and snapshot rehydration.

pub mod database;
pub mod snapshot;

pub use database::Database;
pub use snapshot::{Snapshot, SNAPSHOT_KEY};

use std::path::PathBuf;

use crate::error::StorageError;

/// Abstract string key-value storage backing the snapshot port.
///
/// Failures (quota, locks, corruption) surface as errors and are treated as
/// non-fatal by every caller in this crate: the engine keeps running without
/// persistence rather than crashing.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// Returns `~/.config/focusloop[-dev]/` based on FOCUSLOOP_ENV.
///
/// Set FOCUSLOOP_ENV=dev to use the development data directory.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf, std::io::Error> {
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("FOCUSLOOP_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("focusloop-dev")
    } else {
        base_dir.join("focusloop")
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
