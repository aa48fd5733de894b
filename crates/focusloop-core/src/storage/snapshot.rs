//! The persisted timer snapshot.
//!
//! Deliberately excludes `remaining_seconds` and `running`: both are derived
//! at load time, so a reload never resumes mid-countdown and never replays a
//! stale duration after a settings change.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::timer::{TimerMode, TimerSettings};

use super::KeyValueStore;

/// Key under which the snapshot lives in the kv store.
pub const SNAPSHOT_KEY: &str = "timer_snapshot";

/// Everything the timer persists across restarts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub settings: TimerSettings,
    pub mode: TimerMode,
    pub completed_focus_count: u32,
    pub completed_cycle_count: u32,
}

impl Snapshot {
    /// Read the last snapshot.
    ///
    /// Store errors and corrupt payloads degrade to `None` with a stderr
    /// warning: rehydration falls back entirely to defaults, never a partial
    /// repair.
    pub fn load_from(store: &dyn KeyValueStore) -> Option<Self> {
        let raw = match store.get(SNAPSHOT_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                eprintln!("warning: failed to read persisted timer state: {e}");
                return None;
            }
        };
        match serde_json::from_str(&raw) {
            Ok(snapshot) => Some(snapshot),
            Err(e) => {
                eprintln!("warning: discarding corrupt timer snapshot: {e}");
                None
            }
        }
    }

    /// Persist this snapshot as JSON under [`SNAPSHOT_KEY`].
    pub fn save_to(&self, store: &dyn KeyValueStore) -> Result<(), CoreError> {
        let json = serde_json::to_string(self)?;
        store.set(SNAPSHOT_KEY, &json)?;
        Ok(())
    }
}
