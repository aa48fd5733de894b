use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::timer::{TimerMode, TimerSettings};

/// How a session came to an end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompletionCause {
    /// The countdown reached zero.
    Expired,
    /// The user skipped ahead. Counts as completed all the same.
    Skipped,
}

/// Every externally visible transition in the engine produces an Event.
/// The CLI prints them; front ends can subscribe to them.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    TimerStarted {
        mode: TimerMode,
        remaining_seconds: u32,
        at: DateTime<Utc>,
    },
    TimerPaused {
        mode: TimerMode,
        remaining_seconds: u32,
        at: DateTime<Utc>,
    },
    TimerReset {
        mode: TimerMode,
        remaining_seconds: u32,
        at: DateTime<Utc>,
    },
    /// A period finished (expiry or skip) and the engine advanced to the
    /// next one.
    SessionCompleted {
        finished: TimerMode,
        next: TimerMode,
        cause: CompletionCause,
        auto_started: bool,
        completed_focus_count: u32,
        completed_cycle_count: u32,
        at: DateTime<Utc>,
    },
    SettingsUpdated {
        settings: TimerSettings,
        /// Whether the countdown was reset to the new full duration.
        remaining_reset: bool,
        at: DateTime<Utc>,
    },
    StateSnapshot {
        mode: TimerMode,
        remaining_seconds: u32,
        total_seconds: u32,
        running: bool,
        completed_focus_count: u32,
        completed_cycle_count: u32,
        progress: f64,
        at: DateTime<Utc>,
    },
}
