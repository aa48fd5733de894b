//! # Focusloop Core Library
//!
//! This library provides the core business logic for the Focusloop focus
//! timer: a settings-driven countdown state machine with restart-safe
//! persistence. The CLI binary is a thin layer over this library; any other
//! front end (tray widget, GUI) is expected to consume the same API.
//!
//! ## Architecture
//!
//! - **Timer Engine**: a caller-driven state machine; a [`Scheduler`] (or any
//!   host loop) invokes `tick()` once per second while the timer is running
//! - **Settings**: merge-and-clamp configuration; changing the active mode's
//!   duration resets the countdown to the new full duration
//! - **Storage**: SQLite-backed key-value store holding a snapshot of
//!   settings, mode and counters -- never remaining time
//! - **Alerts**: capability ports for sound and notification delivery, fired
//!   best-effort when a session completes
//!
//! ## Key Components
//!
//! - [`TimerEngine`]: the countdown state machine
//! - [`TimerSettings`]: validated configuration
//! - [`Snapshot`]: restart-safe persisted state
//! - [`Scheduler`]: 1 Hz tick source

pub mod alerts;
pub mod error;
pub mod events;
pub mod scheduler;
pub mod storage;
pub mod timer;

pub use alerts::{AlertError, CompletionAlerts, NotificationSink, SoundPlayer};
pub use error::{CoreError, StorageError};
pub use events::{CompletionCause, Event};
pub use scheduler::Scheduler;
pub use storage::{Database, KeyValueStore, Snapshot, SNAPSHOT_KEY};
pub use timer::{format_clock, SettingsPatch, TimerEngine, TimerMode, TimerSettings, TimerState};
