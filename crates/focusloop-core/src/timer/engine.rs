//! Countdown engine: the timer state machine.
//!
//! The engine owns mode, remaining time, the running flag and the session
//! counters. It has no internal clock -- a [`crate::Scheduler`] (or any host
//! loop) drives it by calling `tick()` once per second while it is running.
//!
//! ## State transitions
//!
//! ```text
//! Focus -> ShortBreak -> Focus -> ... -> LongBreak -> Focus
//! ```
//!
//! A Focus period ending (expiry or skip) increments the focus counter; every
//! `long_break_interval`-th one leads into a LongBreak, whose end increments
//! the cycle counter.
//!
//! ## Usage
//!
//! ```ignore
//! let mut engine = TimerEngine::rehydrate(Snapshot::load_from(&db), alerts);
//! engine.start();
//! // In a loop, once per second:
//! engine.tick(); // Returns Some(Event::SessionCompleted) when a period ends
//! ```

use chrono::Utc;

use crate::alerts::CompletionAlerts;
use crate::events::{CompletionCause, Event};
use crate::storage::Snapshot;

use super::mode::TimerMode;
use super::settings::{SettingsPatch, TimerSettings};
use super::transition::{self, TickOutcome, TimerState};

/// Core timer engine.
///
/// All operations run to completion before the next one begins; hosts with
/// real parallelism wrap the engine in a single mutex.
pub struct TimerEngine {
    state: TimerState,
    settings: TimerSettings,
    alerts: CompletionAlerts,
}

impl TimerEngine {
    /// Create a fresh engine in Focus mode with zeroed counters.
    pub fn new(settings: TimerSettings, alerts: CompletionAlerts) -> Self {
        let settings = settings.clamped();
        Self {
            state: TimerState::initial(TimerMode::Focus, &settings),
            settings,
            alerts,
        }
    }

    /// Restore from a persisted snapshot, or fall back to defaults.
    ///
    /// Settings, mode and counters come from the snapshot; remaining time is
    /// always recomputed from the restored settings and the engine always
    /// comes up paused. A reload never resumes mid-countdown and never
    /// replays a stale duration after a settings change.
    pub fn rehydrate(snapshot: Option<Snapshot>, alerts: CompletionAlerts) -> Self {
        match snapshot {
            Some(snap) => {
                let settings = snap.settings.clamped();
                let mut state = TimerState::initial(snap.mode, &settings);
                state.completed_focus_count = snap.completed_focus_count;
                state.completed_cycle_count = snap.completed_cycle_count;
                Self {
                    state,
                    settings,
                    alerts,
                }
            }
            None => Self::new(TimerSettings::default(), alerts),
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> &TimerState {
        &self.state
    }

    pub fn settings(&self) -> &TimerSettings {
        &self.settings
    }

    pub fn mode(&self) -> TimerMode {
        self.state.mode
    }

    pub fn remaining_seconds(&self) -> u32 {
        self.state.remaining_seconds
    }

    pub fn is_running(&self) -> bool {
        self.state.running
    }

    pub fn total_seconds(&self) -> u32 {
        self.settings.duration_seconds(self.state.mode)
    }

    /// 0.0 .. 1.0 progress within the current period.
    pub fn progress(&self) -> f64 {
        let total = self.total_seconds();
        if total == 0 {
            return 0.0;
        }
        1.0 - (self.state.remaining_seconds as f64 / total as f64)
    }

    /// The persistable part of the state: settings, mode, counters.
    pub fn to_snapshot(&self) -> Snapshot {
        Snapshot {
            settings: self.settings.clone(),
            mode: self.state.mode,
            completed_focus_count: self.state.completed_focus_count,
            completed_cycle_count: self.state.completed_cycle_count,
        }
    }

    /// Build a full state snapshot event.
    pub fn snapshot_event(&self) -> Event {
        Event::StateSnapshot {
            mode: self.state.mode,
            remaining_seconds: self.state.remaining_seconds,
            total_seconds: self.total_seconds(),
            running: self.state.running,
            completed_focus_count: self.state.completed_focus_count,
            completed_cycle_count: self.state.completed_cycle_count,
            progress: self.progress(),
            at: Utc::now(),
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Begin counting down. No effect while already running or with nothing
    /// left on the clock.
    pub fn start(&mut self) -> Option<Event> {
        if self.state.running || self.state.remaining_seconds == 0 {
            return None;
        }
        self.state = transition::start(&self.state);
        Some(Event::TimerStarted {
            mode: self.state.mode,
            remaining_seconds: self.state.remaining_seconds,
            at: Utc::now(),
        })
    }

    /// Stop counting down. Idempotent.
    pub fn pause(&mut self) -> Option<Event> {
        if !self.state.running {
            return None;
        }
        self.state = transition::pause(&self.state);
        Some(Event::TimerPaused {
            mode: self.state.mode,
            remaining_seconds: self.state.remaining_seconds,
            at: Utc::now(),
        })
    }

    /// Restore the full duration, paused. `mode` switches the period;
    /// counters are untouched either way.
    pub fn reset(&mut self, mode: Option<TimerMode>) -> Event {
        let mode = mode.unwrap_or(self.state.mode);
        self.state = transition::reset(&self.state, &self.settings, mode);
        Event::TimerReset {
            mode,
            remaining_seconds: self.state.remaining_seconds,
            at: Utc::now(),
        }
    }

    /// End the current period now and advance to the next one.
    ///
    /// Runs the same transition algorithm as tick-to-zero, so a skipped
    /// session still counts as completed.
    pub fn skip(&mut self) -> Event {
        let finished = self.state.mode;
        self.state = transition::advance(&self.state, &self.settings);
        self.completion_event(finished, CompletionCause::Skipped)
    }

    /// One one-second decrement. No-op while paused or at zero.
    ///
    /// When the decrement reaches zero the completion alerts fire (best
    /// effort, failures swallowed) and the engine advances to the next
    /// period.
    pub fn tick(&mut self) -> Option<Event> {
        let TickOutcome { state, finished } = transition::tick(&self.state, &self.settings);
        let finished = match finished {
            Some(mode) => mode,
            None => {
                self.state = state;
                return None;
            }
        };
        // Alerts fire between the countdown hitting zero and the transition
        // committing; their failure never blocks it.
        self.alerts.session_complete(finished, &self.settings);
        self.state = state;
        Some(self.completion_event(finished, CompletionCause::Expired))
    }

    /// Merge a settings patch, clamping every numeric field.
    ///
    /// When the patch carries the duration field of the currently active
    /// mode, the countdown resets to the new full duration; elapsed time is
    /// discarded, never prorated. Other fields never touch remaining time.
    pub fn update_settings(&mut self, patch: SettingsPatch) -> Event {
        let active_duration_patched = match self.state.mode {
            TimerMode::Focus => patch.focus_minutes.is_some(),
            TimerMode::ShortBreak => patch.short_break_minutes.is_some(),
            TimerMode::LongBreak => patch.long_break_minutes.is_some(),
        };
        self.settings = self.settings.merged(patch);
        if active_duration_patched {
            self.state.remaining_seconds = self.settings.duration_seconds(self.state.mode);
        }
        Event::SettingsUpdated {
            settings: self.settings.clone(),
            remaining_reset: active_duration_patched,
            at: Utc::now(),
        }
    }

    fn completion_event(&self, finished: TimerMode, cause: CompletionCause) -> Event {
        Event::SessionCompleted {
            finished,
            next: self.state.mode,
            cause,
            auto_started: self.state.running,
            completed_focus_count: self.state.completed_focus_count,
            completed_cycle_count: self.state.completed_cycle_count,
            at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alerts::{AlertError, NotificationSink, SoundPlayer};
    use std::sync::{Arc, Mutex};

    fn engine() -> TimerEngine {
        TimerEngine::new(TimerSettings::default(), CompletionAlerts::disabled())
    }

    fn engine_with(settings: TimerSettings) -> TimerEngine {
        TimerEngine::new(settings, CompletionAlerts::disabled())
    }

    struct RecordingPlayer(Arc<Mutex<Vec<(String, f32)>>>);

    impl SoundPlayer for RecordingPlayer {
        fn play(&self, sound_id: &str, volume: f32) -> Result<(), AlertError> {
            self.0.lock().unwrap().push((sound_id.to_string(), volume));
            Ok(())
        }
    }

    struct RecordingSink(Arc<Mutex<Vec<(String, String)>>>);

    impl NotificationSink for RecordingSink {
        fn show(&self, title: &str, body: &str) -> Result<(), AlertError> {
            self.0
                .lock()
                .unwrap()
                .push((title.to_string(), body.to_string()));
            Ok(())
        }
    }

    struct FailingPlayer;

    impl SoundPlayer for FailingPlayer {
        fn play(&self, _sound_id: &str, _volume: f32) -> Result<(), AlertError> {
            Err(AlertError::Playback("no audio device".into()))
        }
    }

    struct FailingSink;

    impl NotificationSink for FailingSink {
        fn show(&self, _title: &str, _body: &str) -> Result<(), AlertError> {
            Err(AlertError::Notification("permission revoked".into()))
        }
    }

    #[test]
    fn reset_restores_full_duration_paused() {
        let mut engine = engine();
        engine.start();
        for mode in [TimerMode::Focus, TimerMode::ShortBreak, TimerMode::LongBreak] {
            engine.reset(Some(mode));
            assert_eq!(engine.mode(), mode);
            assert_eq!(engine.remaining_seconds(), engine.total_seconds());
            assert!(!engine.is_running());
        }
    }

    #[test]
    fn reset_without_mode_keeps_the_current_one() {
        let mut engine = engine();
        engine.reset(Some(TimerMode::ShortBreak));
        engine.start();
        engine.tick();
        engine.reset(None);
        assert_eq!(engine.mode(), TimerMode::ShortBreak);
        assert_eq!(engine.remaining_seconds(), 5 * 60);
    }

    #[test]
    fn reset_does_not_touch_counters() {
        let mut engine = engine();
        engine.skip();
        engine.skip();
        let focus = engine.state().completed_focus_count;
        engine.reset(Some(TimerMode::Focus));
        assert_eq!(engine.state().completed_focus_count, focus);
    }

    #[test]
    fn start_is_idempotent() {
        let mut engine = engine();
        assert!(engine.start().is_some());
        assert!(engine.start().is_none());
        assert!(engine.is_running());
    }

    #[test]
    fn pause_is_idempotent() {
        let mut engine = engine();
        engine.start();
        assert!(engine.pause().is_some());
        let state = engine.state().clone();
        assert!(engine.pause().is_none());
        assert_eq!(engine.state(), &state);
    }

    #[test]
    fn tick_is_noop_while_paused() {
        let mut engine = engine();
        let state = engine.state().clone();
        assert!(engine.tick().is_none());
        assert_eq!(engine.state(), &state);
    }

    #[test]
    fn ticks_count_down_one_second_each() {
        let mut engine = engine();
        engine.start();
        for _ in 0..90 {
            engine.tick();
        }
        assert_eq!(engine.remaining_seconds(), 25 * 60 - 90);
    }

    #[test]
    fn fourth_focus_completion_is_the_long_break() {
        let mut engine = engine();
        for _ in 0..3 {
            engine.skip(); // focus ends
            engine.skip(); // break ends
        }
        engine.skip(); // fourth focus ends, 4 % 4 == 0
        assert_eq!(engine.state().completed_focus_count, 4);
        assert_eq!(engine.mode(), TimerMode::LongBreak);

        engine.skip(); // long break ends
        assert_eq!(engine.mode(), TimerMode::Focus);
        assert_eq!(engine.state().completed_cycle_count, 1);
        assert_eq!(engine.state().completed_focus_count, 4);
    }

    #[test]
    fn active_mode_duration_patch_resets_remaining() {
        let mut engine = engine();
        engine.skip(); // into ShortBreak, auto-started
        assert_eq!(engine.mode(), TimerMode::ShortBreak);
        for _ in 0..180 {
            engine.tick();
        }
        assert_eq!(engine.remaining_seconds(), 120);

        engine.update_settings(SettingsPatch {
            short_break_minutes: Some(10),
            ..SettingsPatch::default()
        });
        assert_eq!(engine.remaining_seconds(), 600);
    }

    #[test]
    fn other_fields_never_touch_remaining() {
        let mut engine = engine();
        engine.start();
        for _ in 0..30 {
            engine.tick();
        }
        let remaining = engine.remaining_seconds();

        engine.update_settings(SettingsPatch {
            short_break_minutes: Some(10),
            alarm_volume: Some(0.2),
            auto_start_focus: Some(true),
            ..SettingsPatch::default()
        });
        assert_eq!(engine.remaining_seconds(), remaining);
    }

    #[test]
    fn expiry_fires_alerts_then_advances() {
        let played = Arc::new(Mutex::new(Vec::new()));
        let shown = Arc::new(Mutex::new(Vec::new()));
        let alerts = CompletionAlerts::new(
            Box::new(RecordingPlayer(played.clone())),
            Box::new(RecordingSink(shown.clone())),
        );
        let settings = TimerSettings {
            focus_minutes: 1,
            ..TimerSettings::default()
        };
        let mut engine = TimerEngine::new(settings, alerts);
        engine.start();
        for _ in 0..59 {
            assert!(engine.tick().is_none());
        }
        let event = engine.tick().expect("final tick completes the session");

        {
            let played = played.lock().unwrap();
            assert_eq!(played.len(), 1);
            assert_eq!(played[0].0, "bell");
            assert_eq!(played[0].1, 0.7);
        }
        {
            let shown = shown.lock().unwrap();
            assert_eq!(shown.len(), 1);
            assert_eq!(shown[0].0, "Focus complete!");
            assert_eq!(shown[0].1, "Time to take a break.");
        }
        assert_eq!(engine.mode(), TimerMode::ShortBreak);
        assert_eq!(engine.state().completed_focus_count, 1);
        assert!(engine.is_running()); // autoStartBreaks default
        match event {
            Event::SessionCompleted {
                finished,
                next,
                cause,
                auto_started,
                ..
            } => {
                assert_eq!(finished, TimerMode::Focus);
                assert_eq!(next, TimerMode::ShortBreak);
                assert_eq!(cause, CompletionCause::Expired);
                assert!(auto_started);
            }
            other => panic!("expected SessionCompleted, got {other:?}"),
        }
    }

    #[test]
    fn failing_alerts_never_block_the_transition() {
        let alerts = CompletionAlerts::new(Box::new(FailingPlayer), Box::new(FailingSink));
        let settings = TimerSettings {
            focus_minutes: 1,
            ..TimerSettings::default()
        };
        let mut engine = TimerEngine::new(settings, alerts);
        engine.start();
        for _ in 0..60 {
            engine.tick();
        }
        assert_eq!(engine.mode(), TimerMode::ShortBreak);
        assert_eq!(engine.state().completed_focus_count, 1);
    }

    #[test]
    fn skip_does_not_fire_alerts() {
        let played = Arc::new(Mutex::new(Vec::new()));
        let shown = Arc::new(Mutex::new(Vec::new()));
        let alerts = CompletionAlerts::new(
            Box::new(RecordingPlayer(played.clone())),
            Box::new(RecordingSink(shown.clone())),
        );
        let mut engine = TimerEngine::new(TimerSettings::default(), alerts);
        engine.skip();
        assert!(played.lock().unwrap().is_empty());
        assert!(shown.lock().unwrap().is_empty());
    }

    #[test]
    fn break_end_respects_auto_start_focus() {
        let mut engine = engine_with(TimerSettings {
            auto_start_breaks: true,
            auto_start_focus: false,
            ..TimerSettings::default()
        });
        engine.skip(); // focus ends, break auto-starts
        assert!(engine.is_running());
        engine.skip(); // break ends
        assert_eq!(engine.mode(), TimerMode::Focus);
        assert!(!engine.is_running());
    }

    #[test]
    fn rehydrate_restores_counters_paused_at_full_duration() {
        let mut engine = engine_with(TimerSettings {
            focus_minutes: 30,
            ..TimerSettings::default()
        });
        for _ in 0..4 {
            engine.skip();
        }
        engine.start();
        let snapshot = engine.to_snapshot();

        let restored = TimerEngine::rehydrate(Some(snapshot), CompletionAlerts::disabled());
        assert_eq!(restored.mode(), TimerMode::LongBreak);
        assert_eq!(restored.state().completed_focus_count, 4);
        assert_eq!(restored.state().completed_cycle_count, 0);
        assert!(!restored.is_running());
        assert_eq!(restored.remaining_seconds(), restored.total_seconds());
        assert_eq!(restored.settings().focus_minutes, 30);
    }

    #[test]
    fn rehydrate_without_snapshot_uses_defaults() {
        let engine = TimerEngine::rehydrate(None, CompletionAlerts::disabled());
        assert_eq!(engine.mode(), TimerMode::Focus);
        assert_eq!(engine.remaining_seconds(), 25 * 60);
        assert_eq!(engine.state().completed_focus_count, 0);
        assert!(!engine.is_running());
    }

    #[test]
    fn rehydrate_clamps_out_of_range_settings() {
        let snapshot = Snapshot {
            settings: TimerSettings {
                focus_minutes: 500,
                long_break_interval: 0,
                ..TimerSettings::default()
            },
            mode: TimerMode::Focus,
            completed_focus_count: 0,
            completed_cycle_count: 0,
        };
        let engine = TimerEngine::rehydrate(Some(snapshot), CompletionAlerts::disabled());
        assert_eq!(engine.settings().focus_minutes, 60);
        assert_eq!(engine.settings().long_break_interval, 1);
        assert_eq!(engine.remaining_seconds(), 60 * 60);
    }

    #[test]
    fn progress_runs_zero_to_one() {
        let mut engine = engine();
        assert_eq!(engine.progress(), 0.0);
        engine.start();
        for _ in 0..(25 * 60 / 2) {
            engine.tick();
        }
        assert!((engine.progress() - 0.5).abs() < 1e-9);
    }
}
