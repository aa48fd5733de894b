//! Timer settings: merge-and-clamp configuration for the countdown engine.
//!
//! Settings are only ever mutated through [`TimerSettings::merged`], which
//! applies a partial patch and clamps every numeric field into its valid
//! range. Out-of-range values are silently corrected, never rejected, so the
//! engine always ends up in a valid state.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::mode::TimerMode;

/// Valid range for per-mode session durations, in minutes.
pub const MIN_SESSION_MINUTES: u32 = 1;
pub const MAX_SESSION_MINUTES: u32 = 60;

/// Alarm sounds shipped with the app.
pub const ALARM_SOUNDS: [&str; 5] = ["bell", "digital", "kitchen", "analog", "wood"];

/// Validated timer configuration.
///
/// Field names on the wire are camelCase, matching the persisted snapshot
/// format (`focusMinutes`, `alarmSoundId`, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimerSettings {
    #[serde(default = "default_focus_minutes")]
    pub focus_minutes: u32,
    #[serde(default = "default_short_break_minutes")]
    pub short_break_minutes: u32,
    #[serde(default = "default_long_break_minutes")]
    pub long_break_minutes: u32,
    /// Completed focus sessions between long breaks.
    #[serde(default = "default_long_break_interval")]
    pub long_break_interval: u32,
    #[serde(default = "default_true")]
    pub auto_start_breaks: bool,
    #[serde(default)]
    pub auto_start_focus: bool,
    #[serde(default = "default_alarm_sound")]
    pub alarm_sound_id: String,
    #[serde(default = "default_alarm_volume")]
    pub alarm_volume: f32,
    /// Per-mode accent color overrides.
    #[serde(default)]
    pub theme_colors: Option<BTreeMap<TimerMode, String>>,
}

// Default functions
fn default_focus_minutes() -> u32 {
    25
}
fn default_short_break_minutes() -> u32 {
    5
}
fn default_long_break_minutes() -> u32 {
    15
}
fn default_long_break_interval() -> u32 {
    4
}
fn default_true() -> bool {
    true
}
fn default_alarm_sound() -> String {
    "bell".into()
}
fn default_alarm_volume() -> f32 {
    0.7
}

impl Default for TimerSettings {
    fn default() -> Self {
        Self {
            focus_minutes: default_focus_minutes(),
            short_break_minutes: default_short_break_minutes(),
            long_break_minutes: default_long_break_minutes(),
            long_break_interval: default_long_break_interval(),
            auto_start_breaks: true,
            auto_start_focus: false,
            alarm_sound_id: default_alarm_sound(),
            alarm_volume: default_alarm_volume(),
            theme_colors: None,
        }
    }
}

/// A partial settings update. Absent fields leave the current value
/// unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SettingsPatch {
    pub focus_minutes: Option<u32>,
    pub short_break_minutes: Option<u32>,
    pub long_break_minutes: Option<u32>,
    pub long_break_interval: Option<u32>,
    pub auto_start_breaks: Option<bool>,
    pub auto_start_focus: Option<bool>,
    pub alarm_sound_id: Option<String>,
    pub alarm_volume: Option<f32>,
    /// Replaces the whole override map when present.
    pub theme_colors: Option<BTreeMap<TimerMode, String>>,
}

impl From<TimerSettings> for SettingsPatch {
    fn from(settings: TimerSettings) -> Self {
        Self {
            focus_minutes: Some(settings.focus_minutes),
            short_break_minutes: Some(settings.short_break_minutes),
            long_break_minutes: Some(settings.long_break_minutes),
            long_break_interval: Some(settings.long_break_interval),
            auto_start_breaks: Some(settings.auto_start_breaks),
            auto_start_focus: Some(settings.auto_start_focus),
            alarm_sound_id: Some(settings.alarm_sound_id),
            alarm_volume: Some(settings.alarm_volume),
            theme_colors: settings.theme_colors,
        }
    }
}

impl TimerSettings {
    /// Configured minutes for a mode.
    pub fn minutes_for(&self, mode: TimerMode) -> u32 {
        match mode {
            TimerMode::Focus => self.focus_minutes,
            TimerMode::ShortBreak => self.short_break_minutes,
            TimerMode::LongBreak => self.long_break_minutes,
        }
    }

    /// Full countdown duration for a mode, in seconds.
    pub fn duration_seconds(&self, mode: TimerMode) -> u32 {
        self.minutes_for(mode) * 60
    }

    /// Accent color for a mode: the configured override or the built-in
    /// default.
    pub fn theme_color(&self, mode: TimerMode) -> &str {
        self.theme_colors
            .as_ref()
            .and_then(|colors| colors.get(&mode))
            .map(String::as_str)
            .unwrap_or(mode.default_theme_color())
    }

    /// Pure merge: apply `patch` on top of `self`, then clamp.
    pub fn merged(&self, patch: SettingsPatch) -> Self {
        let mut next = self.clone();
        if let Some(v) = patch.focus_minutes {
            next.focus_minutes = v;
        }
        if let Some(v) = patch.short_break_minutes {
            next.short_break_minutes = v;
        }
        if let Some(v) = patch.long_break_minutes {
            next.long_break_minutes = v;
        }
        if let Some(v) = patch.long_break_interval {
            next.long_break_interval = v;
        }
        if let Some(v) = patch.auto_start_breaks {
            next.auto_start_breaks = v;
        }
        if let Some(v) = patch.auto_start_focus {
            next.auto_start_focus = v;
        }
        if let Some(v) = patch.alarm_sound_id {
            next.alarm_sound_id = v;
        }
        if let Some(v) = patch.alarm_volume {
            next.alarm_volume = v;
        }
        if let Some(v) = patch.theme_colors {
            next.theme_colors = Some(v);
        }
        next.clamped()
    }

    /// Clamp every numeric field into its valid range. The interval floor
    /// also guards the modulo in the mode-transition algorithm.
    pub fn clamped(mut self) -> Self {
        self.focus_minutes = self
            .focus_minutes
            .clamp(MIN_SESSION_MINUTES, MAX_SESSION_MINUTES);
        self.short_break_minutes = self
            .short_break_minutes
            .clamp(MIN_SESSION_MINUTES, MAX_SESSION_MINUTES);
        self.long_break_minutes = self
            .long_break_minutes
            .clamp(MIN_SESSION_MINUTES, MAX_SESSION_MINUTES);
        self.long_break_interval = self.long_break_interval.max(1);
        self.alarm_volume = if self.alarm_volume.is_finite() {
            self.alarm_volume.clamp(0.0, 1.0)
        } else {
            default_alarm_volume()
        };
        self
    }
}
