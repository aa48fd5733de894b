use serde::{Deserialize, Serialize};

/// The three countdown periods. Closed set -- no custom modes.
///
/// Serialized exactly as `"Focus"`, `"ShortBreak"`, `"LongBreak"` in the
/// persisted snapshot and on every event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum TimerMode {
    Focus,
    ShortBreak,
    LongBreak,
}

impl TimerMode {
    /// Human-readable label for display layers.
    pub fn label(self) -> &'static str {
        match self {
            TimerMode::Focus => "Focus Time",
            TimerMode::ShortBreak => "Short Break",
            TimerMode::LongBreak => "Long Break",
        }
    }

    /// Built-in accent color, used when settings carry no override.
    pub fn default_theme_color(self) -> &'static str {
        match self {
            TimerMode::Focus => "#BA4949",
            TimerMode::ShortBreak => "#388588",
            TimerMode::LongBreak => "#397097",
        }
    }
}

/// Format a second count as zero-padded `MM:SS`.
pub fn format_clock(seconds: u32) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}
