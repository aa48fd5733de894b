//! Completion alert ports: sound and notification delivery.
//!
//! Delivery is best-effort. A failing player or sink is logged to stderr
//! and never blocks or rolls back a mode transition.

use thiserror::Error;

use crate::timer::{TimerMode, TimerSettings};

#[derive(Error, Debug)]
pub enum AlertError {
    #[error("sound playback failed: {0}")]
    Playback(String),

    #[error("notification delivery failed: {0}")]
    Notification(String),
}

/// Plays a named alarm sound at a given volume.
pub trait SoundPlayer: Send + Sync {
    /// `sound_id` is one of [`crate::timer::ALARM_SOUNDS`]; `volume` is
    /// 0.0..=1.0.
    fn play(&self, sound_id: &str, volume: f32) -> Result<(), AlertError>;
}

/// Shows a desktop-style notification.
///
/// An implementation without a permission grant should decline silently by
/// returning `Ok` -- missing permission is a normal condition, not an error.
pub trait NotificationSink: Send + Sync {
    fn show(&self, title: &str, body: &str) -> Result<(), AlertError>;
}

/// Fan-out for the side effects of a session ending.
pub struct CompletionAlerts {
    sound: Option<Box<dyn SoundPlayer>>,
    notifier: Option<Box<dyn NotificationSink>>,
}

impl CompletionAlerts {
    pub fn new(sound: Box<dyn SoundPlayer>, notifier: Box<dyn NotificationSink>) -> Self {
        Self {
            sound: Some(sound),
            notifier: Some(notifier),
        }
    }

    /// No-op alerts for headless commands and tests.
    pub fn disabled() -> Self {
        Self {
            sound: None,
            notifier: None,
        }
    }

    /// Fire sound and notification for a finished period. Never fails;
    /// delivery errors are logged and swallowed.
    pub fn session_complete(&self, finished: TimerMode, settings: &TimerSettings) {
        if let Some(player) = &self.sound {
            if let Err(e) = player.play(&settings.alarm_sound_id, settings.alarm_volume) {
                eprintln!("warning: failed to play alarm sound: {e}");
            }
        }
        if let Some(sink) = &self.notifier {
            let (title, body) = match finished {
                TimerMode::Focus => ("Focus complete!", "Time to take a break."),
                TimerMode::ShortBreak | TimerMode::LongBreak => {
                    ("Break complete!", "Ready to focus again?")
                }
            };
            if let Err(e) = sink.show(title, body) {
                eprintln!("warning: failed to deliver notification: {e}");
            }
        }
    }
}
