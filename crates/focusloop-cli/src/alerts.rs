//! Terminal-backed implementations of the core alert ports.

use std::io::Write;

use focusloop_core::{AlertError, NotificationSink, SoundPlayer};

/// Rings the terminal bell. The configured sound id and volume have no
/// terminal equivalent and are ignored.
pub struct TerminalBell;

impl SoundPlayer for TerminalBell {
    fn play(&self, _sound_id: &str, _volume: f32) -> Result<(), AlertError> {
        let mut out = std::io::stdout();
        out.write_all(b"\x07")
            .and_then(|_| out.flush())
            .map_err(|e| AlertError::Playback(e.to_string()))
    }
}

/// Prints the notification to stderr, keeping stdout clean for JSON output.
pub struct ConsoleNotification;

impl NotificationSink for ConsoleNotification {
    fn show(&self, title: &str, body: &str) -> Result<(), AlertError> {
        eprintln!("{title} {body}");
        Ok(())
    }
}
