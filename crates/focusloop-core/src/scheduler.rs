//! Periodic tick source for the countdown engine.
//!
//! Wraps a tokio task around a nominal 1 Hz interval. Exactly one source is
//! active at a time: `start` while active is a no-op, `stop` aborts the task
//! so no further ticks are delivered. The callback returns `false` to tear
//! the source down from inside (when the engine pauses).
//!
//! Drift policy: fixed decrement. Each delivered tick is worth exactly one
//! second; missed wakeups are skipped, not replayed.

use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

/// Nominal tick period.
pub const TICK_PERIOD: Duration = Duration::from_secs(1);

pub struct Scheduler {
    period: Duration,
    handle: Option<JoinHandle<()>>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::with_period(TICK_PERIOD)
    }

    pub fn with_period(period: Duration) -> Self {
        Self {
            period,
            handle: None,
        }
    }

    /// Whether a tick task is currently delivering.
    pub fn is_active(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }

    /// Spawn the tick task. No-op when one is already active, so starting
    /// twice can never double-count.
    ///
    /// `on_tick` runs once per period until it returns `false` or [`stop`]
    /// is called.
    ///
    /// [`stop`]: Scheduler::stop
    pub fn start<F>(&mut self, mut on_tick: F)
    where
        F: FnMut() -> bool + Send + 'static,
    {
        if self.is_active() {
            return;
        }
        let period = self.period;
        self.handle = Some(tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
            // An interval's first tick fires immediately; consume it so the
            // first callback lands one full period after start.
            interval.tick().await;
            loop {
                interval.tick().await;
                if !on_tick() {
                    break;
                }
            }
        }));
    }

    /// Tear down the tick task. Idempotent.
    pub fn stop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }

    /// Wait for the tick task to exit on its own (callback returned
    /// `false`). Cancellation-safe: dropping this future leaves the task
    /// (and `stop`) intact.
    pub async fn joined(&mut self) {
        if let Some(handle) = self.handle.as_mut() {
            let _ = handle.await;
            self.handle = None;
        }
    }
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for Scheduler {
    fn drop(&mut self) {
        self.stop();
    }
}
