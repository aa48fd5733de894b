//! Pure state transitions for the countdown engine.
//!
//! Every operation is a function `(state, settings) -> state'` with no I/O
//! and no clock, so the mode-transition algorithm can be unit-tested without
//! ports or real time. [`super::TimerEngine`] is a thin stateful wrapper
//! around these functions.

use super::mode::TimerMode;
use super::settings::TimerSettings;

/// The engine-owned state.
///
/// `remaining_seconds` and `running` are derived at rehydration time and
/// never persisted; the counters and mode are.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimerState {
    pub mode: TimerMode,
    pub remaining_seconds: u32,
    pub running: bool,
    pub completed_focus_count: u32,
    pub completed_cycle_count: u32,
}

impl TimerState {
    /// Fresh state for `mode`: full duration, paused, counters zeroed.
    pub fn initial(mode: TimerMode, settings: &TimerSettings) -> Self {
        Self {
            mode,
            remaining_seconds: settings.duration_seconds(mode),
            running: false,
            completed_focus_count: 0,
            completed_cycle_count: 0,
        }
    }
}

/// Outcome of a single one-second tick.
pub struct TickOutcome {
    pub state: TimerState,
    /// The mode that just finished, when the decrement hit zero.
    pub finished: Option<TimerMode>,
}

/// `running = true`, but only with time left on the clock.
pub fn start(state: &TimerState) -> TimerState {
    TimerState {
        running: state.remaining_seconds > 0,
        ..state.clone()
    }
}

/// `running = false`. Idempotent.
pub fn pause(state: &TimerState) -> TimerState {
    TimerState {
        running: false,
        ..state.clone()
    }
}

/// Switch to `mode` at its full duration, paused. Counters untouched.
pub fn reset(state: &TimerState, settings: &TimerSettings, mode: TimerMode) -> TimerState {
    TimerState {
        mode,
        remaining_seconds: settings.duration_seconds(mode),
        running: false,
        ..state.clone()
    }
}

/// The mode-transition algorithm, shared by skip and tick-to-zero.
///
/// Ending a Focus period increments the focus counter and chooses the break
/// kind by `completed % interval`; ending a LongBreak increments the cycle
/// counter. The next period starts at its full duration, running per the
/// auto-start flags. The transition is taken as a whole.
pub fn advance(state: &TimerState, settings: &TimerSettings) -> TimerState {
    let mut next = state.clone();
    match state.mode {
        TimerMode::Focus => {
            next.completed_focus_count += 1;
            next.mode = if next.completed_focus_count % settings.long_break_interval == 0 {
                TimerMode::LongBreak
            } else {
                TimerMode::ShortBreak
            };
        }
        TimerMode::ShortBreak | TimerMode::LongBreak => {
            if state.mode == TimerMode::LongBreak {
                next.completed_cycle_count += 1;
            }
            next.mode = TimerMode::Focus;
        }
    }
    next.remaining_seconds = settings.duration_seconds(next.mode);
    next.running = if next.mode == TimerMode::Focus {
        settings.auto_start_focus
    } else {
        settings.auto_start_breaks
    };
    next
}

/// One one-second decrement. No-op while paused or already at zero; advances
/// through the mode transition when the decrement reaches zero.
pub fn tick(state: &TimerState, settings: &TimerSettings) -> TickOutcome {
    if !state.running || state.remaining_seconds == 0 {
        return TickOutcome {
            state: state.clone(),
            finished: None,
        };
    }
    let mut next = state.clone();
    next.remaining_seconds -= 1;
    if next.remaining_seconds > 0 {
        return TickOutcome {
            state: next,
            finished: None,
        };
    }
    let finished = next.mode;
    TickOutcome {
        state: advance(&next, settings),
        finished: Some(finished),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn settings() -> TimerSettings {
        TimerSettings::default()
    }

    #[test]
    fn start_needs_time_on_the_clock() {
        let s = settings();
        let mut state = TimerState::initial(TimerMode::Focus, &s);
        state.remaining_seconds = 0;
        assert!(!start(&state).running);

        state.remaining_seconds = 1;
        assert!(start(&state).running);
    }

    #[test]
    fn tick_is_noop_at_zero_even_while_running() {
        let s = settings();
        let state = TimerState {
            mode: TimerMode::Focus,
            remaining_seconds: 0,
            running: true,
            completed_focus_count: 0,
            completed_cycle_count: 0,
        };
        let outcome = tick(&state, &s);
        assert_eq!(outcome.state, state);
        assert!(outcome.finished.is_none());
    }

    #[test]
    fn tick_is_noop_while_paused() {
        let s = settings();
        let state = TimerState::initial(TimerMode::Focus, &s);
        let outcome = tick(&state, &s);
        assert_eq!(outcome.state, state);
        assert!(outcome.finished.is_none());
    }

    #[test]
    fn final_tick_advances_through_the_transition() {
        let s = settings();
        let state = TimerState {
            mode: TimerMode::Focus,
            remaining_seconds: 1,
            running: true,
            completed_focus_count: 0,
            completed_cycle_count: 0,
        };
        let outcome = tick(&state, &s);
        assert_eq!(outcome.finished, Some(TimerMode::Focus));
        assert_eq!(outcome.state.mode, TimerMode::ShortBreak);
        assert_eq!(outcome.state.completed_focus_count, 1);
        assert_eq!(outcome.state.remaining_seconds, 5 * 60);
        // autoStartBreaks defaults to true
        assert!(outcome.state.running);
    }

    #[test]
    fn long_break_every_interval() {
        let s = settings();
        let mut state = TimerState::initial(TimerMode::Focus, &s);
        for expected in [
            TimerMode::ShortBreak,
            TimerMode::ShortBreak,
            TimerMode::ShortBreak,
            TimerMode::LongBreak,
        ] {
            state = advance(&state, &s); // focus ends
            assert_eq!(state.mode, expected);
            state = advance(&state, &s); // break ends
            assert_eq!(state.mode, TimerMode::Focus);
        }
        assert_eq!(state.completed_focus_count, 4);
        assert_eq!(state.completed_cycle_count, 1);
    }

    #[test]
    fn interval_one_never_yields_short_break() {
        let s = TimerSettings {
            long_break_interval: 1,
            ..TimerSettings::default()
        };
        let mut state = TimerState::initial(TimerMode::Focus, &s);
        for _ in 0..5 {
            state = advance(&state, &s);
            assert_eq!(state.mode, TimerMode::LongBreak);
            state = advance(&state, &s);
            assert_eq!(state.mode, TimerMode::Focus);
        }
    }

    #[test]
    fn auto_start_flags_decide_running_after_transition() {
        let s = TimerSettings {
            auto_start_breaks: true,
            auto_start_focus: false,
            ..TimerSettings::default()
        };
        let state = TimerState::initial(TimerMode::Focus, &s);
        let after_focus = advance(&state, &s);
        assert!(after_focus.running);
        let after_break = advance(&after_focus, &s);
        assert_eq!(after_break.mode, TimerMode::Focus);
        assert!(!after_break.running);
    }

    proptest! {
        #[test]
        fn advance_always_lands_on_a_full_duration(
            mode_idx in 0usize..3,
            focus_count in 0u32..1000,
            cycle_count in 0u32..1000,
            interval in 1u32..12,
        ) {
            let s = TimerSettings {
                long_break_interval: interval,
                ..TimerSettings::default()
            };
            let mode = [TimerMode::Focus, TimerMode::ShortBreak, TimerMode::LongBreak][mode_idx];
            let state = TimerState {
                mode,
                remaining_seconds: 0,
                running: true,
                completed_focus_count: focus_count,
                completed_cycle_count: cycle_count,
            };
            let next = advance(&state, &s);
            prop_assert_eq!(next.remaining_seconds, s.duration_seconds(next.mode));
            prop_assert!(next.completed_focus_count >= state.completed_focus_count);
            prop_assert!(next.completed_cycle_count >= state.completed_cycle_count);
            // a break always hands control back to focus
            if mode != TimerMode::Focus {
                prop_assert_eq!(next.mode, TimerMode::Focus);
            }
        }
    }
}
