mod engine;
mod mode;
mod settings;
pub mod transition;

pub use engine::TimerEngine;
pub use mode::{format_clock, TimerMode};
pub use settings::{
    SettingsPatch, TimerSettings, ALARM_SOUNDS, MAX_SESSION_MINUTES, MIN_SESSION_MINUTES,
};
pub use transition::TimerState;
