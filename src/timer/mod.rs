//! Foreground pomodoro countdown.

pub mod pomodoro;

pub use pomodoro::{
    PomodoroSession, PomodoroSettings, PomodoroTimer, TimerEvent, TimerMode, TimerSnapshot,
    TimerState,
};
