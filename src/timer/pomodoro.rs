use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum TimerMode {
    #[default]
    Work,
    ShortBreak,
    LongBreak,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum TimerState {
    #[default]
    Idle,
    Running,
    Paused,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PomodoroSettings {
    pub work_minutes: u32,
    pub short_break_minutes: u32,
    pub long_break_minutes: u32,
    /// Work sessions completed before a long break replaces the short one.
    pub sessions_before_long_break: u32,
}

impl Default for PomodoroSettings {
    fn default() -> Self {
        Self {
            work_minutes: 25,
            short_break_minutes: 5,
            long_break_minutes: 15,
            sessions_before_long_break: 4,
        }
    }
}

impl PomodoroSettings {
    pub fn duration_secs(&self, mode: TimerMode) -> u64 {
        let minutes = match mode {
            TimerMode::Work => self.work_minutes,
            TimerMode::ShortBreak => self.short_break_minutes,
            TimerMode::LongBreak => self.long_break_minutes,
        };
        minutes.max(1) as u64 * 60
    }
}

/// A finished session, kept in the local history.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PomodoroSession {
    pub mode: TimerMode,
    pub duration_secs: u64,
    pub finished_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerEvent {
    Completed {
        mode: TimerMode,
        duration_secs: u64,
        next: TimerMode,
    },
}

impl TimerEvent {
    pub fn into_session(self, finished_at: DateTime<Utc>) -> PomodoroSession {
        match self {
            TimerEvent::Completed {
                mode,
                duration_secs,
                ..
            } => PomodoroSession {
                mode,
                duration_secs,
                finished_at,
            },
        }
    }
}

/// Persisted timer state used to reconcile elapsed wall-clock time when the
/// host comes back to the foreground.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TimerSnapshot {
    pub mode: TimerMode,
    pub state: TimerState,
    pub remaining_secs: u64,
    pub anchor: DateTime<Utc>,
    #[serde(default)]
    pub completed_work_sessions: u32,
}

/// One-second countdown cycling through work and break sessions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PomodoroTimer {
    settings: PomodoroSettings,
    mode: TimerMode,
    state: TimerState,
    remaining_secs: u64,
    completed_work_sessions: u32,
}

impl PomodoroTimer {
    pub fn new(settings: PomodoroSettings) -> Self {
        let remaining_secs = settings.duration_secs(TimerMode::Work);
        Self {
            settings,
            mode: TimerMode::Work,
            state: TimerState::Idle,
            remaining_secs,
            completed_work_sessions: 0,
        }
    }

    pub fn mode(&self) -> TimerMode {
        self.mode
    }

    pub fn state(&self) -> TimerState {
        self.state
    }

    pub fn remaining_secs(&self) -> u64 {
        self.remaining_secs
    }

    pub fn completed_work_sessions(&self) -> u32 {
        self.completed_work_sessions
    }

    pub fn start(&mut self) {
        if self.state != TimerState::Running {
            tracing::debug!(mode = ?self.mode, remaining = self.remaining_secs, "timer started");
            self.state = TimerState::Running;
        }
    }

    pub fn pause(&mut self) {
        if self.state == TimerState::Running {
            tracing::debug!(remaining = self.remaining_secs, "timer paused");
            self.state = TimerState::Paused;
        }
    }

    /// Returns to idle with the current mode's full duration.
    pub fn reset(&mut self) {
        self.state = TimerState::Idle;
        self.remaining_secs = self.settings.duration_secs(self.mode);
    }

    /// Ends the current session early without recording it.
    pub fn skip(&mut self) {
        let next = self.following_mode(false);
        self.enter(next);
    }

    /// Advances the countdown by one second. Ticks outside `Running` are ignored.
    pub fn tick(&mut self) -> Option<TimerEvent> {
        self.elapse(1)
    }

    fn elapse(&mut self, secs: u64) -> Option<TimerEvent> {
        if self.state != TimerState::Running {
            return None;
        }
        self.remaining_secs = self.remaining_secs.saturating_sub(secs);
        if self.remaining_secs == 0 {
            Some(self.finish())
        } else {
            None
        }
    }

    fn finish(&mut self) -> TimerEvent {
        let mode = self.mode;
        let duration_secs = self.settings.duration_secs(mode);
        let next = self.following_mode(true);
        if mode == TimerMode::Work {
            self.completed_work_sessions += 1;
        }
        self.enter(next);
        tracing::info!(?mode, ?next, "pomodoro session completed");
        TimerEvent::Completed {
            mode,
            duration_secs,
            next,
        }
    }

    fn following_mode(&self, counting_current: bool) -> TimerMode {
        match self.mode {
            TimerMode::Work => {
                let done = self.completed_work_sessions + u32::from(counting_current);
                let every = self.settings.sessions_before_long_break.max(1);
                if counting_current && done % every == 0 {
                    TimerMode::LongBreak
                } else {
                    TimerMode::ShortBreak
                }
            }
            TimerMode::ShortBreak | TimerMode::LongBreak => TimerMode::Work,
        }
    }

    fn enter(&mut self, mode: TimerMode) {
        self.mode = mode;
        self.state = TimerState::Idle;
        self.remaining_secs = self.settings.duration_secs(mode);
    }

    pub fn snapshot(&self, now: DateTime<Utc>) -> TimerSnapshot {
        TimerSnapshot {
            mode: self.mode,
            state: self.state,
            remaining_secs: self.remaining_secs,
            anchor: now,
            completed_work_sessions: self.completed_work_sessions,
        }
    }

    /// Rebuilds a timer from a snapshot taken at `snapshot.anchor`.
    ///
    /// A running timer is charged for the wall-clock time that passed since the
    /// anchor; if that exhausts the session, the completion is reported at once.
    pub fn restore(
        settings: PomodoroSettings,
        snapshot: &TimerSnapshot,
        now: DateTime<Utc>,
    ) -> (Self, Option<TimerEvent>) {
        let mut timer = Self {
            settings,
            mode: snapshot.mode,
            state: snapshot.state,
            remaining_secs: snapshot.remaining_secs,
            completed_work_sessions: snapshot.completed_work_sessions,
        };
        let elapsed = (now - snapshot.anchor).num_seconds().max(0) as u64;
        let event = timer.elapse(elapsed);
        if let Some(TimerEvent::Completed { mode, .. }) = event {
            tracing::info!(?mode, elapsed, "session finished while in background");
        }
        (timer, event)
    }
}
