use std::path::PathBuf;

use serde::{de::DeserializeOwned, Deserialize, Serialize};

use crate::{
    core::utils::PathResolver,
    domain::{TaskFilter, TaskSort, WeightGoal},
    errors::CoreError,
    timer::{PomodoroSession, PomodoroSettings, TimerSnapshot},
    utils::persistence::{ensure_dir, read_json, write_json_atomic},
};

pub const TASK_VIEW_KEY: &str = "task_view";
pub const WEIGHT_GOAL_KEY: &str = "weight_goal";
pub const POMODORO_SETTINGS_KEY: &str = "pomodoro_settings";
pub const POMODORO_HISTORY_KEY: &str = "pomodoro_history";
pub const TIMER_SNAPSHOT_KEY: &str = "timer_snapshot";

/// Sessions kept in the local pomodoro history; older entries are dropped.
const MAX_HISTORY: usize = 500;

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct TaskView {
    #[serde(default)]
    pub filter: TaskFilter,
    #[serde(default)]
    pub sort: TaskSort,
}

/// Device-local preferences. Each field is stored as its own JSON blob under a
/// fixed key and always written back as a whole.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Settings {
    pub task_view: TaskView,
    pub weight_goal: Option<WeightGoal>,
    pub pomodoro: PomodoroSettings,
    pub pomodoro_history: Vec<PomodoroSession>,
    pub timer_snapshot: Option<TimerSnapshot>,
}

impl Settings {
    pub fn record_session(&mut self, session: PomodoroSession) {
        self.pomodoro_history.push(session);
        if self.pomodoro_history.len() > MAX_HISTORY {
            let excess = self.pomodoro_history.len() - MAX_HISTORY;
            self.pomodoro_history.drain(..excess);
        }
    }
}

pub struct SettingsManager {
    base: PathBuf,
}

impl SettingsManager {
    pub fn new() -> Result<Self, CoreError> {
        Self::from_base(PathResolver::base_dir())
    }

    pub fn with_base_dir(base: PathBuf) -> Result<Self, CoreError> {
        Self::from_base(base)
    }

    fn from_base(base: PathBuf) -> Result<Self, CoreError> {
        ensure_dir(&PathResolver::preferences_dir_in(&base))?;
        Ok(Self { base })
    }

    pub fn preferences_dir(&self) -> PathBuf {
        PathResolver::preferences_dir_in(&self.base)
    }

    /// Reads every preference blob. Missing or unreadable blobs fall back to
    /// their defaults; this never fails.
    pub fn load(&self) -> Settings {
        Settings {
            task_view: self.read_or_default(TASK_VIEW_KEY),
            weight_goal: self.read_or_default(WEIGHT_GOAL_KEY),
            pomodoro: self.read_or_default(POMODORO_SETTINGS_KEY),
            pomodoro_history: self.read_or_default(POMODORO_HISTORY_KEY),
            timer_snapshot: self.read_or_default(TIMER_SNAPSHOT_KEY),
        }
    }

    pub fn save(&self, settings: &Settings) -> Result<(), CoreError> {
        self.write(TASK_VIEW_KEY, &settings.task_view)?;
        self.write(WEIGHT_GOAL_KEY, &settings.weight_goal)?;
        self.write(POMODORO_SETTINGS_KEY, &settings.pomodoro)?;
        self.write(POMODORO_HISTORY_KEY, &settings.pomodoro_history)?;
        self.write(TIMER_SNAPSHOT_KEY, &settings.timer_snapshot)?;
        tracing::debug!(dir = %self.preferences_dir().display(), "preferences saved");
        Ok(())
    }

    fn blob_path(&self, key: &str) -> PathBuf {
        PathResolver::preference_file_in(&self.base, key)
    }

    fn read_or_default<T: DeserializeOwned + Default>(&self, key: &str) -> T {
        let path = self.blob_path(key);
        match read_json(&path) {
            Ok(Some(value)) => value,
            Ok(None) => T::default(),
            Err(err) => {
                tracing::warn!(key, error = %err, "ignoring unreadable preference");
                T::default()
            }
        }
    }

    fn write<T: Serialize>(&self, key: &str, value: &T) -> Result<(), CoreError> {
        write_json_atomic(value, &self.blob_path(key))
    }
}
