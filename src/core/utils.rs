use dirs::home_dir;
use std::{
    env,
    path::{Path, PathBuf},
};

const DEFAULT_DIR_NAME: &str = ".daybook";
const HOME_ENV: &str = "DAYBOOK_HOME";
const RECORDS_FILE: &str = "records.json";
const PREFERENCES_DIR: &str = "preferences";

/// Resolves the on-disk locations used by the local stores.
pub struct PathResolver;

impl PathResolver {
    /// Returns the application data directory, defaulting to `~/.daybook`.
    pub fn base_dir() -> PathBuf {
        if let Some(custom) = env::var_os(HOME_ENV) {
            return PathBuf::from(custom);
        }
        home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(DEFAULT_DIR_NAME)
    }

    pub fn resolve_base(custom: Option<PathBuf>) -> PathBuf {
        custom.unwrap_or_else(Self::base_dir)
    }

    pub fn records_file_in(base: &Path) -> PathBuf {
        base.join(RECORDS_FILE)
    }

    pub fn preferences_dir_in(base: &Path) -> PathBuf {
        base.join(PREFERENCES_DIR)
    }

    /// Path of the JSON blob stored under a fixed preference key.
    pub fn preference_file_in(base: &Path, key: &str) -> PathBuf {
        Self::preferences_dir_in(base).join(format!("{key}.json"))
    }
}
