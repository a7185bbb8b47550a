#![allow(dead_code)]

use std::{path::PathBuf, sync::Mutex};

use chrono::NaiveDate;
use daybook_core::{
    config::SettingsManager,
    core::services::Session,
    storage::JsonStore,
};
use once_cell::sync::Lazy;
use tempfile::TempDir;

/// Holds TempDir guards so temporary folders live for the duration of the test run.
static TEST_DIRS: Lazy<Mutex<Vec<TempDir>>> = Lazy::new(|| Mutex::new(Vec::new()));

/// Fresh data directory that outlives the calling test.
pub fn temp_base() -> PathBuf {
    let temp = TempDir::new().expect("create temp dir");
    let base = temp.path().to_path_buf();
    TEST_DIRS.lock().expect("lock temp dir registry").push(temp);
    base
}

/// Creates an isolated session and settings manager backed by a unique directory.
pub fn setup_test_env() -> (PathBuf, Session, SettingsManager) {
    let base = temp_base();
    let session = Session::new(Box::new(JsonStore::in_dir(&base)));
    let settings =
        SettingsManager::with_base_dir(base.clone()).expect("create settings manager for temp dir");
    (base, session, settings)
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}
