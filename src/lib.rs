#![doc(test(attr(deny(warnings))))]

//! Daybook Core holds the record types and derived-statistics layer shared by
//! the daybook clients: recurring schedules, habit streaks, finance and
//! wellness aggregates, XP leveling, and the foreground pomodoro timer.

pub mod cache;
pub mod config;
pub mod core;
pub mod domain;
pub mod errors;
pub mod finance;
pub mod insights;
pub mod schedule;
pub mod storage;
pub mod timer;
pub mod utils;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!("Daybook Core tracing initialized.");
    });
}
