//! Recurring transaction settlement: reminder tasks and concrete instances.

pub mod recurring;

pub use recurring::{next_due, reminder_for, settle, Settlement};
