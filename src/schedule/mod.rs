//! Calendar arithmetic for recurring tasks and transactions.

pub mod recurrence;

pub use recurrence::{days_in_month, shift_months, RecurrenceKind, RecurrencePattern};
