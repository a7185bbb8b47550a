//! Record types loaded from the backing store.

pub mod budget;
pub mod common;
pub mod habit;
pub mod metric;
pub mod project;
pub mod task;
pub mod transaction;
pub mod user;
pub mod workspace;

pub use budget::Budget;
pub use common::{find_by_id, find_by_id_mut, remove_by_id, Identifiable, Month};
pub use habit::{Completion, Habit, HabitFrequency, PeriodProgress, ToggleOutcome, TrackingMode};
pub use metric::{MetricEntry, MetricKind, WeightGoal};
pub use project::{Milestone, Objective, ObjectiveStatus, Project, ProjectStatus};
pub use task::{arrange, Priority, Subtask, Task, TaskFilter, TaskSort, TaskStatus};
pub use transaction::{Category, Transaction, TransactionKind, TransactionRecurrence};
pub use user::{LevelUp, UserStats};
pub use workspace::Workspace;
