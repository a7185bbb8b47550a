//! Pure derivations over loaded record collections. Nothing here keeps state
//! between calls; every result is recomputed from its inputs.

pub mod aggregation;
pub mod leveling;
pub mod streak;
pub mod wellness;

pub use aggregation::{
    budget_progress, habit_stats, monthly_stats, project_progress, task_stats, BudgetProgress,
    HabitStats, MonthlyStats, ProjectProgress, TaskStats,
};
pub use leveling::{level_for_xp, progress, xp_threshold, LevelProgress};
pub use streak::{compute_streak, Streak};
pub use wellness::{metric_average, weight_stats, Trend, WeightStats};
