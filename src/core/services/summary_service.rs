use chrono::{Duration, NaiveDate};
use serde::Serialize;

use crate::{
    domain::{MetricKind, Month, WeightGoal, Workspace},
    insights::{
        aggregation::{
            budget_progress, habit_stats, monthly_stats, project_progress, task_stats,
            BudgetProgress, HabitStats, MonthlyStats, ProjectProgress, TaskStats,
        },
        leveling::LevelProgress,
        streak::Streak,
        wellness::{metric_average, weight_stats, WeightStats},
    },
};

/// Window, in days ending on `as_of`, for the averaged wellness metrics.
const AVERAGE_WINDOW_DAYS: i64 = 7;

/// Every derived figure the home screen shows for one day.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dashboard {
    pub as_of: NaiveDate,
    pub month: Month,
    pub tasks: TaskStats,
    pub habits: HabitStats,
    pub finances: MonthlyStats,
    pub budgets: Vec<BudgetProgress>,
    pub weight: WeightStats,
    pub mood_average: Option<f64>,
    pub sleep_average: Option<f64>,
    pub level: LevelProgress,
    pub streak: Streak,
    pub projects: Vec<ProjectProgress>,
}

pub struct SummaryService;

impl SummaryService {
    pub fn dashboard(ws: &Workspace, as_of: NaiveDate, goal: Option<&WeightGoal>) -> Dashboard {
        let month = Month::of(as_of);
        let since = as_of - Duration::days(AVERAGE_WINDOW_DAYS - 1);
        Dashboard {
            as_of,
            month,
            tasks: task_stats(&ws.tasks, as_of),
            habits: habit_stats(&ws.habits, as_of),
            finances: monthly_stats(&ws.transactions, month),
            budgets: budget_progress(&ws.transactions, &ws.budgets, &ws.categories, month),
            weight: weight_stats(&ws.metrics, goal),
            mood_average: metric_average(&ws.metrics, MetricKind::Mood, since),
            sleep_average: metric_average(&ws.metrics, MetricKind::Sleep, since),
            level: ws.user.level_progress(),
            streak: Streak {
                current: ws.user.current_streak,
                longest: ws.user.longest_streak,
            },
            projects: project_progress(&ws.projects),
        }
    }

    /// Spending for `month` alone, for callers that only need the ledger view.
    pub fn month(ws: &Workspace, month: Month) -> (MonthlyStats, Vec<BudgetProgress>) {
        (
            monthly_stats(&ws.transactions, month),
            budget_progress(&ws.transactions, &ws.budgets, &ws.categories, month),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        Budget, Category, Habit, MetricEntry, Task, Transaction, TransactionKind,
    };
    use chrono::Utc;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn sample() -> Workspace {
        let mut ws = Workspace::default();
        let food = Category::new("Food", TransactionKind::Expense);
        let month = Month::new(2024, 3).unwrap();
        ws.budgets.push(Budget::new(food.id, month, 500.0));
        for (amount, day) in [(400.0, 4), (220.0, 18)] {
            ws.transactions.push(
                Transaction::new(TransactionKind::Expense, amount, Some(food.id), date(2024, 3, day))
                    .unwrap(),
            );
        }
        ws.transactions.push(
            Transaction::new(TransactionKind::Income, 2000.0, None, date(2024, 3, 1)).unwrap(),
        );
        ws.transactions.push(
            Transaction::new(TransactionKind::Expense, 80.0, Some(food.id), date(2024, 2, 28))
                .unwrap(),
        );
        ws.categories.push(food);
        ws.tasks.push(Task::new("Overdue").due_on(date(2024, 3, 10)));
        let mut habit = Habit::daily("Journal");
        habit.toggle_completion(date(2024, 3, 20), Utc::now());
        ws.habits.push(habit);
        ws.metrics.push(MetricEntry::new(MetricKind::Mood, 4.0, date(2024, 3, 19)));
        ws.metrics.push(MetricEntry::new(MetricKind::Mood, 2.0, date(2024, 3, 1)));
        ws
    }

    #[test]
    fn dashboard_combines_derivations_for_month() {
        let ws = sample();
        let dash = SummaryService::dashboard(&ws, date(2024, 3, 20), None);
        assert_eq!(dash.month, Month::new(2024, 3).unwrap());
        assert_eq!(dash.finances.total_expenses, 620.0);
        assert_eq!(dash.finances.total_income, 2000.0);
        assert_eq!(dash.budgets.len(), 1);
        let food = &dash.budgets[0];
        assert_eq!(food.percentage, 100.0);
        assert!(food.is_over_budget);
        assert_eq!(food.remaining, -120.0);
        assert_eq!(dash.tasks.overdue, 1);
        assert_eq!(dash.habits.completed_today, 1);
        assert_eq!(dash.mood_average, Some(4.0));
        assert_eq!(dash.level.level, 1);
    }

    #[test]
    fn empty_workspace_yields_zeroes() {
        let dash = SummaryService::dashboard(&Workspace::default(), date(2024, 1, 1), None);
        assert_eq!(dash.tasks, TaskStats::default());
        assert_eq!(dash.finances, MonthlyStats::default());
        assert!(dash.budgets.is_empty());
        assert!(dash.weight.current.is_none());
        assert_eq!(dash.level, LevelProgress::default());
    }

    #[test]
    fn month_view_ignores_other_months() {
        let ws = sample();
        let (feb, budgets) = SummaryService::month(&ws, Month::new(2024, 2).unwrap());
        assert_eq!(feb.total_expenses, 80.0);
        assert!(budgets.is_empty());
    }
}
