use chrono::NaiveDate;
use serde::Serialize;
use uuid::Uuid;

use crate::domain::{
    Budget, Category, Habit, Month, ObjectiveStatus, Project, ProjectStatus, Task, TaskStatus,
    Transaction, TransactionKind,
};

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct MonthlyStats {
    pub total_income: f64,
    pub total_expenses: f64,
    pub balance: f64,
    pub count: usize,
}

/// Income and expense totals for the transactions dated inside `month`.
pub fn monthly_stats(transactions: &[Transaction], month: Month) -> MonthlyStats {
    let mut stats = MonthlyStats::default();
    for txn in transactions.iter().filter(|t| month.contains(t.date)) {
        match txn.kind {
            TransactionKind::Income => stats.total_income += txn.amount,
            TransactionKind::Expense => stats.total_expenses += txn.amount,
        }
        stats.count += 1;
    }
    stats.balance = stats.total_income - stats.total_expenses;
    stats
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BudgetProgress {
    pub budget: Budget,
    pub category: Option<Category>,
    pub spent: f64,
    /// Spend as a percentage of the limit, capped at 100 for display.
    pub percentage: f64,
    /// Limit minus spend; negative once the budget is exceeded.
    pub remaining: f64,
    /// Uncapped over-limit signal.
    pub is_over_budget: bool,
}

/// Progress of every budget set for `month` against that month's expenses in
/// the budget's category.
pub fn budget_progress(
    transactions: &[Transaction],
    budgets: &[Budget],
    categories: &[Category],
    month: Month,
) -> Vec<BudgetProgress> {
    budgets
        .iter()
        .filter(|budget| budget.month == month)
        .map(|budget| {
            let spent = spent_in_category(transactions, budget.category_id, month);
            let percentage = if budget.limit > 0.0 {
                (spent / budget.limit * 100.0).clamp(0.0, 100.0)
            } else if spent > 0.0 {
                100.0
            } else {
                0.0
            };
            BudgetProgress {
                budget: budget.clone(),
                category: categories
                    .iter()
                    .find(|c| c.id == budget.category_id)
                    .cloned(),
                spent,
                percentage,
                remaining: budget.limit - spent,
                is_over_budget: spent > budget.limit,
            }
        })
        .collect()
}

fn spent_in_category(transactions: &[Transaction], category_id: Uuid, month: Month) -> f64 {
    transactions
        .iter()
        .filter(|t| t.is_expense() && t.category_id == Some(category_id) && month.contains(t.date))
        .map(|t| t.amount)
        .sum()
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct TaskStats {
    pub total: usize,
    pub pending: usize,
    pub in_progress: usize,
    pub done: usize,
    pub overdue: usize,
    pub due_today: usize,
    pub completion_rate: f64,
}

pub fn task_stats(tasks: &[Task], as_of: NaiveDate) -> TaskStats {
    let mut stats = TaskStats {
        total: tasks.len(),
        ..TaskStats::default()
    };
    for task in tasks {
        match task.status {
            TaskStatus::Pending => stats.pending += 1,
            TaskStatus::InProgress => stats.in_progress += 1,
            TaskStatus::Done => stats.done += 1,
        }
        if task.is_overdue(as_of) {
            stats.overdue += 1;
        }
        if !task.is_done() && task.due_date == Some(as_of) {
            stats.due_today += 1;
        }
    }
    if stats.total > 0 {
        stats.completion_rate = stats.done as f64 / stats.total as f64;
    }
    stats
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct HabitStats {
    pub total: usize,
    pub active: usize,
    pub archived: usize,
    pub completed_today: usize,
    pub best_current_streak: u32,
    pub longest_streak: u32,
}

/// Counts over all habits; completion and streak figures only consider
/// habits that are not archived.
pub fn habit_stats(habits: &[Habit], as_of: NaiveDate) -> HabitStats {
    let mut stats = HabitStats {
        total: habits.len(),
        ..HabitStats::default()
    };
    for habit in habits {
        if habit.is_archived() {
            stats.archived += 1;
            continue;
        }
        stats.active += 1;
        if habit
            .completion_on(as_of)
            .is_some_and(|c| habit.qualifies(c))
        {
            stats.completed_today += 1;
        }
        let streak = habit.streak(as_of);
        stats.best_current_streak = stats.best_current_streak.max(streak.current);
        stats.longest_streak = stats.longest_streak.max(streak.longest);
    }
    stats
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectProgress {
    pub project_id: Uuid,
    pub title: String,
    pub status: ProjectStatus,
    pub objectives_total: usize,
    pub objectives_completed: usize,
    pub progress: f64,
}

pub fn project_progress(projects: &[Project]) -> Vec<ProjectProgress> {
    projects
        .iter()
        .map(|project| ProjectProgress {
            project_id: project.id,
            title: project.title.clone(),
            status: project.status,
            objectives_total: project.objectives.len(),
            objectives_completed: project
                .objectives
                .iter()
                .filter(|o| o.status == ObjectiveStatus::Completed)
                .count(),
            progress: project.progress(),
        })
        .collect()
}
