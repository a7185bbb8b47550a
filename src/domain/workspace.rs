use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{
    budget::Budget,
    common::{find_by_id, find_by_id_mut},
    habit::Habit,
    metric::MetricEntry,
    project::Project,
    task::{Task, TaskStatus},
    transaction::{Category, Transaction},
    user::UserStats,
};

const CURRENT_SCHEMA_VERSION: u8 = 1;

/// Every record owned by one user, as loaded from the backing store.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Workspace {
    #[serde(default)]
    pub tasks: Vec<Task>,
    #[serde(default)]
    pub habits: Vec<Habit>,
    #[serde(default)]
    pub transactions: Vec<Transaction>,
    #[serde(default)]
    pub categories: Vec<Category>,
    #[serde(default)]
    pub budgets: Vec<Budget>,
    #[serde(default)]
    pub metrics: Vec<MetricEntry>,
    #[serde(default)]
    pub projects: Vec<Project>,
    #[serde(default)]
    pub user: UserStats,
    #[serde(default = "Workspace::schema_version_default")]
    pub schema_version: u8,
}

impl Default for Workspace {
    fn default() -> Self {
        Self {
            tasks: Vec::new(),
            habits: Vec::new(),
            transactions: Vec::new(),
            categories: Vec::new(),
            budgets: Vec::new(),
            metrics: Vec::new(),
            projects: Vec::new(),
            user: UserStats::default(),
            schema_version: CURRENT_SCHEMA_VERSION,
        }
    }
}

impl Workspace {
    pub fn schema_version_default() -> u8 {
        CURRENT_SCHEMA_VERSION
    }

    pub fn task(&self, id: Uuid) -> Option<&Task> {
        find_by_id(&self.tasks, id)
    }

    pub fn task_mut(&mut self, id: Uuid) -> Option<&mut Task> {
        find_by_id_mut(&mut self.tasks, id)
    }

    pub fn habit_mut(&mut self, id: Uuid) -> Option<&mut Habit> {
        find_by_id_mut(&mut self.habits, id)
    }

    pub fn transaction(&self, id: Uuid) -> Option<&Transaction> {
        find_by_id(&self.transactions, id)
    }

    pub fn transaction_mut(&mut self, id: Uuid) -> Option<&mut Transaction> {
        find_by_id_mut(&mut self.transactions, id)
    }

    /// Removes every not-yet-done task linked to `transaction_id`, returning how
    /// many were dropped.
    pub fn remove_pending_reminders(&mut self, transaction_id: Uuid) -> usize {
        let before = self.tasks.len();
        self.tasks.retain(|task| {
            task.transaction_id != Some(transaction_id) || task.status == TaskStatus::Done
        });
        before - self.tasks.len()
    }
}
