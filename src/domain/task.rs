use std::cmp::{Ordering, Reverse};

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::common::Identifiable;
use crate::schedule::RecurrencePattern;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Low,
    Medium,
    High,
    Urgent,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    #[default]
    Pending,
    InProgress,
    Done,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Subtask {
    pub id: Uuid,
    pub title: String,
    #[serde(default)]
    pub done: bool,
}

impl Subtask {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            done: false,
        }
    }
}

/// A to-do item, optionally recurring and optionally tied to a project tree or
/// to the recurring transaction that generated it as a reminder.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Task {
    pub id: Uuid,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub due_date: Option<NaiveDate>,
    #[serde(default)]
    pub priority: Option<Priority>,
    #[serde(default)]
    pub status: TaskStatus,
    #[serde(default)]
    pub recurrence: Option<RecurrencePattern>,
    #[serde(default)]
    pub subtasks: Vec<Subtask>,
    #[serde(default)]
    pub project_id: Option<Uuid>,
    #[serde(default)]
    pub objective_id: Option<Uuid>,
    #[serde(default)]
    pub area_id: Option<Uuid>,
    #[serde(default)]
    pub transaction_id: Option<Uuid>,
    /// Occurrence this task was spawned from when a recurring task completed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub predecessor_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,
}

impl Task {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            description: None,
            due_date: None,
            priority: None,
            status: TaskStatus::Pending,
            recurrence: None,
            subtasks: Vec::new(),
            project_id: None,
            objective_id: None,
            area_id: None,
            transaction_id: None,
            predecessor_id: None,
            created_at: Utc::now(),
            completed_at: None,
        }
    }

    pub fn due_on(mut self, date: NaiveDate) -> Self {
        self.due_date = Some(date);
        self
    }

    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = Some(priority);
        self
    }

    pub fn with_recurrence(mut self, pattern: RecurrencePattern) -> Self {
        self.recurrence = Some(pattern);
        self
    }

    pub fn is_done(&self) -> bool {
        self.status == TaskStatus::Done
    }

    /// Moves the task to `status`. Entering `Done` stamps `completed_at`, leaving
    /// it clears the stamp.
    pub fn set_status(&mut self, status: TaskStatus, now: DateTime<Utc>) {
        match (self.status, status) {
            (TaskStatus::Done, TaskStatus::Done) => {}
            (_, TaskStatus::Done) => self.completed_at = Some(now),
            _ => self.completed_at = None,
        }
        self.status = status;
    }

    /// Marks the task done and, for a recurring task with a due date, returns the
    /// successor due on the next occurrence. No successor is produced once the
    /// next occurrence falls after the pattern's end date.
    pub fn complete(&mut self, now: DateTime<Utc>) -> Option<Task> {
        self.set_status(TaskStatus::Done, now);
        let pattern = self.recurrence.as_ref()?;
        let due = self.due_date?;
        let next = pattern.next_date(due);
        if !pattern.allows(next) {
            return None;
        }
        let mut successor = self.clone();
        successor.id = Uuid::new_v4();
        successor.status = TaskStatus::Pending;
        successor.due_date = Some(next);
        successor.completed_at = None;
        successor.predecessor_id = Some(self.id);
        successor.created_at = now;
        for subtask in successor.subtasks.iter_mut() {
            subtask.id = Uuid::new_v4();
            subtask.done = false;
        }
        Some(successor)
    }

    /// Flips a subtask's done flag, returning the new value.
    pub fn toggle_subtask(&mut self, subtask_id: Uuid) -> Option<bool> {
        let subtask = self.subtasks.iter_mut().find(|s| s.id == subtask_id)?;
        subtask.done = !subtask.done;
        Some(subtask.done)
    }

    pub fn is_overdue(&self, as_of: NaiveDate) -> bool {
        !self.is_done() && self.due_date.is_some_and(|due| due < as_of)
    }
}

impl Identifiable for Task {
    fn id(&self) -> Uuid {
        self.id
    }
}

/// Persisted list filter for the task view.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TaskFilter {
    #[serde(default)]
    pub status: Option<TaskStatus>,
    #[serde(default)]
    pub min_priority: Option<Priority>,
    #[serde(default)]
    pub project_id: Option<Uuid>,
    #[serde(default = "TaskFilter::default_show_done")]
    pub show_done: bool,
}

impl Default for TaskFilter {
    fn default() -> Self {
        Self {
            status: None,
            min_priority: None,
            project_id: None,
            show_done: true,
        }
    }
}

impl TaskFilter {
    fn default_show_done() -> bool {
        true
    }

    pub fn matches(&self, task: &Task) -> bool {
        if !self.show_done && task.is_done() {
            return false;
        }
        if self.status.is_some_and(|status| status != task.status) {
            return false;
        }
        if let Some(min) = self.min_priority {
            if task.priority.map_or(true, |p| p < min) {
                return false;
            }
        }
        if self.project_id.is_some() && self.project_id != task.project_id {
            return false;
        }
        true
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TaskSort {
    #[default]
    DueDate,
    Priority,
    CreatedAt,
    Title,
}

/// Applies a filter and sort to a task list without cloning the tasks.
///
/// Undated tasks sort after dated ones; tasks without priority sort last.
pub fn arrange<'a>(tasks: &'a [Task], filter: &TaskFilter, sort: TaskSort) -> Vec<&'a Task> {
    let mut selected: Vec<&Task> = tasks.iter().filter(|t| filter.matches(t)).collect();
    selected.sort_by(|a, b| match sort {
        TaskSort::DueDate => cmp_missing_last(a.due_date, b.due_date),
        TaskSort::Priority => {
            cmp_missing_last(a.priority.map(Reverse), b.priority.map(Reverse))
        }
        TaskSort::CreatedAt => b.created_at.cmp(&a.created_at),
        TaskSort::Title => a.title.to_lowercase().cmp(&b.title.to_lowercase()),
    });
    selected
}

fn cmp_missing_last<T: Ord>(a: Option<T>, b: Option<T>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}
