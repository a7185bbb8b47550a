//! Task lifecycle: creation, status changes and completion side effects.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::{
    domain::{remove_by_id, LevelUp, Task, TaskStatus, Workspace},
    errors::CoreError,
    finance::Settlement,
    insights::leveling::XpEvent,
};

use super::{FinanceService, ServiceError, ServiceResult, Session};

/// Everything that changed when a task was completed.
#[derive(Debug, Clone)]
pub struct TaskCompletion {
    pub task: Task,
    /// Next occurrence of a recurring task.
    pub successor: Option<Task>,
    /// Present when the task was the reminder of a recurring transaction.
    pub settlement: Option<Settlement>,
    pub level_up: Option<LevelUp>,
}

pub struct TaskService;

impl TaskService {
    pub fn add(session: &mut Session, task: Task) -> ServiceResult<Uuid> {
        if task.title.trim().is_empty() {
            return Err(ServiceError::Invalid("task title is required".into()));
        }
        session.mutate(|ws| {
            let id = task.id;
            ws.tasks.push(task);
            Ok(id)
        })
    }

    /// Moves a task between statuses. Moving to `Done` runs the full
    /// completion; reopening a done task takes its XP back.
    pub fn set_status(
        session: &mut Session,
        id: Uuid,
        status: TaskStatus,
        now: DateTime<Utc>,
    ) -> ServiceResult<Task> {
        if status == TaskStatus::Done {
            return Self::complete(session, id, now).map(|completion| completion.task);
        }
        session.mutate(|ws| Self::set_status_in(ws, id, status, now))
    }

    /// Applies a non-`Done` status to task `id` inside `ws`.
    ///
    /// Reopening a recurring task drops its successor while that one is still
    /// untouched. A reminder whose completion settled a recurring transaction
    /// cannot be reopened.
    pub fn set_status_in(
        ws: &mut Workspace,
        id: Uuid,
        status: TaskStatus,
        now: DateTime<Utc>,
    ) -> ServiceResult<Task> {
        let (was_done, transaction_id) = ws
            .task(id)
            .map(|task| (task.is_done(), task.transaction_id))
            .ok_or_else(|| CoreError::not_found("task", id))?;
        let reopening = was_done && status != TaskStatus::Done;

        if reopening {
            if let Some(txn_id) = transaction_id
                .filter(|txn_id| ws.transaction(*txn_id).is_some_and(|t| t.is_recurring()))
            {
                return Err(ServiceError::Invalid(format!(
                    "task {id} settled transaction {txn_id} and cannot be reopened"
                )));
            }
            let before = ws.tasks.len();
            ws.tasks
                .retain(|t| !(t.predecessor_id == Some(id) && t.status == TaskStatus::Pending));
            let dropped = before - ws.tasks.len();
            if dropped > 0 {
                tracing::debug!(%id, dropped, "pending successor removed on reopen");
            }
        }

        let task = ws
            .task_mut(id)
            .ok_or_else(|| CoreError::not_found("task", id))?;
        task.set_status(status, now);
        let task = task.clone();
        if reopening {
            ws.user.revoke(XpEvent::TaskCompleted);
        }
        Ok(task)
    }

    pub fn complete(
        session: &mut Session,
        id: Uuid,
        now: DateTime<Utc>,
    ) -> ServiceResult<TaskCompletion> {
        session.mutate(|ws| Self::complete_in(ws, id, now))
    }

    /// Completes task `id` inside `ws`: stamps it done, inserts the next
    /// occurrence of a recurring task, settles a linked recurring transaction
    /// and awards XP.
    pub fn complete_in(
        ws: &mut Workspace,
        id: Uuid,
        now: DateTime<Utc>,
    ) -> ServiceResult<TaskCompletion> {
        let task = ws
            .task_mut(id)
            .ok_or_else(|| CoreError::not_found("task", id))?;
        if task.is_done() {
            return Err(ServiceError::Invalid(format!("task {id} is already done")));
        }
        let successor = task.complete(now);
        let task = task.clone();
        // A reopened task whose successor survived does not spawn another one.
        let successor =
            successor.filter(|_| !ws.tasks.iter().any(|t| t.predecessor_id == Some(id)));

        let settlement = match task.transaction_id {
            Some(txn_id) if ws.transaction(txn_id).is_some_and(|t| t.is_recurring()) => {
                FinanceService::settle_in(ws, txn_id, now)?
            }
            _ => None,
        };
        if let Some(next) = &successor {
            ws.tasks.push(next.clone());
        }
        let level_up = ws.user.award(XpEvent::TaskCompleted);
        if let Some(up) = level_up {
            tracing::info!(from = up.from, to = up.to, "level up");
        }
        tracing::debug!(%id, recurring = successor.is_some(), "task completed");

        Ok(TaskCompletion {
            task,
            successor,
            settlement,
            level_up,
        })
    }

    pub fn toggle_subtask(
        session: &mut Session,
        task_id: Uuid,
        subtask_id: Uuid,
    ) -> ServiceResult<bool> {
        session.mutate(|ws| {
            let task = ws
                .task_mut(task_id)
                .ok_or_else(|| CoreError::not_found("task", task_id))?;
            task.toggle_subtask(subtask_id)
                .ok_or_else(|| CoreError::not_found("subtask", subtask_id).into())
        })
    }

    pub fn remove(session: &mut Session, id: Uuid) -> ServiceResult<Task> {
        session.mutate(|ws| {
            remove_by_id(&mut ws.tasks, id)
                .ok_or_else(|| CoreError::not_found("task", id).into())
        })
    }
}
