//! Transactions, categories and budgets, including recurring settlement.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::{
    domain::{remove_by_id, Budget, Category, Transaction, Workspace},
    errors::CoreError,
    finance::{reminder_for, settle, Settlement},
};

use super::{ServiceError, ServiceResult, Session};

pub struct FinanceService;

impl FinanceService {
    /// Records a one-off transaction. Recurring ones go through
    /// [`FinanceService::add_recurring`].
    pub fn add(session: &mut Session, transaction: Transaction) -> ServiceResult<Uuid> {
        if transaction.is_recurring() {
            return Self::add_recurring(session, transaction, Utc::now());
        }
        session.mutate(|ws| {
            let id = transaction.id;
            ws.transactions.push(transaction);
            Ok(id)
        })
    }

    /// Stores a recurring template and schedules the reminder for its next
    /// occurrence.
    pub fn add_recurring(
        session: &mut Session,
        transaction: Transaction,
        now: DateTime<Utc>,
    ) -> ServiceResult<Uuid> {
        session.mutate(|ws| Self::add_recurring_in(ws, transaction, now))
    }

    pub fn add_recurring_in(
        ws: &mut Workspace,
        transaction: Transaction,
        now: DateTime<Utc>,
    ) -> ServiceResult<Uuid> {
        if !transaction.is_recurring() {
            return Err(ServiceError::Invalid(
                "transaction has no recurrence rule".into(),
            ));
        }
        let id = transaction.id;
        ws.remove_pending_reminders(id);
        if let Some(reminder) = reminder_for(&transaction, now) {
            ws.tasks.push(reminder);
        }
        ws.transactions.push(transaction);
        tracing::debug!(%id, "recurring transaction added");
        Ok(id)
    }

    /// Settles the pending occurrence of the recurring transaction `id`.
    pub fn settle(
        session: &mut Session,
        id: Uuid,
        now: DateTime<Utc>,
    ) -> ServiceResult<Option<Settlement>> {
        session.mutate(|ws| Self::settle_in(ws, id, now))
    }

    /// Writes a settlement into `ws`: the concrete instance is stored, the
    /// template advances and its pending reminder is replaced. Returns `None`
    /// when the series has already ended.
    pub fn settle_in(
        ws: &mut Workspace,
        id: Uuid,
        now: DateTime<Utc>,
    ) -> ServiceResult<Option<Settlement>> {
        let template = ws
            .transaction(id)
            .ok_or_else(|| CoreError::not_found("transaction", id))?;
        if !template.is_recurring() {
            return Err(ServiceError::Invalid(format!(
                "transaction {id} is not recurring"
            )));
        }
        let Some(settlement) = settle(template, now) else {
            ws.remove_pending_reminders(id);
            return Ok(None);
        };

        ws.remove_pending_reminders(id);
        ws.transactions.push(settlement.instance.clone());
        if let Some(rule) = ws
            .transaction_mut(id)
            .and_then(|template| template.recurrence.as_mut())
        {
            rule.next_date = Some(settlement.next_date);
        }
        if let Some(reminder) = &settlement.reminder {
            ws.tasks.push(reminder.clone());
        }
        tracing::info!(
            %id,
            paid = %settlement.instance.date,
            next = %settlement.next_date,
            "recurring transaction settled"
        );
        Ok(Some(settlement))
    }

    pub fn remove(session: &mut Session, id: Uuid) -> ServiceResult<Transaction> {
        session.mutate(|ws| {
            let removed = remove_by_id(&mut ws.transactions, id)
                .ok_or_else(|| CoreError::not_found("transaction", id))?;
            ws.remove_pending_reminders(id);
            Ok(removed)
        })
    }

    pub fn add_category(session: &mut Session, category: Category) -> ServiceResult<Uuid> {
        if category.name.trim().is_empty() {
            return Err(ServiceError::Invalid("category name is required".into()));
        }
        session.mutate(|ws| {
            let id = category.id;
            ws.categories.push(category);
            Ok(id)
        })
    }

    /// Sets the limit for a category and month, replacing an existing budget
    /// for the same pair.
    pub fn set_budget(session: &mut Session, budget: Budget) -> ServiceResult<Uuid> {
        if !budget.limit.is_finite() || budget.limit < 0.0 {
            return Err(ServiceError::Invalid(
                "budget limit must be a non-negative amount".into(),
            ));
        }
        session.mutate(|ws| {
            ws.budgets
                .retain(|b| !(b.category_id == budget.category_id && b.month == budget.month));
            let id = budget.id;
            ws.budgets.push(budget);
            Ok(id)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Month, TaskStatus, TransactionKind, TransactionRecurrence};
    use crate::schedule::RecurrenceKind;
    use crate::storage::MemoryStore;
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn subscription(end: Option<NaiveDate>) -> Transaction {
        Transaction::new(TransactionKind::Expense, 12.5, None, date(2024, 1, 15))
            .unwrap()
            .described("Streaming")
            .with_recurrence(TransactionRecurrence {
                end_date: end,
                ..TransactionRecurrence::new(RecurrenceKind::Monthly)
            })
    }

    fn pending_reminders(ws: &Workspace, id: Uuid) -> Vec<NaiveDate> {
        ws.tasks
            .iter()
            .filter(|t| t.transaction_id == Some(id) && t.status != TaskStatus::Done)
            .filter_map(|t| t.due_date)
            .collect()
    }

    #[test]
    fn adding_recurring_schedules_one_reminder() {
        let mut ws = Workspace::default();
        let txn = subscription(None);
        let id = FinanceService::add_recurring_in(&mut ws, txn.clone(), Utc::now()).unwrap();
        assert_eq!(pending_reminders(&ws, id), vec![date(2024, 2, 15)]);

        // Re-adding the same template replaces rather than duplicates.
        ws.transactions.clear();
        FinanceService::add_recurring_in(&mut ws, txn, Utc::now()).unwrap();
        assert_eq!(pending_reminders(&ws, id).len(), 1);
    }

    #[test]
    fn one_off_rejected_by_add_recurring() {
        let mut ws = Workspace::default();
        let single =
            Transaction::new(TransactionKind::Expense, 4.0, None, date(2024, 1, 1)).unwrap();
        assert!(matches!(
            FinanceService::add_recurring_in(&mut ws, single, Utc::now()),
            Err(ServiceError::Invalid(_))
        ));
    }

    #[test]
    fn settle_advances_template_and_swaps_reminder() {
        let mut ws = Workspace::default();
        let id = FinanceService::add_recurring_in(&mut ws, subscription(None), Utc::now()).unwrap();

        let settlement = FinanceService::settle_in(&mut ws, id, Utc::now())
            .unwrap()
            .expect("settled");
        assert_eq!(settlement.instance.date, date(2024, 2, 15));
        assert_eq!(ws.transactions.len(), 2);
        assert_eq!(pending_reminders(&ws, id), vec![date(2024, 3, 15)]);

        FinanceService::settle_in(&mut ws, id, Utc::now()).unwrap();
        assert_eq!(pending_reminders(&ws, id), vec![date(2024, 4, 15)]);
        let next = ws.transaction(id).and_then(|t| t.recurrence.as_ref()).unwrap();
        assert_eq!(next.next_date, Some(date(2024, 4, 15)));
    }

    #[test]
    fn ended_series_settles_nothing() {
        let mut ws = Workspace::default();
        let id = FinanceService::add_recurring_in(
            &mut ws,
            subscription(Some(date(2024, 2, 20))),
            Utc::now(),
        )
        .unwrap();
        assert!(FinanceService::settle_in(&mut ws, id, Utc::now()).unwrap().is_some());
        assert!(pending_reminders(&ws, id).is_empty());
        assert!(FinanceService::settle_in(&mut ws, id, Utc::now()).unwrap().is_none());
        assert_eq!(ws.transactions.len(), 2);
    }

    #[test]
    fn settle_unknown_transaction_is_not_found() {
        let mut ws = Workspace::default();
        let err = FinanceService::settle_in(&mut ws, Uuid::new_v4(), Utc::now()).unwrap_err();
        assert!(matches!(err, ServiceError::Core(CoreError::NotFound { .. })));
    }

    #[test]
    fn set_budget_replaces_same_month_and_category() {
        let mut session = Session::new(Box::new(MemoryStore::default()));
        let category = Category::new("Groceries", TransactionKind::Expense);
        let month = Month::new(2024, 3).unwrap();
        FinanceService::add_category(&mut session, category.clone()).unwrap();
        FinanceService::set_budget(&mut session, Budget::new(category.id, month, 400.0)).unwrap();
        FinanceService::set_budget(&mut session, Budget::new(category.id, month, 500.0)).unwrap();

        let ws = session.workspace().unwrap();
        assert_eq!(ws.budgets.len(), 1);
        assert_eq!(ws.budgets[0].limit, 500.0);
        assert!(FinanceService::set_budget(&mut session, Budget::new(category.id, month, -1.0)).is_err());
    }

    #[test]
    fn removing_template_drops_its_reminders() {
        let mut session = Session::new(Box::new(MemoryStore::default()));
        let id = FinanceService::add(&mut session, subscription(None)).unwrap();
        assert_eq!(session.workspace().unwrap().tasks.len(), 1);
        FinanceService::remove(&mut session, id).unwrap();
        let ws = session.workspace().unwrap();
        assert!(ws.tasks.is_empty());
        assert!(ws.transactions.is_empty());
    }
}
