use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

use crate::domain::{Priority, Task, Transaction, TransactionKind};

/// Outcome of settling one occurrence of a recurring transaction.
#[derive(Debug, Clone)]
pub struct Settlement {
    /// Concrete, non-recurring record of the occurrence that was just paid.
    pub instance: Transaction,
    /// Date the template should be due next.
    pub next_date: NaiveDate,
    /// Reminder for the following occurrence, absent once the series ended.
    pub reminder: Option<Task>,
}

/// Date of the occurrence a recurring transaction is waiting on.
pub fn next_due(transaction: &Transaction) -> Option<NaiveDate> {
    let rule = transaction.recurrence.as_ref()?;
    Some(
        rule.next_date
            .unwrap_or_else(|| rule.frequency.advance(transaction.date, 1)),
    )
}

/// Builds the pending reminder task for the next occurrence, unless that
/// occurrence falls after the series' end date.
pub fn reminder_for(transaction: &Transaction, now: DateTime<Utc>) -> Option<Task> {
    let rule = transaction.recurrence.as_ref()?;
    let due = next_due(transaction)?;
    if !rule.allows(due) {
        return None;
    }
    Some(reminder_task(transaction, due, now))
}

/// Settles the pending occurrence of `template` and advances the series.
///
/// Returns `None` for non-recurring transactions and for series whose pending
/// occurrence already lies past the end date.
pub fn settle(template: &Transaction, now: DateTime<Utc>) -> Option<Settlement> {
    let rule = template.recurrence.as_ref()?;
    let due = next_due(template)?;
    if !rule.allows(due) {
        return None;
    }

    let mut instance = template.clone();
    instance.id = Uuid::new_v4();
    instance.date = due;
    instance.recurrence = None;
    instance.source_id = Some(template.id);

    let next_date = rule.frequency.advance(due, 1);
    let reminder = rule
        .allows(next_date)
        .then(|| reminder_task(template, next_date, now));

    Some(Settlement {
        instance,
        next_date,
        reminder,
    })
}

fn reminder_task(transaction: &Transaction, due: NaiveDate, now: DateTime<Utc>) -> Task {
    let title = if transaction.description.is_empty() {
        let label = match transaction.kind {
            TransactionKind::Income => "Recurring income",
            TransactionKind::Expense => "Recurring expense",
        };
        format!("{label} of {:.2}", transaction.amount)
    } else {
        transaction.description.clone()
    };
    let mut task = Task::new(title)
        .due_on(due)
        .with_priority(Priority::Medium);
    task.transaction_id = Some(transaction.id);
    task.created_at = now;
    task
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::TransactionRecurrence;
    use crate::schedule::RecurrenceKind;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn rent(end: Option<NaiveDate>) -> Transaction {
        Transaction::new(TransactionKind::Expense, 900.0, None, date(2024, 1, 31))
            .unwrap()
            .described("Rent")
            .with_recurrence(TransactionRecurrence {
                end_date: end,
                ..TransactionRecurrence::new(RecurrenceKind::Monthly)
            })
    }

    #[test]
    fn next_due_defaults_to_one_period_after_date() {
        assert_eq!(next_due(&rent(None)), Some(date(2024, 2, 29)));
        let mut explicit = rent(None);
        if let Some(rule) = explicit.recurrence.as_mut() {
            rule.next_date = Some(date(2024, 5, 1));
        }
        assert_eq!(next_due(&explicit), Some(date(2024, 5, 1)));
    }

    #[test]
    fn reminder_links_back_to_transaction() {
        let template = rent(None);
        let reminder = reminder_for(&template, Utc::now()).expect("reminder");
        assert_eq!(reminder.transaction_id, Some(template.id));
        assert_eq!(reminder.due_date, Some(date(2024, 2, 29)));
        assert_eq!(reminder.title, "Rent");
    }

    #[test]
    fn settle_creates_instance_and_next_reminder() {
        let template = rent(None);
        let settlement = settle(&template, Utc::now()).expect("settlement");
        assert_eq!(settlement.instance.date, date(2024, 2, 29));
        assert!(settlement.instance.recurrence.is_none());
        assert_eq!(settlement.instance.source_id, Some(template.id));
        assert_ne!(settlement.instance.id, template.id);
        assert_eq!(settlement.next_date, date(2024, 3, 29));
        let reminder = settlement.reminder.expect("reminder");
        assert_eq!(reminder.due_date, Some(date(2024, 3, 29)));
    }

    #[test]
    fn end_date_stops_the_series() {
        let template = rent(Some(date(2024, 3, 1)));
        let settlement = settle(&template, Utc::now()).expect("last occurrence");
        assert!(settlement.reminder.is_none());

        let ended = rent(Some(date(2024, 2, 1)));
        assert!(settle(&ended, Utc::now()).is_none());
        assert!(reminder_for(&ended, Utc::now()).is_none());
    }

    #[test]
    fn one_off_transactions_are_ignored() {
        let single = Transaction::new(TransactionKind::Income, 10.0, None, date(2024, 1, 1)).unwrap();
        assert!(next_due(&single).is_none());
        assert!(settle(&single, Utc::now()).is_none());
    }
}
