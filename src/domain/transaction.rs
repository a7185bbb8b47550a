use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::common::Identifiable;
use crate::{errors::CoreError, schedule::RecurrenceKind};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum TransactionKind {
    Income,
    Expense,
}

/// Repeat rule for a recurring transaction. `next_date` is the date of the next
/// occurrence still to be settled; when unset it is derived from the
/// transaction's own date.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TransactionRecurrence {
    pub frequency: RecurrenceKind,
    #[serde(default)]
    pub next_date: Option<NaiveDate>,
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
}

impl TransactionRecurrence {
    pub fn new(frequency: RecurrenceKind) -> Self {
        Self {
            frequency,
            next_date: None,
            end_date: None,
        }
    }

    pub fn allows(&self, candidate: NaiveDate) -> bool {
        self.end_date.map_or(true, |end| candidate <= end)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Transaction {
    pub id: Uuid,
    pub kind: TransactionKind,
    pub amount: f64,
    #[serde(default)]
    pub category_id: Option<Uuid>,
    #[serde(default)]
    pub description: String,
    pub date: NaiveDate,
    #[serde(default)]
    pub recurrence: Option<TransactionRecurrence>,
    /// Recurring template this concrete instance was settled from.
    #[serde(default)]
    pub source_id: Option<Uuid>,
}

impl Transaction {
    pub fn new(
        kind: TransactionKind,
        amount: f64,
        category_id: Option<Uuid>,
        date: NaiveDate,
    ) -> Result<Self, CoreError> {
        if !amount.is_finite() || amount < 0.0 {
            return Err(CoreError::Invalid(format!(
                "transaction amount must be a non-negative number, got {amount}"
            )));
        }
        Ok(Self {
            id: Uuid::new_v4(),
            kind,
            amount,
            category_id,
            description: String::new(),
            date,
            recurrence: None,
            source_id: None,
        })
    }

    pub fn described(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_recurrence(mut self, recurrence: TransactionRecurrence) -> Self {
        self.recurrence = Some(recurrence);
        self
    }

    pub fn is_recurring(&self) -> bool {
        self.recurrence.is_some()
    }

    pub fn is_expense(&self) -> bool {
        self.kind == TransactionKind::Expense
    }
}

impl Identifiable for Transaction {
    fn id(&self) -> Uuid {
        self.id
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Category {
    pub id: Uuid,
    pub name: String,
    pub kind: TransactionKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl Category {
    pub fn new(name: impl Into<String>, kind: TransactionKind) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            kind,
            color: None,
        }
    }
}

impl Identifiable for Category {
    fn id(&self) -> Uuid {
        self.id
    }
}
