use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::errors::CoreError;

/// Period a recurring record repeats on.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum RecurrenceKind {
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

impl RecurrenceKind {
    fn unit_name(self) -> &'static str {
        match self {
            RecurrenceKind::Daily => "day",
            RecurrenceKind::Weekly => "week",
            RecurrenceKind::Monthly => "month",
            RecurrenceKind::Yearly => "year",
        }
    }

    /// Advances `from` by `count` units of this period.
    ///
    /// Month and year steps clamp the day to the last day of the target month,
    /// so Jan 31 plus one month lands on the last day of February.
    pub fn advance(self, from: NaiveDate, count: u32) -> NaiveDate {
        match self {
            RecurrenceKind::Daily => from + Duration::days(count as i64),
            RecurrenceKind::Weekly => from + Duration::weeks(count as i64),
            RecurrenceKind::Monthly => shift_months(from, count as i32),
            RecurrenceKind::Yearly => shift_months(from, count as i32 * 12),
        }
    }
}

/// How often a task or transaction repeats, and until when.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RecurrencePattern {
    pub kind: RecurrenceKind,
    #[serde(default = "RecurrencePattern::default_interval")]
    pub interval: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
}

impl RecurrencePattern {
    pub fn new(kind: RecurrenceKind, interval: u32) -> Result<Self, CoreError> {
        if interval == 0 {
            return Err(CoreError::Invalid(
                "recurrence interval must be at least 1".into(),
            ));
        }
        Ok(Self {
            kind,
            interval,
            end_date: None,
        })
    }

    pub fn daily() -> Self {
        Self {
            kind: RecurrenceKind::Daily,
            interval: 1,
            end_date: None,
        }
    }

    pub fn until(mut self, end_date: NaiveDate) -> Self {
        self.end_date = Some(end_date);
        self
    }

    fn default_interval() -> u32 {
        1
    }

    /// Interval as stored, with zero read back as one.
    pub fn effective_interval(&self) -> u32 {
        self.interval.max(1)
    }

    /// Next due date after `current`. Never consults the end date.
    pub fn next_date(&self, current: NaiveDate) -> NaiveDate {
        self.kind.advance(current, self.effective_interval())
    }

    /// Applies `next_date` `steps` times.
    pub fn advance(&self, current: NaiveDate, steps: u32) -> NaiveDate {
        let mut date = current;
        for _ in 0..steps {
            date = self.next_date(date);
        }
        date
    }

    /// Whether a record dated `candidate` may still be generated.
    pub fn allows(&self, candidate: NaiveDate) -> bool {
        match self.end_date {
            Some(end) => candidate <= end,
            None => true,
        }
    }

    pub fn label(&self) -> String {
        match (self.effective_interval(), self.kind) {
            (1, RecurrenceKind::Daily) => "Daily".into(),
            (1, RecurrenceKind::Weekly) => "Weekly".into(),
            (1, RecurrenceKind::Monthly) => "Monthly".into(),
            (1, RecurrenceKind::Yearly) => "Yearly".into(),
            (n, kind) => format!("Every {} {}s", n, kind.unit_name()),
        }
    }
}

/// Moves `date` by a signed number of months, clamping the day of month.
pub fn shift_months(date: NaiveDate, months: i32) -> NaiveDate {
    let index = date.year() * 12 + date.month0() as i32 + months;
    let year = index.div_euclid(12);
    let month = index.rem_euclid(12) as u32 + 1;
    let day = date.day().min(days_in_month(year, month));
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or(date)
}

pub fn days_in_month(year: i32, month: u32) -> u32 {
    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .map(|first| (first - Duration::days(1)).day())
        .unwrap_or(28)
}
