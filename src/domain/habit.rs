use chrono::{DateTime, Datelike, NaiveDate, Utc, Weekday};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::common::{Identifiable, Month};
use crate::insights::streak::{compute_streak, Streak};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case", tag = "type", content = "value")]
pub enum HabitFrequency {
    Daily,
    TimesPerWeek(u8),
    SpecificDays(Vec<Weekday>),
    TimesPerMonth(u8),
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case", tag = "mode")]
pub enum TrackingMode {
    Boolean,
    Quantitative { target: f64, unit: String },
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Completion {
    pub date: NaiveDate,
    pub value: f64,
    pub completed_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleOutcome {
    Added,
    Removed,
}

/// Completions counted in the frequency's current period.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PeriodProgress {
    pub done: u32,
    pub target: u32,
}

impl PeriodProgress {
    pub fn is_met(&self) -> bool {
        self.done >= self.target
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Habit {
    pub id: Uuid,
    pub title: String,
    pub frequency: HabitFrequency,
    pub tracking: TrackingMode,
    #[serde(default)]
    pub completions: Vec<Completion>,
    #[serde(default)]
    pub current_streak: u32,
    #[serde(default)]
    pub longest_streak: u32,
    #[serde(default)]
    pub archived_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl Habit {
    pub fn new(title: impl Into<String>, frequency: HabitFrequency, tracking: TrackingMode) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            frequency,
            tracking,
            completions: Vec::new(),
            current_streak: 0,
            longest_streak: 0,
            archived_at: None,
            created_at: Utc::now(),
        }
    }

    pub fn daily(title: impl Into<String>) -> Self {
        Self::new(title, HabitFrequency::Daily, TrackingMode::Boolean)
    }

    pub fn is_archived(&self) -> bool {
        self.archived_at.is_some()
    }

    pub fn completion_on(&self, date: NaiveDate) -> Option<&Completion> {
        self.completions.iter().find(|c| c.date == date)
    }

    /// Adds a completion for `date`, or removes the existing one.
    ///
    /// Quantitative habits are credited with their full target when toggled on.
    pub fn toggle_completion(&mut self, date: NaiveDate, now: DateTime<Utc>) -> ToggleOutcome {
        if let Some(idx) = self.completions.iter().position(|c| c.date == date) {
            self.completions.remove(idx);
            return ToggleOutcome::Removed;
        }
        let value = match &self.tracking {
            TrackingMode::Boolean => 1.0,
            TrackingMode::Quantitative { target, .. } => *target,
        };
        self.insert_completion(date, value, now);
        ToggleOutcome::Added
    }

    /// Records a measured value for `date`, replacing any earlier value. Zero or
    /// negative values clear the day.
    pub fn record_value(&mut self, date: NaiveDate, value: f64, now: DateTime<Utc>) {
        self.completions.retain(|c| c.date != date);
        if value > 0.0 {
            self.insert_completion(date, value, now);
        }
    }

    fn insert_completion(&mut self, date: NaiveDate, value: f64, now: DateTime<Utc>) {
        let idx = self.completions.partition_point(|c| c.date < date);
        self.completions.insert(
            idx,
            Completion {
                date,
                value,
                completed_at: now,
            },
        );
    }

    pub fn qualifies(&self, completion: &Completion) -> bool {
        match &self.tracking {
            TrackingMode::Boolean => true,
            TrackingMode::Quantitative { target, .. } => completion.value >= *target,
        }
    }

    pub fn qualifying_dates(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.completions
            .iter()
            .filter(move |c| self.qualifies(c))
            .map(|c| c.date)
    }

    pub fn streak(&self, as_of: NaiveDate) -> Streak {
        compute_streak(self.qualifying_dates(), as_of)
    }

    /// Recomputes the cached streak counters from the full completion history.
    pub fn refresh_streak(&mut self, as_of: NaiveDate) -> Streak {
        let streak = self.streak(as_of);
        self.current_streak = streak.current;
        self.longest_streak = streak.longest;
        streak
    }

    pub fn is_scheduled_on(&self, date: NaiveDate) -> bool {
        match &self.frequency {
            HabitFrequency::SpecificDays(days) => days.contains(&date.weekday()),
            _ => true,
        }
    }

    pub fn period_progress(&self, as_of: NaiveDate) -> PeriodProgress {
        match &self.frequency {
            HabitFrequency::Daily => PeriodProgress {
                done: self.count_where(|d| d == as_of),
                target: 1,
            },
            HabitFrequency::TimesPerWeek(n) => PeriodProgress {
                done: self.count_where(|d| d.iso_week() == as_of.iso_week()),
                target: *n as u32,
            },
            HabitFrequency::SpecificDays(days) => PeriodProgress {
                done: self.count_where(|d| {
                    d.iso_week() == as_of.iso_week() && days.contains(&d.weekday())
                }),
                target: days.len() as u32,
            },
            HabitFrequency::TimesPerMonth(n) => {
                let month = Month::of(as_of);
                PeriodProgress {
                    done: self.count_where(|d| month.contains(d)),
                    target: *n as u32,
                }
            }
        }
    }

    fn count_where(&self, predicate: impl Fn(NaiveDate) -> bool) -> u32 {
        self.qualifying_dates().filter(|d| predicate(*d)).count() as u32
    }
}

impl Identifiable for Habit {
    fn id(&self) -> Uuid {
        self.id
    }
}
