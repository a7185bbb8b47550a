use std::{fmt, str::FromStr};

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use uuid::Uuid;

use crate::errors::CoreError;

/// Identifies records that expose a stable unique identifier.
pub trait Identifiable {
    fn id(&self) -> Uuid;
}

pub fn find_by_id<T: Identifiable>(items: &[T], id: Uuid) -> Option<&T> {
    items.iter().find(|item| item.id() == id)
}

pub fn find_by_id_mut<T: Identifiable>(items: &mut [T], id: Uuid) -> Option<&mut T> {
    items.iter_mut().find(|item| item.id() == id)
}

/// Removes and returns the record with `id`, keeping the order of the rest.
pub fn remove_by_id<T: Identifiable>(items: &mut Vec<T>, id: Uuid) -> Option<T> {
    let idx = items.iter().position(|item| item.id() == id)?;
    Some(items.remove(idx))
}

/// A calendar month, written `YYYY-MM` on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Month {
    pub year: i32,
    pub month: u32,
}

impl Month {
    pub fn new(year: i32, month: u32) -> Result<Self, CoreError> {
        if !(1..=12).contains(&month) {
            return Err(CoreError::Invalid(format!("month {month} out of range")));
        }
        Ok(Self { year, month })
    }

    pub fn of(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date.year() == self.year && date.month() == self.month
    }
}

impl fmt::Display for Month {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for Month {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || CoreError::Invalid(format!("`{s}` is not a YYYY-MM month"));
        let (year, month) = s.trim().split_once('-').ok_or_else(invalid)?;
        let year = year.parse::<i32>().map_err(|_| invalid())?;
        let month = month.parse::<u32>().map_err(|_| invalid())?;
        Month::new(year, month)
    }
}

impl Serialize for Month {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Month {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_and_formats_year_month() {
        let month: Month = "2024-03".parse().unwrap();
        assert_eq!(month, Month { year: 2024, month: 3 });
        assert_eq!(month.to_string(), "2024-03");
        assert!("2024-13".parse::<Month>().is_err());
        assert!("March".parse::<Month>().is_err());
    }

    #[test]
    fn contains_matches_year_and_month() {
        let month = Month::new(2024, 2).unwrap();
        assert!(month.contains(NaiveDate::from_ymd_opt(2024, 2, 29).unwrap()));
        assert!(!month.contains(NaiveDate::from_ymd_opt(2023, 2, 1).unwrap()));
        assert!(!month.contains(NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()));
    }

    struct Row(Uuid, &'static str);

    impl Identifiable for Row {
        fn id(&self) -> Uuid {
            self.0
        }
    }

    #[test]
    fn id_lookups_find_and_remove_records() {
        let (a, b) = (Uuid::new_v4(), Uuid::new_v4());
        let mut rows = vec![Row(a, "first"), Row(b, "second")];
        assert_eq!(find_by_id(&rows, b).map(|r| r.1), Some("second"));
        if let Some(row) = find_by_id_mut(&mut rows, a) {
            row.1 = "renamed";
        }
        assert_eq!(remove_by_id(&mut rows, a).map(|r| r.1), Some("renamed"));
        assert!(remove_by_id(&mut rows, a).is_none());
        assert_eq!(rows.len(), 1);
    }

    #[test]
    fn serializes_as_string() {
        let month = Month::new(2024, 1).unwrap();
        assert_eq!(serde_json::to_string(&month).unwrap(), "\"2024-01\"");
        let back: Month = serde_json::from_str("\"2024-01\"").unwrap();
        assert_eq!(back, month);
    }
}
