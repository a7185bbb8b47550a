use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::common::Identifiable;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum MetricKind {
    Weight,
    Mood,
    Energy,
    Sleep,
    Water,
}

/// One health measurement. Weight is in kilograms, sleep in hours, water in
/// litres; mood and energy are 1–5 ratings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MetricEntry {
    pub id: Uuid,
    #[serde(default)]
    pub area_id: Option<Uuid>,
    pub kind: MetricKind,
    pub value: f64,
    pub date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl MetricEntry {
    pub fn new(kind: MetricKind, value: f64, date: NaiveDate) -> Self {
        Self {
            id: Uuid::new_v4(),
            area_id: None,
            kind,
            value,
            date,
            note: None,
        }
    }

    pub fn weight(value: f64, date: NaiveDate) -> Self {
        Self::new(MetricKind::Weight, value, date)
    }
}

impl Identifiable for MetricEntry {
    fn id(&self) -> Uuid {
        self.id
    }
}

/// Target weight kept in local preferences.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WeightGoal {
    pub target: f64,
    #[serde(default)]
    pub start: Option<f64>,
    #[serde(default)]
    pub height_cm: Option<f64>,
}
