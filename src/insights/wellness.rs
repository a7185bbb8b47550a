use chrono::{Duration, NaiveDate};
use serde::Serialize;

use crate::domain::{MetricEntry, MetricKind, WeightGoal};

/// Changes smaller than this, in kilograms, count as noise.
const TREND_THRESHOLD: f64 = 0.1;
const VARIATION_WINDOW_DAYS: i64 = 7;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Trend {
    Up,
    Down,
    #[default]
    Stable,
}

impl Trend {
    pub fn from_variation(variation: f64) -> Self {
        if variation > TREND_THRESHOLD {
            Trend::Up
        } else if variation < -TREND_THRESHOLD {
            Trend::Down
        } else {
            Trend::Stable
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct WeightStats {
    pub current: Option<f64>,
    pub lowest: Option<f64>,
    pub highest: Option<f64>,
    pub variation_7d: f64,
    pub trend: Trend,
    pub bmi: Option<f64>,
    pub goal_progress: Option<f64>,
}

/// Summarises the weight entries in `metrics`.
///
/// The variation compares the first and last entries dated within the seven
/// days ending on the most recent entry.
pub fn weight_stats(metrics: &[MetricEntry], goal: Option<&WeightGoal>) -> WeightStats {
    let mut weights: Vec<&MetricEntry> = metrics
        .iter()
        .filter(|m| m.kind == MetricKind::Weight)
        .collect();
    weights.sort_by_key(|m| m.date);

    let (Some(first), Some(latest)) = (weights.first(), weights.last()) else {
        return WeightStats::default();
    };
    let current = latest.value;

    let window_start = latest.date - Duration::days(VARIATION_WINDOW_DAYS - 1);
    let variation = weights
        .iter()
        .find(|m| m.date >= window_start)
        .map(|window_first| current - window_first.value)
        .unwrap_or(0.0);

    let lowest = weights.iter().map(|m| m.value).fold(f64::INFINITY, f64::min);
    let highest = weights
        .iter()
        .map(|m| m.value)
        .fold(f64::NEG_INFINITY, f64::max);

    WeightStats {
        current: Some(current),
        lowest: Some(lowest),
        highest: Some(highest),
        variation_7d: variation,
        trend: Trend::from_variation(variation),
        bmi: goal.and_then(|g| g.height_cm).and_then(|h| bmi(current, h)),
        goal_progress: goal.and_then(|g| goal_progress(g, first.value, current)),
    }
}

pub fn bmi(weight_kg: f64, height_cm: f64) -> Option<f64> {
    if height_cm <= 0.0 {
        return None;
    }
    let meters = height_cm / 100.0;
    Some(weight_kg / (meters * meters))
}

/// Percentage of the distance from the starting weight to the target covered
/// so far, clamped to `[0, 100]`.
fn goal_progress(goal: &WeightGoal, first_recorded: f64, current: f64) -> Option<f64> {
    let start = goal.start.unwrap_or(first_recorded);
    let distance = start - goal.target;
    if distance.abs() < f64::EPSILON {
        return None;
    }
    Some(((start - current) / distance * 100.0).clamp(0.0, 100.0))
}

/// Mean value of `kind` entries dated on or after `since`.
pub fn metric_average(metrics: &[MetricEntry], kind: MetricKind, since: NaiveDate) -> Option<f64> {
    let (sum, count) = metrics
        .iter()
        .filter(|m| m.kind == kind && m.date >= since)
        .fold((0.0, 0usize), |(sum, count), m| (sum + m.value, count + 1));
    (count > 0).then(|| sum / count as f64)
}
