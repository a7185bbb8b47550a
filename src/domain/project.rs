use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::common::Identifiable;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum ProjectStatus {
    #[default]
    Planning,
    Active,
    OnHold,
    Completed,
    Cancelled,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum ObjectiveStatus {
    #[default]
    NotStarted,
    InProgress,
    Completed,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Milestone {
    pub id: Uuid,
    pub title: String,
    #[serde(default)]
    pub due_date: Option<NaiveDate>,
    #[serde(default)]
    pub done: bool,
}

impl Milestone {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            due_date: None,
            done: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Objective {
    pub id: Uuid,
    pub title: String,
    #[serde(default)]
    pub status: ObjectiveStatus,
    #[serde(default)]
    pub milestones: Vec<Milestone>,
}

impl Objective {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            status: ObjectiveStatus::NotStarted,
            milestones: Vec::new(),
        }
    }

    /// Share of milestones done, 0 when there are none.
    pub fn progress(&self) -> f64 {
        ratio(
            self.milestones.iter().filter(|m| m.done).count(),
            self.milestones.len(),
        )
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Project {
    pub id: Uuid,
    pub title: String,
    #[serde(default)]
    pub status: ProjectStatus,
    #[serde(default)]
    pub area_id: Option<Uuid>,
    #[serde(default)]
    pub objectives: Vec<Objective>,
}

impl Project {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            status: ProjectStatus::Planning,
            area_id: None,
            objectives: Vec::new(),
        }
    }

    /// Share of objectives completed, 0 when there are none.
    pub fn progress(&self) -> f64 {
        ratio(
            self.objectives
                .iter()
                .filter(|o| o.status == ObjectiveStatus::Completed)
                .count(),
            self.objectives.len(),
        )
    }
}

impl Identifiable for Project {
    fn id(&self) -> Uuid {
        self.id
    }
}

fn ratio(done: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        done as f64 / total as f64
    }
}
