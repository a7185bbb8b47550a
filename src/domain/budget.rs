use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::common::{Identifiable, Month};

/// A monthly spending limit for one expense category.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Budget {
    pub id: Uuid,
    pub category_id: Uuid,
    pub month: Month,
    pub limit: f64,
}

impl Budget {
    pub fn new(category_id: Uuid, month: Month, limit: f64) -> Self {
        Self {
            id: Uuid::new_v4(),
            category_id,
            month,
            limit,
        }
    }
}

impl Identifiable for Budget {
    fn id(&self) -> Uuid {
        self.id
    }
}
