pub mod finance_service;
pub mod habit_service;
pub mod session;
pub mod summary_service;
pub mod task_service;

pub use finance_service::FinanceService;
pub use habit_service::{HabitService, HabitToggle};
pub use session::Session;
pub use summary_service::{Dashboard, SummaryService};
pub use task_service::{TaskCompletion, TaskService};

use crate::errors::CoreError;

pub type ServiceResult<T> = Result<T, ServiceError>;

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error(transparent)]
    Core(#[from] CoreError),
    #[error("{0}")]
    Invalid(String),
}
