pub mod json_backend;
pub mod memory;

use std::sync::Arc;

use crate::{domain::Workspace, errors::CoreError};

pub type Result<T> = std::result::Result<T, CoreError>;

/// Boundary to whatever holds the user's records. Implementations load and
/// replace the whole record set; the service layer never sees partial writes.
pub trait RecordStore: Send + Sync {
    fn load(&self) -> Result<Workspace>;
    fn save(&self, workspace: &Workspace) -> Result<()>;
}

impl<S: RecordStore + ?Sized> RecordStore for Arc<S> {
    fn load(&self) -> Result<Workspace> {
        (**self).load()
    }

    fn save(&self, workspace: &Workspace) -> Result<()> {
        (**self).save(workspace)
    }
}

pub use json_backend::JsonStore;
pub use memory::MemoryStore;
