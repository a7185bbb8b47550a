use std::sync::{
    atomic::{AtomicBool, Ordering},
    Mutex,
};

use crate::{domain::Workspace, errors::CoreError};

use super::{RecordStore, Result};

/// Volatile store, mainly for tests and previews. `fail_next_save` makes the
/// following save fail once, which exercises rollback paths.
#[derive(Debug, Default)]
pub struct MemoryStore {
    workspace: Mutex<Workspace>,
    fail_next_save: AtomicBool,
}

impl MemoryStore {
    pub fn new(workspace: Workspace) -> Self {
        Self {
            workspace: Mutex::new(workspace),
            fail_next_save: AtomicBool::new(false),
        }
    }

    pub fn fail_next_save(&self) {
        self.fail_next_save.store(true, Ordering::SeqCst);
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Workspace>> {
        self.workspace
            .lock()
            .map_err(|_| CoreError::Storage("memory store lock poisoned".into()))
    }
}

impl RecordStore for MemoryStore {
    fn load(&self) -> Result<Workspace> {
        Ok(self.lock()?.clone())
    }

    fn save(&self, workspace: &Workspace) -> Result<()> {
        if self.fail_next_save.swap(false, Ordering::SeqCst) {
            return Err(CoreError::Storage("write rejected".into()));
        }
        *self.lock()? = workspace.clone();
        Ok(())
    }
}
