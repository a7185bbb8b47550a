use std::path::{Path, PathBuf};

use crate::{
    core::utils::PathResolver,
    domain::Workspace,
    utils::persistence::{read_json, write_json_atomic},
};

use super::{RecordStore, Result};

/// Keeps the record set in a single JSON file, replaced atomically on save.
#[derive(Debug, Clone)]
pub struct JsonStore {
    path: PathBuf,
}

impl JsonStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store rooted at the application data directory.
    pub fn new_default() -> Self {
        Self::in_dir(&PathResolver::base_dir())
    }

    pub fn in_dir(base: &Path) -> Self {
        Self::new(PathResolver::records_file_in(base))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl RecordStore for JsonStore {
    /// A missing file reads as an empty workspace.
    fn load(&self) -> Result<Workspace> {
        let workspace = read_json::<Workspace>(&self.path)?.unwrap_or_default();
        tracing::debug!(
            path = %self.path.display(),
            tasks = workspace.tasks.len(),
            habits = workspace.habits.len(),
            "records loaded"
        );
        Ok(workspace)
    }

    fn save(&self, workspace: &Workspace) -> Result<()> {
        write_json_atomic(workspace, &self.path)?;
        tracing::debug!(path = %self.path.display(), "records saved");
        Ok(())
    }
}
