//! Directory resource.
use std::path::PathBuf;

use anyhow::Result;

use super::helpers::fs::remove_path;
use super::{Applicable, Resource, ResourceChange, ResourceState};
use crate::error::DevenvError;

/// A directory that must exist.
#[derive(Debug, Clone)]
pub struct DirectoryResource {
    /// Absolute path.
    pub path: PathBuf,
}

impl DirectoryResource {
    /// Create a new directory resource.
    #[must_use]
    pub const fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

impl Applicable for DirectoryResource {
    fn description(&self) -> String {
        self.path.display().to_string()
    }

    fn apply(&self) -> Result<ResourceChange> {
        if self.path.is_dir() {
            return Ok(ResourceChange::AlreadyCorrect);
        }
        std::fs::create_dir_all(&self.path).map_err(|e| DevenvError::create(&self.path, e))?;
        Ok(ResourceChange::Applied)
    }

    fn remove(&self) -> Result<ResourceChange> {
        if self.path.symlink_metadata().is_err() {
            return Ok(ResourceChange::AlreadyCorrect);
        }
        remove_path(&self.path)?;
        Ok(ResourceChange::Applied)
    }
}

impl Resource for DirectoryResource {
    fn current_state(&self) -> Result<ResourceState> {
        if self.path.is_dir() {
            Ok(ResourceState::Correct)
        } else if self.path.symlink_metadata().is_ok() {
            Ok(ResourceState::Invalid {
                reason: "exists and is not a directory".to_string(),
            })
        } else {
            Ok(ResourceState::Missing)
        }
    }
}
