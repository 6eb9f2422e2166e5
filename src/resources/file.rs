//! Regular file resource with rendered content.
use std::path::PathBuf;

use anyhow::Result;

use super::helpers::fs::{ensure_parent_dir, is_executable, remove_path, set_executable};
use super::{Applicable, Resource, ResourceChange, ResourceState};
use crate::error::DevenvError;

/// A file whose content is written on creation or regeneration.
///
/// An existing file is judged only by the required lines it must contain
/// and, for scripts, its execute bit; its remaining content belongs to the
/// user.
#[derive(Debug, Clone)]
pub struct FileResource {
    /// Absolute path.
    pub path: PathBuf,
    /// Fully rendered content.
    pub content: String,
    /// Lines an existing file must contain.
    pub must_contain: Vec<&'static str>,
    /// Whether the file must be executable.
    pub executable: bool,
}

impl FileResource {
    /// Create a new file resource with no required lines.
    #[must_use]
    pub const fn new(path: PathBuf, content: String) -> Self {
        Self {
            path,
            content,
            must_contain: Vec::new(),
            executable: false,
        }
    }

    /// Set the required lines.
    #[must_use]
    pub fn with_required_lines(mut self, lines: &[&'static str]) -> Self {
        self.must_contain = lines.to_vec();
        self
    }

    /// Require the execute bit.
    #[must_use]
    pub const fn with_executable(mut self, executable: bool) -> Self {
        self.executable = executable;
        self
    }

    fn missing_lines(&self, existing: &str) -> Vec<&'static str> {
        self.must_contain
            .iter()
            .copied()
            .filter(|want| !existing.lines().any(|line| line.trim() == *want))
            .collect()
    }
}

impl Applicable for FileResource {
    fn description(&self) -> String {
        self.path.display().to_string()
    }

    fn apply(&self) -> Result<ResourceChange> {
        if self.path.is_dir() {
            return Err(DevenvError::create(&self.path, "a directory is in the way").into());
        }
        ensure_parent_dir(&self.path).map_err(|e| DevenvError::create(&self.path, e))?;
        std::fs::write(&self.path, &self.content)
            .map_err(|e| DevenvError::create(&self.path, e))?;
        if self.executable {
            set_executable(&self.path)?;
        }
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

impl Resource for FileResource {
    fn current_state(&self) -> Result<ResourceState> {
        if self.path.is_dir() {
            return Ok(ResourceState::Invalid {
                reason: "exists and is a directory".to_string(),
            });
        }
        if !self.path.exists() {
            return Ok(ResourceState::Missing);
        }

        if !self.must_contain.is_empty() {
            let existing = std::fs::read_to_string(&self.path).unwrap_or_default();
            let missing = self.missing_lines(&existing);
            if !missing.is_empty() {
                return Ok(ResourceState::Incorrect {
                    current: format!("missing line: {}", missing.join(", ")),
                });
            }
        }

        if self.executable && !is_executable(&self.path) {
            return Ok(ResourceState::Incorrect {
                current: "not executable".to_string(),
            });
        }

        Ok(ResourceState::Correct)
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::panic)]
mod tests {
    use super::*;

    const SENSIBLE: &str = "set -g @plugin 'tmux-plugins/tmux-sensible'";

    #[test]
    fn missing_file_is_written_with_parents() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a/b/.rc");
        let resource = FileResource::new(path.clone(), "hello\n".to_string());
        assert_eq!(resource.current_state().unwrap(), ResourceState::Missing);
        assert_eq!(resource.apply().unwrap(), ResourceChange::Applied);
        assert_eq!(std::fs::read_to_string(path).unwrap(), "hello\n");
        assert_eq!(resource.current_state().unwrap(), ResourceState::Correct);
    }

    #[test]
    fn existing_file_with_other_content_is_correct() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".vimrc");
        std::fs::write(&path, "user edits\n").unwrap();
        let resource = FileResource::new(path, "canonical\n".to_string());
        assert_eq!(resource.current_state().unwrap(), ResourceState::Correct);
    }

    #[test]
    fn missing_required_line_is_incorrect() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".tmux.conf");
        std::fs::write(&path, "set -g mouse on\n").unwrap();
        let resource = FileResource::new(path.clone(), format!("{SENSIBLE}\n"))
            .with_required_lines(&[SENSIBLE]);

        let ResourceState::Incorrect { current } = resource.current_state().unwrap() else {
            panic!("expected Incorrect");
        };
        assert!(current.contains("tmux-sensible"));

        resource.apply().unwrap();
        assert_eq!(resource.current_state().unwrap(), ResourceState::Correct);
    }

    #[test]
    fn required_line_matches_ignoring_indentation() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".tmux.conf");
        std::fs::write(&path, format!("  {SENSIBLE}\n")).unwrap();
        let resource =
            FileResource::new(path, String::new()).with_required_lines(&[SENSIBLE]);
        assert_eq!(resource.current_state().unwrap(), ResourceState::Correct);
    }

    #[test]
    fn directory_in_the_way_is_invalid() {
        let dir = tempfile::tempdir().unwrap();
        let resource = FileResource::new(dir.path().to_path_buf(), String::new());
        assert!(matches!(
            resource.current_state().unwrap(),
            ResourceState::Invalid { .. }
        ));
        assert!(resource.apply().is_err());
    }

    #[cfg(unix)]
    #[test]
    fn executable_file_gets_exec_bit() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bin/note");
        let resource =
            FileResource::new(path.clone(), "#!/bin/sh\n".to_string()).with_executable(true);
        resource.apply().unwrap();
        assert!(is_executable(&path));

        std::fs::write(&path, "#!/bin/sh\n").unwrap();
        use std::os::unix::fs::PermissionsExt as _;
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o644)).unwrap();
        assert!(matches!(
            resource.current_state().unwrap(),
            ResourceState::Incorrect { .. }
        ));
    }

    #[test]
    fn remove_deletes_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".zshrc");
        std::fs::write(&path, "x").unwrap();
        let resource = FileResource::new(path.clone(), String::new());
        assert_eq!(resource.remove().unwrap(), ResourceChange::Applied);
        assert!(!path.exists());
    }
}
