//! Idempotent resource primitives (check + apply pattern).
//!
//! Each [`ResourceKind`](crate::inventory::ResourceKind) has a resource type
//! here that knows how to inspect and mutate exactly one path or tool.  Mode
//! policy (whether to overwrite, install, or only report) lives in the
//! reconciler; resources only answer "what is there" and "make it so".
pub mod directory;
pub mod file;
pub mod helpers;
pub mod repository;
pub mod tool;

use anyhow::Result;

pub use directory::DirectoryResource;
pub use file::FileResource;
pub use repository::RepositoryResource;
pub use tool::{PackageManagerInstaller, ToolInstaller, ToolResource};

/// Minimal interface for resources that can be described, applied, and removed.
pub trait Applicable {
    /// Human-readable description of this resource.
    fn description(&self) -> String;

    /// Bring the resource to its desired state.
    ///
    /// Parent directories are created as needed.  An existing file is
    /// overwritten; callers back it up first.
    ///
    /// # Errors
    ///
    /// Returns an error if the resource cannot be applied due to I/O failures,
    /// permission issues, a failed shell-out, or other system errors.
    fn apply(&self) -> Result<ResourceChange>;

    /// Remove the resource, undoing a previous `apply()`.
    ///
    /// Callers back up whatever is at the path first.
    ///
    /// # Errors
    ///
    /// Returns an error if the resource exists but cannot be removed.
    fn remove(&self) -> Result<ResourceChange>;
}

/// State of a resource (directory, file, tool, repository).
///
/// # Examples
///
/// ```
/// use devenv_cli::resources::ResourceState;
///
/// let missing = ResourceState::Missing;
/// let correct = ResourceState::Correct;
/// let stale = ResourceState::Incorrect { current: "missing line".into() };
/// let blocked = ResourceState::Invalid { reason: "not a directory".into() };
///
/// assert_ne!(missing, correct);
/// assert_eq!(correct, ResourceState::Correct);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResourceState {
    /// Resource does not exist or is not present.
    Missing,
    /// Resource exists and matches the desired state.
    Correct,
    /// Resource exists but does not match the desired state.
    Incorrect {
        /// What is wrong with the current resource.
        current: String,
    },
    /// Something else occupies the resource's place and blocks it.
    Invalid {
        /// Reason why the resource cannot be applied.
        reason: String,
    },
}

/// Result of applying a resource change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResourceChange {
    /// Resource was created or updated.
    Applied,
    /// Resource was already correct (no change needed).
    AlreadyCorrect,
    /// Resource was skipped.
    Skipped {
        /// Reason why the resource was skipped.
        reason: String,
    },
}

/// Unified interface for resources that can be checked and applied.
pub trait Resource: Applicable {
    /// Check the current state of the resource.
    ///
    /// # Errors
    ///
    /// Returns an error if the state cannot be determined due to I/O
    /// failures, permission issues, or other system errors.
    fn current_state(&self) -> Result<ResourceState>;
}
