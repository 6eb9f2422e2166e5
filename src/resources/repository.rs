//! Git repository resource: cloned plugins and the local notes repository.
use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result};

use super::helpers::fs::{ensure_parent_dir, remove_path};
use super::{Applicable, Resource, ResourceChange, ResourceState};
use crate::exec::Executor;
use crate::inventory::RepoSource;

/// A git working tree at a fixed path.
#[derive(Debug)]
pub struct RepositoryResource<'a> {
    /// Absolute path of the working tree.
    pub path: PathBuf,
    /// Clone URL or local initialisation.
    pub source: &'a RepoSource,
    executor: &'a dyn Executor,
}

impl<'a> RepositoryResource<'a> {
    /// Create a new repository resource; `git` runs through `executor`.
    #[must_use]
    pub const fn new(path: PathBuf, source: &'a RepoSource, executor: &'a dyn Executor) -> Self {
        Self {
            path,
            source,
            executor,
        }
    }

    /// Fast-forward a cloned repository from its remote.
    ///
    /// Local repositories have no remote and are left alone.
    ///
    /// # Errors
    ///
    /// Returns an error if `git pull` fails.
    pub fn update(&self) -> Result<ResourceChange> {
        match self.source {
            RepoSource::Local => Ok(ResourceChange::Skipped {
                reason: "local repository".to_string(),
            }),
            RepoSource::Remote(_) => {
                let path = self.path.to_string_lossy();
                self.executor
                    .run("git", &["-C", &path, "pull", "--ff-only"])
                    .with_context(|| format!("updating {}", self.path.display()))?;
                Ok(ResourceChange::Applied)
            }
        }
    }

    fn clone_from(&self, url: &str) -> Result<()> {
        ensure_parent_dir(&self.path)?;
        let dest = self.path.to_string_lossy();
        self.executor
            .run("git", &["clone", "--depth", "1", url, &dest])
            .with_context(|| format!("cloning {url}"))?;
        Ok(())
    }
}

/// Whether `path` is an empty directory.
fn is_empty_dir(path: &Path) -> bool {
    std::fs::read_dir(path).is_ok_and(|mut entries| entries.next().is_none())
}

/// Initialise `path` as a repository and commit whatever it already holds.
///
/// The commit is authored by the user's configured identity, falling back
/// to a fixed `devenv` signature when git has none.
///
/// # Errors
///
/// Returns an error if any git operation fails.
pub fn init_local(path: &Path) -> Result<()> {
    std::fs::create_dir_all(path).with_context(|| format!("creating {}", path.display()))?;
    let repo = git2::Repository::init(path)
        .with_context(|| format!("initialising repository at {}", path.display()))?;

    let mut index = repo.index()?;
    index.add_all(["*"], git2::IndexAddOption::DEFAULT, None)?;
    index.write()?;
    let tree_id = index.write_tree()?;
    let tree = repo.find_tree(tree_id)?;

    let signature = repo
        .signature()
        .or_else(|_| git2::Signature::now("devenv", "devenv@localhost"))?;
    repo.commit(
        Some("HEAD"),
        &signature,
        &signature,
        "Initial notes commit",
        &tree,
        &[],
    )?;
    Ok(())
}

impl Applicable for RepositoryResource<'_> {
    fn description(&self) -> String {
        match self.source {
            RepoSource::Remote(url) => format!("{} ({url})", self.path.display()),
            RepoSource::Local => self.path.display().to_string(),
        }
    }

    fn apply(&self) -> Result<ResourceChange> {
        if git2::Repository::open(&self.path).is_ok() {
            return Ok(ResourceChange::AlreadyCorrect);
        }
        match self.source {
            RepoSource::Remote(url) => self.clone_from(url)?,
            RepoSource::Local => init_local(&self.path)?,
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

impl Resource for RepositoryResource<'_> {
    fn current_state(&self) -> Result<ResourceState> {
        if git2::Repository::open(&self.path).is_ok() {
            return Ok(ResourceState::Correct);
        }
        if self.path.symlink_metadata().is_err() {
            return Ok(ResourceState::Missing);
        }
        match self.source {
            // A plain notes directory is exactly what gets initialised.
            RepoSource::Local if self.path.is_dir() => Ok(ResourceState::Missing),
            RepoSource::Remote(_) if is_empty_dir(&self.path) => Ok(ResourceState::Missing),
            _ => Ok(ResourceState::Invalid {
                reason: "exists but is not a git repository".to_string(),
            }),
        }
    }
}
