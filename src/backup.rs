//! Backup-before-mutate: copies of anything about to be overwritten or
//! removed, kept under `~/.devenv_backups/<YYYYMMDD_HHMMSS>/`.
//!
//! The backup directory is created lazily, once per run, on the first path
//! that actually needs backing up.  Copies preserve the path relative to
//! the home directory.  Originals are never touched here.
use std::path::{Component, Path, PathBuf};
use std::sync::Mutex;

use crate::error::DevenvError;
use crate::logging::Log;
use crate::resources::helpers::fs::copy_path;

/// Directory under the home root that holds every run's backups.
pub const BACKUP_DIR: &str = ".devenv_backups";

/// A single copied path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackupRecord {
    /// Run timestamp, `YYYYMMDD_HHMMSS`.
    pub timestamp: String,
    /// Original path.
    pub source: PathBuf,
    /// Where the copy was written.
    pub destination: PathBuf,
}

/// Creates and fills the per-run backup directory.
#[derive(Debug)]
pub struct BackupManager {
    home: PathBuf,
    timestamp: String,
    run_dir: Mutex<Option<PathBuf>>,
}

impl BackupManager {
    /// A manager for `home` stamped with the current local time.
    #[must_use]
    pub fn new(home: impl Into<PathBuf>) -> Self {
        let timestamp = chrono::Local::now().format("%Y%m%d_%H%M%S").to_string();
        Self::with_timestamp(home, timestamp)
    }

    /// A manager with a fixed timestamp.
    #[must_use]
    pub fn with_timestamp(home: impl Into<PathBuf>, timestamp: impl Into<String>) -> Self {
        Self {
            home: home.into(),
            timestamp: timestamp.into(),
            run_dir: Mutex::new(None),
        }
    }

    /// Back up every existing path in `paths`.
    ///
    /// Paths that do not exist are ignored.  A failed copy is logged as a
    /// warning and does not stop the others.
    ///
    /// # Errors
    ///
    /// Returns the first [`DevenvError::Backup`] once every path has been
    /// tried; callers must then leave the originals alone.
    pub fn backup_before_mutate(
        &self,
        paths: &[&Path],
        log: &dyn Log,
    ) -> Result<Vec<BackupRecord>, DevenvError> {
        let mut records = Vec::new();
        let mut first_error = None;
        for path in paths {
            match self.backup(path) {
                Ok(Some(record)) => {
                    log.debug(&format!(
                        "backed up {} to {}",
                        record.source.display(),
                        record.destination.display()
                    ));
                    records.push(record);
                }
                Ok(None) => {}
                Err(e) => {
                    log.warn(&e.to_string());
                    first_error.get_or_insert(e);
                }
            }
        }
        first_error.map_or(Ok(records), Err)
    }

    /// Back up one path.
    ///
    /// Returns `Ok(None)` when there is nothing at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`DevenvError::Backup`] if the backup directory cannot be
    /// created or the copy fails.
    pub fn backup(&self, path: &Path) -> Result<Option<BackupRecord>, DevenvError> {
        if path.symlink_metadata().is_err() {
            return Ok(None);
        }
        let run_dir = self.run_dir().map_err(|source| DevenvError::Backup {
            path: path.to_path_buf(),
            source: source.into(),
        })?;
        let destination = run_dir.join(self.relative(path));
        copy_path(path, &destination).map_err(|source| DevenvError::Backup {
            path: path.to_path_buf(),
            source: source.into(),
        })?;

        Ok(Some(BackupRecord {
            timestamp: self.timestamp.clone(),
            source: path.to_path_buf(),
            destination,
        }))
    }

    /// The run directory, if anything has been backed up yet.
    #[must_use]
    pub fn run_dir_if_created(&self) -> Option<PathBuf> {
        self.run_dir.lock().ok().and_then(|d| d.clone())
    }

    /// Create the run directory on first use, suffixing `-N` if a directory
    /// with this timestamp already exists.
    fn run_dir(&self) -> std::io::Result<PathBuf> {
        let mut guard = self
            .run_dir
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        if let Some(ref dir) = *guard {
            return Ok(dir.clone());
        }

        let base = self.home.join(BACKUP_DIR);
        std::fs::create_dir_all(&base)?;
        let mut candidate = base.join(&self.timestamp);
        let mut n = 1;
        loop {
            match std::fs::create_dir(&candidate) {
                Ok(()) => break,
                Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {
                    candidate = base.join(format!("{}-{n}", self.timestamp));
                    n += 1;
                }
                Err(e) => return Err(e),
            }
        }
        *guard = Some(candidate.clone());
        Ok(candidate)
    }

    /// `path` relative to home, or with its root stripped if it lies elsewhere.
    fn relative(&self, path: &Path) -> PathBuf {
        path.strip_prefix(&self.home).map_or_else(
            |_| {
                path.components()
                    .filter(|c| matches!(c, Component::Normal(_)))
                    .collect()
            },
            Path::to_path_buf,
        )
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::logging::isolated_logger;

    #[test]
    fn nothing_is_created_until_a_path_exists() {
        let home = tempfile::tempdir().unwrap();
        let manager = BackupManager::with_timestamp(home.path(), "20240309_101500");
        assert!(manager.backup(&home.path().join(".zshrc")).unwrap().is_none());
        assert!(manager.run_dir_if_created().is_none());
        assert!(!home.path().join(BACKUP_DIR).exists());
    }

    #[test]
    fn file_is_copied_preserving_home_relative_path() {
        let home = tempfile::tempdir().unwrap();
        let source = home.path().join(".config/zsh/aliases.zsh");
        std::fs::create_dir_all(source.parent().unwrap()).unwrap();
        std::fs::write(&source, "alias ll='ls -l'\n").unwrap();
        let manager = BackupManager::with_timestamp(home.path(), "20240309_101500");

        let record = manager.backup(&source).unwrap().unwrap();
        let expected = home
            .path()
            .join(".devenv_backups/20240309_101500/.config/zsh/aliases.zsh");
        assert_eq!(record.destination, expected);
        assert_eq!(record.timestamp, "20240309_101500");
        assert_eq!(
            std::fs::read_to_string(expected).unwrap(),
            "alias ll='ls -l'\n"
        );
        assert!(source.exists(), "original must be left in place");
    }

    #[test]
    fn directory_tree_is_copied() {
        let home = tempfile::tempdir().unwrap();
        let notes = home.path().join("notes");
        std::fs::create_dir_all(notes.join("daily")).unwrap();
        std::fs::write(notes.join("daily/2024-03-09.md"), "hi").unwrap();
        let manager = BackupManager::with_timestamp(home.path(), "t");

        manager.backup(&notes).unwrap();
        assert!(
            home.path()
                .join(".devenv_backups/t/notes/daily/2024-03-09.md")
                .exists()
        );
    }

    #[test]
    fn one_run_directory_per_manager() {
        let home = tempfile::tempdir().unwrap();
        std::fs::write(home.path().join(".vimrc"), "a").unwrap();
        std::fs::write(home.path().join(".zshrc"), "b").unwrap();
        let manager = BackupManager::with_timestamp(home.path(), "t");
        let (log, _tmp, _guard) = isolated_logger();

        let records = manager
            .backup_before_mutate(
                &[&home.path().join(".vimrc"), &home.path().join(".zshrc")],
                &log,
            )
            .unwrap();
        assert_eq!(records.len(), 2);
        let entries = std::fs::read_dir(home.path().join(BACKUP_DIR))
            .unwrap()
            .count();
        assert_eq!(entries, 1);
        assert_eq!(manager.run_dir_if_created(), Some(home.path().join(".devenv_backups/t")));
    }

    #[test]
    fn timestamp_collision_gets_suffix() {
        let home = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(home.path().join(".devenv_backups/t")).unwrap();
        std::fs::create_dir_all(home.path().join(".devenv_backups/t-1")).unwrap();
        std::fs::write(home.path().join(".tmux.conf"), "x").unwrap();
        let manager = BackupManager::with_timestamp(home.path(), "t");

        let record = manager
            .backup(&home.path().join(".tmux.conf"))
            .unwrap()
            .unwrap();
        assert_eq!(
            record.destination,
            home.path().join(".devenv_backups/t-2/.tmux.conf")
        );
    }

    #[test]
    fn path_outside_home_keeps_its_components() {
        let home = tempfile::tempdir().unwrap();
        let elsewhere = tempfile::tempdir().unwrap();
        let file = elsewhere.path().join("f");
        std::fs::write(&file, "x").unwrap();
        let manager = BackupManager::with_timestamp(home.path(), "t");
        let record = manager.backup(&file).unwrap().unwrap();
        assert!(record.destination.starts_with(home.path().join(".devenv_backups/t")));
        assert!(record.destination.ends_with("f"));
    }

    #[test]
    fn failed_backup_is_reported_after_trying_every_path() {
        let home = tempfile::tempdir().unwrap();
        // A file where the backup root should be makes every copy fail.
        std::fs::write(home.path().join(BACKUP_DIR), "in the way").unwrap();
        std::fs::write(home.path().join(".vimrc"), "a").unwrap();
        std::fs::write(home.path().join(".zshrc"), "b").unwrap();
        let manager = BackupManager::with_timestamp(home.path(), "t");
        let (log, _tmp, _guard) = isolated_logger();

        let err = manager
            .backup_before_mutate(
                &[&home.path().join(".vimrc"), &home.path().join(".zshrc")],
                &log,
            )
            .unwrap_err();
        assert!(matches!(err, DevenvError::Backup { ref path, .. } if path.ends_with(".vimrc")));
        assert_eq!(
            std::fs::read_to_string(home.path().join(".vimrc")).unwrap(),
            "a"
        );
        assert!(manager.run_dir_if_created().is_none());
    }

    #[cfg(unix)]
    #[test]
    fn dangling_symlink_inside_a_tree_is_backed_up() {
        let home = tempfile::tempdir().unwrap();
        let tmux = home.path().join(".tmux");
        std::fs::create_dir_all(&tmux).unwrap();
        std::fs::write(tmux.join("my-script.sh"), "echo\n").unwrap();
        std::os::unix::fs::symlink("/nonexistent/target", tmux.join("dangling")).unwrap();
        let manager = BackupManager::with_timestamp(home.path(), "t");

        manager.backup(&tmux).unwrap();
        let copy = home.path().join(".devenv_backups/t/.tmux");
        assert!(copy.join("my-script.sh").is_file());
        assert!(copy.join("dangling").symlink_metadata().unwrap().file_type().is_symlink());
    }
}
