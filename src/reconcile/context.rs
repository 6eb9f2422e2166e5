use std::sync::Arc;

use crate::backup::BackupManager;
use crate::config::RunConfig;
use crate::exec::Executor;
use crate::logging::Log;
use crate::resources::{PackageManagerInstaller, ToolInstaller};

/// Shared context for a reconciliation run.
#[derive(Clone)]
pub struct Context {
    /// Immutable run configuration.
    pub config: Arc<RunConfig>,
    /// Logger for output and the persistent log file.
    pub log: Arc<dyn Log>,
    /// Command executor for `git` shell-outs.
    pub executor: Arc<dyn Executor>,
    /// Tool presence checks and installs.
    pub installer: Arc<dyn ToolInstaller>,
    /// Backup directory for this run.
    pub backups: Arc<BackupManager>,
}

impl std::fmt::Debug for Context {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Context")
            .field("config", &self.config)
            .field("log", &"<dyn Log>")
            .field("executor", &self.executor)
            .field("installer", &self.installer)
            .field("backups", &self.backups)
            .finish()
    }
}

impl Context {
    /// Creates a context whose tools are installed with the configured
    /// package manager through `executor`.
    #[must_use]
    pub fn new(config: RunConfig, log: Arc<dyn Log>, executor: Arc<dyn Executor>) -> Self {
        let installer = Arc::new(PackageManagerInstaller::new(
            config.settings.package_manager.clone(),
            Arc::clone(&executor),
        ));
        let backups = Arc::new(BackupManager::new(config.home.clone()));
        Self {
            config: Arc::new(config),
            log,
            executor,
            installer,
            backups,
        }
    }

    /// Replace the tool installer.
    #[must_use]
    pub fn with_installer(mut self, installer: Arc<dyn ToolInstaller>) -> Self {
        self.installer = installer;
        self
    }

    /// Replace the backup manager.
    #[must_use]
    pub fn with_backups(mut self, backups: BackupManager) -> Self {
        self.backups = Arc::new(backups);
        self
    }
}
