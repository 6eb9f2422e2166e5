// Shared helpers for integration tests.
//
// Provides a temporary home directory, a fake executor that emulates `git`
// without the network, a fake tool installer, and a recording logger, so each
// integration test can run whole commands against an isolated home.
//
// Used by all integration test binaries that declare `mod common;`.
#![allow(
    dead_code,
    missing_debug_implementations,
    clippy::expect_used,
    clippy::panic
)]

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use chrono::NaiveDate;

use devenv_cli::backup::BackupManager;
use devenv_cli::config::{Mode, RunConfig};
use devenv_cli::exec::{ExecResult, Executor};
use devenv_cli::inventory::ToolSpec;
use devenv_cli::logging::Log;
use devenv_cli::reconcile::Context;
use devenv_cli::resources::ToolInstaller;

/// Date every test run is pinned to.
pub const TODAY: &str = "2024-03-09";

/// Timestamp of the first backup directory of every test run.
pub const STAMP: &str = "20240309_120000";

/// Every tool any inventory declares.
pub const ALL_TOOLS: &[&str] = &["git", "zsh", "fzf", "vim", "tmux"];

/// Executor that records calls and turns `git clone` into a local init.
#[derive(Debug, Default)]
pub struct FakeExecutor {
    calls: Mutex<Vec<String>>,
}

impl FakeExecutor {
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().expect("calls lock").clone()
    }
}

impl Executor for FakeExecutor {
    fn run(&self, program: &str, args: &[&str]) -> anyhow::Result<ExecResult> {
        self.run_unchecked(program, args)
    }

    fn run_unchecked(&self, program: &str, args: &[&str]) -> anyhow::Result<ExecResult> {
        self.calls
            .lock()
            .expect("calls lock")
            .push(format!("{program} {}", args.join(" ")));
        if program == "git"
            && let ["clone", .., dest] = args
        {
            git2::Repository::init(dest)?;
        }
        Ok(ExecResult {
            stdout: String::new(),
            stderr: String::new(),
            success: true,
            code: Some(0),
        })
    }

    fn which(&self, _program: &str) -> bool {
        true
    }
}

/// Tool installer backed by an in-memory set of installed binaries.
#[derive(Debug, Default)]
pub struct FakeInstaller {
    installed: Mutex<HashSet<String>>,
    installs: Mutex<Vec<String>>,
    broken: bool,
}

impl FakeInstaller {
    /// An installer where `tools` are already installed.
    pub fn with_tools(tools: &[&str]) -> Self {
        Self {
            installed: Mutex::new(tools.iter().map(|t| (*t).to_string()).collect()),
            ..Self::default()
        }
    }

    /// An installer whose installs always fail.
    pub fn broken() -> Self {
        Self {
            broken: true,
            ..Self::default()
        }
    }

    /// Packages installed through this installer, in order.
    pub fn installs(&self) -> Vec<String> {
        self.installs.lock().expect("installs lock").clone()
    }
}

impl ToolInstaller for FakeInstaller {
    fn is_present(&self, tool: &ToolSpec) -> bool {
        self.installed
            .lock()
            .expect("installed lock")
            .contains(&tool.binary)
    }

    fn install(&self, tool: &ToolSpec) -> anyhow::Result<()> {
        if self.broken {
            anyhow::bail!("install of {} failed", tool.package);
        }
        self.installs
            .lock()
            .expect("installs lock")
            .push(tool.package.clone());
        self.installed
            .lock()
            .expect("installed lock")
            .insert(tool.binary.clone());
        Ok(())
    }

    fn install_hint(&self, tool: &ToolSpec) -> String {
        format!("brew install {}", tool.package)
    }
}

/// Logger that keeps every message in memory.
#[derive(Debug, Default)]
pub struct RecordingLog {
    lines: Mutex<Vec<String>>,
}

impl RecordingLog {
    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().expect("lines lock").clone()
    }

    pub fn contains(&self, needle: &str) -> bool {
        self.lines().iter().any(|l| l.contains(needle))
    }

    fn push(&self, level: &str, msg: &str) {
        self.lines
            .lock()
            .expect("lines lock")
            .push(format!("{level} {msg}"));
    }
}

impl Log for RecordingLog {
    fn stage(&self, msg: &str) {
        self.push("==>", msg);
    }
    fn info(&self, msg: &str) {
        self.push("INFO", msg);
    }
    fn debug(&self, msg: &str) {
        self.push("DEBUG", msg);
    }
    fn warn(&self, msg: &str) {
        self.push("WARN", msg);
    }
    fn error(&self, msg: &str) {
        self.push("ERROR", msg);
    }
}

/// An isolated home directory plus the fakes a run needs.
pub struct TestHome {
    pub home: tempfile::TempDir,
    pub executor: Arc<FakeExecutor>,
    pub installer: Arc<FakeInstaller>,
    pub log: Arc<RecordingLog>,
}

impl TestHome {
    /// An empty home where every tool is already installed.
    pub fn new() -> Self {
        Self::with_installer(FakeInstaller::with_tools(ALL_TOOLS))
    }

    /// An empty home with a custom installer.
    pub fn with_installer(installer: FakeInstaller) -> Self {
        Self {
            home: tempfile::tempdir().expect("create temp home"),
            executor: Arc::new(FakeExecutor::default()),
            installer: Arc::new(installer),
            log: Arc::new(RecordingLog::default()),
        }
    }

    pub fn path(&self) -> &Path {
        self.home.path()
    }

    pub fn join(&self, rel: impl AsRef<Path>) -> PathBuf {
        self.home.path().join(rel)
    }

    pub fn read(&self, rel: &str) -> String {
        std::fs::read_to_string(self.join(rel)).unwrap_or_else(|e| panic!("read {rel}: {e}"))
    }

    pub fn write(&self, rel: &str, content: &str) {
        let path = self.join(rel);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("create parent");
        }
        std::fs::write(path, content).expect("write file");
    }

    /// Configuration for `mode` pinned to [`TODAY`].
    pub fn config(&self, mode: Mode) -> RunConfig {
        RunConfig::new(mode, self.path())
            .with_today(NaiveDate::parse_from_str(TODAY, "%Y-%m-%d").expect("valid date"))
    }

    /// A context for `config` wired to this home's fakes.
    pub fn context(&self, config: RunConfig) -> Context {
        let log: Arc<dyn Log> = self.log.clone();
        Context::new(config, log, self.executor.clone())
            .with_installer(self.installer.clone())
            .with_backups(BackupManager::with_timestamp(self.path(), STAMP))
    }

    /// Every file under home, minus `skip` prefixes, with its content, sorted.
    pub fn snapshot(&self, skip: &[&str]) -> Vec<(String, String)> {
        let mut out = Vec::new();
        collect(self.path(), self.path(), skip, &mut out);
        out.sort();
        out
    }

    /// Number of files in the backup directories.
    pub fn backup_file_count(&self) -> usize {
        let dir = self.join(".devenv_backups");
        if !dir.exists() {
            return 0;
        }
        let mut out = Vec::new();
        collect(&dir, &dir, &[], &mut out);
        out.len()
    }
}

fn collect(root: &Path, dir: &Path, skip: &[&str], out: &mut Vec<(String, String)>) {
    for entry in std::fs::read_dir(dir).expect("read dir") {
        let path = entry.expect("dir entry").path();
        let rel = path
            .strip_prefix(root)
            .expect("under root")
            .to_string_lossy()
            .to_string();
        if skip.iter().any(|s| rel.starts_with(s)) {
            continue;
        }
        if path.is_dir() {
            collect(root, &path, skip, out);
        } else {
            let content = std::fs::read(&path).expect("read file");
            out.push((rel, String::from_utf8_lossy(&content).to_string()));
        }
    }
}
