//! The reconciliation engine: walk an inventory, compare each entry with
//! the filesystem, and apply the minimal corrective action the run mode
//! allows.
//!
//! Per-entry failures are recorded as issues and never abort the walk.
mod context;
mod result;

pub use context::Context;
pub use result::{CheckRecord, Issue, Outcome, RunResult, RunStats};

use std::path::Path;

use anyhow::Result;

use crate::config::Mode;
use crate::error::DevenvError;
use crate::inventory::{FileContent, Inventory, ResourceEntry, ResourceKind, Retention};
use crate::resources::helpers::fs::remove_path;
use crate::resources::{
    Applicable, DirectoryResource, FileResource, RepositoryResource, Resource as _,
    ResourceChange, ResourceState, ToolResource,
};
use crate::template::{self, Vars};

/// Hint attached to anything `install` would create.
pub const INSTALL_HINT: &str = "run `devenv install`";
/// Hint attached to anything only `doctor --fix` repairs.
pub const FIX_HINT: &str = "run `devenv doctor --fix`";

/// Per-entry verdict before it is folded into the [`RunResult`].
enum Verdict {
    Done(Outcome),
    Issue {
        message: String,
        hint: Option<String>,
    },
}

impl Verdict {
    fn issue(message: impl ToString, hint: Option<&str>) -> Self {
        Self::Issue {
            message: message.to_string(),
            hint: hint.map(str::to_string),
        }
    }

    fn skipped(reason: impl Into<String>) -> Self {
        Self::Done(Outcome::Skipped {
            reason: reason.into(),
        })
    }
}

impl From<ResourceChange> for Verdict {
    fn from(change: ResourceChange) -> Self {
        match change {
            ResourceChange::Applied => Self::Done(Outcome::Applied),
            ResourceChange::AlreadyCorrect => Self::Done(Outcome::Passed),
            ResourceChange::Skipped { reason } => Self::Done(Outcome::Skipped { reason }),
        }
    }
}

/// Reconcile `inventory` according to `ctx.config.mode`.
///
/// Entries are processed in order; the result holds one check per entry.
/// Uninstall mode is delegated to [`uninstall`].
#[must_use]
pub fn reconcile(inventory: &Inventory, ctx: &Context) -> RunResult {
    let mode = ctx.config.mode;
    if mode == Mode::Uninstall {
        return uninstall(inventory, ctx);
    }

    let vars = Vars {
        date: ctx.config.date_string(),
        home: ctx.config.home.display().to_string(),
        version: inventory.version.to_string(),
    };

    let mut result = RunResult::new(mode);
    for entry in &inventory.entries {
        let verdict = match check_entry(entry, mode, &vars, ctx) {
            Ok(v) => v,
            Err(e) => Verdict::issue(format!("{e:#}"), None),
        };
        fold(&mut result, inventory, entry, verdict, ctx);
    }
    result
}

/// Back up and remove what the inventory installed, last entry first.
///
/// `Shared` entries and external tools stay.  `UserData` entries are
/// removed only when the run does not keep data.
#[must_use]
pub fn uninstall(inventory: &Inventory, ctx: &Context) -> RunResult {
    let mut result = RunResult::new(Mode::Uninstall);
    for entry in inventory.entries.iter().rev() {
        let verdict = match remove_entry(entry, ctx) {
            Ok(v) => v,
            Err(e) => Verdict::issue(format!("{e:#}"), None),
        };
        fold(&mut result, inventory, entry, verdict, ctx);
    }
    result
}

fn fold(
    result: &mut RunResult,
    inventory: &Inventory,
    entry: &ResourceEntry,
    verdict: Verdict,
    ctx: &Context,
) {
    match verdict {
        Verdict::Done(outcome) => {
            ctx.log.debug(&format!("{}: {outcome:?}", entry.name));
            result.record(inventory.domain, &entry.name, outcome);
        }
        Verdict::Issue { message, hint } => {
            ctx.log.debug(&format!("{}: {message}", entry.name));
            result.fail(inventory.domain, &entry.name, message, hint);
        }
    }
}

fn check_entry(entry: &ResourceEntry, mode: Mode, vars: &Vars, ctx: &Context) -> Result<Verdict> {
    match &entry.kind {
        ResourceKind::Directory { path } => {
            check_directory(&DirectoryResource::new(path.clone()), mode)
        }
        ResourceKind::File {
            path,
            content,
            must_contain,
            executable,
        } => {
            let rendered = match content {
                FileContent::Static(text) => (*text).to_string(),
                FileContent::Template(text) => template::render(text, vars),
            };
            let resource = FileResource::new(path.clone(), rendered)
                .with_required_lines(must_contain)
                .with_executable(*executable);
            check_file(&resource, mode, ctx)
        }
        ResourceKind::ExternalTool { tool } => {
            if mode == Mode::Minimal {
                return Ok(Verdict::skipped("minimal install"));
            }
            check_tool(&ToolResource::new(tool, ctx.installer.as_ref()), mode)
        }
        ResourceKind::Repository { path, source } => {
            if mode == Mode::Minimal {
                return Ok(Verdict::skipped("minimal install"));
            }
            let resource = RepositoryResource::new(path.clone(), source, ctx.executor.as_ref());
            check_repository(&resource, mode, ctx)
        }
    }
}

fn check_directory(resource: &DirectoryResource, mode: Mode) -> Result<Verdict> {
    match resource.current_state()? {
        ResourceState::Correct | ResourceState::Incorrect { .. } => {
            Ok(Verdict::Done(Outcome::Passed))
        }
        ResourceState::Invalid { reason } => Ok(Verdict::issue(
            DevenvError::create(&resource.path, reason),
            None,
        )),
        ResourceState::Missing if mode == Mode::Check => {
            Ok(Verdict::issue("directory is missing", Some(INSTALL_HINT)))
        }
        ResourceState::Missing => Ok(resource.apply()?.into()),
    }
}

fn check_file(resource: &FileResource, mode: Mode, ctx: &Context) -> Result<Verdict> {
    let state = resource.current_state()?;
    let overwrite = match mode {
        Mode::FixOnly => true,
        Mode::Full | Mode::Minimal => ctx.config.force,
        Mode::Check | Mode::Uninstall => false,
    };

    match state {
        ResourceState::Invalid { reason } => Ok(Verdict::issue(
            DevenvError::create(&resource.path, reason),
            None,
        )),
        ResourceState::Missing if mode == Mode::Check => {
            Ok(Verdict::issue("file is missing", Some(INSTALL_HINT)))
        }
        ResourceState::Missing => Ok(resource.apply()?.into()),
        ResourceState::Correct | ResourceState::Incorrect { .. } if overwrite => {
            back_up(&resource.path, ctx)?;
            Ok(resource.apply()?.into())
        }
        ResourceState::Incorrect { current } if mode == Mode::Check => {
            Ok(Verdict::issue(current, Some(FIX_HINT)))
        }
        ResourceState::Incorrect { current } => {
            ctx.log.warn(&format!(
                "{}: {current}; keeping existing file ({FIX_HINT} to regenerate)",
                resource.path.display()
            ));
            Ok(Verdict::skipped(format!("kept existing file: {current}")))
        }
        ResourceState::Correct => Ok(Verdict::Done(Outcome::Passed)),
    }
}

fn check_tool(resource: &ToolResource<'_>, mode: Mode) -> Result<Verdict> {
    if resource.current_state()? == ResourceState::Correct {
        return Ok(Verdict::Done(Outcome::Passed));
    }
    let hint = resource.hint();
    if mode != Mode::FixOnly {
        return Ok(Verdict::issue(
            DevenvError::external_tool(&resource.tool.binary, "not found on PATH"),
            Some(hint.as_str()),
        ));
    }
    match resource.apply() {
        Ok(change) => Ok(change.into()),
        Err(e) => Ok(Verdict::issue(format!("{e:#}"), Some(hint.as_str()))),
    }
}

fn check_repository(
    resource: &RepositoryResource<'_>,
    mode: Mode,
    ctx: &Context,
) -> Result<Verdict> {
    match resource.current_state()? {
        ResourceState::Correct | ResourceState::Incorrect { .. } => {
            if mode == Mode::Full
                && let Err(e) = resource.update()
            {
                ctx.log.warn(&format!("{e:#}"));
            }
            Ok(Verdict::Done(Outcome::Passed))
        }
        ResourceState::Missing if mode == Mode::Check => {
            Ok(Verdict::issue("repository is missing", Some(INSTALL_HINT)))
        }
        ResourceState::Missing => Ok(resource.apply()?.into()),
        ResourceState::Invalid { reason } if mode == Mode::FixOnly => {
            back_up(&resource.path, ctx)?;
            remove_path(&resource.path)?;
            ctx.log.debug(&format!("re-creating {} ({reason})", resource.path.display()));
            Ok(resource.apply()?.into())
        }
        ResourceState::Invalid { reason } => Ok(Verdict::issue(reason, Some(FIX_HINT))),
    }
}

fn remove_entry(entry: &ResourceEntry, ctx: &Context) -> Result<Verdict> {
    match entry.retention {
        Retention::Shared => return Ok(Verdict::skipped("shared")),
        Retention::UserData if ctx.config.keep_data => {
            return Ok(Verdict::skipped("user data kept"));
        }
        Retention::Owned | Retention::UserData => {}
    }
    let resource: Box<dyn Applicable + '_> = match &entry.kind {
        ResourceKind::Directory { path } => Box::new(DirectoryResource::new(path.clone())),
        ResourceKind::File { path, .. } => Box::new(FileResource::new(path.clone(), String::new())),
        ResourceKind::ExternalTool { tool } => {
            Box::new(ToolResource::new(tool, ctx.installer.as_ref()))
        }
        ResourceKind::Repository { path, source } => Box::new(RepositoryResource::new(
            path.clone(),
            source,
            ctx.executor.as_ref(),
        )),
    };
    if let Some(path) = entry.path() {
        if path.symlink_metadata().is_err() {
            return Ok(Verdict::Done(Outcome::Passed));
        }
        back_up(path, ctx)?;
    }
    ctx.log.debug(&format!("removing {}", resource.description()));
    Ok(resource.remove()?.into())
}

/// Copy `path` into the run's backup directory.
///
/// An error here means the caller must not touch `path`.
fn back_up(path: &Path, ctx: &Context) -> Result<(), DevenvError> {
    ctx.backups
        .backup_before_mutate(&[path], ctx.log.as_ref())
        .map(|_| ())
}
