//! External tool resource and the installer that checks and installs tools.
use std::sync::Arc;

use anyhow::Result;

use super::{Applicable, Resource, ResourceChange, ResourceState};
use crate::error::DevenvError;
use crate::exec::Executor;
use crate::inventory::ToolSpec;

/// Capability for checking and installing external tools.
///
/// The reconciler never shells out for tools directly; it goes through a
/// `ToolInstaller` so tests can substitute a fake.
#[cfg_attr(test, mockall::automock)]
pub trait ToolInstaller: Send + Sync + std::fmt::Debug {
    /// Whether the tool's binary is resolvable.
    fn is_present(&self, tool: &ToolSpec) -> bool;

    /// Install the tool's package.
    ///
    /// # Errors
    ///
    /// Returns an error if the install command cannot be run or fails.
    fn install(&self, tool: &ToolSpec) -> Result<()>;

    /// The command a user would run to install the tool by hand.
    fn install_hint(&self, tool: &ToolSpec) -> String;
}

/// [`ToolInstaller`] that looks binaries up on `PATH` and installs packages with
/// `<manager> install <package>`.
#[derive(Debug, Clone)]
pub struct PackageManagerInstaller {
    manager: String,
    executor: Arc<dyn Executor>,
}

impl PackageManagerInstaller {
    /// Create an installer for `manager` (e.g. `brew`).
    #[must_use]
    pub fn new(manager: impl Into<String>, executor: Arc<dyn Executor>) -> Self {
        Self {
            manager: manager.into(),
            executor,
        }
    }
}

impl ToolInstaller for PackageManagerInstaller {
    fn is_present(&self, tool: &ToolSpec) -> bool {
        self.executor.which(&tool.binary)
    }

    fn install(&self, tool: &ToolSpec) -> Result<()> {
        if !self.executor.which(&self.manager) {
            return Err(DevenvError::external_tool(
                &tool.binary,
                format!("package manager '{}' not found", self.manager),
            )
            .into());
        }
        self.executor
            .run(&self.manager, &["install", &tool.package])
            .map_err(|e| DevenvError::external_tool(&tool.binary, e))?;
        Ok(())
    }

    fn install_hint(&self, tool: &ToolSpec) -> String {
        format!("{} install {}", self.manager, tool.package)
    }
}

/// An external tool that must be on `PATH`.
#[derive(Debug)]
pub struct ToolResource<'a> {
    /// The tool.
    pub tool: &'a ToolSpec,
    installer: &'a dyn ToolInstaller,
}

impl<'a> ToolResource<'a> {
    /// Create a new tool resource checked through `installer`.
    #[must_use]
    pub const fn new(tool: &'a ToolSpec, installer: &'a dyn ToolInstaller) -> Self {
        Self { tool, installer }
    }

    /// The manual install command for this tool.
    #[must_use]
    pub fn hint(&self) -> String {
        self.installer.install_hint(self.tool)
    }
}

impl Applicable for ToolResource<'_> {
    fn description(&self) -> String {
        self.tool.binary.clone()
    }

    /// Run the install once, then re-check presence.
    fn apply(&self) -> Result<ResourceChange> {
        if self.installer.is_present(self.tool) {
            return Ok(ResourceChange::AlreadyCorrect);
        }
        self.installer.install(self.tool)?;
        if !self.installer.is_present(self.tool) {
            return Err(DevenvError::external_tool(
                &self.tool.binary,
                "still not found after install",
            )
            .into());
        }
        Ok(ResourceChange::Applied)
    }

    /// Tools are shared with the rest of the system and never uninstalled.
    fn remove(&self) -> Result<ResourceChange> {
        Ok(ResourceChange::Skipped {
            reason: "external tool left installed".to_string(),
        })
    }
}

impl Resource for ToolResource<'_> {
    fn current_state(&self) -> Result<ResourceState> {
        if self.installer.is_present(self.tool) {
            Ok(ResourceState::Correct)
        } else {
            Ok(ResourceState::Missing)
        }
    }
}
