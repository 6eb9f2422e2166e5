//! Uninstall command implementation.
use anyhow::Result;

use crate::reconcile::{Context, RunResult};

/// Run the uninstall command.
///
/// # Errors
///
/// Returns an error if an inventory cannot be built.
pub fn run(ctx: &Context) -> Result<RunResult> {
    super::announce(ctx);
    if ctx.config.keep_data {
        ctx.log.info("keeping user data (pass --no-keep-data to remove it)");
    } else {
        ctx.log.warn("user data will be backed up and removed");
    }
    super::run_domains(ctx)
}
