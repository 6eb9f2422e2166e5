//! Install command implementation.
use anyhow::Result;

use crate::reconcile::{Context, RunResult};

/// Run the install command (`Full` or `Minimal` mode).
///
/// # Errors
///
/// Returns an error if an inventory cannot be built.
pub fn run(ctx: &Context) -> Result<RunResult> {
    super::announce(ctx);
    if ctx.config.force {
        ctx.log
            .info("--force: existing files will be backed up and regenerated");
    }
    super::run_domains(ctx)
}
