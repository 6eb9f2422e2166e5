//! Doctor command: diagnose, and with `--fix`, repair.
use anyhow::Result;

use crate::inventory::Inventory;
use crate::marker;
use crate::reconcile::{Context, RunResult};

/// Log the installed version of every selected domain.
///
/// # Errors
///
/// Returns an error if an inventory cannot be built.
pub fn show_versions(ctx: &Context) -> Result<()> {
    let config = &ctx.config;
    ctx.log.stage("Installed versions");
    for inventory in Inventory::all(&config.domains, &config.home, &config.settings)? {
        let name = inventory.domain;
        match marker::read(&inventory.marker) {
            Ok(Some(m)) if m.version == inventory.version => {
                let mode = m.mode.as_deref().unwrap_or("unknown");
                ctx.log
                    .info(&format!("{name}: {} (installed {}, {mode})", m.version, m.date));
            }
            Ok(Some(m)) => ctx.log.warn(&format!(
                "{name}: {} installed, {} available",
                m.version, inventory.version
            )),
            Ok(None) => ctx.log.info(&format!("{name}: not installed")),
            Err(e) => ctx.log.warn(&format!("{name}: {e:#}")),
        }
    }
    Ok(())
}

/// Run the doctor command (`Check` or `FixOnly` mode).
///
/// # Errors
///
/// Returns an error if an inventory cannot be built.
pub fn run(ctx: &Context) -> Result<RunResult> {
    super::announce(ctx);
    show_versions(ctx)?;
    super::run_domains(ctx)
}
