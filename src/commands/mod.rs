//! Top-level subcommand orchestration.
//!
//! Every reconciling command is the same fixed sequence: resolve the
//! [`RunConfig`], then one reconciler pass per selected domain followed by
//! its version-marker update.
pub mod doctor;
pub mod install;
pub mod uninstall;
pub mod version;

use std::sync::Arc;

use anyhow::{Result, bail};

use crate::cli::{Command, GlobalOpts};
use crate::config::{Mode, RunConfig};
use crate::exec::Executor;
use crate::inventory::Inventory;
use crate::logging::Log;
use crate::marker;
use crate::reconcile::{self, Context, RunResult};

/// Resolve the configuration for `command`, including its modifiers.
///
/// # Errors
///
/// Returns an error if `command` does not reconcile, no home directory
/// can be determined, or the settings file is malformed.
pub fn resolve_config(command: &Command, global: &GlobalOpts, verbose: bool) -> Result<RunConfig> {
    let Some(mode) = command.mode() else {
        bail!("'{}' does not reconcile anything", command.log_name());
    };
    let config = RunConfig::resolve(global, verbose, mode)?;
    Ok(match command {
        Command::Install(opts) => config.with_force(opts.force),
        Command::Uninstall(opts) => config.with_keep_data(opts.keep_data),
        _ => config,
    })
}

/// Run `command` under an already resolved `config`.
///
/// # Errors
///
/// Returns an error if `command` does not reconcile or an inventory
/// cannot be built.
pub fn run(
    command: &Command,
    config: RunConfig,
    log: Arc<dyn Log>,
    executor: Arc<dyn Executor>,
) -> Result<RunResult> {
    let ctx = Context::new(config, log, executor);
    match command {
        Command::Install(_) => install::run(&ctx),
        Command::Doctor(_) => doctor::run(&ctx),
        Command::Uninstall(_) => uninstall::run(&ctx),
        Command::Completions { .. } | Command::Version => {
            bail!("'{}' does not reconcile anything", command.log_name())
        }
    }
}

/// Log the version banner and what this run will touch.
fn announce(ctx: &Context) {
    let config = &ctx.config;
    ctx.log
        .info(&format!("devenv {} ({} mode)", version::version(), config.mode));
    ctx.log.debug(&format!("home: {}", config.home.display()));
    let domains: Vec<String> = config.domains.iter().map(ToString::to_string).collect();
    ctx.log.debug(&format!("domains: {}", domains.join(", ")));
}

/// Run one reconciler pass per selected domain and update its marker.
///
/// Domains run in inventory order, reversed for uninstall.  Marker write
/// failures are warnings.
///
/// # Errors
///
/// Returns an error if an inventory cannot be built.
pub fn run_domains(ctx: &Context) -> Result<RunResult> {
    let config = &ctx.config;
    let mut inventories = Inventory::all(&config.domains, &config.home, &config.settings)?;
    if config.mode == Mode::Uninstall {
        inventories.reverse();
    }

    let mut result = RunResult::new(config.mode);
    for inventory in &inventories {
        ctx.log.stage(inventory.domain.title());
        let pass = reconcile::reconcile(inventory, ctx);
        ctx.log.info(&pass.stats().summary());

        let marker_update = match config.mode {
            Mode::Full | Mode::Minimal | Mode::FixOnly => marker::write(inventory, config),
            Mode::Uninstall => marker::remove(&inventory.marker).map(|_| ()),
            Mode::Check => Ok(()),
        };
        if let Err(e) = marker_update {
            ctx.log.warn(&format!("{e:#}"));
        }
        result.merge(pass);
    }

    if let Some(dir) = ctx.backups.run_dir_if_created() {
        ctx.log.info(&format!("backups saved to {}", dir.display()));
    }
    Ok(result)
}
