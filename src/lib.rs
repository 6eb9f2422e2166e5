//! Terminal development environment installer.
//!
//! Installs, troubleshoots, and uninstalls a shell, editor, terminal
//! multiplexer, and notes setup under a home directory.  Every run is an
//! idempotent reconciliation of a fixed desired state against the
//! filesystem, with a backup taken before anything is overwritten or
//! removed.
//!
//! The public API is organised into layers:
//!
//! - **[`inventory`]**: static desired-state tables, one per domain
//! - **[`resources`]**: idempotent `check + apply` primitives
//! - **[`reconcile`]**: drives an inventory's resources for a run mode
//! - **[`commands`]**: subcommand orchestration (`install`, `doctor`, `uninstall`)
#![deny(clippy::or_fun_call)]
#![deny(clippy::bool_to_int_with_if)]

pub mod backup;
pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod exec;
pub mod inventory;
pub mod logging;
pub mod marker;
pub mod reconcile;
pub mod report;
pub mod resources;
pub mod template;
