use clap::{Parser, Subcommand};

use crate::config::Mode;
use crate::inventory::Domain;

/// Top-level CLI entry point for the environment installer.
#[derive(Parser, Debug)]
#[command(
    name = "devenv",
    about = "Install, troubleshoot, and uninstall a terminal development environment",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(flatten)]
    pub global: GlobalOpts,
}

/// Options shared across all subcommands.
#[derive(Parser, Debug, Clone)]
pub struct GlobalOpts {
    /// Home directory to reconcile (defaults to $HOME)
    #[arg(long, global = true, env = "DEVENV_HOME")]
    pub home: Option<std::path::PathBuf>,

    /// Settings file (defaults to $XDG_CONFIG_HOME/devenv/settings.toml)
    #[arg(long, global = true)]
    pub settings: Option<std::path::PathBuf>,

    /// Process only these domains
    #[arg(long, global = true, value_delimiter = ',', value_enum)]
    pub only: Vec<Domain>,

    /// Skip these domains
    #[arg(long, global = true, value_delimiter = ',', value_enum)]
    pub skip: Vec<Domain>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create missing directories, files, and plugin repositories
    Install(InstallOpts),
    /// Diagnose the environment, optionally repairing it
    Doctor(DoctorOpts),
    /// Back up and remove installed configuration
    Uninstall(UninstallOpts),
    /// Print shell completions
    Completions {
        /// Shell to generate completions for
        shell: clap_complete::Shell,
    },
    /// Print version information
    Version,
}

/// Options for the `install` subcommand.
#[derive(Parser, Debug, Clone)]
pub struct InstallOpts {
    /// Install everything: files, plugin repositories, and tool checks (default)
    #[arg(long, conflicts_with = "minimal")]
    pub full: bool,

    /// Only directories and configuration files
    #[arg(long)]
    pub minimal: bool,

    /// Overwrite existing files after backing them up
    #[arg(long)]
    pub force: bool,
}

/// Options for the `doctor` subcommand.
#[derive(Parser, Debug, Clone)]
pub struct DoctorOpts {
    /// Repair problems: regenerate files and install missing tools
    #[arg(long)]
    pub fix: bool,
}

/// Options for the `uninstall` subcommand.
#[derive(Parser, Debug, Clone)]
pub struct UninstallOpts {
    /// Also remove user data (the notes directory)
    #[arg(long = "no-keep-data", action = clap::ArgAction::SetFalse)]
    pub keep_data: bool,
}

impl Command {
    /// The reconciliation mode this subcommand selects, if it reconciles.
    #[must_use]
    pub const fn mode(&self) -> Option<Mode> {
        match self {
            Self::Install(opts) if opts.minimal => Some(Mode::Minimal),
            Self::Install(_) => Some(Mode::Full),
            Self::Doctor(opts) if opts.fix => Some(Mode::FixOnly),
            Self::Doctor(_) => Some(Mode::Check),
            Self::Uninstall(_) => Some(Mode::Uninstall),
            Self::Completions { .. } | Self::Version => None,
        }
    }

    /// Name used for the per-command log file.
    #[must_use]
    pub const fn log_name(&self) -> &'static str {
        match self {
            Self::Install(_) => "install",
            Self::Doctor(_) => "doctor",
            Self::Uninstall(_) => "uninstall",
            Self::Completions { .. } => "completions",
            Self::Version => "version",
        }
    }
}
