//! Run configuration built once by the mode selector.
//!
//! [`RunConfig`] is immutable after construction and passed by reference to
//! the reconciler, backup manager, and reporter.
pub mod settings;

use std::fmt;
use std::path::PathBuf;

use anyhow::{Context as _, Result};
use chrono::NaiveDate;

use crate::cli::GlobalOpts;
use crate::inventory::Domain;
pub use settings::Settings;

/// Reconciliation mode for a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Create everything missing; clone/update repositories.
    Full,
    /// Only directories and files; tools and repositories are skipped.
    Minimal,
    /// Diagnose without mutating anything.
    Check,
    /// Repair: overwrite existing files (after backup) and install missing tools.
    FixOnly,
    /// Back up and remove owned resources.
    Uninstall,
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Full => write!(f, "full"),
            Self::Minimal => write!(f, "minimal"),
            Self::Check => write!(f, "check"),
            Self::FixOnly => write!(f, "fix"),
            Self::Uninstall => write!(f, "uninstall"),
        }
    }
}

/// Immutable configuration for one invocation.
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Selected reconciliation mode.
    pub mode: Mode,
    /// Overwrite existing files (after backup) even outside fix mode.
    pub force: bool,
    /// Keep user data (notes) on uninstall.
    pub keep_data: bool,
    /// Verbose console output.
    pub verbose: bool,
    /// Home directory every inventory path is rooted at.
    pub home: PathBuf,
    /// Domains to process, in inventory order.
    pub domains: Vec<Domain>,
    /// Date substituted for `{{date}}` and written to version markers.
    pub today: NaiveDate,
    /// User settings.
    pub settings: Settings,
}

impl RunConfig {
    /// A configuration for `mode` rooted at `home` with every domain
    /// selected and default settings.
    #[must_use]
    pub fn new(mode: Mode, home: impl Into<PathBuf>) -> Self {
        Self {
            mode,
            force: false,
            keep_data: true,
            verbose: false,
            home: home.into(),
            domains: Domain::ALL.to_vec(),
            today: chrono::Local::now().date_naive(),
            settings: Settings::default(),
        }
    }

    /// Resolve the configuration from parsed command-line options.
    ///
    /// # Errors
    ///
    /// Returns an error if no home directory can be determined or the
    /// settings file is malformed.
    pub fn resolve(global: &GlobalOpts, verbose: bool, mode: Mode) -> Result<Self> {
        let home = resolve_home(global)?;
        let settings_path = global
            .settings
            .clone()
            .unwrap_or_else(|| Settings::default_path(&home));
        let settings = Settings::load(&settings_path)?;

        Ok(Self {
            verbose,
            domains: select_domains(&global.only, &global.skip),
            settings,
            ..Self::new(mode, home)
        })
    }

    /// Set the `--force` modifier.
    #[must_use]
    pub const fn with_force(mut self, force: bool) -> Self {
        self.force = force;
        self
    }

    /// Set the keep-data modifier used by uninstall.
    #[must_use]
    pub const fn with_keep_data(mut self, keep_data: bool) -> Self {
        self.keep_data = keep_data;
        self
    }

    /// Restrict the run to `domains`.
    #[must_use]
    pub fn with_domains(mut self, domains: &[Domain]) -> Self {
        self.domains = select_domains(domains, &[]);
        self
    }

    /// Pin the date used for template substitution and markers.
    #[must_use]
    pub const fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = today;
        self
    }

    /// `today` formatted as `YYYY-MM-DD`.
    #[must_use]
    pub fn date_string(&self) -> String {
        self.today.format("%Y-%m-%d").to_string()
    }
}

/// Resolve the home directory: `--home`/`DEVENV_HOME`, then `HOME`.
fn resolve_home(global: &GlobalOpts) -> Result<PathBuf> {
    if let Some(ref home) = global.home {
        return Ok(home.clone());
    }
    std::env::var("HOME")
        .map(PathBuf::from)
        .context("HOME environment variable is not set; use --home")
}

/// Apply `--only`/`--skip` to the canonical domain order.
///
/// A non-empty `only` wins over `skip`.
fn select_domains(only: &[Domain], skip: &[Domain]) -> Vec<Domain> {
    Domain::ALL
        .iter()
        .copied()
        .filter(|d| {
            if !only.is_empty() {
                return only.contains(d);
            }
            !skip.contains(d)
        })
        .collect()
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;

    fn global(home: Option<PathBuf>) -> GlobalOpts {
        GlobalOpts {
            home,
            settings: None,
            only: vec![],
            skip: vec![],
        }
    }

    #[test]
    fn only_selects_in_canonical_order() {
        let selected = select_domains(&[Domain::Notes, Domain::Shell], &[]);
        assert_eq!(selected, vec![Domain::Shell, Domain::Notes]);
    }

    #[test]
    fn skip_removes_domains() {
        let selected = select_domains(&[], &[Domain::Editor]);
        assert!(!selected.contains(&Domain::Editor));
        assert_eq!(selected.len(), Domain::ALL.len() - 1);
    }

    #[test]
    fn only_wins_over_skip() {
        let selected = select_domains(&[Domain::Notes], &[Domain::Notes]);
        assert_eq!(selected, vec![Domain::Notes]);
    }

    #[test]
    fn resolve_uses_explicit_home_and_its_settings() {
        let home = tempfile::tempdir().unwrap();
        let settings_path = home.path().join("custom.toml");
        std::fs::write(&settings_path, "package_manager = \"port\"\n").unwrap();
        let mut opts = global(Some(home.path().to_path_buf()));
        opts.settings = Some(settings_path);

        let config = RunConfig::resolve(&opts, true, Mode::Full).unwrap();
        assert_eq!(config.home, home.path());
        assert_eq!(config.settings.package_manager, "port");
        assert!(config.verbose);
        assert!(config.keep_data);
    }

    #[test]
    fn resolve_fails_on_malformed_settings() {
        let home = tempfile::tempdir().unwrap();
        let settings_path = home.path().join("bad.toml");
        std::fs::write(&settings_path, "[notes\n").unwrap();
        let mut opts = global(Some(home.path().to_path_buf()));
        opts.settings = Some(settings_path);
        assert!(RunConfig::resolve(&opts, false, Mode::Full).is_err());
    }

    #[test]
    fn date_string_is_iso() {
        let config = RunConfig::new(Mode::Full, "/home/u")
            .with_today(NaiveDate::from_ymd_opt(2024, 3, 9).unwrap());
        assert_eq!(config.date_string(), "2024-03-09");
    }

    #[test]
    fn mode_display() {
        assert_eq!(Mode::FixOnly.to_string(), "fix");
        assert_eq!(Mode::Minimal.to_string(), "minimal");
        assert_eq!(Mode::Uninstall.to_string(), "uninstall");
    }
}
