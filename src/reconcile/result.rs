//! Per-run outcome records consumed by the reporter.

use crate::config::Mode;
use crate::inventory::Domain;

/// What happened to one entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Already in the desired state.
    Passed,
    /// Created, repaired, or removed.
    Applied,
    /// Deliberately left alone.
    Skipped {
        /// Why it was left alone.
        reason: String,
    },
    /// Could not be brought to the desired state.
    Failed {
        /// What went wrong.
        message: String,
    },
}

/// One evaluated entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckRecord {
    /// Owning domain.
    pub domain: Domain,
    /// Entry name.
    pub name: String,
    /// Result of the check and any action.
    pub outcome: Outcome,
}

/// An unresolved problem, reported after the per-check lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Issue {
    /// Entry name.
    pub name: String,
    /// What is wrong.
    pub message: String,
    /// How the user can fix it, if there is a known remedy.
    pub hint: Option<String>,
}

/// Counters over a run's checks.
///
/// # Examples
///
/// ```
/// use devenv_cli::reconcile::RunStats;
///
/// let stats = RunStats { passed: 10, applied: 3, skipped: 0, failed: 0 };
/// assert_eq!(stats.summary(), "3 applied, 10 ok");
///
/// let stats = RunStats { passed: 1, applied: 0, skipped: 2, failed: 1 };
/// assert_eq!(stats.summary(), "0 applied, 1 ok, 2 skipped, 1 failed");
/// ```
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RunStats {
    /// Entries already correct.
    pub passed: u32,
    /// Entries changed.
    pub applied: u32,
    /// Entries left alone.
    pub skipped: u32,
    /// Entries that failed.
    pub failed: u32,
}

impl RunStats {
    /// Format the summary string, omitting zero skip/fail counts.
    #[must_use]
    pub fn summary(&self) -> String {
        let mut out = format!("{} applied, {} ok", self.applied, self.passed);
        if self.skipped > 0 {
            out.push_str(&format!(", {} skipped", self.skipped));
        }
        if self.failed > 0 {
            out.push_str(&format!(", {} failed", self.failed));
        }
        out
    }
}

/// Everything a run did, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunResult {
    /// Mode the run was executed in.
    pub mode: Mode,
    /// One record per evaluated entry.
    pub checks: Vec<CheckRecord>,
    /// Unresolved entries.
    pub issues: Vec<Issue>,
}

impl RunResult {
    /// An empty result for `mode`.
    #[must_use]
    pub const fn new(mode: Mode) -> Self {
        Self {
            mode,
            checks: Vec::new(),
            issues: Vec::new(),
        }
    }

    /// Record a non-failing outcome.
    pub fn record(&mut self, domain: Domain, name: &str, outcome: Outcome) {
        self.checks.push(CheckRecord {
            domain,
            name: name.to_string(),
            outcome,
        });
    }

    /// Record a failed check and the matching issue.
    pub fn fail(&mut self, domain: Domain, name: &str, message: String, hint: Option<String>) {
        self.checks.push(CheckRecord {
            domain,
            name: name.to_string(),
            outcome: Outcome::Failed {
                message: message.clone(),
            },
        });
        self.issues.push(Issue {
            name: name.to_string(),
            message,
            hint,
        });
    }

    /// Append another result's checks and issues.
    pub fn merge(&mut self, other: Self) {
        self.checks.extend(other.checks);
        self.issues.extend(other.issues);
    }

    /// Whether every check succeeded.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.issues.is_empty()
    }

    /// `0` if no issues remain, otherwise `1`.
    #[must_use]
    pub fn exit_code(&self) -> u8 {
        u8::from(!self.is_success())
    }

    /// Count the checks by outcome.
    #[must_use]
    pub fn stats(&self) -> RunStats {
        let mut stats = RunStats::default();
        for check in &self.checks {
            match check.outcome {
                Outcome::Passed => stats.passed += 1,
                Outcome::Applied => stats.applied += 1,
                Outcome::Skipped { .. } => stats.skipped += 1,
                Outcome::Failed { .. } => stats.failed += 1,
            }
        }
        stats
    }

    /// Outcome recorded for `name`, if it was checked.
    #[must_use]
    pub fn outcome_of(&self, name: &str) -> Option<&Outcome> {
        self.checks
            .iter()
            .find(|c| c.name == name)
            .map(|c| &c.outcome)
    }
}
