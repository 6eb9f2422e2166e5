//! Run summary: one line per check, unresolved issues, and the exit code.
use std::fmt::Write as _;
use std::process::ExitCode;

use crate::config::Mode;
use crate::logging::Log;
use crate::reconcile::{FIX_HINT, Outcome, RunResult};

/// Terminal text style.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Style {
    /// Green.
    Success,
    /// Yellow.
    Warning,
    /// Red.
    Error,
    /// Dim.
    Muted,
    /// Bold.
    Strong,
}

impl Style {
    const fn code(self) -> &'static str {
        match self {
            Self::Success => "\x1b[32m",
            Self::Warning => "\x1b[33m",
            Self::Error => "\x1b[31m",
            Self::Muted => "\x1b[2m",
            Self::Strong => "\x1b[1m",
        }
    }
}

/// Wrap `text` in the escape codes for `style`.
#[must_use]
pub fn colorize(text: &str, style: Style) -> String {
    format!("{}{text}\x1b[0m", style.code())
}

fn outcome_line(name: &str, outcome: &Outcome) -> String {
    let (icon, style, detail) = match outcome {
        Outcome::Passed => ("✓", Style::Success, None),
        Outcome::Applied => ("+", Style::Success, None),
        Outcome::Skipped { reason } => ("○", Style::Warning, Some(reason)),
        Outcome::Failed { message } => ("✗", Style::Error, Some(message)),
    };
    let suffix = detail.map(|d| format!(" ({d})")).unwrap_or_default();
    colorize(&format!("{icon} {name}{suffix}"), style)
}

/// Every line of the summary, without the log-file footer.
#[must_use]
pub fn render(result: &RunResult) -> Vec<String> {
    let mut lines: Vec<String> = result
        .checks
        .iter()
        .map(|c| outcome_line(&c.name, &c.outcome))
        .collect();

    lines.push(String::new());
    let stats = result.stats();
    let mut totals = format!(
        "{} checks: {}, {} ok",
        result.checks.len(),
        colorize(&format!("{} applied", stats.applied), Style::Success),
        stats.passed
    );
    if stats.skipped > 0 {
        let _ = write!(
            totals,
            ", {}",
            colorize(&format!("{} skipped", stats.skipped), Style::Warning)
        );
    }
    let _ = write!(
        totals,
        ", {}",
        colorize(&format!("{} failed", stats.failed), Style::Error)
    );
    lines.push(totals);

    if result.issues.is_empty() {
        lines.push(colorize("No issues found", Style::Success));
        return lines;
    }

    lines.push(String::new());
    lines.push(colorize(
        &format!("{} issue(s) remain:", result.issues.len()),
        Style::Strong,
    ));
    for issue in &result.issues {
        lines.push(format!(
            "  {} {}: {}",
            colorize("✗", Style::Error),
            issue.name,
            issue.message
        ));
        if let Some(ref hint) = issue.hint {
            lines.push(colorize(&format!("      {hint}"), Style::Muted));
        }
    }
    if result.mode != Mode::FixOnly {
        lines.push(String::new());
        lines.push(format!("Some problems can be repaired automatically: {FIX_HINT}"));
    }
    lines
}

/// Log the summary for `result` and turn it into the process exit code.
pub fn report(result: &RunResult, log: &dyn Log) -> ExitCode {
    log.stage("Summary");
    for line in render(result) {
        log.info(&line);
    }
    if let Some(path) = log.log_file() {
        log.info(&colorize(&format!("log: {}", path.display()), Style::Muted));
    }
    ExitCode::from(result.exit_code())
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use std::sync::Mutex;

    use super::*;
    use crate::inventory::Domain;
    use crate::logging::strip_ansi;

    #[derive(Default)]
    struct Recorder {
        lines: Mutex<Vec<String>>,
    }

    impl Recorder {
        fn push(&self, msg: &str) {
            self.lines.lock().unwrap().push(strip_ansi(msg));
        }
    }

    impl Log for Recorder {
        fn stage(&self, msg: &str) {
            self.push(&format!("==> {msg}"));
        }
        fn info(&self, msg: &str) {
            self.push(msg);
        }
        fn debug(&self, _: &str) {}
        fn warn(&self, msg: &str) {
            self.push(msg);
        }
        fn error(&self, msg: &str) {
            self.push(msg);
        }
    }

    fn plain(result: &RunResult) -> Vec<String> {
        render(result).iter().map(|l| strip_ansi(l)).collect()
    }

    #[test]
    fn colorize_wraps_and_resets() {
        assert_eq!(colorize("ok", Style::Success), "\x1b[32mok\x1b[0m");
        assert_eq!(colorize("x", Style::Error), "\x1b[31mx\x1b[0m");
        assert_eq!(strip_ansi(&colorize("hint", Style::Muted)), "hint");
    }

    #[test]
    fn one_line_per_check_with_icons() {
        let mut result = RunResult::new(Mode::Full);
        result.record(Domain::Core, "~/bin", Outcome::Passed);
        result.record(Domain::Core, "~/.config", Outcome::Applied);
        result.record(
            Domain::Core,
            "tool:git",
            Outcome::Skipped {
                reason: "minimal install".to_string(),
            },
        );
        let lines = plain(&result);
        assert_eq!(lines[0], "✓ ~/bin");
        assert_eq!(lines[1], "+ ~/.config");
        assert_eq!(lines[2], "○ tool:git (minimal install)");
        assert_eq!(lines[4], "3 checks: 1 applied, 1 ok, 1 skipped, 0 failed");
        assert_eq!(lines[5], "No issues found");
    }

    #[test]
    fn issues_are_listed_with_hints_and_fix_suggestion() {
        let mut result = RunResult::new(Mode::Check);
        result.fail(
            Domain::Multiplexer,
            "tool:tmux",
            "external tool 'tmux': not found on PATH".to_string(),
            Some("brew install tmux".to_string()),
        );
        let text = plain(&result).join("\n");
        insta::assert_snapshot!(text, @r"
        ✗ tool:tmux (external tool 'tmux': not found on PATH)

        1 checks: 0 applied, 0 ok, 1 failed

        1 issue(s) remain:
          ✗ tool:tmux: external tool 'tmux': not found on PATH
              brew install tmux

        Some problems can be repaired automatically: run `devenv doctor --fix`
        ");
    }

    #[test]
    fn fix_mode_does_not_suggest_itself() {
        let mut result = RunResult::new(Mode::FixOnly);
        result.fail(Domain::Shell, "tool:zsh", "no network".to_string(), None);
        assert!(!plain(&result).iter().any(|l| l.contains("doctor --fix")));
    }

    #[test]
    fn report_returns_exit_code_and_logs_summary() {
        let log = Recorder::default();
        let mut result = RunResult::new(Mode::Full);
        result.record(Domain::Notes, "~/notes", Outcome::Applied);
        let _ = report(&result, &log);
        assert_eq!(result.exit_code(), 0);
        let lines = log.lines.lock().unwrap();
        assert_eq!(lines[0], "==> Summary");
        assert_eq!(lines[1], "+ ~/notes");

        result.fail(Domain::Notes, "~/bin/note", "denied".to_string(), None);
        assert_eq!(result.exit_code(), 1);
    }
}
