//! Domain-specific error types for the environment installer.
//!
//! Resource and backup code raise these typed errors and propagate them as
//! [`anyhow::Error`] via the standard `?` operator.  The reconciler catches
//! them per entry and records them as issues, so only [`DevenvError::Parse`]
//! and [`DevenvError::Settings`] ever abort a run.
//!
//! # Error hierarchy
//!
//! ```text
//! DevenvError
//! ├── Create       : directory/file could not be made
//! ├── ExternalTool : presence check or install command failed
//! ├── Backup       : copy into the backup directory failed (non-fatal)
//! ├── Parse        : malformed command line (fatal)
//! └── Settings     : malformed settings file (fatal)
//! ```

use std::path::PathBuf;

use thiserror::Error;

/// Top-level error type for the environment installer.
#[derive(Error, Debug)]
pub enum DevenvError {
    /// A directory or file could not be created (permissions, disk space,
    /// or a conflicting non-directory at the path).
    #[error("cannot create {}: {reason}", path.display())]
    Create {
        /// Path that could not be created.
        path: PathBuf,
        /// Human-readable cause.
        reason: String,
    },

    /// An external tool is missing or its install command failed.
    #[error("external tool '{tool}': {reason}")]
    ExternalTool {
        /// Name of the tool (binary) involved.
        tool: String,
        /// Human-readable cause.
        reason: String,
    },

    /// Copying a path into the backup directory failed.
    #[error("backup of {} failed: {source}", path.display())]
    Backup {
        /// Path that could not be backed up.
        path: PathBuf,
        /// Underlying I/O or copy error.
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// The command line could not be parsed.
    #[error("invalid arguments: {0}")]
    Parse(String),

    /// The settings file exists but could not be read or parsed.
    #[error("invalid settings file {}: {message}", path.display())]
    Settings {
        /// Path to the settings file.
        path: PathBuf,
        /// Parser or I/O message.
        message: String,
    },
}

impl DevenvError {
    /// Build a [`DevenvError::Create`] from any displayable cause.
    pub fn create(path: impl Into<PathBuf>, reason: impl std::fmt::Display) -> Self {
        Self::Create {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    /// Build a [`DevenvError::ExternalTool`] from any displayable cause.
    pub fn external_tool(tool: impl Into<String>, reason: impl std::fmt::Display) -> Self {
        Self::ExternalTool {
            tool: tool.into(),
            reason: reason.to_string(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn create_display_includes_path_and_reason() {
        let e = DevenvError::create("/home/u/notes", "permission denied");
        assert_eq!(
            e.to_string(),
            "cannot create /home/u/notes: permission denied"
        );
    }

    #[test]
    fn external_tool_display() {
        let e = DevenvError::external_tool("tmux", "not found on PATH");
        assert_eq!(e.to_string(), "external tool 'tmux': not found on PATH");
    }

    #[test]
    fn backup_has_source() {
        use std::error::Error as StdError;
        let e = DevenvError::Backup {
            path: PathBuf::from("/home/u/.zshrc"),
            source: "disk full".into(),
        };
        assert!(e.to_string().contains(".zshrc"));
        assert!(e.source().is_some());
    }

    #[test]
    fn parse_display() {
        let e = DevenvError::Parse("unexpected argument '--bogus'".to_string());
        assert_eq!(
            e.to_string(),
            "invalid arguments: unexpected argument '--bogus'"
        );
    }

    #[test]
    fn settings_display() {
        let e = DevenvError::Settings {
            path: PathBuf::from("/cfg/settings.toml"),
            message: "expected `=`".to_string(),
        };
        assert!(e.to_string().contains("/cfg/settings.toml"));
        assert!(e.to_string().contains("expected `=`"));
    }

    #[test]
    fn converts_to_anyhow_and_back() {
        let e: anyhow::Error = DevenvError::create("/x", "boom").into();
        assert!(matches!(
            e.downcast_ref::<DevenvError>(),
            Some(DevenvError::Create { .. })
        ));
    }

    fn assert_send_sync<T: Send + Sync>() {}

    #[test]
    fn devenv_error_is_send_sync() {
        assert_send_sync::<DevenvError>();
    }
}
