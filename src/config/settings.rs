//! Optional user settings loaded from `settings.toml`.
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::DevenvError;

/// User-tunable settings.
///
/// Every field has a default, so a missing file or a file that sets only
/// some keys is valid.
///
/// ```toml
/// package_manager = "brew"
/// skip_tools = ["fzf"]
///
/// [notes]
/// git = true
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// Program invoked as `<package_manager> install <package>`.
    pub package_manager: String,
    /// Tool binaries excluded from every inventory.
    pub skip_tools: Vec<String>,
    /// Notes-specific settings.
    pub notes: NotesSettings,
}

/// Settings for the notes domain.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct NotesSettings {
    /// Initialise `~/notes` as a local git repository.
    pub git: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            package_manager: "brew".to_string(),
            skip_tools: Vec::new(),
            notes: NotesSettings::default(),
        }
    }
}

impl Default for NotesSettings {
    fn default() -> Self {
        Self { git: true }
    }
}

impl Settings {
    /// Default settings file location.
    ///
    /// `$XDG_CONFIG_HOME/devenv/settings.toml`, falling back to
    /// `<home>/.config/devenv/settings.toml`.
    #[must_use]
    pub fn default_path(home: &Path) -> PathBuf {
        std::env::var("XDG_CONFIG_HOME")
            .map_or_else(|_| home.join(".config"), PathBuf::from)
            .join("devenv")
            .join("settings.toml")
    }

    /// Load settings from `path`, returning defaults if it does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`DevenvError::Settings`] if the file exists but cannot be
    /// read or is not valid TOML for this schema.
    pub fn load(path: &Path) -> Result<Self, DevenvError> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| DevenvError::Settings {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        toml::from_str(&content).map_err(|e| DevenvError::Settings {
            path: path.to_path_buf(),
            message: e.message().to_string(),
        })
    }

    /// Whether the tool with binary name `binary` has been opted out.
    #[must_use]
    pub fn skips_tool(&self, binary: &str) -> bool {
        self.skip_tools.iter().any(|t| t == binary)
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let settings = Settings::load(&dir.path().join("settings.toml")).unwrap();
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.package_manager, "brew");
        assert!(settings.notes.git);
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.toml");
        std::fs::write(&path, "skip_tools = [\"fzf\"]\n").unwrap();
        let settings = Settings::load(&path).unwrap();
        assert_eq!(settings.skip_tools, vec!["fzf"]);
        assert_eq!(settings.package_manager, "brew");
        assert!(settings.skips_tool("fzf"));
        assert!(!settings.skips_tool("tmux"));
    }

    #[test]
    fn full_file_is_parsed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.toml");
        std::fs::write(
            &path,
            "package_manager = \"port\"\nskip_tools = []\n\n[notes]\ngit = false\n",
        )
        .unwrap();
        let settings = Settings::load(&path).unwrap();
        assert_eq!(settings.package_manager, "port");
        assert!(!settings.notes.git);
    }

    #[test]
    fn malformed_file_is_settings_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.toml");
        std::fs::write(&path, "package_manager = \n").unwrap();
        let err = Settings::load(&path).unwrap_err();
        assert!(matches!(err, DevenvError::Settings { .. }), "got {err:?}");
    }

    #[test]
    fn unknown_key_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.toml");
        std::fs::write(&path, "pakage_manager = \"brew\"\n").unwrap();
        assert!(Settings::load(&path).is_err());
    }
}
