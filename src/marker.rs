//! Version marker files (`~/.{tool}_version`).
//!
//! ```text
//! version=0.2.0
//! date=2024-03-09
//! mode=full
//! ```
use std::fmt;
use std::path::Path;

use anyhow::{Context as _, Result};

use crate::config::RunConfig;
use crate::inventory::Inventory;

/// Parsed contents of a version marker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionMarker {
    /// Installed version.
    pub version: String,
    /// Date of the run that wrote the marker.
    pub date: String,
    /// Mode of that run, if recorded.
    pub mode: Option<String>,
}

impl VersionMarker {
    /// The marker a run with `config` writes for `inventory`.
    #[must_use]
    pub fn for_run(inventory: &Inventory, config: &RunConfig) -> Self {
        Self {
            version: inventory.version.to_string(),
            date: config.date_string(),
            mode: Some(config.mode.to_string()),
        }
    }

    /// Parse `key=value` lines; unknown keys are ignored.
    ///
    /// Returns `None` if `version` or `date` is absent.
    #[must_use]
    pub fn parse(text: &str) -> Option<Self> {
        let mut version = None;
        let mut date = None;
        let mut mode = None;
        for line in text.lines() {
            let Some((key, value)) = line.split_once('=') else {
                continue;
            };
            let value = value.trim().to_string();
            match key.trim() {
                "version" => version = Some(value),
                "date" => date = Some(value),
                "mode" => mode = Some(value),
                _ => {}
            }
        }
        Some(Self {
            version: version?,
            date: date?,
            mode,
        })
    }
}

impl fmt::Display for VersionMarker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "version={}", self.version)?;
        writeln!(f, "date={}", self.date)?;
        if let Some(ref mode) = self.mode {
            writeln!(f, "mode={mode}")?;
        }
        Ok(())
    }
}

/// Write the marker for `inventory` after a run with `config`.
///
/// # Errors
///
/// Returns an error if the marker file cannot be written.
pub fn write(inventory: &Inventory, config: &RunConfig) -> Result<()> {
    let marker = VersionMarker::for_run(inventory, config);
    std::fs::write(&inventory.marker, marker.to_string())
        .with_context(|| format!("writing {}", inventory.marker.display()))
}

/// Read and parse the marker at `path`.
///
/// Returns `Ok(None)` if there is no marker.
///
/// # Errors
///
/// Returns an error if the file exists but cannot be read or parsed.
pub fn read(path: &Path) -> Result<Option<VersionMarker>> {
    if !path.exists() {
        return Ok(None);
    }
    let text =
        std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    VersionMarker::parse(&text)
        .map(Some)
        .with_context(|| format!("malformed version marker {}", path.display()))
}

/// Delete the marker at `path` if it exists.
///
/// # Errors
///
/// Returns an error if the file exists but cannot be removed.
pub fn remove(path: &Path) -> Result<bool> {
    if !path.exists() {
        return Ok(false);
    }
    std::fs::remove_file(path).with_context(|| format!("removing {}", path.display()))?;
    Ok(true)
}
