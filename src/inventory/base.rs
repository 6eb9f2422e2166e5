//! Cross-cutting directories and tools every other domain relies on.
use std::path::Path;

use super::{ResourceEntry, Retention};

pub const VERSION: &str = "0.2.0";
pub const MARKER: &str = ".devenv_version";

pub fn entries(home: &Path) -> Vec<ResourceEntry> {
    vec![
        ResourceEntry::dir(home, "bin").retain(Retention::Shared),
        ResourceEntry::dir(home, ".config").retain(Retention::Shared),
        ResourceEntry::tool("git"),
    ]
}
