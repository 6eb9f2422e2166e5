//! tmux configuration and the tpm plugin manager.
use std::path::Path;

use super::{FileContent, ResourceEntry};

pub const VERSION: &str = "0.2.0";
pub const MARKER: &str = ".tmux_version";

const TMUX_CONF: &str = include_str!("../../templates/tmux/tmux.conf");

pub const TPM_PLUGIN_LINE: &str = "set -g @plugin 'tmux-plugins/tpm'";
pub const SENSIBLE_PLUGIN_LINE: &str = "set -g @plugin 'tmux-plugins/tmux-sensible'";

pub fn entries(home: &Path) -> Vec<ResourceEntry> {
    vec![
        ResourceEntry::dir(home, ".tmux"),
        ResourceEntry::dir(home, ".tmux/plugins"),
        ResourceEntry::file(home, ".tmux.conf", FileContent::Template(TMUX_CONF))
            .must_contain(&[TPM_PLUGIN_LINE, SENSIBLE_PLUGIN_LINE]),
        ResourceEntry::tool("tmux"),
        ResourceEntry::repo(
            home,
            ".tmux/plugins/tpm",
            "https://github.com/tmux-plugins/tpm",
        ),
    ]
}
