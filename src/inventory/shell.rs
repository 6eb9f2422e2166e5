//! zsh configuration, prompt theme, and plugins.
use std::path::Path;

use super::{FileContent, ResourceEntry};

pub const VERSION: &str = "0.2.0";
pub const MARKER: &str = ".zsh_version";

const ZSHRC: &str = include_str!("../../templates/zsh/zshrc");
const P10K: &str = include_str!("../../templates/zsh/p10k.zsh");
const ALIASES: &str = include_str!("../../templates/zsh/aliases.zsh");

pub fn entries(home: &Path) -> Vec<ResourceEntry> {
    vec![
        ResourceEntry::dir(home, ".config/zsh"),
        ResourceEntry::dir(home, ".config/zsh/plugins"),
        ResourceEntry::file(home, ".zshrc", FileContent::Template(ZSHRC)),
        ResourceEntry::file(home, ".p10k.zsh", FileContent::Static(P10K)),
        ResourceEntry::file(home, ".config/zsh/aliases.zsh", FileContent::Static(ALIASES)),
        ResourceEntry::tool("zsh"),
        ResourceEntry::tool("fzf"),
        ResourceEntry::repo(
            home,
            ".config/zsh/plugins/powerlevel10k",
            "https://github.com/romkatv/powerlevel10k.git",
        ),
        ResourceEntry::repo(
            home,
            ".config/zsh/plugins/zsh-autosuggestions",
            "https://github.com/zsh-users/zsh-autosuggestions.git",
        ),
        ResourceEntry::repo(
            home,
            ".config/zsh/plugins/zsh-syntax-highlighting",
            "https://github.com/zsh-users/zsh-syntax-highlighting.git",
        ),
    ]
}
