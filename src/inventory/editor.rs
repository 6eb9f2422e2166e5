//! vim configuration, undo directory, and native packages.
use std::path::Path;

use super::{FileContent, ResourceEntry};

pub const VERSION: &str = "0.2.0";
pub const MARKER: &str = ".vim_version";

const VIMRC: &str = include_str!("../../templates/vim/vimrc");

pub fn entries(home: &Path) -> Vec<ResourceEntry> {
    vec![
        ResourceEntry::dir(home, ".vim"),
        ResourceEntry::dir(home, ".vim/undodir"),
        ResourceEntry::dir(home, ".vim/pack/plugins/start"),
        ResourceEntry::file(home, ".vimrc", FileContent::Template(VIMRC)),
        ResourceEntry::tool("vim"),
        ResourceEntry::repo(
            home,
            ".vim/pack/plugins/start/vim-sensible",
            "https://github.com/tpope/vim-sensible.git",
        ),
        ResourceEntry::repo(
            home,
            ".vim/pack/plugins/start/fzf.vim",
            "https://github.com/junegunn/fzf.vim.git",
        ),
    ]
}
