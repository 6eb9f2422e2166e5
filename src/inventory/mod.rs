//! Static desired-state tables, one per tool domain.
//!
//! Inventories are pure data: every path is the home root joined with a
//! fixed suffix, computed once at construction without touching the
//! filesystem.  Entry order is significant only in that parents precede
//! children.
mod base;
mod editor;
mod multiplexer;
mod notes;
mod shell;

use std::collections::HashSet;
use std::fmt;
use std::path::{Path, PathBuf};

use anyhow::{Result, bail};

use crate::config::Settings;

/// Tool domain an inventory belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, clap::ValueEnum)]
pub enum Domain {
    /// Cross-cutting directories and tools.
    Core,
    /// zsh, prompt, and shell plugins.
    Shell,
    /// vim and its packages.
    Editor,
    /// tmux and tpm.
    Multiplexer,
    /// The notes tree and its helper script.
    Notes,
}

impl Domain {
    /// Every domain, in install order.
    pub const ALL: [Self; 5] = [
        Self::Core,
        Self::Shell,
        Self::Editor,
        Self::Multiplexer,
        Self::Notes,
    ];

    /// Human-readable title used for stage headers.
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::Core => "Core",
            Self::Shell => "Shell (zsh)",
            Self::Editor => "Editor (vim)",
            Self::Multiplexer => "Multiplexer (tmux)",
            Self::Notes => "Notes",
        }
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Core => write!(f, "core"),
            Self::Shell => write!(f, "shell"),
            Self::Editor => write!(f, "editor"),
            Self::Multiplexer => write!(f, "multiplexer"),
            Self::Notes => write!(f, "notes"),
        }
    }
}

/// What uninstall may do with an entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Retention {
    /// Created for this environment; removed on uninstall.
    Owned,
    /// Shared with other software (`~/bin`, `~/.config`); never removed.
    Shared,
    /// User content; removed only when data is not kept.
    UserData,
}

/// Content written for a file entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileContent {
    /// Written verbatim.
    Static(&'static str),
    /// Placeholders are substituted before writing.
    Template(&'static str),
}

/// An external tool dependency.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolSpec {
    /// Binary that must be on `PATH`.
    pub binary: String,
    /// Package that provides it.
    pub package: String,
}

impl ToolSpec {
    /// A tool whose package has the same name as its binary.
    #[must_use]
    pub fn new(binary: &str) -> Self {
        Self {
            binary: binary.to_string(),
            package: binary.to_string(),
        }
    }
}

/// Where a repository entry comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RepoSource {
    /// Cloned from a URL with `git`.
    Remote(String),
    /// Initialised in place around existing content.
    Local,
}

/// Kind-specific payload of an entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResourceKind {
    /// A directory, created recursively.
    Directory {
        /// Absolute path.
        path: PathBuf,
    },
    /// A regular file.
    File {
        /// Absolute path.
        path: PathBuf,
        /// Content written when the file is created or regenerated.
        content: FileContent,
        /// Lines an existing file must contain to be considered correct.
        must_contain: Vec<&'static str>,
        /// Mark the file executable.
        executable: bool,
    },
    /// A binary provided by the package manager.
    ExternalTool {
        /// The tool.
        tool: ToolSpec,
    },
    /// A git repository.
    Repository {
        /// Absolute path of the working tree.
        path: PathBuf,
        /// Clone URL or local initialisation.
        source: RepoSource,
    },
}

/// One unit of desired state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceEntry {
    /// Identifier, unique within its inventory.
    pub name: String,
    /// What the entry describes.
    pub kind: ResourceKind,
    /// Uninstall policy.
    pub retention: Retention,
}

/// Display name for a home-relative path.
fn tilde(rel: &str) -> String {
    format!("~/{rel}")
}

impl ResourceEntry {
    /// An owned directory at `home/rel`.
    #[must_use]
    pub fn dir(home: &Path, rel: &str) -> Self {
        Self {
            name: tilde(rel),
            kind: ResourceKind::Directory {
                path: home.join(rel),
            },
            retention: Retention::Owned,
        }
    }

    /// An owned file at `home/rel`.
    #[must_use]
    pub fn file(home: &Path, rel: &str, content: FileContent) -> Self {
        Self {
            name: tilde(rel),
            kind: ResourceKind::File {
                path: home.join(rel),
                content,
                must_contain: Vec::new(),
                executable: false,
            },
            retention: Retention::Owned,
        }
    }

    /// An external tool whose package shares its binary name.
    #[must_use]
    pub fn tool(binary: &str) -> Self {
        Self::tool_from(ToolSpec::new(binary))
    }

    /// An external tool.
    #[must_use]
    pub fn tool_from(tool: ToolSpec) -> Self {
        Self {
            name: format!("tool:{}", tool.binary),
            kind: ResourceKind::ExternalTool { tool },
            retention: Retention::Shared,
        }
    }

    /// An owned repository cloned from `url` into `home/rel`.
    #[must_use]
    pub fn repo(home: &Path, rel: &str, url: &str) -> Self {
        let short = rel.rsplit('/').next().unwrap_or(rel);
        Self {
            name: format!("plugin:{short}"),
            kind: ResourceKind::Repository {
                path: home.join(rel),
                source: RepoSource::Remote(url.to_string()),
            },
            retention: Retention::Owned,
        }
    }

    /// A repository initialised in place at `home/rel`.
    #[must_use]
    pub fn local_repo(home: &Path, rel: &str) -> Self {
        Self {
            name: format!("git:{}", tilde(rel)),
            kind: ResourceKind::Repository {
                path: home.join(rel),
                source: RepoSource::Local,
            },
            retention: Retention::Owned,
        }
    }

    /// Change the retention policy.
    #[must_use]
    pub const fn retain(mut self, retention: Retention) -> Self {
        self.retention = retention;
        self
    }

    /// Require `lines` to be present in an existing file.
    #[must_use]
    pub fn must_contain(mut self, lines: &[&'static str]) -> Self {
        if let ResourceKind::File {
            ref mut must_contain,
            ..
        } = self.kind
        {
            must_contain.extend_from_slice(lines);
        }
        self
    }

    /// Mark a file entry executable.
    #[must_use]
    pub const fn executable(mut self) -> Self {
        if let ResourceKind::File {
            ref mut executable, ..
        } = self.kind
        {
            *executable = true;
        }
        self
    }

    /// Filesystem path of the entry, if it has one.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        match &self.kind {
            ResourceKind::Directory { path }
            | ResourceKind::File { path, .. }
            | ResourceKind::Repository { path, .. } => Some(path),
            ResourceKind::ExternalTool { .. } => None,
        }
    }
}

/// Ordered desired state for one domain.
#[derive(Debug, Clone)]
pub struct Inventory {
    /// Owning domain.
    pub domain: Domain,
    /// Version recorded in the marker file.
    pub version: &'static str,
    /// Version marker path (`~/.{tool}_version`).
    pub marker: PathBuf,
    /// Entries, parents before children.
    pub entries: Vec<ResourceEntry>,
}

impl Inventory {
    /// Build an inventory, rejecting duplicate entry names.
    ///
    /// # Errors
    ///
    /// Returns an error if two entries share a name.
    pub fn new(
        domain: Domain,
        version: &'static str,
        marker: PathBuf,
        entries: Vec<ResourceEntry>,
    ) -> Result<Self> {
        let mut seen = HashSet::new();
        for entry in &entries {
            if !seen.insert(entry.name.as_str()) {
                bail!("duplicate entry '{}' in {domain} inventory", entry.name);
            }
        }
        Ok(Self {
            domain,
            version,
            marker,
            entries,
        })
    }

    /// The inventory for `domain` rooted at `home`.
    ///
    /// Tools listed in `settings.skip_tools` are left out.
    ///
    /// # Errors
    ///
    /// Returns an error if the static table contains duplicate names.
    pub fn for_domain(domain: Domain, home: &Path, settings: &Settings) -> Result<Self> {
        let (version, marker, entries) = match domain {
            Domain::Core => (base::VERSION, base::MARKER, base::entries(home)),
            Domain::Shell => (shell::VERSION, shell::MARKER, shell::entries(home)),
            Domain::Editor => (editor::VERSION, editor::MARKER, editor::entries(home)),
            Domain::Multiplexer => (
                multiplexer::VERSION,
                multiplexer::MARKER,
                multiplexer::entries(home),
            ),
            Domain::Notes => (notes::VERSION, notes::MARKER, notes::entries(home, settings)),
        };
        let entries = entries
            .into_iter()
            .filter(|e| match &e.kind {
                ResourceKind::ExternalTool { tool } => !settings.skips_tool(&tool.binary),
                _ => true,
            })
            .collect();
        Self::new(domain, version, home.join(marker), entries)
    }

    /// Inventories for every domain in `domains`, in the given order.
    ///
    /// # Errors
    ///
    /// Returns an error if any static table contains duplicate names.
    pub fn all(domains: &[Domain], home: &Path, settings: &Settings) -> Result<Vec<Self>> {
        domains
            .iter()
            .map(|d| Self::for_domain(*d, home, settings))
            .collect()
    }

    /// Entry names in order.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.name.as_str()).collect()
    }
}

#[cfg(test)]
#[allow(
    clippy::expect_used,
    clippy::unwrap_used,
    clippy::indexing_slicing,
    clippy::panic
)]
mod tests {
    use super::*;

    fn inventory(domain: Domain) -> Inventory {
        Inventory::for_domain(domain, Path::new("/home/dev"), &Settings::default()).unwrap()
    }

    #[test]
    fn every_domain_builds_with_unique_names() {
        for domain in Domain::ALL {
            let inv = inventory(domain);
            let names: HashSet<&str> = inv.names().into_iter().collect();
            assert_eq!(names.len(), inv.entries.len(), "{domain} has duplicates");
        }
    }

    #[test]
    fn duplicate_names_are_rejected() {
        let home = Path::new("/h");
        let err = Inventory::new(
            Domain::Core,
            "0.0.0",
            home.join(".x"),
            vec![ResourceEntry::dir(home, "a"), ResourceEntry::dir(home, "a")],
        )
        .unwrap_err();
        assert!(err.to_string().contains("duplicate entry '~/a'"));
    }

    #[test]
    fn paths_are_rooted_at_home() {
        for domain in Domain::ALL {
            let inv = inventory(domain);
            assert!(inv.marker.starts_with("/home/dev"));
            for entry in &inv.entries {
                if let Some(path) = entry.path() {
                    assert!(path.starts_with("/home/dev"), "{}", path.display());
                }
            }
        }
    }

    #[test]
    fn parents_precede_children() {
        for domain in Domain::ALL {
            let inv = inventory(domain);
            for (i, entry) in inv.entries.iter().enumerate() {
                let ResourceKind::Directory { path } = &entry.kind else {
                    continue;
                };
                for earlier in &inv.entries[..i] {
                    if let Some(p) = earlier.path() {
                        assert!(
                            !p.starts_with(path) || p == path,
                            "{} listed before its parent {}",
                            p.display(),
                            path.display()
                        );
                    }
                }
            }
        }
    }

    #[test]
    fn notes_inventory_matches_layout() {
        let inv = inventory(Domain::Notes);
        assert_eq!(inv.version, "0.2.0");
        assert_eq!(inv.marker, Path::new("/home/dev/.notes_version"));
        insta::assert_snapshot!(inv.names().join("\n"), @r"
        ~/notes
        ~/notes/daily
        ~/notes/projects
        ~/notes/learning
        ~/notes/templates
        ~/notes/templates/daily.md
        ~/notes/templates/project.md
        ~/notes/templates/learning.md
        ~/notes/README.md
        git:~/notes
        ~/.config/devenv
        ~/.config/devenv/note-templates
        ~/.config/devenv/note-templates/daily.md
        ~/.config/devenv/note-templates/project.md
        ~/.config/devenv/note-templates/learning.md
        ~/bin/note
        ");
    }

    #[test]
    fn notes_git_can_be_disabled() {
        let mut settings = Settings::default();
        settings.notes.git = false;
        let inv = Inventory::for_domain(Domain::Notes, Path::new("/h"), &settings).unwrap();
        assert!(!inv.names().contains(&"git:~/notes"));
    }

    #[test]
    fn skipped_tools_are_filtered() {
        let mut settings = Settings::default();
        settings.skip_tools = vec!["fzf".to_string()];
        let inv = Inventory::for_domain(Domain::Shell, Path::new("/h"), &settings).unwrap();
        assert!(!inv.names().contains(&"tool:fzf"));
        assert!(inv.names().contains(&"tool:zsh"));
    }

    #[test]
    fn multiplexer_config_requires_sensible_plugin() {
        let inv = inventory(Domain::Multiplexer);
        let conf = inv
            .entries
            .iter()
            .find(|e| e.name == "~/.tmux.conf")
            .expect("tmux.conf entry");
        let ResourceKind::File { must_contain, .. } = &conf.kind else {
            panic!("tmux.conf should be a file entry");
        };
        assert!(must_contain.contains(&"set -g @plugin 'tmux-plugins/tmux-sensible'"));
    }

    #[test]
    fn user_data_is_confined_to_notes() {
        for domain in Domain::ALL {
            for entry in &inventory(domain).entries {
                if entry.retention == Retention::UserData {
                    assert_eq!(domain, Domain::Notes, "{}", entry.name);
                }
            }
        }
    }
}
