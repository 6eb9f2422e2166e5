//! The notes tree, its templates, and the `note` helper.
use std::path::Path;

use super::{FileContent, ResourceEntry, Retention};
use crate::config::Settings;

pub const VERSION: &str = "0.2.0";
pub const MARKER: &str = ".notes_version";

const DAILY: &str = include_str!("../../templates/notes/daily.md");
const PROJECT: &str = include_str!("../../templates/notes/project.md");
const LEARNING: &str = include_str!("../../templates/notes/learning.md");
const README: &str = include_str!("../../templates/notes/README.md");
const NOTE_SCRIPT: &str = include_str!("../../templates/bin/note");

/// Where `note` reads its unrendered skeletons from.
pub const SKELETON_DIR: &str = ".config/devenv/note-templates";

pub fn entries(home: &Path, settings: &Settings) -> Vec<ResourceEntry> {
    let data = |rel: &str| ResourceEntry::dir(home, rel).retain(Retention::UserData);
    let rendered = |rel: &str, text: &'static str| {
        ResourceEntry::file(home, rel, FileContent::Template(text)).retain(Retention::UserData)
    };
    let skeleton = |name: &str, text: &'static str| {
        ResourceEntry::file(home, &format!("{SKELETON_DIR}/{name}"), FileContent::Static(text))
    };

    let mut entries = vec![
        data("notes"),
        data("notes/daily"),
        data("notes/projects"),
        data("notes/learning"),
        data("notes/templates"),
        rendered("notes/templates/daily.md", DAILY),
        rendered("notes/templates/project.md", PROJECT),
        rendered("notes/templates/learning.md", LEARNING),
        rendered("notes/README.md", README),
    ];
    if settings.notes.git {
        entries.push(ResourceEntry::local_repo(home, "notes").retain(Retention::UserData));
    }
    // `note` fills `{{date}}` and `{{title}}` itself when it creates a note.
    entries.extend([
        ResourceEntry::dir(home, ".config/devenv").retain(Retention::Shared),
        ResourceEntry::dir(home, SKELETON_DIR),
        skeleton("daily.md", DAILY),
        skeleton("project.md", PROJECT),
        skeleton("learning.md", LEARNING),
        ResourceEntry::file(home, "bin/note", FileContent::Static(NOTE_SCRIPT)).executable(),
    ]);
    entries
}
