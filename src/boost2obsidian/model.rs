use serde::{Deserialize, Serialize};
use std::collections::HashMap;

pub const MARKDOWN_NOTE: &str = "MARKDOWN_NOTE";
pub const SNIPPET_NOTE: &str = "SNIPPET_NOTE";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NoteKind {
    Markdown,
    Snippet,
}

impl NoteKind {
    /// Maps the `type` field of a note file to a kind, `None` for anything else.
    pub fn from_discriminator(value: &str) -> Option<Self> {
        match value {
            MARKDOWN_NOTE => Some(NoteKind::Markdown),
            SNIPPET_NOTE => Some(NoteKind::Snippet),
            _ => None,
        }
    }
}

impl std::fmt::Display for NoteKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NoteKind::Markdown => write!(f, "markdown"),
            NoteKind::Snippet => write!(f, "snippet"),
        }
    }
}

/// A note file as it sits on disk, before normalization.
#[derive(Debug, Clone, Deserialize)]
pub struct RawNote {
    #[serde(rename = "type")]
    pub kind: String,
    pub folder: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub snippets: Vec<RawSnippet>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawSnippet {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub content: String,
}

/// A note normalized to a single content field, ready for conversion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Note {
    /// File name of the note inside the source `notes/` directory
    pub source: String,
    pub kind: NoteKind,
    /// Destination-safe folder label (display name with whitespace filled)
    pub folder_name: String,
    pub title: String,
    pub content: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FolderDescriptor {
    pub key: String,
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Manifest {
    pub folders: Vec<FolderDescriptor>,
}

/// Folder key → display name, loaded once per run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FolderMapping {
    names: HashMap<String, String>,
}

impl FolderMapping {
    pub fn from_manifest(manifest: Manifest) -> Self {
        let names = manifest
            .folders
            .into_iter()
            .map(|folder| (folder.key, folder.name))
            .collect();
        Self { names }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.names.get(key).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Entries sorted by key.
    pub fn entries(&self) -> Vec<(&str, &str)> {
        let mut entries: Vec<(&str, &str)> = self
            .names
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect();
        entries.sort();
        entries
    }
}

impl FromIterator<(String, String)> for FolderMapping {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self {
            names: iter.into_iter().collect(),
        }
    }
}

/// Replaces every whitespace character with `filler`.
pub fn fill_whitespace(name: &str, filler: char) -> String {
    name.chars()
        .map(|c| if c.is_whitespace() { filler } else { c })
        .collect()
}

/// Destination directory name for a folder display name: whitespace and path
/// separators become `filler`. `None` when nothing usable is left (empty or
/// only dots), since such a name would not stay a single directory in the vault.
pub fn folder_label(name: &str, filler: char) -> Option<String> {
    let label: String = fill_whitespace(name, filler)
        .chars()
        .map(|c| match c {
            ':' | '/' | '\\' => filler,
            c => c,
        })
        .collect();
    if label.chars().all(|c| c == '.') {
        return None;
    }
    Some(label)
}

/// An inline image reference into the Boostnote attachment store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AttachmentRef {
    pub alt_text: String,
    pub sub_folder: String,
    pub file_name: String,
}

impl AttachmentRef {
    /// Everything after the first `.` of the file name.
    pub fn extension(&self) -> &str {
        self.file_name
            .split_once('.')
            .map(|(_, ext)| ext)
            .unwrap_or_default()
    }
}
