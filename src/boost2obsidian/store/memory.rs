use super::{SourceStore, VaultStore, ATTACHMENTS_DIR, MANIFEST_FILENAME};
use crate::error::{MigrateError, Result};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::io;
use std::path::{Path, PathBuf};

/// In-memory Boostnote source for testing.
#[derive(Default)]
pub struct MemorySource {
    manifest: Option<String>,
    notes: BTreeMap<String, String>,
    attachments: HashMap<(String, String), Vec<u8>>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_manifest(mut self, manifest: impl Into<String>) -> Self {
        self.manifest = Some(manifest.into());
        self
    }

    pub fn with_note(mut self, name: impl Into<String>, content: impl Into<String>) -> Self {
        self.notes.insert(name.into(), content.into());
        self
    }

    pub fn with_attachment(
        mut self,
        sub_folder: impl Into<String>,
        file_name: impl Into<String>,
        bytes: impl Into<Vec<u8>>,
    ) -> Self {
        self.attachments
            .insert((sub_folder.into(), file_name.into()), bytes.into());
        self
    }
}

impl SourceStore for MemorySource {
    fn read_manifest(&self) -> Result<String> {
        self.manifest
            .clone()
            .ok_or_else(|| MigrateError::Manifest(format!("{} does not exist", MANIFEST_FILENAME)))
    }

    fn list_note_files(&self, marker: &str) -> Result<Vec<String>> {
        Ok(self
            .notes
            .keys()
            .filter(|name| name.contains(marker))
            .cloned()
            .collect())
    }

    fn read_note_file(&self, name: &str) -> Result<String> {
        self.notes.get(name).cloned().ok_or_else(|| {
            MigrateError::Io(io::Error::new(
                io::ErrorKind::NotFound,
                format!("note file {} not found", name),
            ))
        })
    }

    fn read_attachment(&self, sub_folder: &str, file_name: &str) -> Result<Vec<u8>> {
        self.attachments
            .get(&(sub_folder.to_string(), file_name.to_string()))
            .cloned()
            .ok_or_else(|| {
                MigrateError::AttachmentNotFound(self.attachment_path(sub_folder, file_name))
            })
    }

    fn attachment_path(&self, sub_folder: &str, file_name: &str) -> PathBuf {
        Path::new(ATTACHMENTS_DIR).join(sub_folder).join(file_name)
    }
}

/// In-memory vault for testing. Like a real filesystem, writing into a
/// directory that was never ensured fails.
#[derive(Default)]
pub struct MemoryVault {
    dirs: BTreeSet<PathBuf>,
    files: BTreeMap<PathBuf, Vec<u8>>,
    ensure_calls: usize,
}

impl MemoryVault {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn file(&self, rel: impl AsRef<Path>) -> Option<&[u8]> {
        self.files.get(rel.as_ref()).map(Vec::as_slice)
    }

    pub fn file_text(&self, rel: impl AsRef<Path>) -> Option<String> {
        self.file(rel)
            .map(|bytes| String::from_utf8_lossy(bytes).into_owned())
    }

    pub fn files(&self) -> impl Iterator<Item = &PathBuf> {
        self.files.keys()
    }

    pub fn has_dir(&self, rel: impl AsRef<Path>) -> bool {
        self.dirs.contains(rel.as_ref())
    }

    /// Number of `ensure_dir` calls made so far
    pub fn ensure_calls(&self) -> usize {
        self.ensure_calls
    }
}

impl VaultStore for MemoryVault {
    fn ensure_dir(&mut self, rel: &Path) -> Result<()> {
        self.ensure_calls += 1;
        for ancestor in rel.ancestors() {
            if !ancestor.as_os_str().is_empty() {
                self.dirs.insert(ancestor.to_path_buf());
            }
        }
        Ok(())
    }

    fn write_file(&mut self, rel: &Path, bytes: &[u8]) -> Result<()> {
        if let Some(parent) = rel.parent() {
            if !parent.as_os_str().is_empty() && !self.dirs.contains(parent) {
                return Err(MigrateError::Io(io::Error::new(
                    io::ErrorKind::NotFound,
                    format!("directory {} does not exist", parent.display()),
                )));
            }
        }
        self.files.insert(rel.to_path_buf(), bytes.to_vec());
        Ok(())
    }

    fn resolve(&self, rel: &Path) -> PathBuf {
        Path::new("memory://").join(rel)
    }
}

// --- Test Fixtures ---

#[cfg(any(test, feature = "test_utils"))]
pub mod fixtures {
    use super::*;

    pub const MANIFEST: &str = r##"{
  "folders": [
    { "key": "f1", "color": "#E10051", "name": "My Trips" },
    { "key": "f2", "color": "#1EC38B", "name": "Work" }
  ],
  "version": "1.0"
}"##;

    pub fn markdown_note(folder: &str, title: &str, content: &str) -> String {
        let body = content
            .lines()
            .map(|line| format!("  {}", line.replace('\\', "\\\\")))
            .collect::<Vec<_>>()
            .join("\n");
        format!(
            "createdAt: \"2019-04-02T10:00:00.000Z\"\ntype: \"MARKDOWN_NOTE\"\nfolder: \"{}\"\ntitle: \"{}\"\ntags: []\ncontent: '''\n{}\n'''\nisStarred: false\nisTrashed: false\n",
            folder, title, body
        )
    }

    pub fn snippet_note(folder: &str, title: &str, snippet: &str) -> String {
        format!(
            "type: \"SNIPPET_NOTE\"\nfolder: \"{}\"\ntitle: \"{}\"\ndescription: \"\"\ncontent: \"top-level content\"\nsnippets: [\n  {{\n    name: \"first.txt\"\n    mode: \"text\"\n    content: '''\n      {}\n    '''\n  }}\n  {{\n    name: \"second.txt\"\n    content: \"not me\"\n  }}\n]\n",
            folder, title, snippet
        )
    }

    /// One markdown note in `My Trips` referencing one picture.
    pub fn trip_source() -> MemorySource {
        MemorySource::new()
            .with_manifest(MANIFEST)
            .with_note(
                "0001.cson",
                markdown_note("f1", "Trip", "![beach](:storage/abc/pic.png)"),
            )
            .with_attachment("abc", "pic.png", vec![0x89, b'P', b'N', b'G'])
    }
}
