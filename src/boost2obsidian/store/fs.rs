use super::{SourceStore, VaultStore, ATTACHMENTS_DIR, MANIFEST_FILENAME, NOTES_DIR};
use crate::error::{MigrateError, Result};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// A Boostnote storage folder on disk.
pub struct FsSource {
    root: PathBuf,
}

impl FsSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl SourceStore for FsSource {
    fn read_manifest(&self) -> Result<String> {
        let path = self.root.join(MANIFEST_FILENAME);
        fs::read_to_string(&path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => {
                MigrateError::Manifest(format!("{} does not exist", path.display()))
            }
            _ => MigrateError::Io(e),
        })
    }

    fn list_note_files(&self, marker: &str) -> Result<Vec<String>> {
        let notes_dir = self.root.join(NOTES_DIR);
        let mut names = Vec::new();
        for entry in fs::read_dir(&notes_dir).map_err(MigrateError::Io)? {
            let entry = entry.map_err(MigrateError::Io)?;
            if !entry.path().is_file() {
                continue;
            }
            let name = entry.file_name().to_string_lossy().into_owned();
            if name.contains(marker) {
                names.push(name);
            }
        }
        names.sort();
        Ok(names)
    }

    fn read_note_file(&self, name: &str) -> Result<String> {
        fs::read_to_string(self.root.join(NOTES_DIR).join(name)).map_err(MigrateError::Io)
    }

    fn read_attachment(&self, sub_folder: &str, file_name: &str) -> Result<Vec<u8>> {
        let path = self.attachment_path(sub_folder, file_name);
        fs::read(&path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => MigrateError::AttachmentNotFound(path.clone()),
            _ => MigrateError::Io(e),
        })
    }

    fn attachment_path(&self, sub_folder: &str, file_name: &str) -> PathBuf {
        self.root
            .join(ATTACHMENTS_DIR)
            .join(sub_folder)
            .join(file_name)
    }
}

/// An Obsidian vault on disk. Created on first write if missing.
pub struct FsVault {
    root: PathBuf,
}

impl FsVault {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl VaultStore for FsVault {
    fn ensure_dir(&mut self, rel: &Path) -> Result<()> {
        let path = self.root.join(rel);
        if !path.is_dir() {
            fs::create_dir_all(&path).map_err(MigrateError::Io)?;
        }
        Ok(())
    }

    fn write_file(&mut self, rel: &Path, bytes: &[u8]) -> Result<()> {
        fs::write(self.root.join(rel), bytes).map_err(MigrateError::Io)
    }

    fn resolve(&self, rel: &Path) -> PathBuf {
        self.root.join(rel)
    }
}
