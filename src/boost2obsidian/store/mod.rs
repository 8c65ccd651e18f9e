//! # Storage Layer
//!
//! The migration reads from one store and writes into another. Both sides sit
//! behind traits so the command layer never touches the filesystem directly.
//!
//! ## Design Rationale
//!
//! - The **command layer** is tested against [`memory`] stores, no temp dirs needed
//! - The **CLI** wires up the [`fs`] implementations
//!
//! ## Source Layout (Boostnote storage folder)
//!
//! ```text
//! <source>/
//! ├── boostnote.json               # folder manifest
//! ├── notes/
//! │   └── {id}.cson                # one note per file
//! └── attachments/
//!     └── {sub-folder}/{file}      # images referenced as :storage/{sub-folder}/{file}
//! ```
//!
//! ## Destination Layout (Obsidian vault)
//!
//! ```text
//! <destination>/
//! ├── .obsidian/                   # settings bundle
//! └── {Folder_Name}/
//!     ├── {title}.md
//!     └── attachments/{uuid}.{ext}
//! ```
//!
//! All vault paths handed to a [`VaultStore`] are relative to the vault root.

use crate::error::Result;
use std::path::{Path, PathBuf};

pub mod fs;
pub mod memory;

pub const MANIFEST_FILENAME: &str = "boostnote.json";
pub const NOTES_DIR: &str = "notes";
pub const ATTACHMENTS_DIR: &str = "attachments";
pub const SETTINGS_DIR: &str = ".obsidian";

/// Read access to a Boostnote storage folder.
pub trait SourceStore {
    /// Raw contents of the folder manifest
    fn read_manifest(&self) -> Result<String>;

    /// Note file names whose name contains `marker`, sorted by name
    fn list_note_files(&self, marker: &str) -> Result<Vec<String>>;

    /// Raw contents of a note file
    fn read_note_file(&self, name: &str) -> Result<String>;

    /// Bytes of `attachments/<sub_folder>/<file_name>`.
    /// Fails with `AttachmentNotFound` when the file does not exist.
    fn read_attachment(&self, sub_folder: &str, file_name: &str) -> Result<Vec<u8>>;

    /// Where an attachment is expected to live, for messages
    fn attachment_path(&self, sub_folder: &str, file_name: &str) -> PathBuf;
}

/// Write access to the destination vault.
pub trait VaultStore {
    /// Create a directory (and parents). Existing directories are not an error.
    fn ensure_dir(&mut self, rel: &Path) -> Result<()>;

    /// Write a file, replacing anything already at that path
    fn write_file(&mut self, rel: &Path, bytes: &[u8]) -> Result<()>;

    /// Absolute (or store-qualified) location of a vault path
    fn resolve(&self, rel: &Path) -> PathBuf;
}
