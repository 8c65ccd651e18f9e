use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum MigrateError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("CSON parse error at line {line}: {message}")]
    Cson { line: usize, message: String },

    #[error("Folder manifest error: {0}")]
    Manifest(String),

    #[error("Note {note} references unknown folder '{folder}'")]
    UnknownFolder { note: String, folder: String },

    #[error("Note {note} has unrecognized type '{kind}'")]
    UnknownNoteKind { note: String, kind: String },

    #[error("Snippet note {0} has no snippets")]
    EmptySnippets(String),

    #[error("Note {note} is malformed: {message}")]
    MalformedNote { note: String, message: String },

    #[error("Attachment not found: {}", .0.display())]
    AttachmentNotFound(PathBuf),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Logging error: {0}")]
    Logging(String),
}

pub type Result<T> = std::result::Result<T, MigrateError>;
