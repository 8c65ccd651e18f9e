use crate::commands::CmdMessage;
use crate::config::{FailurePolicy, MigrateConfig};
use crate::cson;
use crate::error::{MigrateError, Result};
use crate::model::{folder_label, FolderMapping, Note, NoteKind, RawNote};
use crate::store::SourceStore;
use serde_json::Value;

/// Notes read from the source, in processing order.
#[derive(Debug, Default)]
pub struct LoadedNotes {
    pub notes: Vec<Note>,
    pub skipped: Vec<String>,
    pub messages: Vec<CmdMessage>,
}

/// Loads every note file in name order. The first failure aborts, except
/// unknown note kinds when the config says to skip them.
pub fn load_notes<S: SourceStore>(
    source: &S,
    mapping: &FolderMapping,
    config: &MigrateConfig,
) -> Result<LoadedNotes> {
    let mut loaded = LoadedNotes::default();
    for name in source.list_note_files(&config.notes_marker)? {
        let raw = source.read_note_file(&name)?;
        match parse_note(&name, &raw, mapping, config.folder_filler) {
            Ok(note) => loaded.notes.push(note),
            Err(MigrateError::UnknownNoteKind { note, kind })
                if config.on_unknown_kind == FailurePolicy::Skip =>
            {
                log::warn!("skipping {}: unrecognized type {}", note, kind);
                loaded.messages.push(CmdMessage::warning(format!(
                    "Skipped {}: unrecognized note type '{}'",
                    note, kind
                )));
                loaded.skipped.push(note);
            }
            Err(e) => return Err(e),
        }
    }
    log::info!(
        "loaded {} note(s), skipped {}",
        loaded.notes.len(),
        loaded.skipped.len()
    );
    Ok(loaded)
}

/// Normalizes one note file. Markdown notes take `content`, snippet notes take
/// the content of their first snippet.
pub fn parse_note(
    name: &str,
    raw: &str,
    mapping: &FolderMapping,
    folder_filler: char,
) -> Result<Note> {
    let malformed = |message: String| MigrateError::MalformedNote {
        note: name.to_string(),
        message,
    };

    let value = cson::parse(raw).map_err(|e| malformed(e.to_string()))?;

    // Kind first: notes of unknown kinds may lack the other fields.
    let discriminator = value
        .get("type")
        .and_then(Value::as_str)
        .ok_or_else(|| malformed("note has no type field".to_string()))?;
    let kind = NoteKind::from_discriminator(discriminator).ok_or_else(|| {
        MigrateError::UnknownNoteKind {
            note: name.to_string(),
            kind: discriminator.to_string(),
        }
    })?;

    let raw_note: RawNote =
        serde_json::from_value(value).map_err(|e| malformed(e.to_string()))?;

    let display_name = mapping
        .get(&raw_note.folder)
        .ok_or_else(|| MigrateError::UnknownFolder {
            note: name.to_string(),
            folder: raw_note.folder.clone(),
        })?;
    let folder_name = folder_label(display_name, folder_filler).ok_or_else(|| {
        MigrateError::Manifest(format!(
            "folder '{}' has no usable name ('{}')",
            raw_note.folder, display_name
        ))
    })?;

    let content = match kind {
        NoteKind::Markdown => raw_note
            .content
            .ok_or_else(|| malformed("markdown note has no content field".to_string()))?,
        NoteKind::Snippet => raw_note
            .snippets
            .into_iter()
            .next()
            .map(|snippet| snippet.content)
            .ok_or_else(|| MigrateError::EmptySnippets(name.to_string()))?,
    };

    Ok(Note {
        source: name.to_string(),
        kind,
        folder_name,
        title: raw_note.title,
        content,
    })
}
