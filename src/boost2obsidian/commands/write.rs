use crate::commands::attachments::rewrite_content;
use crate::commands::{CmdMessage, WrittenNote};
use crate::config::MigrateConfig;
use crate::error::Result;
use crate::model::Note;
use crate::store::{SourceStore, VaultStore};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Directories already created during this run, so each is ensured once.
#[derive(Debug, Default)]
pub struct EnsuredDirs {
    seen: HashSet<PathBuf>,
}

impl EnsuredDirs {
    pub fn ensure<V: VaultStore>(&mut self, vault: &mut V, rel: &Path) -> Result<()> {
        if self.seen.contains(rel) {
            return Ok(());
        }
        vault.ensure_dir(rel)?;
        self.seen.insert(rel.to_path_buf());
        Ok(())
    }
}

/// Hands out synthetic file names for notes whose title cannot be used.
/// The counter runs across the whole migration.
#[derive(Debug, Default)]
pub struct NameAllocator {
    next: usize,
}

impl NameAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// File name (without `.md`) for a note, and whether it is synthetic.
    pub fn file_stem(&mut self, note: &Note, max_len: usize, filler: char) -> (String, bool) {
        let title = sanitize_title(&note.title, filler);
        if title.trim().is_empty() || title.chars().count() > max_len {
            let name = format!("{}{}", note.folder_name, self.next);
            self.next += 1;
            return (name, true);
        }
        (title, false)
    }
}

/// Replaces characters that cannot appear in a file name.
fn sanitize_title(title: &str, filler: char) -> String {
    title
        .chars()
        .map(|c| match c {
            ':' | '/' | '\\' => filler,
            c => c,
        })
        .collect()
}

/// Rewrites a note's attachments and writes it to `<folder>/<name>.md`,
/// replacing any file already there.
pub fn write_note<S: SourceStore, V: VaultStore>(
    note: &Note,
    source: &S,
    vault: &mut V,
    dirs: &mut EnsuredDirs,
    names: &mut NameAllocator,
    config: &MigrateConfig,
) -> Result<(WrittenNote, Vec<CmdMessage>)> {
    let folder = Path::new(&note.folder_name);
    dirs.ensure(vault, folder)?;

    let outcome = rewrite_content(note, source, vault, dirs, config.on_missing_attachment)?;
    let mut messages = outcome.messages;

    let (stem, synthetic) = names.file_stem(note, config.max_title_len, config.title_filler);
    if synthetic {
        log::warn!("{}: title unusable as file name, writing {}.md", note.source, stem);
        messages.push(CmdMessage::warning(format!(
            "{}: title too long or empty, saved as {}.md",
            note.source, stem
        )));
    }

    let path = folder.join(format!("{}.md", stem));
    vault.write_file(&path, outcome.content.as_bytes())?;
    log::debug!("wrote {}", vault.resolve(&path).display());

    Ok((
        WrittenNote {
            source: note.source.clone(),
            path,
            attachments: outcome.copied,
        },
        messages,
    ))
}
