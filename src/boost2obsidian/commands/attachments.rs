//! # Attachment Rewriting
//!
//! Boostnote references images stored next to its notes with a pseudo-URL:
//!
//! ```text
//! ![beach](:storage/abc/pic.png)
//!          └──────┘ └─┘ └─────┘
//!           marker  sub  file
//! ```
//!
//! For every such line the referenced file is copied from
//! `<source>/attachments/<sub>/<file>` into `<Folder>/attachments/<uuid>.<ext>`
//! inside the vault and the line is replaced with a vault-relative image link:
//!
//! ```text
//! ![beach](My_Trips/attachments/5f0c…e1.png)
//! ```
//!
//! A line is either rewritten as a whole or passed through untouched. Text
//! around the reference on the same line is not kept. Lines that mention the
//! marker but do not match the full pattern are reported and left alone.

use crate::commands::write::EnsuredDirs;
use crate::commands::CmdMessage;
use crate::config::FailurePolicy;
use crate::error::{MigrateError, Result};
use crate::model::{AttachmentRef, Note};
use crate::store::{SourceStore, VaultStore, ATTACHMENTS_DIR};
use once_cell::sync::Lazy;
use regex::{Regex, RegexBuilder};
use std::path::{Path, PathBuf};
use uuid::Uuid;

pub const STORAGE_MARKER: &str = ":storage";

static ATTACHMENT_PATTERN: Lazy<Regex> = Lazy::new(|| {
    RegexBuilder::new(r"^(.*?!\[)(.*)(\]\(:storage[/\\])(.*)([/\\])(.*\.(png|gif|jpg|jpeg))(\))")
        .case_insensitive(true)
        .build()
        .expect("attachment pattern must compile")
});

/// What a single line of note content holds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineMatch {
    /// No storage marker, pass through
    Plain,
    Reference(AttachmentRef),
    /// Storage marker present but not a recognizable image reference
    Unparseable,
}

pub fn scan_line(line: &str) -> LineMatch {
    if !line.to_lowercase().contains(STORAGE_MARKER) {
        return LineMatch::Plain;
    }
    match ATTACHMENT_PATTERN.captures(line) {
        Some(caps) => LineMatch::Reference(AttachmentRef {
            alt_text: caps[2].to_string(),
            sub_folder: caps[4].to_string(),
            file_name: caps[6].to_string(),
        }),
        None => LineMatch::Unparseable,
    }
}

/// Every attachment reference in `content`, in line order.
pub fn find_references(content: &str) -> Vec<AttachmentRef> {
    content
        .split('\n')
        .filter_map(|line| match scan_line(line) {
            LineMatch::Reference(reference) => Some(reference),
            _ => None,
        })
        .collect()
}

#[derive(Debug, Default)]
pub struct RewriteOutcome {
    pub content: String,
    /// Vault-relative paths of the copied attachments
    pub copied: Vec<PathBuf>,
    pub messages: Vec<CmdMessage>,
}

/// Rewrites all attachment lines of a note, copying each referenced file into
/// the note folder's `attachments/` directory under a fresh UUID name.
pub fn rewrite_content<S: SourceStore, V: VaultStore>(
    note: &Note,
    source: &S,
    vault: &mut V,
    dirs: &mut EnsuredDirs,
    on_missing: FailurePolicy,
) -> Result<RewriteOutcome> {
    let mut outcome = RewriteOutcome::default();
    let mut lines = Vec::new();
    let mut marker_lines = 0;

    for (index, line) in note.content.split('\n').enumerate() {
        let reference = match scan_line(line) {
            LineMatch::Plain => {
                lines.push(line.to_string());
                continue;
            }
            LineMatch::Unparseable => {
                marker_lines += 1;
                log::warn!("{}:{} unrecognized storage reference", note.source, index + 1);
                outcome.messages.push(CmdMessage::warning(format!(
                    "{} line {}: storage reference not recognized, left unchanged",
                    note.source,
                    index + 1
                )));
                lines.push(line.to_string());
                continue;
            }
            LineMatch::Reference(reference) => {
                marker_lines += 1;
                reference
            }
        };

        match relocate(&reference, note, source, vault, dirs) {
            Ok(rel) => {
                lines.push(replacement_line(&reference, &rel));
                outcome.copied.push(rel);
            }
            Err(MigrateError::AttachmentNotFound(path)) if on_missing == FailurePolicy::Skip => {
                log::warn!("{}: missing attachment {}", note.source, path.display());
                outcome.messages.push(CmdMessage::warning(format!(
                    "{} line {}: attachment {} not found, left unchanged",
                    note.source,
                    index + 1,
                    path.display()
                )));
                lines.push(line.to_string());
            }
            Err(e) => return Err(e),
        }
    }

    log::debug!(
        "{}: {} storage line(s), {} attachment(s) copied",
        note.source,
        marker_lines,
        outcome.copied.len()
    );
    outcome.content = lines.join("\n");
    Ok(outcome)
}

/// Copies one attachment and returns its vault-relative path.
fn relocate<S: SourceStore, V: VaultStore>(
    reference: &AttachmentRef,
    note: &Note,
    source: &S,
    vault: &mut V,
    dirs: &mut EnsuredDirs,
) -> Result<PathBuf> {
    let bytes = source.read_attachment(&reference.sub_folder, &reference.file_name)?;

    let attachments_dir = Path::new(&note.folder_name).join(ATTACHMENTS_DIR);
    dirs.ensure(vault, &attachments_dir)?;

    let new_name = format!("{}.{}", Uuid::new_v4(), reference.extension());
    let rel = attachments_dir.join(new_name);
    vault.write_file(&rel, &bytes)?;
    Ok(rel)
}

fn replacement_line(reference: &AttachmentRef, rel: &Path) -> String {
    let link = rel
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/");
    format!("![{}]({})", reference.alt_text, link)
}
