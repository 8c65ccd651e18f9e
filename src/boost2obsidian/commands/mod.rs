use crate::model::{AttachmentRef, FolderMapping, Note};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::PathBuf;

pub mod attachments;
pub mod folders;
pub mod inspect;
pub mod load;
pub mod migrate;
pub mod settings;
pub mod write;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageLevel {
    Info,
    Success,
    Warning,
}

#[derive(Debug, Clone)]
pub struct CmdMessage {
    pub level: MessageLevel,
    pub content: String,
}

impl CmdMessage {
    pub fn info(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Info,
            content: content.into(),
        }
    }

    pub fn success(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Success,
            content: content.into(),
        }
    }

    pub fn warning(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Warning,
            content: content.into(),
        }
    }
}

/// Linear progress of a migration run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum Stage {
    #[default]
    Idle,
    SettingsCopied,
    MappingLoaded,
    NotesLoaded,
    NotesWritten,
    Done,
}

/// One note written to the vault.
#[derive(Debug, Clone, Serialize)]
pub struct WrittenNote {
    pub source: String,
    pub path: PathBuf,
    pub attachments: Vec<PathBuf>,
}

/// Summary of a migration run, serializable for `--report`.
#[derive(Debug, Clone, Serialize)]
pub struct MigrationReport {
    pub stage: Stage,
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
    pub settings_copied: usize,
    pub notes: Vec<WrittenNote>,
    pub skipped_notes: Vec<String>,
}

impl Default for MigrationReport {
    fn default() -> Self {
        Self {
            stage: Stage::Idle,
            started_at: Utc::now(),
            finished_at: None,
            settings_copied: 0,
            notes: Vec::new(),
            skipped_notes: Vec::new(),
        }
    }
}

impl MigrationReport {
    pub fn attachments_copied(&self) -> usize {
        self.notes.iter().map(|n| n.attachments.len()).sum()
    }
}

/// A note as it would be migrated, without touching the vault.
#[derive(Debug, Clone, Serialize)]
pub struct PlannedNote {
    pub note: Note,
    pub path: PathBuf,
    pub attachments: Vec<AttachmentRef>,
}

#[derive(Debug, Default)]
pub struct CmdResult {
    pub report: Option<MigrationReport>,
    pub folders: Option<FolderMapping>,
    pub planned: Vec<PlannedNote>,
    pub messages: Vec<CmdMessage>,
}

impl CmdResult {
    pub fn add_message(&mut self, message: CmdMessage) {
        self.messages.push(message);
    }

    pub fn with_report(mut self, report: MigrationReport) -> Self {
        self.report = Some(report);
        self
    }

    pub fn with_folders(mut self, folders: FolderMapping) -> Self {
        self.folders = Some(folders);
        self
    }

    pub fn with_planned(mut self, planned: Vec<PlannedNote>) -> Self {
        self.planned = planned;
        self
    }
}
