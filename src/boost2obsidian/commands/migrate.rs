use crate::commands::folders::load_mapping;
use crate::commands::load::load_notes;
use crate::commands::settings::copy_settings;
use crate::commands::write::{write_note, EnsuredDirs, NameAllocator};
use crate::commands::{CmdMessage, CmdResult, MigrationReport, Stage};
use crate::config::MigrateConfig;
use crate::error::Result;
use crate::store::{SourceStore, VaultStore};
use chrono::Utc;
use std::path::Path;

/// Runs a full migration: settings, folder mapping, every note.
///
/// Strictly sequential and fail-fast: the first error aborts the run and
/// leaves whatever was already written in the vault.
pub fn run<S: SourceStore, V: VaultStore>(
    source: &S,
    vault: &mut V,
    config: &MigrateConfig,
) -> Result<CmdResult> {
    let mut result = CmdResult::default();
    let mut report = MigrationReport::default();

    report.settings_copied = copy_settings(vault, config.settings_dir.as_deref())?;
    advance(&mut report, Stage::SettingsCopied);

    let mapping = load_mapping(source)?;
    advance(&mut report, Stage::MappingLoaded);

    let loaded = load_notes(source, &mapping, config)?;
    report.skipped_notes = loaded.skipped;
    result.messages.extend(loaded.messages);
    advance(&mut report, Stage::NotesLoaded);

    let mut dirs = EnsuredDirs::default();
    let mut names = NameAllocator::new();
    for note in &loaded.notes {
        let (written, messages) = write_note(note, source, vault, &mut dirs, &mut names, config)?;
        result.messages.extend(messages);
        report.notes.push(written);
    }
    advance(&mut report, Stage::NotesWritten);

    report.finished_at = Some(Utc::now());
    advance(&mut report, Stage::Done);

    result.add_message(CmdMessage::success(format!(
        "Migrated {} note(s) and {} attachment(s) into {}",
        report.notes.len(),
        report.attachments_copied(),
        vault.resolve(Path::new("")).display()
    )));
    if !report.skipped_notes.is_empty() {
        result.add_message(CmdMessage::warning(format!(
            "Skipped {} note(s)",
            report.skipped_notes.len()
        )));
    }
    Ok(result.with_report(report))
}

fn advance(report: &mut MigrationReport, stage: Stage) {
    log::info!("stage {:?} -> {:?}", report.stage, stage);
    report.stage = stage;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FailurePolicy;
    use crate::error::MigrateError;
    use crate::store::memory::fixtures::{markdown_note, snippet_note, trip_source, MANIFEST};
    use crate::store::memory::{MemorySource, MemoryVault};
    use std::path::PathBuf;

    #[test]
    fn test_trip_scenario() {
        let source = trip_source();
        let mut vault = MemoryVault::new();

        let result = run(&source, &mut vault, &MigrateConfig::default()).unwrap();
        let report = result.report.unwrap();

        assert_eq!(report.stage, Stage::Done);
        assert!(report.finished_at.is_some());
        assert_eq!(report.notes.len(), 1);
        assert_eq!(report.notes[0].path, PathBuf::from("My_Trips/Trip.md"));

        let attachment = &report.notes[0].attachments[0];
        assert_eq!(attachment.parent().unwrap(), Path::new("My_Trips/attachments"));
        assert_eq!(vault.file(attachment).unwrap(), &[0x89, b'P', b'N', b'G']);

        let name = attachment.file_name().unwrap().to_string_lossy().into_owned();
        let uuid_part = name.strip_suffix(".png").unwrap();
        assert!(uuid::Uuid::parse_str(uuid_part).is_ok());
        assert_eq!(
            vault.file_text("My_Trips/Trip.md").unwrap(),
            format!("![beach](My_Trips/attachments/{})", name)
        );
        assert!(vault.file(".obsidian/app.json").is_some());
    }

    #[test]
    fn test_snippet_content_from_first_snippet() {
        let source = MemorySource::new()
            .with_manifest(MANIFEST)
            .with_note("s.cson", snippet_note("f2", "Shell", "ls -la"));
        let mut vault = MemoryVault::new();

        run(&source, &mut vault, &MigrateConfig::default()).unwrap();
        assert_eq!(vault.file_text("Work/Shell.md").unwrap(), "ls -la");
    }

    #[test]
    fn test_attachment_names_unique_across_notes() {
        let source = MemorySource::new()
            .with_manifest(MANIFEST)
            .with_note("a.cson", markdown_note("f1", "A", "![x](:storage/s/pic.png)"))
            .with_note("b.cson", markdown_note("f1", "B", "![y](:storage/t/pic.png)"))
            .with_attachment("s", "pic.png", b"one".to_vec())
            .with_attachment("t", "pic.png", b"two".to_vec());
        let mut vault = MemoryVault::new();

        let report = run(&source, &mut vault, &MigrateConfig::default())
            .unwrap()
            .report
            .unwrap();

        let a = &report.notes[0].attachments[0];
        let b = &report.notes[1].attachments[0];
        assert_ne!(a, b);
        assert_eq!(vault.file(a).unwrap(), b"one");
        assert_eq!(vault.file(b).unwrap(), b"two");
        assert_eq!(report.attachments_copied(), 2);
    }

    #[test]
    fn test_long_title_counter_spans_notes() {
        let long = "t".repeat(300);
        let source = MemorySource::new()
            .with_manifest(MANIFEST)
            .with_note("a.cson", markdown_note("f1", &long, "first"))
            .with_note("b.cson", markdown_note("f2", &long, "second"))
            .with_note("c.cson", markdown_note("f1", &long, "third"));
        let mut vault = MemoryVault::new();

        run(&source, &mut vault, &MigrateConfig::default()).unwrap();

        assert_eq!(vault.file_text("My_Trips/My_Trips0.md").unwrap(), "first");
        assert_eq!(vault.file_text("Work/Work1.md").unwrap(), "second");
        assert_eq!(vault.file_text("My_Trips/My_Trips2.md").unwrap(), "third");
    }

    #[test]
    fn test_unknown_folder_aborts_run() {
        let source = MemorySource::new()
            .with_manifest(MANIFEST)
            .with_note("a.cson", markdown_note("f1", "Fine", "ok"))
            .with_note("b.cson", markdown_note("zz", "Broken", "ok"));
        let mut vault = MemoryVault::new();

        let err = run(&source, &mut vault, &MigrateConfig::default()).unwrap_err();
        assert!(matches!(err, MigrateError::UnknownFolder { .. }));
        // Loading happens before writing, so nothing was written yet.
        assert!(vault.file("My_Trips/Fine.md").is_none());
        assert!(vault.file(".obsidian/app.json").is_some());
    }

    #[test]
    fn test_missing_attachment_aborts_midway() {
        let source = MemorySource::new()
            .with_manifest(MANIFEST)
            .with_note("a.cson", markdown_note("f1", "First", "plain"))
            .with_note("b.cson", markdown_note("f1", "Second", "![x](:storage/s/gone.png)"));
        let mut vault = MemoryVault::new();

        let err = run(&source, &mut vault, &MigrateConfig::default()).unwrap_err();
        assert!(matches!(err, MigrateError::AttachmentNotFound(_)));
        assert_eq!(vault.file_text("My_Trips/First.md").unwrap(), "plain");
        assert!(vault.file("My_Trips/Second.md").is_none());
    }

    #[test]
    fn test_skip_policies_complete_the_run() {
        let source = MemorySource::new()
            .with_manifest(MANIFEST)
            .with_note("a.cson", "type: \"TODO_NOTE\"\nfolder: \"f1\"\n")
            .with_note("b.cson", markdown_note("f1", "Kept", "![x](:storage/s/gone.png)"));
        let mut vault = MemoryVault::new();
        let config = MigrateConfig {
            on_unknown_kind: FailurePolicy::Skip,
            on_missing_attachment: FailurePolicy::Skip,
            ..MigrateConfig::default()
        };

        let result = run(&source, &mut vault, &config).unwrap();
        let report = result.report.as_ref().unwrap();

        assert_eq!(report.skipped_notes, vec!["a.cson"]);
        assert_eq!(
            vault.file_text("My_Trips/Kept.md").unwrap(),
            "![x](:storage/s/gone.png)"
        );
        assert!(result
            .messages
            .iter()
            .any(|m| m.content.contains("Skipped 1 note(s)")));
    }

    #[test]
    fn test_missing_manifest_aborts_after_settings() {
        let source = MemorySource::new().with_note("a.cson", markdown_note("f1", "A", "x"));
        let mut vault = MemoryVault::new();

        let err = run(&source, &mut vault, &MigrateConfig::default()).unwrap_err();
        assert!(matches!(err, MigrateError::Manifest(_)));
        assert!(vault.file(".obsidian/app.json").is_some());
    }

    #[test]
    fn test_folder_names_stay_inside_vault() {
        let source = MemorySource::new()
            .with_manifest(r#"{ "folders": [ { "key": "u", "name": "../outside" } ] }"#)
            .with_note("b.cson", markdown_note("u", "B", "body"));
        let mut vault = MemoryVault::new();

        run(&source, &mut vault, &MigrateConfig::default()).unwrap();

        assert!(vault.file(".._outside/B.md").is_some());
        assert!(vault.files().all(|path| !path.starts_with("..")));
    }
}
