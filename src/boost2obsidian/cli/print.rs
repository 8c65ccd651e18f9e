use boost2obsidian::api::{CmdMessage, MessageLevel, MigrationReport, PlannedNote};
use boost2obsidian::model::{folder_label, FolderMapping};
use colored::Colorize;

pub(super) fn print_messages(messages: &[CmdMessage]) {
    for message in messages {
        match message.level {
            MessageLevel::Info => println!("{}", message.content.dimmed()),
            MessageLevel::Success => println!("{}", message.content.green()),
            MessageLevel::Warning => println!("{}", message.content.yellow()),
        }
    }
}

pub(super) fn print_report(report: &MigrationReport) {
    for note in &report.notes {
        let attachments = match note.attachments.len() {
            0 => String::new(),
            n => format!(" (+{} attachment{})", n, if n == 1 { "" } else { "s" }),
        };
        println!(
            "  {} {} {}{}",
            note.source.dimmed(),
            "→".dimmed(),
            note.path.display(),
            attachments.dimmed()
        );
    }
    for skipped in &report.skipped_notes {
        println!("  {} {}", skipped.dimmed(), "skipped".yellow());
    }
    if let Some(finished) = report.finished_at {
        let elapsed = finished.signed_duration_since(report.started_at);
        println!(
            "{}",
            format!("Finished in {} ms", elapsed.num_milliseconds()).dimmed()
        );
    }
}

pub(super) fn print_folders(mapping: &FolderMapping, filler: char) {
    if mapping.is_empty() {
        println!("No folders found.");
        return;
    }
    let key_width = mapping
        .entries()
        .iter()
        .map(|(k, _)| k.chars().count())
        .max()
        .unwrap_or(0);
    for (key, name) in mapping.entries() {
        let padded_key = format!("{:<width$}", key, width = key_width);
        println!(
            "{}  {}  {}",
            padded_key.yellow(),
            name.bold(),
            folder_label(name, filler).unwrap_or_default().dimmed()
        );
    }
}

pub(super) fn print_planned(planned: &[PlannedNote]) {
    if planned.is_empty() {
        println!("No notes found.");
        return;
    }
    for plan in planned {
        println!(
            "{} [{}] {}",
            plan.note.source.yellow(),
            plan.note.kind,
            plan.path.display()
        );
        for reference in &plan.attachments {
            println!(
                "    {} {}/{}",
                "↳".dimmed(),
                reference.sub_folder,
                reference.file_name
            );
        }
    }
}
