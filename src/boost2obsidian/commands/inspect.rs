use crate::commands::attachments::find_references;
use crate::commands::folders::load_mapping;
use crate::commands::load::load_notes;
use crate::commands::write::NameAllocator;
use crate::commands::{CmdMessage, CmdResult, PlannedNote};
use crate::config::MigrateConfig;
use crate::error::Result;
use crate::store::SourceStore;
use std::path::Path;

/// Lists what a migration would write, in the same order, without writing.
pub fn run<S: SourceStore>(source: &S, config: &MigrateConfig) -> Result<CmdResult> {
    let mapping = load_mapping(source)?;
    let loaded = load_notes(source, &mapping, config)?;

    let mut result = CmdResult::default();
    result.messages.extend(loaded.messages);

    let mut names = NameAllocator::new();
    let mut planned = Vec::with_capacity(loaded.notes.len());
    for note in loaded.notes {
        let (stem, _) = names.file_stem(&note, config.max_title_len, config.title_filler);
        let path = Path::new(&note.folder_name).join(format!("{}.md", stem));
        let attachments = find_references(&note.content);
        planned.push(PlannedNote {
            note,
            path,
            attachments,
        });
    }

    let attachment_count: usize = planned.iter().map(|p| p.attachments.len()).sum();
    result.add_message(CmdMessage::info(format!(
        "{} note(s), {} attachment reference(s)",
        planned.len(),
        attachment_count
    )));
    Ok(result.with_planned(planned))
}
