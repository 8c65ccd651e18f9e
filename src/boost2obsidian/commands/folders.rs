use crate::commands::{CmdMessage, CmdResult};
use crate::error::{MigrateError, Result};
use crate::model::{FolderMapping, Manifest};
use crate::store::SourceStore;

pub fn run<S: SourceStore>(source: &S) -> Result<CmdResult> {
    let mapping = load_mapping(source)?;
    let mut result = CmdResult::default();
    result.add_message(CmdMessage::info(format!(
        "{} folder(s) in manifest",
        mapping.len()
    )));
    Ok(result.with_folders(mapping))
}

/// Reads the manifest and maps each folder key to its display name.
pub fn load_mapping<S: SourceStore>(source: &S) -> Result<FolderMapping> {
    let raw = source.read_manifest()?;
    parse_manifest(&raw)
}

pub fn parse_manifest(raw: &str) -> Result<FolderMapping> {
    let value: serde_json::Value = serde_json::from_str(raw)
        .map_err(|e| MigrateError::Manifest(format!("not valid JSON: {}", e)))?;
    if !value.get("folders").is_some_and(|f| f.is_array()) {
        return Err(MigrateError::Manifest(
            "missing top-level \"folders\" array".to_string(),
        ));
    }
    let manifest: Manifest = serde_json::from_value(value)
        .map_err(|e| MigrateError::Manifest(format!("invalid folder entry: {}", e)))?;
    Ok(FolderMapping::from_manifest(manifest))
}
