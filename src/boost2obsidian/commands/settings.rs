use crate::commands::{CmdMessage, CmdResult};
use crate::error::{MigrateError, Result};
use crate::store::{VaultStore, SETTINGS_DIR};
use std::fs;
use std::path::Path;

/// Settings copied into every new vault when no settings directory is configured.
pub const BUNDLED_SETTINGS: &[(&str, &str)] = &[
    (
        "app.json",
        include_str!("../../../default_configuration/.obsidian/app.json"),
    ),
    (
        "appearance.json",
        include_str!("../../../default_configuration/.obsidian/appearance.json"),
    ),
    (
        "core-plugins.json",
        include_str!("../../../default_configuration/.obsidian/core-plugins.json"),
    ),
];

pub fn run<V: VaultStore>(vault: &mut V, settings_dir: Option<&Path>) -> Result<CmdResult> {
    let copied = copy_settings(vault, settings_dir)?;
    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!(
        "Copied {} settings file(s) into {}",
        copied,
        vault.resolve(Path::new(SETTINGS_DIR)).display()
    )));
    Ok(result)
}

/// Flat copy into `.obsidian/`, overwriting. Subdirectories of `settings_dir`
/// are not descended into. Returns the number of files copied.
pub fn copy_settings<V: VaultStore>(vault: &mut V, settings_dir: Option<&Path>) -> Result<usize> {
    let target = Path::new(SETTINGS_DIR);
    vault.ensure_dir(target)?;

    match settings_dir {
        None => {
            for (name, content) in BUNDLED_SETTINGS {
                vault.write_file(&target.join(name), content.as_bytes())?;
            }
            Ok(BUNDLED_SETTINGS.len())
        }
        Some(dir) => {
            if !dir.is_dir() {
                return Err(MigrateError::Config(format!(
                    "settings directory {} does not exist",
                    dir.display()
                )));
            }
            let mut files = Vec::new();
            for entry in fs::read_dir(dir).map_err(MigrateError::Io)? {
                let path = entry.map_err(MigrateError::Io)?.path();
                if path.is_file() {
                    files.push(path);
                }
            }
            files.sort();
            for path in &files {
                let bytes = fs::read(path).map_err(MigrateError::Io)?;
                if let Some(name) = path.file_name() {
                    vault.write_file(&target.join(name), &bytes)?;
                }
            }
            Ok(files.len())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::MemoryVault;
    use tempfile::TempDir;

    #[test]
    fn test_bundled_settings_are_copied() {
        let mut vault = MemoryVault::new();
        let copied = copy_settings(&mut vault, None).unwrap();

        assert_eq!(copied, BUNDLED_SETTINGS.len());
        assert!(vault.has_dir(".obsidian"));
        let app = vault.file_text(".obsidian/app.json").unwrap();
        assert!(app.contains("attachmentFolderPath"));
    }

    #[test]
    fn test_bundled_settings_are_valid_json() {
        for (name, content) in BUNDLED_SETTINGS {
            assert!(
                serde_json::from_str::<serde_json::Value>(content).is_ok(),
                "{} is not valid JSON",
                name
            );
        }
    }

    #[test]
    fn test_settings_dir_flat_copy() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("app.json"), "{}").unwrap();
        fs::write(dir.path().join("hotkeys.json"), "[]").unwrap();
        fs::create_dir(dir.path().join("plugins")).unwrap();
        fs::write(dir.path().join("plugins/ignored.json"), "{}").unwrap();

        let mut vault = MemoryVault::new();
        let result = run(&mut vault, Some(dir.path())).unwrap();

        assert_eq!(vault.file_text(".obsidian/app.json").unwrap(), "{}");
        assert_eq!(vault.file_text(".obsidian/hotkeys.json").unwrap(), "[]");
        assert!(vault.file(".obsidian/plugins/ignored.json").is_none());
        assert!(result.messages[0].content.contains("Copied 2 settings file(s)"));
    }

    #[test]
    fn test_missing_settings_dir_is_error() {
        let dir = TempDir::new().unwrap();
        let mut vault = MemoryVault::new();
        let err = copy_settings(&mut vault, Some(&dir.path().join("absent"))).unwrap_err();
        assert!(matches!(err, MigrateError::Config(_)));
    }
}
