use crate::error::{MigrateError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const CONFIG_FILENAME: &str = "boost2obsidian.json";
const DEFAULT_NOTES_MARKER: &str = ".cson";
const DEFAULT_MAX_TITLE_LEN: usize = 290;

/// What to do when a note or attachment cannot be converted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FailurePolicy {
    /// Abort the run
    #[default]
    Error,
    /// Warn and carry on
    Skip,
}

/// Configuration for a migration run, stored as boost2obsidian.json
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MigrateConfig {
    /// Boostnote storage folder
    #[serde(default)]
    pub source: Option<PathBuf>,

    /// Obsidian vault to write into
    #[serde(default)]
    pub destination: Option<PathBuf>,

    /// Substring a file name in notes/ must contain to be read as a note
    #[serde(default = "default_notes_marker")]
    pub notes_marker: String,

    /// Titles longer than this (in characters) get a synthetic file name
    #[serde(default = "default_max_title_len")]
    pub max_title_len: usize,

    /// Replaces whitespace in folder names
    #[serde(default = "default_folder_filler")]
    pub folder_filler: char,

    /// Replaces ':' in note titles
    #[serde(default = "default_title_filler")]
    pub title_filler: char,

    /// Directory to copy into .obsidian/ instead of the bundled settings
    #[serde(default)]
    pub settings_dir: Option<PathBuf>,

    #[serde(default)]
    pub on_unknown_kind: FailurePolicy,

    #[serde(default)]
    pub on_missing_attachment: FailurePolicy,
}

fn default_notes_marker() -> String {
    DEFAULT_NOTES_MARKER.to_string()
}

fn default_max_title_len() -> usize {
    DEFAULT_MAX_TITLE_LEN
}

fn default_folder_filler() -> char {
    '_'
}

fn default_title_filler() -> char {
    ' '
}

impl Default for MigrateConfig {
    fn default() -> Self {
        Self {
            source: None,
            destination: None,
            notes_marker: default_notes_marker(),
            max_title_len: DEFAULT_MAX_TITLE_LEN,
            folder_filler: default_folder_filler(),
            title_filler: default_title_filler(),
            settings_dir: None,
            on_unknown_kind: FailurePolicy::Error,
            on_missing_attachment: FailurePolicy::Error,
        }
    }
}

impl MigrateConfig {
    /// Load config from the given directory, or return defaults if not found
    pub fn load<P: AsRef<Path>>(config_dir: P) -> Result<Self> {
        let config_path = config_dir.as_ref().join(CONFIG_FILENAME);
        if !config_path.exists() {
            return Ok(Self::default());
        }
        Self::load_file(config_path)
    }

    /// Load config from an explicit file. A missing file is an error here.
    pub fn load_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            MigrateError::Config(format!("cannot read {}: {}", path.display(), e))
        })?;
        let config: MigrateConfig =
            serde_json::from_str(&content).map_err(MigrateError::Serialization)?;
        config.validate()?;
        Ok(config)
    }

    /// Save config to the given directory
    pub fn save<P: AsRef<Path>>(&self, config_dir: P) -> Result<()> {
        let config_dir = config_dir.as_ref();

        if !config_dir.exists() {
            fs::create_dir_all(config_dir).map_err(MigrateError::Io)?;
        }

        let config_path = config_dir.join(CONFIG_FILENAME);
        let content = serde_json::to_string_pretty(self).map_err(MigrateError::Serialization)?;
        fs::write(config_path, content).map_err(MigrateError::Io)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.notes_marker.is_empty() {
            return Err(MigrateError::Config("notes_marker cannot be empty".into()));
        }
        if self.max_title_len == 0 {
            return Err(MigrateError::Config(
                "max_title_len must be greater than zero".into(),
            ));
        }
        if is_path_unsafe(self.folder_filler) || is_path_unsafe(self.title_filler) {
            return Err(MigrateError::Config(
                "fillers cannot be path separators or ':'".into(),
            ));
        }
        Ok(())
    }
}

fn is_path_unsafe(c: char) -> bool {
    matches!(c, '/' | '\\' | ':')
}
