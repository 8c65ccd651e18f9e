//! # API Facade
//!
//! The API layer is a **thin facade** over the command layer and the single
//! entry point for all migration operations, whatever the UI.
//!
//! It dispatches to the command functions and returns `Result<CmdResult>`.
//! It holds no business logic and performs no terminal I/O.
//!
//! ## Generic Over Stores
//!
//! `MigrateApi<S: SourceStore, V: VaultStore>`:
//! - Production: `MigrateApi<FsSource, FsVault>`
//! - Testing: `MigrateApi<MemorySource, MemoryVault>`

use crate::commands;
use crate::config::MigrateConfig;
use crate::error::Result;
use crate::store::{SourceStore, VaultStore};

pub use crate::commands::{
    CmdMessage, CmdResult, MessageLevel, MigrationReport, PlannedNote, Stage, WrittenNote,
};

pub struct MigrateApi<S: SourceStore, V: VaultStore> {
    source: S,
    vault: V,
    config: MigrateConfig,
}

impl<S: SourceStore, V: VaultStore> MigrateApi<S, V> {
    pub fn new(source: S, vault: V, config: MigrateConfig) -> Self {
        Self {
            source,
            vault,
            config,
        }
    }

    pub fn config(&self) -> &MigrateConfig {
        &self.config
    }

    pub fn vault(&self) -> &V {
        &self.vault
    }

    pub fn migrate(&mut self) -> Result<CmdResult> {
        commands::migrate::run(&self.source, &mut self.vault, &self.config)
    }

    pub fn folders(&self) -> Result<CmdResult> {
        commands::folders::run(&self.source)
    }

    pub fn inspect(&self) -> Result<CmdResult> {
        commands::inspect::run(&self.source, &self.config)
    }

    pub fn seed_settings(&mut self) -> Result<CmdResult> {
        commands::settings::run(&mut self.vault, self.config.settings_dir.as_deref())
    }
}
