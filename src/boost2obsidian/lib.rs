//! # boost2obsidian Architecture
//!
//! boost2obsidian moves a Boostnote storage folder into an Obsidian vault: every
//! CSON note becomes a Markdown file in a folder named after its Boostnote
//! folder, and every `:storage/...` image it references is copied next to it
//! under a fresh UUID name, with the reference rewritten to match.
//!
//! Like any library with a CLI client, the migration itself knows nothing about
//! terminals.
//!
//! ## Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  CLI Layer (cli/, wired by main.rs)                         │
//! │  - Parses arguments, resolves config, prints results        │
//! │  - The ONLY place that knows about stdout/stderr/exit codes │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  API Layer (api.rs)                                         │
//! │  - Thin facade over commands, owns stores and config        │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Command Layer (commands/*.rs)                              │
//! │  - settings → folders → load → attachments/write → migrate  │
//! │  - Returns `CmdResult` with messages and a run report       │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Storage Layer (store/)                                     │
//! │  - SourceStore (Boostnote) / VaultStore (Obsidian) traits   │
//! │  - fs implementations, in-memory ones for tests             │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Run Model
//!
//! A migration is a single synchronous pass:
//! `Idle → SettingsCopied → MappingLoaded → NotesLoaded → NotesWritten → Done`.
//! Notes are processed in file-name order. Any error stops the run where it is;
//! nothing is rolled back.
//!
//! ## Module Overview
//!
//! - [`api`]: The API facade
//! - [`commands`]: One module per migration step
//! - [`store`]: Source and vault storage abstractions
//! - [`model`]: Notes, folder mapping, attachment references
//! - [`cson`]: Reader for Boostnote's CSON note files
//! - [`config`]: Run configuration
//! - [`logging`]: stderr diagnostics
//! - [`error`]: Error types

pub mod api;
pub mod commands;
pub mod config;
pub mod cson;
pub mod error;
pub mod logging;
pub mod model;
pub mod store;
