//! # CLI Layer
//!
//! One client of the library. This is the only place that parses arguments,
//! prints to the terminal, and decides the process exit code.
//!
//! - `setup.rs`: clap definitions and the version string
//! - `commands.rs`: config resolution, context wiring, per-command handlers
//! - `print.rs`: turns `CmdResult` values into terminal output

mod commands;
mod print;
mod setup;

pub use commands::run;
