//! Process-wide logging bootstrap.
//!
//! Diagnostics go through the `log` facade to stderr via `flexi_logger`, so they
//! never mix with the migration summary printed on stdout.
//!
//! # Invariants
//! - Initialization happens at most once per process; later calls are no-ops
//!   when the level matches and errors otherwise.
//! - `RUST_LOG`, when set, takes precedence over the requested level.

use crate::error::{MigrateError, Result};
use flexi_logger::{Logger, LoggerHandle};
use once_cell::sync::OnceCell;

static LOGGING_STATE: OnceCell<LoggingState> = OnceCell::new();

struct LoggingState {
    level: &'static str,
    _logger: LoggerHandle,
}

const SUPPORTED_LEVELS: [&str; 6] = ["off", "error", "warn", "info", "debug", "trace"];

/// Maps `-v` repetitions to a level: none → warn, one → info, more → debug.
pub fn level_for_verbosity(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    }
}

pub fn normalize_level(level: &str) -> Result<&'static str> {
    let lowered = level.trim().to_ascii_lowercase();
    SUPPORTED_LEVELS
        .iter()
        .find(|l| **l == lowered)
        .copied()
        .ok_or_else(|| MigrateError::Logging(format!("unsupported log level `{}`", level)))
}

pub fn init_logging(level: &str) -> Result<()> {
    let level = normalize_level(level)?;

    if let Some(state) = LOGGING_STATE.get() {
        if state.level != level {
            return Err(MigrateError::Logging(format!(
                "logging already initialized with level `{}`; refusing to switch to `{}`",
                state.level, level
            )));
        }
        return Ok(());
    }

    LOGGING_STATE.get_or_try_init(|| -> Result<LoggingState> {
        let logger = Logger::try_with_env_or_str(level)
            .map_err(|e| MigrateError::Logging(format!("invalid log level `{}`: {}", level, e)))?
            .format(flexi_logger::default_format)
            .start()
            .map_err(|e| MigrateError::Logging(format!("failed to start logger: {}", e)))?;

        log::debug!(
            "logging started level={} version={}",
            level,
            env!("CARGO_PKG_VERSION")
        );
        Ok(LoggingState {
            level,
            _logger: logger,
        })
    })?;
    Ok(())
}
