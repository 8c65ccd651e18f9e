use super::print::{print_folders, print_messages, print_planned, print_report};
use super::setup::{Cli, Commands};
use boost2obsidian::api::MigrateApi;
use boost2obsidian::config::{FailurePolicy, MigrateConfig};
use boost2obsidian::error::{MigrateError, Result};
use boost2obsidian::logging::{init_logging, level_for_verbosity};
use boost2obsidian::store::fs::{FsSource, FsVault};
use clap::Parser;
use directories::ProjectDirs;
use std::fs;
use std::path::{Path, PathBuf};

const CONFIG_DIR_ENV: &str = "BOOST2OBSIDIAN_CONFIG_DIR";

pub fn run() -> Result<()> {
    let cli = Cli::parse();

    let level = match &cli.log_level {
        Some(level) => level.as_str(),
        None => level_for_verbosity(cli.verbose),
    };
    init_logging(level)?;

    let mut config = load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Migrate {
            source,
            destination,
            report,
            settings_dir,
            max_title_len,
            skip_unknown_kinds,
            skip_missing_attachments,
        } => {
            if let Some(dir) = settings_dir {
                config.settings_dir = Some(dir);
            }
            if let Some(len) = max_title_len {
                config.max_title_len = len;
            }
            if skip_unknown_kinds {
                config.on_unknown_kind = FailurePolicy::Skip;
            }
            if skip_missing_attachments {
                config.on_missing_attachment = FailurePolicy::Skip;
            }
            config.validate()?;
            handle_migrate(config, source, destination, report)
        }
        Commands::Folders { source } => handle_folders(config, source),
        Commands::Inspect { source } => handle_inspect(config, source),
    }
}

/// `--config` wins, then the config dir (env override or platform default),
/// then built-in defaults.
fn load_config(explicit: Option<&Path>) -> Result<MigrateConfig> {
    if let Some(path) = explicit {
        return MigrateConfig::load_file(path);
    }
    if let Some(dir) = std::env::var_os(CONFIG_DIR_ENV) {
        return MigrateConfig::load(PathBuf::from(dir));
    }
    match ProjectDirs::from("com", "boost2obsidian", "boost2obsidian") {
        Some(dirs) => MigrateConfig::load(dirs.config_dir()),
        None => Ok(MigrateConfig::default()),
    }
}

fn require(arg: Option<PathBuf>, configured: &Option<PathBuf>, what: &str) -> Result<PathBuf> {
    arg.or_else(|| configured.clone()).ok_or_else(|| {
        MigrateError::Config(format!(
            "no {} folder given (pass it as an argument or set it in the config file)",
            what
        ))
    })
}

fn handle_migrate(
    config: MigrateConfig,
    source: Option<PathBuf>,
    destination: Option<PathBuf>,
    report_path: Option<PathBuf>,
) -> Result<()> {
    let source = require(source, &config.source, "source")?;
    let destination = require(destination, &config.destination, "destination")?;
    log::info!(
        "migrating {} into {}",
        source.display(),
        destination.display()
    );

    let mut api = MigrateApi::new(FsSource::new(source), FsVault::new(destination), config);
    let result = api.migrate()?;

    print_messages(&result.messages);
    if let Some(report) = &result.report {
        print_report(report);
        if let Some(path) = report_path {
            let json = serde_json::to_string_pretty(report)?;
            fs::write(&path, json)?;
            log::info!("report written to {}", path.display());
        }
    }
    Ok(())
}

fn handle_folders(config: MigrateConfig, source: Option<PathBuf>) -> Result<()> {
    let source = require(source, &config.source, "source")?;
    let filler = config.folder_filler;
    let api = MigrateApi::new(FsSource::new(source), FsVault::new(PathBuf::new()), config);
    let result = api.folders()?;
    if let Some(mapping) = &result.folders {
        print_folders(mapping, filler);
    }
    print_messages(&result.messages);
    Ok(())
}

fn handle_inspect(config: MigrateConfig, source: Option<PathBuf>) -> Result<()> {
    let source = require(source, &config.source, "source")?;
    let api = MigrateApi::new(FsSource::new(source), FsVault::new(PathBuf::new()), config);
    let result = api.inspect()?;
    print_planned(&result.planned);
    print_messages(&result.messages);
    Ok(())
}
