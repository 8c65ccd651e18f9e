use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Returns the version string, including git hash and commit date for non-release builds.
/// Format: "0.3.2" for releases, "0.3.2@abc1234 2024-01-15 14:30" for dev builds
fn get_version() -> &'static str {
    const VERSION: &str = env!("CARGO_PKG_VERSION");
    const GIT_HASH: &str = env!("GIT_HASH");
    const GIT_COMMIT_DATE: &str = env!("GIT_COMMIT_DATE");
    const IS_RELEASE: &str = env!("IS_RELEASE");

    use std::sync::OnceLock;
    static VERSION_STRING: OnceLock<String> = OnceLock::new();

    VERSION_STRING.get_or_init(|| {
        if IS_RELEASE == "true" || GIT_HASH.is_empty() {
            VERSION.to_string()
        } else {
            format!("{}@{} {}", VERSION, GIT_HASH, GIT_COMMIT_DATE)
        }
    })
}

#[derive(Parser, Debug)]
#[command(name = "boost2obsidian", bin_name = "boost2obsidian", version = get_version())]
#[command(about = "Migrate a Boostnote storage folder into an Obsidian vault", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Config file (defaults to boost2obsidian.json in the user config dir)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// More diagnostics on stderr (-v info, -vv debug)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Explicit log level (off, error, warn, info, debug, trace)
    #[arg(long, global = true)]
    pub log_level: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Convert every note and attachment into the vault
    #[command(alias = "m")]
    Migrate {
        /// Boostnote storage folder (contains boostnote.json)
        source: Option<PathBuf>,

        /// Obsidian vault folder, created if missing
        destination: Option<PathBuf>,

        /// Write a JSON run report to this file
        #[arg(long)]
        report: Option<PathBuf>,

        /// Copy settings from this directory instead of the bundled ones
        #[arg(long)]
        settings_dir: Option<PathBuf>,

        /// Titles longer than this get a synthetic file name
        #[arg(long)]
        max_title_len: Option<usize>,

        /// Warn about notes of unknown type instead of aborting
        #[arg(long)]
        skip_unknown_kinds: bool,

        /// Warn about missing attachments instead of aborting
        #[arg(long)]
        skip_missing_attachments: bool,
    },

    /// Print the folder mapping from boostnote.json
    Folders {
        /// Boostnote storage folder
        source: Option<PathBuf>,
    },

    /// List notes and attachment references without writing anything
    #[command(alias = "ls")]
    Inspect {
        /// Boostnote storage folder
        source: Option<PathBuf>,
    },
}
