//! CLI adapter for docseek
//!
//! Command-line access to indexing, searching and watching. Depends
//! on `core/` only.
//!
//! # Architecture
//!
//! ```text
//! +------------------+
//! |     core/        |
//! |  (domain logic)  |
//! +--------+---------+
//!          |
//!          v
//! +------------------+
//! |      cli/        |
//! | (clap adapter)   |
//! +------------------+
//! ```

pub mod commands;
pub mod output;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::core::config::Config;
use crate::core::services::Services;

/// docseek - Document search over a watched directory
///
/// Index the TXT, PDF and DOCX files of a directory and search
/// them with fuzzy keyword or embedding-based ranking.
#[derive(Parser, Debug)]
#[command(name = "docseek")]
#[command(version)]
#[command(about = "Search the documents of a directory", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output format
    #[arg(long, global = true, default_value = "human")]
    pub format: OutputFormat,

    /// Configuration file (overrides the default lookup)
    #[arg(long, global = true, env = "DOCSEEK_CONFIG")]
    pub config: Option<PathBuf>,

    /// Source directory (overrides configuration)
    #[arg(long, short = 'd', global = true)]
    pub dir: Option<PathBuf>,

    /// Emit logs as JSON lines on stderr
    #[arg(long, global = true)]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Output format for CLI commands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable output (default)
    #[default]
    Human,
    /// JSON output for scripting
    Json,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Build the index once and report statistics
    Index(commands::IndexArgs),

    /// Build the index and run one query
    Search(commands::SearchArgs),

    /// Keep the index current and answer queries read from stdin
    Watch(commands::WatchArgs),

    /// Show current configuration
    #[command(name = "show-config")]
    ShowConfig(commands::ConfigArgs),
}

/// Install the global tracing subscriber.
///
/// Logs go to stderr so JSON output on stdout stays parseable.
pub fn init_tracing(json: bool) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "docseek=info".into());

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

/// Resolve configuration from the CLI flags, file and environment
pub fn load_config(cli: &Cli) -> crate::core::error::Result<Config> {
    let mut config = match &cli.config {
        Some(path) => {
            let mut config = Config::from_file(path)?;
            config.merge_env();
            config
        }
        None => Config::load()?,
    };

    if let Some(dir) = &cli.dir {
        config.source.dir = dir.clone();
    }

    config.validate()?;
    Ok(config)
}

/// Run the CLI with the provided arguments
pub async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    init_tracing(cli.json_logs);

    let config = load_config(&cli)?;

    if let Commands::ShowConfig(args) = &cli.command {
        return commands::config::execute(args, &config, cli.format);
    }

    config.log_config();
    let services = Services::new(config)?;

    match cli.command {
        Commands::Index(args) => commands::index::execute(args, &services, cli.format).await,
        Commands::Search(args) => commands::search::execute(args, &services, cli.format).await,
        Commands::Watch(args) => commands::watch::execute(args, &services, cli.format).await,
        Commands::ShowConfig(_) => Ok(()),
    }
}
