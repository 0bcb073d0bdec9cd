//! Watch command - keep the index current and answer queries
//!
//! Reads one query per line from stdin until EOF or Ctrl-C.

use clap::Args;
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::cli::commands::search::print_response;
use crate::cli::output::{self, colors};
use crate::cli::OutputFormat;
use crate::core::services::Services;

/// Arguments for the watch command
#[derive(Args, Debug)]
pub struct WatchArgs {
    /// Maximum number of results per query
    #[arg(long, short = 'k')]
    pub limit: Option<usize>,

    /// Do not watch for changes; serve the initial index only
    #[arg(long)]
    pub no_watch: bool,
}

/// Execute the watch command
pub async fn execute(
    args: WatchArgs,
    services: &Services,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    services.initialize().await?;

    let watcher = if services.config.watcher.enabled && !args.no_watch {
        Some(services.watch()?)
    } else {
        if !services.config.watcher.enabled {
            output::print_warning("Watcher disabled in configuration; the index will not refresh");
        }
        None
    };

    if format == OutputFormat::Human {
        eprintln!(
            "{} {} {}",
            colors::success("Ready:"),
            colors::file_path(&services.source_dir().display().to_string()),
            colors::dim("(one query per line, Ctrl-D to quit)")
        );
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        let line = tokio::select! {
            line = lines.next_line() => line?,
            _ = tokio::signal::ctrl_c() => None,
        };
        let Some(line) = line else { break };

        let query = line.trim();
        if query.is_empty() {
            continue;
        }

        let response = services.search(query, args.limit).await;
        if let Err(e) = print_response(&response, &services.config.search, format, false) {
            output::print_error(&e.to_string());
        }
    }

    if let Some(watcher) = watcher {
        watcher.stop().await;
    }

    Ok(())
}
