//! Search command - index the source directory and run one query

use clap::Args;

use crate::cli::output::{self, colors};
use crate::cli::OutputFormat;
use crate::core::config::SearchConfig;
use crate::core::services::Services;
use crate::core::types::SearchResponse;

/// Arguments for the search command
#[derive(Args, Debug)]
pub struct SearchArgs {
    /// Free-text query
    pub query: String,

    /// Maximum number of results (defaults to search.default_k)
    #[arg(long, short = 'k')]
    pub limit: Option<usize>,

    /// Only show file names and locations (no snippets)
    #[arg(long)]
    pub files_only: bool,
}

/// Execute the search command
pub async fn execute(
    args: SearchArgs,
    services: &Services,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    services.ensure_source_dir()?;
    services.rebuild().await?;

    let response = services.search(&args.query, args.limit).await;
    print_response(&response, &services.config.search, format, args.files_only)?;

    Ok(())
}

/// Print a search response in the requested format
pub fn print_response(
    response: &SearchResponse,
    search: &SearchConfig,
    format: OutputFormat,
    files_only: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    match format {
        OutputFormat::Human => print_human(response, search, files_only),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(response)?),
    }
    Ok(())
}

fn print_human(response: &SearchResponse, search: &SearchConfig, files_only: bool) {
    let hits: Vec<_> = response
        .results
        .iter()
        .filter(|r| !r.doc_id.is_empty())
        .collect();

    if hits.is_empty() {
        match response.results.first() {
            Some(placeholder) => println!("{}", colors::dim(&placeholder.snippet)),
            None => println!("No results found for '{}'", colors::label(&response.query)),
        }
        return;
    }

    println!(
        "Found {} result(s) for '{}' {}:\n",
        colors::number(&hits.len().to_string()),
        colors::label(&response.query),
        colors::dim(&format!(
            "(generation {}, {})",
            response.generation,
            output::format_duration(response.duration_ms as f64 / 1000.0)
        ))
    );

    for (i, result) in hits.iter().enumerate() {
        if files_only {
            println!(
                "{} {}",
                colors::file_path(&result.doc_id),
                colors::dim(&format!("({})", result.locator))
            );
            continue;
        }

        println!(
            "[{}] {} {} {}",
            colors::rank(&(i + 1).to_string()),
            colors::file_path(&result.doc_id),
            colors::dim(&format!("({})", result.locator)),
            colors::score(&format!("score: {:.3}", result.score))
        );
        let text = output::emphasize(
            &result.highlighted,
            &search.highlight_open,
            &search.highlight_close,
        );
        for line in text.lines().filter(|l| !l.trim().is_empty()) {
            println!("    {line}");
        }
        println!();
    }
}
