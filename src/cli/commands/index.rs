//! Index command - build the index once and report statistics

use clap::Args;

use crate::cli::output::{self, colors};
use crate::cli::OutputFormat;
use crate::core::services::Services;

/// Arguments for the index command
#[derive(Args, Debug)]
pub struct IndexArgs {
    /// List the indexed documents
    #[arg(long, short = 'l')]
    pub list: bool,
}

/// Execute the index command
pub async fn execute(
    args: IndexArgs,
    services: &Services,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    services.ensure_source_dir()?;
    let stats = services.rebuild().await?;
    let index = services.store.get();

    match format {
        OutputFormat::Human => {
            output::print_success(&format!(
                "Indexed {} into generation {}",
                services.source_dir().display(),
                stats.generation
            ));
            println!(
                "  {} {}",
                colors::label("Documents:"),
                colors::number(&stats.documents_indexed.to_string())
            );
            if stats.documents_skipped > 0 {
                println!(
                    "  {} {}",
                    colors::label("Skipped:"),
                    colors::warning(&stats.documents_skipped.to_string())
                );
            }
            println!(
                "  {} {}",
                colors::label("Chunks:"),
                colors::number(&stats.chunks_created.to_string())
            );
            if stats.embeddings_omitted > 0 {
                println!(
                    "  {} {}",
                    colors::label("Embeddings omitted:"),
                    colors::warning(&stats.embeddings_omitted.to_string())
                );
            }
            println!(
                "  {} {}",
                colors::label("Strategy:"),
                index.strategy()
            );
            println!(
                "  {} {}",
                colors::label("Duration:"),
                output::format_duration_colored(stats.duration_ms as f64 / 1000.0)
            );

            if args.list {
                println!();
                output::print_header("Documents");
                for doc in index.documents() {
                    println!(
                        "  {} {} {}",
                        colors::file_path(&doc.id),
                        colors::dim(doc.format.extension()),
                        output::format_bytes_colored(doc.size_bytes)
                    );
                }
            }
        }
        OutputFormat::Json => {
            let mut value = serde_json::to_value(&stats)?;
            if args.list {
                value["documents"] = serde_json::to_value(index.documents())?;
            }
            println!("{}", serde_json::to_string_pretty(&value)?);
        }
    }

    Ok(())
}
