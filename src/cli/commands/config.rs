//! Config command - show current configuration

use clap::Args;

use crate::cli::output::colors;
use crate::cli::OutputFormat;
use crate::core::config::Config;
use crate::core::types::Strategy;

/// Arguments for the config command
#[derive(Args, Debug)]
pub struct ConfigArgs {
    /// Print the effective configuration as TOML
    #[arg(long)]
    pub toml: bool,
}

/// Execute the config command
pub fn execute(
    args: &ConfigArgs,
    config: &Config,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    if args.toml {
        print!("{}", toml::to_string_pretty(config)?);
        return Ok(());
    }

    match format {
        OutputFormat::Human => {
            println!("{}", colors::label("Configuration:"));
            println!("  source:");
            println!("    dir: {}", config.source.dir.display());
            println!("    recursive: {}", config.source.recursive);
            println!("    max_file_size_mb: {}", config.source.max_file_size_mb);
            println!("    exclude_patterns: {:?}", config.source.exclude_patterns);
            println!("  indexing:");
            println!("    granularity: {}", config.indexing.granularity);
            println!("    fixed_words_size: {}", config.indexing.fixed_words_size);
            println!("    strategy: {}", config.indexing.strategy);
            println!("  search:");
            println!("    default_k: {}", config.search.default_k);
            println!("    max_k: {}", config.search.max_k);
            println!("    snippet_length: {}", config.search.snippet_length);
            println!("    fuzzy_threshold: {}", config.search.fuzzy_threshold);
            println!(
                "    empty_result_policy: {:?}",
                config.search.empty_result_policy
            );
            println!("  watcher:");
            println!("    enabled: {}", config.watcher.enabled);
            println!("    debounce_window_ms: {}", config.watcher.debounce_window_ms);
            if config.indexing.strategy == Strategy::Vector {
                println!("  embedding:");
                println!("    backend: {:?}", config.embedding.backend);
                println!("    endpoint: {}", config.embedding.endpoint);
                println!("    model: {}", config.embedding.model);
                println!("    api_key_env: {}", config.embedding.api_key_env);
            }
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(config)?);
        }
    }

    Ok(())
}
