//! docseek CLI - search the documents of a directory
//!
//! # Examples
//!
//! ```bash
//! # Index a directory and show statistics
//! docseek --dir ./docs index --list
//!
//! # One-off search
//! docseek --dir ./docs search "lazy dog" -k 3
//!
//! # Keep the index current and answer queries from stdin
//! docseek --dir ./docs watch
//!
//! # Show configuration
//! docseek show-config
//! ```

use clap::Parser;
use docseek::cli::output::print_error;
use docseek::cli::{run, Cli};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        print_error(&e.to_string());
        std::process::exit(1);
    }
}
