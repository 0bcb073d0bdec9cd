//! CLI command implementations
//!
//! Each command module handles argument parsing and execution for a specific CLI command.

pub mod config;
pub mod index;
pub mod search;
pub mod watch;

// Re-export argument types for use in mod.rs
pub use config::ConfigArgs;
pub use index::IndexArgs;
pub use search::SearchArgs;
pub use watch::WatchArgs;
