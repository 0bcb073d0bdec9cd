//! Core domain logic
//!
//! Everything below the CLI: configuration, extraction, indexing,
//! search and change watching.
//!
//! # Architecture
//!
//! - **config**: Configuration loading (TOML + environment)
//! - **error**: Error types and Result alias
//! - **types**: Domain data structures
//! - **extract**: TXT/PDF/DOCX text extraction
//! - **indexer**: Directory scanning, chunking, snapshot building
//! - **index**: Immutable snapshots and the snapshot store
//! - **embed**: Embedding providers for the vector strategy
//! - **search**: Ranking, snippets and highlighting
//! - **watcher**: Debounced, serialised rebuilds on file changes
//! - **services**: Unified service container

pub mod config;
pub mod embed;
pub mod error;
pub mod extract;
pub mod index;
pub mod indexer;
pub mod search;
pub mod services;
pub mod types;
pub mod watcher;

// Re-export key types for convenience
pub use config::Config;
pub use error::{DocseekError, Result};
pub use services::Services;
