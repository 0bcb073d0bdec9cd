//! docseek - Document search over a watched directory
//!
//! Indexes the TXT, PDF and DOCX files of a directory and answers
//! free-text queries with ranked, highlighted snippets. The index
//! is rebuilt in the background whenever the directory changes;
//! queries always run against a complete snapshot.
//!
//! # Architecture
//!
//! - **core**: Domain logic
//!   - config, error, types
//!   - extract (per-format text extraction)
//!   - indexer (scanning, chunking, snapshot building)
//!   - index (lexical and vector snapshots, snapshot store)
//!   - embed (embedding providers)
//!   - search (ranking, snippets, highlighting)
//!   - watcher (debounced rebuild coordination)
//!   - services (unified service container)
//!
//! - **cli**: Command-line adapter (depends on core)
//!
//! # Key Features
//!
//! - Lexical strategy: fuzzy token matching with exact-phrase boost
//! - Vector strategy: cosine similarity over provider embeddings
//! - Document, page, paragraph or fixed-word chunking
//! - Corrupt documents are skipped, never fatal
//! - Atomic snapshot publication

pub mod cli;
pub mod core;

// Re-export commonly used types for convenience
pub use core::config::Config;
pub use core::error::{DocseekError, Result};
pub use core::services::Services;
pub use core::types::*;
