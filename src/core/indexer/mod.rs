//! Document indexing module.
//!
//! Turns the source directory into an index snapshot:
//!
//! - Directory scanning with exclude patterns and size limits
//! - Granularity-driven chunking (document, page, paragraph,
//!   fixed word windows)
//! - Parallel extraction and snapshot construction
//!
//! # Safety
//!
//! Chunk boundaries always fall on whitespace or paragraph breaks
//! located by regex, so slicing never splits a multi-byte
//! character.

pub mod builder;
pub mod chunker;
pub mod walker;

pub use builder::IndexBuilder;
pub use chunker::Chunker;
pub use walker::{FileWalker, SourceFile};
