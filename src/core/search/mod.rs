//! Search module.
//!
//! Ranked retrieval over the current index snapshot: lexical
//! (fuzzy token + exact substring) or vector (cosine), with a
//! case-sensitive keyword scan as the fallback when the strategy
//! finds nothing.

mod engine;
pub mod highlight;

pub use engine::SearchService;
pub use highlight::{extract_snippet, Highlighter};
