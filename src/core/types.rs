//! Core data types for docseek.
//!
//! Documents, chunks, locators and search results shared by the
//! indexer, the index snapshot and the query engine.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use crate::core::error::DocseekError;

/// Supported source document formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentFormat {
    Txt,
    Pdf,
    Docx,
}

impl DocumentFormat {
    /// Resolve a format from a file extension (case-insensitive).
    ///
    /// Returns `None` for anything that is not `.txt`, `.pdf` or
    /// `.docx`; such files are ignored by the walker.
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?;
        if ext.eq_ignore_ascii_case("txt") {
            Some(DocumentFormat::Txt)
        } else if ext.eq_ignore_ascii_case("pdf") {
            Some(DocumentFormat::Pdf)
        } else if ext.eq_ignore_ascii_case("docx") {
            Some(DocumentFormat::Docx)
        } else {
            None
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            DocumentFormat::Txt => "txt",
            DocumentFormat::Pdf => "pdf",
            DocumentFormat::Docx => "docx",
        }
    }
}

impl fmt::Display for DocumentFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// A source document discovered in the watched directory
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    /// Document identifier (file name relative to the source root)
    pub id: String,

    /// File size at discovery time
    pub size_bytes: u64,

    /// Format resolved from the extension
    pub format: DocumentFormat,
}

/// Position of a chunk inside its document
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Locator {
    /// 1-based page number, when the extractor reports pages
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,

    /// 1-based paragraph number within the document
    #[serde(skip_serializing_if = "Option::is_none")]
    pub paragraph: Option<u32>,
}

impl Locator {
    pub fn page(page: u32) -> Self {
        Self {
            page: Some(page),
            paragraph: None,
        }
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.page, self.paragraph) {
            (Some(p), Some(para)) => write!(f, "page {p}, paragraph {para}"),
            (Some(p), None) => write!(f, "page {p}"),
            (None, Some(para)) => write!(f, "paragraph {para}"),
            (None, None) => f.write_str("whole document"),
        }
    }
}

/// Smallest retrievable unit of text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chunk {
    /// Owning document identifier
    pub doc_id: String,

    /// Sequential number within the document (reading order, from 0)
    pub ordinal: usize,

    /// Page/paragraph position
    pub locator: Locator,

    /// Chunk text, never empty after trim
    pub text: String,
}

/// How extracted text is partitioned into chunks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Granularity {
    Document,
    Page,
    Paragraph,
    #[serde(alias = "fixedWords")]
    FixedWords,
}

impl FromStr for Granularity {
    type Err = DocseekError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "document" => Ok(Granularity::Document),
            "page" => Ok(Granularity::Page),
            "paragraph" => Ok(Granularity::Paragraph),
            "fixed_words" | "fixedwords" | "fixed-words" => Ok(Granularity::FixedWords),
            other => Err(DocseekError::ConfigError(format!(
                "Unknown granularity '{other}' (expected document, page, paragraph or fixed_words)"
            ))),
        }
    }
}

impl fmt::Display for Granularity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Granularity::Document => "document",
            Granularity::Page => "page",
            Granularity::Paragraph => "paragraph",
            Granularity::FixedWords => "fixed_words",
        };
        f.write_str(name)
    }
}

/// Index/scoring strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    Lexical,
    Vector,
}

impl FromStr for Strategy {
    type Err = DocseekError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "lexical" => Ok(Strategy::Lexical),
            "vector" => Ok(Strategy::Vector),
            other => Err(DocseekError::ConfigError(format!(
                "Unknown strategy '{other}' (expected lexical or vector)"
            ))),
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Strategy::Lexical => f.write_str("lexical"),
            Strategy::Vector => f.write_str("vector"),
        }
    }
}

/// What a query with no hits returns
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmptyResultPolicy {
    #[default]
    EmptyList,
    PlaceholderMessage,
}

/// Search result returned by the query engine
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResult {
    /// Source document (file name)
    #[serde(rename = "filename")]
    pub doc_id: String,

    /// Chunk ordinal within the document
    pub ordinal: usize,

    /// Chunk position
    pub locator: Locator,

    /// Bounded excerpt of the chunk
    pub snippet: String,

    /// Snippet with query keywords wrapped in emphasis markers
    pub highlighted: String,

    /// Relevance score (higher = more relevant)
    pub score: f32,
}

/// Response from a search operation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResponse {
    /// Original query string
    pub query: String,

    /// Ranked results
    pub results: Vec<SearchResult>,

    /// Number of results returned
    pub count: usize,

    /// Generation of the snapshot that answered the query
    pub generation: u64,

    /// Query duration in milliseconds
    pub duration_ms: u64,
}

impl SearchResponse {
    pub fn empty(query: &str, generation: u64) -> Self {
        Self {
            query: query.to_string(),
            results: Vec::new(),
            count: 0,
            generation,
            duration_ms: 0,
        }
    }
}

/// Statistics from one rebuild cycle
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexStats {
    /// Snapshot generation produced by this rebuild
    pub generation: u64,

    /// Documents that produced at least an extraction
    pub documents_indexed: usize,

    /// Documents dropped because extraction failed
    pub documents_skipped: usize,

    /// Total chunks in the snapshot
    pub chunks_created: usize,

    /// Chunks left out of the vector index after provider failures
    pub embeddings_omitted: usize,

    /// Rebuild duration in milliseconds
    pub duration_ms: u64,

    /// When the snapshot was completed
    pub built_at: DateTime<Utc>,
}
