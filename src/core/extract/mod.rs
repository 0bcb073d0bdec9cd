//! Format-specific text extraction.
//!
//! Each supported [`DocumentFormat`] has one [`TextExtractor`]
//! that turns raw file bytes into plain text. Extractors are
//! synchronous; the index builder runs them on blocking tasks.
//!
//! # Formats
//!
//! - **txt**: UTF-8 decoded verbatim (form feeds mark pages)
//! - **pdf**: text layer via `pdf-extract`, one entry per page
//! - **docx**: `word/document.xml` paragraphs in document order

mod docx;
mod pdf;
mod text;

pub use docx::DocxExtractor;
pub use pdf::PdfExtractor;
pub use text::PlainTextExtractor;

use std::collections::HashMap;
use std::sync::Arc;

use crate::core::error::{DocseekError, Result};
use crate::core::types::DocumentFormat;

/// Text pulled out of one document, in reading order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedText {
    pages: Vec<String>,
    paged: bool,
}

impl ExtractedText {
    /// Text without page information
    pub fn single(text: impl Into<String>) -> Self {
        Self {
            pages: vec![text.into()],
            paged: false,
        }
    }

    /// Text split at page boundaries reported by the format
    pub fn paged(pages: Vec<String>) -> Self {
        Self {
            pages,
            paged: true,
        }
    }

    /// Whether page numbers are meaningful for this document
    pub fn has_pages(&self) -> bool {
        self.paged
    }

    pub fn pages(&self) -> &[String] {
        &self.pages
    }

    /// All pages joined by a blank line
    pub fn full_text(&self) -> String {
        self.pages.join("\n\n")
    }

    pub fn is_blank(&self) -> bool {
        self.pages.iter().all(|p| p.trim().is_empty())
    }
}

/// Extracts plain text from the bytes of one document format
pub trait TextExtractor: Send + Sync {
    /// Format this extractor handles
    fn format(&self) -> DocumentFormat;

    /// Extract text, or fail this single document
    fn extract(&self, doc_id: &str, bytes: &[u8]) -> Result<ExtractedText>;
}

/// Extractors keyed by document format
#[derive(Clone)]
pub struct ExtractorRegistry {
    extractors: HashMap<DocumentFormat, Arc<dyn TextExtractor>>,
}

impl ExtractorRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self {
            extractors: HashMap::new(),
        }
    }

    /// Registry with the built-in TXT, PDF and DOCX extractors
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(PlainTextExtractor);
        registry.register(PdfExtractor);
        registry.register(DocxExtractor);
        registry
    }

    /// Register (or replace) the extractor for its format
    pub fn register<E: TextExtractor + 'static>(&mut self, extractor: E) {
        self.extractors.insert(extractor.format(), Arc::new(extractor));
    }

    pub fn supports(&self, format: DocumentFormat) -> bool {
        self.extractors.contains_key(&format)
    }

    /// Extract text from `bytes` using the extractor for `format`
    pub fn extract(
        &self,
        doc_id: &str,
        bytes: &[u8],
        format: DocumentFormat,
    ) -> Result<ExtractedText> {
        let extractor = self
            .extractors
            .get(&format)
            .ok_or_else(|| DocseekError::UnsupportedFormat(format.to_string()))?;

        extractor.extract(doc_id, bytes)
    }
}

impl Default for ExtractorRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl std::fmt::Debug for ExtractorRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut formats: Vec<_> = self.extractors.keys().map(|f| f.extension()).collect();
        formats.sort_unstable();
        f.debug_struct("ExtractorRegistry")
            .field("formats", &formats)
            .finish()
    }
}
