//! PDF text extractor.
//!
//! Uses pdf-extract for the text layer, one string per page. The
//! parser is not hardened
//! against malformed input, so panics are caught and reported as
//! an extraction failure for that document only.

use std::panic;

use super::{ExtractedText, TextExtractor};
use crate::core::error::{DocseekError, Result};
use crate::core::types::DocumentFormat;

/// Extractor for `.pdf` files.
#[derive(Debug, Clone, Copy, Default)]
pub struct PdfExtractor;

impl TextExtractor for PdfExtractor {
    fn format(&self) -> DocumentFormat {
        DocumentFormat::Pdf
    }

    fn extract(&self, doc_id: &str, bytes: &[u8]) -> Result<ExtractedText> {
        let failed = |reason: String| DocseekError::ExtractionFailed {
            doc_id: doc_id.to_string(),
            reason,
        };

        if !bytes.starts_with(b"%PDF") {
            return Err(failed("missing %PDF header".to_string()));
        }

        let pages = panic::catch_unwind(|| pdf_extract::extract_text_from_mem_by_pages(bytes))
            .map_err(|_| failed("PDF parser panicked".to_string()))?
            .map_err(|e| failed(format!("PDF extraction failed: {e}")))?;

        tracing::debug!("Extracted {} pages from PDF {}", pages.len(), doc_id);

        Ok(ExtractedText::paged(pages))
    }
}
