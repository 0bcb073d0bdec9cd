//! Plain text extractor.

use super::{ExtractedText, TextExtractor};
use crate::core::error::{DocseekError, Result};
use crate::core::types::DocumentFormat;

const FORM_FEED: char = '\x0C';

/// Extractor for `.txt` files.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainTextExtractor;

impl TextExtractor for PlainTextExtractor {
    fn format(&self) -> DocumentFormat {
        DocumentFormat::Txt
    }

    fn extract(&self, doc_id: &str, bytes: &[u8]) -> Result<ExtractedText> {
        let text = std::str::from_utf8(bytes).map_err(|e| DocseekError::ExtractionFailed {
            doc_id: doc_id.to_string(),
            reason: format!("not valid UTF-8: {e}"),
        })?;
        let text = text.strip_prefix('\u{FEFF}').unwrap_or(text);

        if text.contains(FORM_FEED) {
            let pages = text.split(FORM_FEED).map(str::to_string).collect();
            return Ok(ExtractedText::paged(pages));
        }

        Ok(ExtractedText::single(text))
    }
}
