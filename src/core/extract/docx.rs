//! DOCX text extractor.
//!
//! Reads `word/document.xml` from the OOXML package and collects
//! the text runs of each `w:p` paragraph. Paragraphs are joined
//! by blank lines so paragraph-level chunking sees them.

use std::io::{Cursor, Read};

use quick_xml::events::Event;
use quick_xml::Reader;

use super::{ExtractedText, TextExtractor};
use crate::core::error::{DocseekError, Result};
use crate::core::types::DocumentFormat;

const DOCUMENT_PART: &str = "word/document.xml";

/// Extractor for `.docx` files.
#[derive(Debug, Clone, Copy, Default)]
pub struct DocxExtractor;

impl TextExtractor for DocxExtractor {
    fn format(&self) -> DocumentFormat {
        DocumentFormat::Docx
    }

    fn extract(&self, doc_id: &str, bytes: &[u8]) -> Result<ExtractedText> {
        let failed = |reason: String| DocseekError::ExtractionFailed {
            doc_id: doc_id.to_string(),
            reason,
        };

        let mut archive = zip::ZipArchive::new(Cursor::new(bytes))
            .map_err(|e| failed(format!("not a DOCX package: {e}")))?;

        let mut xml = String::new();
        archive
            .by_name(DOCUMENT_PART)
            .map_err(|e| failed(format!("missing {DOCUMENT_PART}: {e}")))?
            .read_to_string(&mut xml)
            .map_err(|e| failed(format!("unreadable {DOCUMENT_PART}: {e}")))?;

        let paragraphs = paragraphs_from_xml(&xml).map_err(failed)?;

        Ok(ExtractedText::single(paragraphs.join("\n\n")))
    }
}

/// Collect paragraph texts from WordprocessingML, skipping empty ones.
fn paragraphs_from_xml(xml: &str) -> std::result::Result<Vec<String>, String> {
    let mut reader = Reader::from_str(xml);
    let mut paragraphs = Vec::new();
    let mut current = String::new();
    let mut in_text = false;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                if e.name().as_ref() == b"w:t" {
                    in_text = true;
                }
            }
            Ok(Event::End(e)) => match e.name().as_ref() {
                b"w:t" => in_text = false,
                b"w:p" => {
                    let paragraph = std::mem::take(&mut current);
                    if !paragraph.trim().is_empty() {
                        paragraphs.push(paragraph);
                    }
                }
                _ => {}
            },
            Ok(Event::Empty(e)) => match e.name().as_ref() {
                b"w:tab" => current.push('\t'),
                b"w:br" | b"w:cr" => current.push('\n'),
                _ => {}
            },
            Ok(Event::Text(t)) if in_text => {
                let text = t
                    .unescape()
                    .map_err(|e| format!("bad text at {}: {e}", reader.buffer_position()))?;
                current.push_str(&text);
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(format!(
                    "malformed XML at {}: {e}",
                    reader.buffer_position()
                ))
            }
            _ => {}
        }
    }

    if !current.trim().is_empty() {
        paragraphs.push(current);
    }

    Ok(paragraphs)
}
