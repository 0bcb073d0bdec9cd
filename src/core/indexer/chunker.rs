//! Granularity-driven text chunking.
//!
//! Splits the extracted text of one document into ordered chunks
//! according to the configured [`Granularity`]:
//!
//! - **document**: one chunk holding the whole text
//! - **page**: one chunk per extractor-reported page
//! - **paragraph**: split on blank lines, or on a period followed
//!   by two or more whitespace characters
//! - **fixed_words**: contiguous runs of N words, no overlap
//!
//! Chunking is a pure function of its input: the same text and
//! granularity always produce the same chunks and ordinals.
//!
//! # Example
//!
//! ```
//! use docseek::core::indexer::Chunker;
//! use docseek::core::types::Granularity;
//!
//! let chunker = Chunker::new(Granularity::Paragraph, 500);
//! let chunks = chunker.chunk_text("notes.txt", "First point.\n\nSecond point.");
//!
//! assert_eq!(chunks.len(), 2);
//! assert_eq!(chunks[1].ordinal, 1);
//! assert_eq!(chunks[1].locator.paragraph, Some(2));
//! ```

use once_cell::sync::Lazy;
use regex::Regex;

use crate::core::extract::ExtractedText;
use crate::core::types::{Chunk, Granularity, Locator};

// Blank line (tolerating CR and trailing spaces), or a sentence end
// followed by a run of at least two whitespace characters.
static PARAGRAPH_BREAK: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\n[ \t\r]*\n\s*|\.\s{2,}").expect("paragraph break pattern is valid")
});

/// Splits extracted text into chunks.
#[derive(Debug, Clone, Copy)]
pub struct Chunker {
    granularity: Granularity,

    /// Words per chunk for `FixedWords`
    window: usize,
}

impl Chunker {
    /// Create a new chunker.
    ///
    /// # Panics
    ///
    /// Panics if `window` is 0. Configuration validation rejects
    /// a zero window before a chunker is ever built.
    pub fn new(granularity: Granularity, window: usize) -> Self {
        assert!(window > 0, "window must be > 0");

        Self {
            granularity,
            window,
        }
    }

    pub fn granularity(&self) -> Granularity {
        self.granularity
    }

    #[allow(dead_code)]
    pub fn window(&self) -> usize {
        self.window
    }

    /// Chunk unpaged text.
    pub fn chunk_text(&self, doc_id: &str, text: &str) -> Vec<Chunk> {
        self.chunk(doc_id, &ExtractedText::single(text))
    }

    /// Chunk one document's extracted text.
    ///
    /// Whitespace-only candidates are discarded before ordinals
    /// are assigned, so ordinals are always dense from 0.
    pub fn chunk(&self, doc_id: &str, extracted: &ExtractedText) -> Vec<Chunk> {
        let pieces = match self.granularity {
            Granularity::Document => vec![(extracted.full_text(), Locator::default())],
            Granularity::Page => split_pages(extracted),
            Granularity::Paragraph => split_paragraphs(extracted),
            Granularity::FixedWords => split_word_windows(extracted, self.window),
        };

        pieces
            .into_iter()
            .filter_map(|(text, locator)| {
                let trimmed = text.trim();
                (!trimmed.is_empty()).then(|| (trimmed.to_string(), locator))
            })
            .enumerate()
            .map(|(ordinal, (text, locator))| Chunk {
                doc_id: doc_id.to_string(),
                ordinal,
                locator,
                text,
            })
            .collect()
    }
}

fn page_number(extracted: &ExtractedText, idx: usize) -> Option<u32> {
    extracted.has_pages().then(|| idx as u32 + 1)
}

/// One piece per page. Unpaged text counts as a single page 1.
fn split_pages(extracted: &ExtractedText) -> Vec<(String, Locator)> {
    if !extracted.has_pages() {
        return vec![(extracted.full_text(), Locator::page(1))];
    }

    extracted
        .pages()
        .iter()
        .enumerate()
        .map(|(idx, page)| (page.clone(), Locator::page(idx as u32 + 1)))
        .collect()
}

/// Paragraphs numbered across the whole document.
fn split_paragraphs(extracted: &ExtractedText) -> Vec<(String, Locator)> {
    let mut pieces = Vec::new();
    let mut paragraph = 0u32;

    for (idx, page) in extracted.pages().iter().enumerate() {
        let page_no = page_number(extracted, idx);
        for text in paragraph_spans(page) {
            if text.trim().is_empty() {
                continue;
            }
            paragraph += 1;
            pieces.push((
                text.to_string(),
                Locator {
                    page: page_no,
                    paragraph: Some(paragraph),
                },
            ));
        }
    }

    pieces
}

/// Slice `text` at paragraph breaks. A sentence-end break keeps
/// its period with the preceding paragraph.
fn paragraph_spans(text: &str) -> Vec<&str> {
    let mut spans = Vec::new();
    let mut start = 0;

    for m in PARAGRAPH_BREAK.find_iter(text) {
        let end = if text[m.start()..].starts_with('.') {
            m.start() + 1
        } else {
            m.start()
        };
        spans.push(&text[start..end]);
        start = m.end();
    }

    if start < text.len() {
        spans.push(&text[start..]);
    }

    spans
}

/// Contiguous runs of `window` words. The locator carries the page
/// of the window's first word when pages are known.
fn split_word_windows(extracted: &ExtractedText, window: usize) -> Vec<(String, Locator)> {
    let words: Vec<(&str, Option<u32>)> = extracted
        .pages()
        .iter()
        .enumerate()
        .flat_map(|(idx, page)| {
            let page_no = page_number(extracted, idx);
            page.split_whitespace().map(move |w| (w, page_no))
        })
        .collect();

    words
        .chunks(window)
        .map(|run| {
            let text = run.iter().map(|(w, _)| *w).collect::<Vec<_>>().join(" ");
            let locator = Locator {
                page: run.first().and_then(|(_, page)| *page),
                paragraph: None,
            };
            (text, locator)
        })
        .collect()
}
