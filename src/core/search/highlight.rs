//! Snippet extraction and keyword highlighting.
//!
//! Both operate on characters, never bytes, so multi-byte text is
//! never split mid-character.

use regex::{Captures, Regex};

use crate::core::error::{DocseekError, Result};

const ELLIPSIS: &str = "...";

/// Whitespace-separated query keywords, deduplicated
/// case-insensitively and ordered longest first so longer keywords
/// win over their prefixes.
pub fn keywords(query: &str) -> Vec<String> {
    let mut keywords: Vec<String> = Vec::new();
    for word in query.split_whitespace() {
        let lower = word.to_lowercase();
        if !keywords.iter().any(|k| k.to_lowercase() == lower) {
            keywords.push(word.to_string());
        }
    }
    keywords.sort_by(|a, b| b.chars().count().cmp(&a.chars().count()));
    keywords
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Case-insensitive alternation of `keywords`. A keyword edge that
/// is a word character must sit on a word boundary.
pub fn keyword_pattern(keywords: &[String]) -> Option<Regex> {
    if keywords.is_empty() {
        return None;
    }

    let alternatives: Vec<String> = keywords
        .iter()
        .filter_map(|k| {
            let first = k.chars().next()?;
            let last = k.chars().last()?;
            let lead = if is_word_char(first) { r"\b" } else { "" };
            let trail = if is_word_char(last) { r"\b" } else { "" };
            Some(format!("{lead}{}{trail}", regex::escape(k)))
        })
        .collect();

    Regex::new(&format!("(?i)(?:{})", alternatives.join("|"))).ok()
}

/// Wraps keyword occurrences in emphasis markers.
#[derive(Debug, Clone)]
pub struct Highlighter {
    open: String,
    close: String,

    /// Marker-delimited spans; candidates for earlier output
    wrapped: Regex,
}

impl Highlighter {
    pub fn new(open: &str, close: &str) -> Result<Self> {
        let wrapped = Regex::new(&format!(
            "{}((?s:.+?)){}",
            regex::escape(open),
            regex::escape(close)
        ))
        .map_err(|e| DocseekError::ConfigError(format!("Invalid highlight markers: {e}")))?;

        Ok(Self {
            open: open.to_string(),
            close: close.to_string(),
            wrapped,
        })
    }

    /// Highlight every match of `pattern` in `text`.
    ///
    /// A marker span whose content is exactly one match is treated
    /// as earlier output and skipped, so applying this twice gives
    /// the same result as applying it once. Other marker-delimited
    /// text in the document (Markdown bold, `2**3`) is highlighted
    /// like any other text.
    pub fn highlight(&self, text: &str, pattern: Option<&Regex>) -> String {
        let Some(pattern) = pattern else {
            return text.to_string();
        };

        let mut out = String::with_capacity(text.len() + 16);
        let mut cursor = 0;
        let mut search_from = 0;

        while let Some(caps) = self.wrapped.captures_at(text, search_from) {
            let (Some(span), Some(inner)) = (caps.get(0), caps.get(1)) else {
                break;
            };

            if is_whole_match(pattern, inner.as_str()) {
                out.push_str(&self.wrap_matches(&text[cursor..span.start()], pattern));
                out.push_str(span.as_str());
                cursor = span.end();
                search_from = cursor;
            } else {
                search_from = span.start() + self.open.len();
            }
        }
        out.push_str(&self.wrap_matches(&text[cursor..], pattern));

        out
    }

    fn wrap_matches(&self, segment: &str, pattern: &Regex) -> String {
        pattern
            .replace_all(segment, |caps: &Captures| {
                format!("{}{}{}", self.open, &caps[0], self.close)
            })
            .into_owned()
    }

    /// Convenience: highlight the keywords of `query`
    pub fn highlight_query(&self, text: &str, query: &str) -> String {
        let pattern = keyword_pattern(&keywords(query));
        self.highlight(text, pattern.as_ref())
    }
}

fn is_whole_match(pattern: &Regex, text: &str) -> bool {
    pattern
        .find(text)
        .is_some_and(|m| m.start() == 0 && m.end() == text.len())
}

/// Excerpt of at most `max_chars` characters.
///
/// With a `center` byte offset the window is centred on it,
/// otherwise it starts at the beginning. Truncated sides are marked
/// with `...`.
pub fn extract_snippet(text: &str, center: Option<usize>, max_chars: usize) -> String {
    let total = text.chars().count();
    if total <= max_chars {
        return text.to_string();
    }

    let start = match center {
        Some(offset) => {
            let center_char = text
                .char_indices()
                .take_while(|(i, _)| *i < offset)
                .count();
            center_char
                .saturating_sub(max_chars / 2)
                .min(total - max_chars)
        }
        None => 0,
    };
    let end = start + max_chars;

    let body: String = text.chars().skip(start).take(max_chars).collect();
    let prefix = if start > 0 { ELLIPSIS } else { "" };
    let suffix = if end < total { ELLIPSIS } else { "" };

    format!("{prefix}{}{suffix}", body.trim())
}
