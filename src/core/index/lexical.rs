//! Lexical index with fuzzy token matching.
//!
//! Chunk text is tokenized with tantivy's simple tokenizer and
//! lowercased. Each token records its first position and byte
//! offset per chunk. Fuzzy lookup goes through a trigram table:
//! a query token is compared to vocabulary terms by the Jaccard
//! similarity of their padded trigram sets.
//!
//! # Scoring
//!
//! For a chunk matched by at least one query token, or containing
//! the whole query as a case-insensitive substring:
//!
//! ```text
//! base  = 0.8 * token_score + 0.2 * proximity
//! score = 1.0 + base   (chunk contains the query as a substring)
//! score = base         (otherwise)
//! ```
//!
//! `token_score` is the mean best similarity over query tokens
//! (unmatched tokens count 0) and `proximity` is the number of
//! matched tokens over the span of their positions. Both lie in
//! [0, 1], so every exact match outranks every fuzzy one. The
//! substring test is literal: `"dog"` is found inside `"hotdog"`
//! even though no token equals it.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::{HashMap, HashSet};
use tantivy::tokenizer::{
    LowerCaser, RemoveLongFilter, SimpleTokenizer, TextAnalyzer, TokenStream,
};

use crate::core::index::ScoredChunk;
use crate::core::types::Chunk;

const TOKEN_WEIGHT: f32 = 0.8;
const PROXIMITY_WEIGHT: f32 = 0.2;
const EXACT_BONUS: f32 = 1.0;

static ANALYZER: Lazy<TextAnalyzer> = Lazy::new(|| {
    TextAnalyzer::builder(SimpleTokenizer::default())
        .filter(RemoveLongFilter::limit(64))
        .filter(LowerCaser)
        .build()
});

/// A normalized token and where it occurs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub text: String,

    /// Byte offset in the source text
    pub offset: usize,

    /// Token position (0-based)
    pub position: usize,
}

/// Split text into lowercased word tokens.
pub fn tokenize(text: &str) -> Vec<Token> {
    let mut analyzer = ANALYZER.clone();
    let mut stream = analyzer.token_stream(text);
    let mut tokens = Vec::new();

    while stream.advance() {
        let token = stream.token();
        tokens.push(Token {
            text: token.text.clone(),
            offset: token.offset_from,
            position: token.position,
        });
    }

    tokens
}

/// Padded character trigrams (`"  dog "` style).
fn trigrams(term: &str) -> HashSet<String> {
    let padded: Vec<char> = format!("  {term} ").chars().collect();
    padded
        .windows(3)
        .map(|w| w.iter().collect::<String>())
        .collect()
}

/// Case-insensitive substring matcher for the whole query, with
/// any whitespace run matching any whitespace run.
pub fn phrase_pattern(query: &str) -> Option<Regex> {
    let parts: Vec<String> = query.split_whitespace().map(regex::escape).collect();
    if parts.is_empty() {
        return None;
    }

    Regex::new(&format!("(?i){}", parts.join(r"\s+"))).ok()
}

#[derive(Debug, Clone, Copy)]
struct Posting {
    chunk: u32,
    position: u32,
    offset: usize,
}

#[derive(Debug, Clone)]
struct Term {
    trigram_count: usize,
    postings: Vec<Posting>,
}

/// Best match of one query token inside one chunk
#[derive(Debug, Clone, Copy)]
struct TokenMatch {
    similarity: f32,
    position: u32,
    offset: usize,
}

/// Inverted index over chunk tokens plus a trigram table over the
/// vocabulary.
#[derive(Debug, Clone, Default)]
pub struct LexicalIndex {
    vocabulary: HashMap<String, u32>,
    terms: Vec<Term>,
    trigrams: HashMap<String, Vec<u32>>,
}

impl LexicalIndex {
    /// Index every chunk. Chunk ids are positions in `chunks`.
    pub fn build(chunks: &[Chunk]) -> Self {
        let mut index = Self::default();

        for (chunk_idx, chunk) in chunks.iter().enumerate() {
            let mut seen = HashSet::new();
            for token in tokenize(&chunk.text) {
                if !seen.insert(token.text.clone()) {
                    continue;
                }
                let term_id = index.term_id(&token.text);
                index.terms[term_id as usize].postings.push(Posting {
                    chunk: chunk_idx as u32,
                    position: token.position as u32,
                    offset: token.offset,
                });
            }
        }

        index
    }

    fn term_id(&mut self, text: &str) -> u32 {
        if let Some(&id) = self.vocabulary.get(text) {
            return id;
        }

        let id = self.terms.len() as u32;
        let grams = trigrams(text);
        for gram in &grams {
            self.trigrams.entry(gram.clone()).or_default().push(id);
        }
        self.terms.push(Term {
            trigram_count: grams.len(),
            postings: Vec::new(),
        });
        self.vocabulary.insert(text.to_string(), id);
        id
    }

    /// Number of distinct terms
    pub fn vocabulary_size(&self) -> usize {
        self.terms.len()
    }

    /// Vocabulary terms similar to `token`, with their similarity.
    fn expand(&self, token: &str, threshold: f32) -> Vec<(u32, f32)> {
        let grams = trigrams(token);
        let mut shared: HashMap<u32, usize> = HashMap::new();
        for gram in &grams {
            if let Some(ids) = self.trigrams.get(gram) {
                for &id in ids {
                    *shared.entry(id).or_default() += 1;
                }
            }
        }

        let exact = self.vocabulary.get(token).copied();
        shared
            .into_iter()
            .filter_map(|(id, common)| {
                let similarity = if Some(id) == exact {
                    1.0
                } else {
                    let union = grams.len() + self.terms[id as usize].trigram_count - common;
                    common as f32 / union as f32
                };
                (similarity >= threshold).then_some((id, similarity))
            })
            .collect()
    }

    /// Score every chunk matched by at least one query token or
    /// containing the query as a substring.
    ///
    /// `chunks` must be the slice this index was built from.
    pub fn search(&self, chunks: &[Chunk], query: &str, threshold: f32) -> Vec<ScoredChunk> {
        let mut query_tokens: Vec<String> = Vec::new();
        for token in tokenize(query) {
            if !query_tokens.contains(&token.text) {
                query_tokens.push(token.text);
            }
        }
        if query_tokens.is_empty() {
            return Vec::new();
        }

        let width = query_tokens.len();
        let mut matches: HashMap<u32, Vec<Option<TokenMatch>>> = HashMap::new();

        for (slot, token) in query_tokens.iter().enumerate() {
            for (term_id, similarity) in self.expand(token, threshold) {
                for posting in &self.terms[term_id as usize].postings {
                    let best = &mut matches
                        .entry(posting.chunk)
                        .or_insert_with(|| vec![None; width])[slot];
                    let better = match best {
                        None => true,
                        Some(current) => {
                            similarity > current.similarity
                                || (similarity == current.similarity
                                    && posting.position < current.position)
                        }
                    };
                    if better {
                        *best = Some(TokenMatch {
                            similarity,
                            position: posting.position,
                            offset: posting.offset,
                        });
                    }
                }
            }
        }

        // Substring hits inside longer tokens have no posting
        let phrase = phrase_pattern(query);
        if let Some(pattern) = &phrase {
            for (chunk_idx, chunk) in chunks.iter().enumerate() {
                if pattern.is_match(&chunk.text) {
                    matches
                        .entry(chunk_idx as u32)
                        .or_insert_with(|| vec![None; width]);
                }
            }
        }

        matches
            .into_iter()
            .filter_map(|(chunk_idx, slots)| {
                let chunk = chunks.get(chunk_idx as usize)?;
                Some(score_chunk(chunk_idx as usize, &chunk.text, &slots, phrase.as_ref()))
            })
            .collect()
    }
}

fn score_chunk(
    chunk_idx: usize,
    text: &str,
    slots: &[Option<TokenMatch>],
    phrase: Option<&Regex>,
) -> ScoredChunk {
    let matched: Vec<&TokenMatch> = slots.iter().flatten().collect();

    let token_score = matched.iter().map(|m| m.similarity).sum::<f32>() / slots.len() as f32;

    let first = matched.iter().map(|m| m.position).min().unwrap_or(0);
    let last = matched.iter().map(|m| m.position).max().unwrap_or(0);
    let span = (last - first + 1) as f32;
    let proximity = (matched.len() as f32 / span).min(1.0);

    let base = TOKEN_WEIGHT * token_score + PROXIMITY_WEIGHT * proximity;

    match phrase.and_then(|p| p.find(text)) {
        Some(m) => ScoredChunk {
            chunk: chunk_idx,
            score: EXACT_BONUS + base,
            offset: Some(m.start()),
        },
        None => ScoredChunk {
            chunk: chunk_idx,
            score: base,
            offset: matched.iter().map(|m| m.offset).min(),
        },
    }
}
