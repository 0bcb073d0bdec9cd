//! Query engine.
//!
//! Answers queries against whichever snapshot is current when the
//! query starts; a concurrent rebuild never affects a query in
//! flight. Queries never fail: every internal problem degrades to
//! fewer (or no) results and is logged.

use std::cmp::Ordering;
use std::sync::Arc;
use std::time::Instant;

use crate::core::config::SearchConfig;
use crate::core::embed::EmbedderPool;
use crate::core::error::Result;
use crate::core::index::{Index, IndexKind, IndexStore, ScoredChunk, VectorIndex};
use crate::core::search::highlight::{self, Highlighter};
use crate::core::types::{EmptyResultPolicy, Locator, SearchResponse, SearchResult};

/// Ranked retrieval over the current snapshot.
pub struct SearchService {
    store: IndexStore,
    embedder: Option<Arc<EmbedderPool>>,
    config: SearchConfig,
    highlighter: Highlighter,
}

impl SearchService {
    pub fn new(
        store: IndexStore,
        config: SearchConfig,
        embedder: Option<Arc<EmbedderPool>>,
    ) -> Result<Self> {
        let highlighter = Highlighter::new(&config.highlight_open, &config.highlight_close)?;
        Ok(Self {
            store,
            embedder,
            config,
            highlighter,
        })
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Search for `query`, returning at most `top_k` results
    /// (configured default when `None`, capped at `max_k`).
    ///
    /// An empty query returns no results without consulting the
    /// index.
    pub async fn search(&self, query: &str, top_k: Option<usize>) -> SearchResponse {
        let start = Instant::now();
        let query = self.normalize_query(query);

        if query.is_empty() {
            return SearchResponse::empty(&query, 0);
        }

        let index = self.store.get();
        let k = top_k.unwrap_or(self.config.default_k).min(self.config.max_k);

        let results = if k == 0 || index.is_empty() {
            Vec::new()
        } else {
            self.ranked_results(&index, &query, k).await
        };
        let results = self.apply_empty_policy(results);

        let duration_ms = start.elapsed().as_millis() as u64;
        tracing::debug!(
            "Query '{}' returned {} results from generation {} in {}ms",
            query,
            results.len(),
            index.generation(),
            duration_ms
        );

        SearchResponse {
            count: results.len(),
            query,
            results,
            generation: index.generation(),
            duration_ms,
        }
    }

    /// Trim and cap the query at `max_query_length` characters
    fn normalize_query(&self, query: &str) -> String {
        let trimmed = query.trim();
        if trimmed.chars().count() <= self.config.max_query_length {
            return trimmed.to_string();
        }

        tracing::debug!(
            "Truncating query to {} characters",
            self.config.max_query_length
        );
        trimmed
            .chars()
            .take(self.config.max_query_length)
            .collect::<String>()
            .trim_end()
            .to_string()
    }

    async fn ranked_results(&self, index: &Index, query: &str, k: usize) -> Vec<SearchResult> {
        let mut hits = match index.kind() {
            IndexKind::Lexical(lexical) => {
                lexical.search(index.chunks(), query, self.config.fuzzy_threshold)
            }
            IndexKind::Vector(vectors) => self.vector_hits(vectors, query).await,
        };

        if hits.is_empty() {
            hits = fallback_scan(index, query);
            if !hits.is_empty() {
                tracing::debug!("Keyword fallback matched {} chunks", hits.len());
            }
        }

        rank(&mut hits, index);
        hits.truncate(k);

        let keywords = highlight::keywords(query);
        let pattern = highlight::keyword_pattern(&keywords);

        hits.into_iter()
            .filter_map(|hit| {
                let chunk = index.chunk(hit.chunk)?;
                let center = hit.offset.or_else(|| {
                    pattern
                        .as_ref()
                        .and_then(|p| p.find(&chunk.text))
                        .map(|m| m.start())
                });
                let snippet =
                    highlight::extract_snippet(&chunk.text, center, self.config.snippet_length);
                let highlighted = self.highlighter.highlight(&snippet, pattern.as_ref());

                Some(SearchResult {
                    doc_id: chunk.doc_id.clone(),
                    ordinal: chunk.ordinal,
                    locator: chunk.locator,
                    snippet,
                    highlighted,
                    score: hit.score,
                })
            })
            .collect()
    }

    /// Cosine scores above `min_vector_score`. Any provider or
    /// model problem yields no hits so the keyword fallback runs.
    async fn vector_hits(&self, vectors: &VectorIndex, query: &str) -> Vec<ScoredChunk> {
        let Some(pool) = &self.embedder else {
            tracing::warn!("Vector index present but no embedding provider configured");
            return Vec::new();
        };

        if pool.model_id() != vectors.model_id() {
            tracing::error!(
                "Embedding model '{}' does not match index model '{}'",
                pool.model_id(),
                vectors.model_id()
            );
            return Vec::new();
        }

        let query_vector = match pool.embed_query(query).await {
            Ok(vector) => vector,
            Err(e) => {
                tracing::warn!("Query embedding failed, using keyword fallback: {}", e);
                return Vec::new();
            }
        };

        match vectors.search(&query_vector) {
            Ok(scored) => scored
                .into_iter()
                .filter(|hit| hit.score > self.config.min_vector_score)
                .collect(),
            Err(e) => {
                tracing::error!("Vector search failed: {}", e);
                Vec::new()
            }
        }
    }

    fn apply_empty_policy(&self, results: Vec<SearchResult>) -> Vec<SearchResult> {
        if !results.is_empty() {
            return results;
        }

        match self.config.empty_result_policy {
            EmptyResultPolicy::EmptyList => results,
            EmptyResultPolicy::PlaceholderMessage => vec![SearchResult {
                doc_id: String::new(),
                ordinal: 0,
                locator: Locator::default(),
                snippet: self.config.placeholder_message.clone(),
                highlighted: self.config.placeholder_message.clone(),
                score: 0.0,
            }],
        }
    }
}

/// Chunks containing any query token verbatim (case-sensitive).
/// Score is the fraction of tokens found.
fn fallback_scan(index: &Index, query: &str) -> Vec<ScoredChunk> {
    let tokens: Vec<&str> = query.split_whitespace().collect();
    if tokens.is_empty() {
        return Vec::new();
    }

    index
        .chunks()
        .iter()
        .enumerate()
        .filter_map(|(idx, chunk)| {
            let found: Vec<usize> = tokens
                .iter()
                .filter_map(|token| chunk.text.find(token))
                .collect();
            if found.is_empty() {
                return None;
            }
            Some(ScoredChunk {
                chunk: idx,
                score: found.len() as f32 / tokens.len() as f32,
                offset: found.iter().min().copied(),
            })
        })
        .collect()
}

/// Descending score; ties broken by (document id, ordinal).
fn rank(hits: &mut [ScoredChunk], index: &Index) {
    hits.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(Ordering::Equal)
            .then_with(|| match (index.chunk(a.chunk), index.chunk(b.chunk)) {
                (Some(x), Some(y)) => x
                    .doc_id
                    .cmp(&y.doc_id)
                    .then_with(|| x.ordinal.cmp(&y.ordinal)),
                _ => a.chunk.cmp(&b.chunk),
            })
    });
}
