//! Embedder pool for concurrent embedding operations.

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

use crate::core::config::EmbeddingConfig;
use crate::core::embed::EmbeddingProvider;
use crate::core::error::{DocseekError, Result};
use crate::core::index::VectorIndex;
use crate::core::types::Chunk;

const MAX_BACKOFF: Duration = Duration::from_secs(10);

/// Outcome of embedding every chunk of a rebuild
#[derive(Debug)]
pub struct EmbeddingBatch {
    pub index: VectorIndex,

    /// Chunks whose embedding failed after all attempts
    pub omitted: usize,
}

/// Provider wrapper with concurrency control and retry.
///
/// Rebuild embeddings and query embeddings draw on separate permit
/// budgets, so a query never waits behind a rebuild's backlog.
pub struct EmbedderPool {
    provider: Arc<dyn EmbeddingProvider>,

    /// Limits in-flight provider requests from rebuilds
    semaphore: Semaphore,

    /// Limits in-flight provider requests from queries
    query_semaphore: Semaphore,

    /// Total attempts per text (first try included)
    max_attempts: usize,

    initial_backoff: Duration,
}

impl EmbedderPool {
    pub fn new(
        provider: Arc<dyn EmbeddingProvider>,
        max_concurrent: usize,
        max_attempts: usize,
        initial_backoff: Duration,
    ) -> Self {
        Self {
            provider,
            semaphore: Semaphore::new(max_concurrent.max(1)),
            query_semaphore: Semaphore::new(max_concurrent.max(1)),
            max_attempts: max_attempts.max(1),
            initial_backoff,
        }
    }

    pub fn from_config(provider: Arc<dyn EmbeddingProvider>, config: &EmbeddingConfig) -> Self {
        Self::new(
            provider,
            config.max_concurrent_requests,
            config.max_retries,
            Duration::from_millis(config.initial_backoff_ms),
        )
    }

    pub fn model_id(&self) -> &str {
        self.provider.model_id()
    }

    pub fn dimension(&self) -> Option<usize> {
        self.provider.dimension()
    }

    pub fn available_permits(&self) -> usize {
        self.semaphore.available_permits()
    }

    /// Delay before attempt `attempt + 1`
    fn backoff(&self, attempt: usize) -> Duration {
        let factor = 1u32 << (attempt.saturating_sub(1)).min(16) as u32;
        self.initial_backoff.saturating_mul(factor).min(MAX_BACKOFF)
    }

    pub fn available_query_permits(&self) -> usize {
        self.query_semaphore.available_permits()
    }

    /// Embed one text on the rebuild budget, retrying retryable
    /// failures with exponential backoff.
    pub async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        self.embed_with(&self.semaphore, text).await
    }

    /// Embed a query string on the query budget
    pub async fn embed_query(&self, query: &str) -> Result<Vec<f32>> {
        self.embed_with(&self.query_semaphore, query).await
    }

    /// Retry loop shared by both budgets. The permit is released
    /// while backing off.
    async fn embed_with(&self, semaphore: &Semaphore, text: &str) -> Result<Vec<f32>> {
        let mut attempt = 0;

        loop {
            attempt += 1;

            let result = {
                let _permit = semaphore
                    .acquire()
                    .await
                    .map_err(|e| DocseekError::fatal(format!("semaphore error: {e}")))?;
                self.provider.embed(text).await
            };

            match result {
                Ok(vector) => return Ok(vector),
                Err(e) if e.is_retryable() && attempt < self.max_attempts => {
                    let delay = self.backoff(attempt);
                    tracing::debug!(
                        "Embedding attempt {}/{} failed ({}), retrying in {:?}",
                        attempt,
                        self.max_attempts,
                        e,
                        delay
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(e) => return Err(e),
            }
        }
    }

    /// Embed every chunk of a rebuild.
    ///
    /// Chunks that still fail after retries are left out of the
    /// vector index and counted in `omitted`. A vector whose length
    /// differs from the provider's dimension (or from the first
    /// vector returned, when the provider does not declare one)
    /// fails the whole batch with `DimensionMismatch`.
    pub async fn embed_chunks(self: &Arc<Self>, chunks: &[Chunk]) -> Result<EmbeddingBatch> {
        let mut tasks = JoinSet::new();
        for (idx, chunk) in chunks.iter().enumerate() {
            let pool = Arc::clone(self);
            let text = chunk.text.clone();
            tasks.spawn(async move { (idx, pool.embed(&text).await) });
        }

        let mut vectors = Vec::with_capacity(chunks.len());
        let mut omitted = 0;

        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((idx, Ok(vector))) => vectors.push((idx, vector)),
                Ok((idx, Err(e))) => {
                    let chunk = &chunks[idx];
                    tracing::warn!(
                        "Omitting {}#{} from vector index: {}",
                        chunk.doc_id,
                        chunk.ordinal,
                        e
                    );
                    omitted += 1;
                }
                Err(e) => {
                    tracing::warn!("Embedding task failed: {}", e);
                    omitted += 1;
                }
            }
        }

        vectors.sort_by_key(|(idx, _)| *idx);

        let dimension = self
            .dimension()
            .or_else(|| vectors.first().map(|(_, v)| v.len()))
            .unwrap_or(0);

        let mut index = VectorIndex::new(self.model_id(), dimension);
        for (idx, vector) in vectors {
            index.insert(idx, vector)?;
        }

        Ok(EmbeddingBatch { index, omitted })
    }
}
