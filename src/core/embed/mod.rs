//! Embedding providers for the vector strategy.
//!
//! A provider turns one piece of text into a dense vector. The
//! [`EmbedderPool`] wraps a provider with bounded concurrency and
//! retry with exponential backoff; the index builder and the query
//! engine only ever talk to the pool.

mod hashing;
mod http;
mod pool;

pub use hashing::HashingEmbedder;
pub use http::HttpEmbedder;
pub use pool::{EmbedderPool, EmbeddingBatch};

use async_trait::async_trait;
use std::sync::Arc;

use crate::core::config::{EmbeddingBackend, EmbeddingConfig};
use crate::core::error::Result;

/// Text-to-vector backend
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Model identity; vectors from different models never mix
    fn model_id(&self) -> &str;

    /// Vector dimension, when known before the first call
    fn dimension(&self) -> Option<usize>;

    /// Embed a single text.
    ///
    /// Transient failures are reported as retryable
    /// `EmbeddingProvider` errors.
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;
}

/// Build the configured provider.
pub fn provider_from_config(config: &EmbeddingConfig) -> Result<Arc<dyn EmbeddingProvider>> {
    match config.backend {
        EmbeddingBackend::Http => Ok(Arc::new(HttpEmbedder::from_config(config)?)),
        EmbeddingBackend::Hashing => Ok(Arc::new(HashingEmbedder::new(
            config.dimension.unwrap_or(hashing::DEFAULT_DIMENSION),
        ))),
    }
}
