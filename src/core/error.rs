//! Error types and error handling for docseek.
//!
//! Document-level and chunk-level failures are contained by the
//! index builder; only source-directory failures abort a rebuild.
//! Nothing in this taxonomy ever reaches the query path.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for docseek operations
pub type Result<T> = std::result::Result<T, DocseekError>;

/// Main error type for docseek
#[derive(Error, Debug)]
pub enum DocseekError {
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("Extraction failed for {doc_id}: {reason}")]
    ExtractionFailed { doc_id: String, reason: String },

    #[error("Embedding provider error (retryable: {retryable}): {reason}")]
    EmbeddingProvider { retryable: bool, reason: String },

    #[error("Embedding dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("Source directory unreadable: {path:?}: {reason}")]
    DirectoryUnreadable { path: PathBuf, reason: String },

    #[error("Indexing failed: {0}")]
    IndexingFailed(String),

    #[error("Watch failed: {0}")]
    WatchFailed(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),
}

impl DocseekError {
    /// Build a retryable provider error (timeouts, rate limits, 5xx)
    pub fn retryable(reason: impl Into<String>) -> Self {
        DocseekError::EmbeddingProvider {
            retryable: true,
            reason: reason.into(),
        }
    }

    /// Build a fatal provider error (invalid input, auth failure)
    pub fn fatal(reason: impl Into<String>) -> Self {
        DocseekError::EmbeddingProvider {
            retryable: false,
            reason: reason.into(),
        }
    }

    /// Get user-friendly error message
    pub fn message(&self) -> String {
        self.to_string()
    }

    /// Errors that drop one document and let the rebuild continue
    pub fn is_document_level(&self) -> bool {
        matches!(
            self,
            DocseekError::UnsupportedFormat(_) | DocseekError::ExtractionFailed { .. }
        )
    }

    /// Provider errors eligible for another attempt after backoff
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            DocseekError::EmbeddingProvider {
                retryable: true,
                ..
            }
        )
    }
}
