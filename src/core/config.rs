//! Configuration management for docseek.
//!
//! This module handles loading configuration from TOML files and
//! environment variables, with sensible defaults for all settings.

use crate::core::error::{DocseekError, Result};
use crate::core::types::{EmptyResultPolicy, Granularity, Strategy};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub source: SourceConfig,
    #[serde(default)]
    pub indexing: IndexingConfig,
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub watcher: WatcherConfig,
    #[serde(default)]
    pub embedding: EmbeddingConfig,
}

/// Document source configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SourceConfig {
    /// Directory holding the documents
    #[serde(default = "default_source_dir")]
    pub dir: PathBuf,

    /// Descend into subdirectories
    #[serde(default)]
    pub recursive: bool,

    /// Maximum file size in MB (skip larger files)
    #[serde(default = "default_max_file_size")]
    pub max_file_size_mb: usize,

    /// File patterns to exclude (glob syntax)
    #[serde(default = "default_exclude_patterns")]
    pub exclude_patterns: Vec<String>,
}

/// Indexing configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct IndexingConfig {
    /// Chunking policy
    #[serde(default = "default_granularity")]
    pub granularity: Granularity,

    /// Words per chunk for `fixed_words` granularity
    #[serde(default = "default_fixed_words_size")]
    pub fixed_words_size: usize,

    /// Lexical or vector index
    #[serde(default = "default_strategy")]
    pub strategy: Strategy,

    /// Documents extracted in parallel during a rebuild
    #[serde(default = "default_max_concurrent_extractions")]
    pub max_concurrent_extractions: usize,
}

/// Search configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SearchConfig {
    /// Default number of results to return
    #[serde(default = "default_k")]
    pub default_k: usize,

    /// Maximum results per query
    #[serde(default = "default_max_k")]
    pub max_k: usize,

    /// Maximum query length in characters (longer queries are truncated)
    #[serde(default = "default_max_query_length")]
    pub max_query_length: usize,

    /// Snippet length in characters
    #[serde(default = "default_snippet_length")]
    pub snippet_length: usize,

    /// Minimum trigram similarity for a fuzzy token match
    #[serde(default = "default_fuzzy_threshold")]
    pub fuzzy_threshold: f32,

    /// Cosine similarity a chunk must exceed to qualify
    #[serde(default)]
    pub min_vector_score: f32,

    /// Behaviour when a query finds nothing
    #[serde(default)]
    pub empty_result_policy: EmptyResultPolicy,

    /// Message used by the placeholder policy
    #[serde(default = "default_placeholder_message")]
    pub placeholder_message: String,

    /// Opening emphasis marker
    #[serde(default = "default_highlight_marker")]
    pub highlight_open: String,

    /// Closing emphasis marker
    #[serde(default = "default_highlight_marker")]
    pub highlight_close: String,
}

/// Directory watcher configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct WatcherConfig {
    /// Watch the source directory for changes
    #[serde(default = "default_watch_enabled")]
    pub enabled: bool,

    /// Quiet period before a burst of events triggers a rebuild
    #[serde(default = "default_debounce_window_ms")]
    pub debounce_window_ms: u64,
}

/// Which embedding backend the vector strategy talks to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EmbeddingBackend {
    /// OpenAI-compatible `/embeddings` endpoint
    Http,
    /// Local feature-hashing embedder
    Hashing,
}

/// Embedding provider configuration (vector strategy only)
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EmbeddingConfig {
    #[serde(default = "default_embedding_backend")]
    pub backend: EmbeddingBackend,

    /// Base URL of the embeddings API
    #[serde(default = "default_embedding_endpoint")]
    pub endpoint: String,

    /// Model identifier
    #[serde(default = "default_embedding_model")]
    pub model: String,

    /// Environment variable holding the API key
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,

    /// Vector dimension (required for hashing, optional for http)
    #[serde(default)]
    pub dimension: Option<usize>,

    /// Total attempts per chunk before it is omitted
    #[serde(default = "default_max_retries")]
    pub max_retries: usize,

    /// First backoff delay, doubled on each retry
    #[serde(default = "default_initial_backoff_ms")]
    pub initial_backoff_ms: u64,

    /// In-flight provider requests
    #[serde(default = "default_max_concurrent_requests")]
    pub max_concurrent_requests: usize,

    /// Request timeout in seconds
    #[serde(default = "default_request_timeout")]
    pub request_timeout_sec: u64,
}

// Default value functions
fn default_source_dir() -> PathBuf {
    PathBuf::from("./data")
}

fn default_max_file_size() -> usize {
    50
}

fn default_exclude_patterns() -> Vec<String> {
    vec!["**/~$*".to_string(), "**/*.tmp".to_string()]
}

fn default_granularity() -> Granularity {
    Granularity::Document
}

fn default_fixed_words_size() -> usize {
    500
}

fn default_strategy() -> Strategy {
    Strategy::Lexical
}

fn default_max_concurrent_extractions() -> usize {
    4
}

fn default_k() -> usize {
    5
}

fn default_max_k() -> usize {
    100
}

fn default_max_query_length() -> usize {
    500
}

fn default_snippet_length() -> usize {
    300
}

fn default_fuzzy_threshold() -> f32 {
    0.5
}

fn default_placeholder_message() -> String {
    "No relevant information found in documents.".to_string()
}

fn default_highlight_marker() -> String {
    "**".to_string()
}

fn default_watch_enabled() -> bool {
    true
}

fn default_debounce_window_ms() -> u64 {
    300
}

fn default_embedding_backend() -> EmbeddingBackend {
    EmbeddingBackend::Http
}

fn default_embedding_endpoint() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_embedding_model() -> String {
    "text-embedding-3-small".to_string()
}

fn default_api_key_env() -> String {
    "OPENAI_API_KEY".to_string()
}

fn default_max_retries() -> usize {
    3
}

fn default_initial_backoff_ms() -> u64 {
    250
}

fn default_max_concurrent_requests() -> usize {
    4
}

fn default_request_timeout() -> u64 {
    30
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            dir: default_source_dir(),
            recursive: false,
            max_file_size_mb: default_max_file_size(),
            exclude_patterns: default_exclude_patterns(),
        }
    }
}

impl Default for IndexingConfig {
    fn default() -> Self {
        Self {
            granularity: default_granularity(),
            fixed_words_size: default_fixed_words_size(),
            strategy: default_strategy(),
            max_concurrent_extractions: default_max_concurrent_extractions(),
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            default_k: default_k(),
            max_k: default_max_k(),
            max_query_length: default_max_query_length(),
            snippet_length: default_snippet_length(),
            fuzzy_threshold: default_fuzzy_threshold(),
            min_vector_score: 0.0,
            empty_result_policy: EmptyResultPolicy::default(),
            placeholder_message: default_placeholder_message(),
            highlight_open: default_highlight_marker(),
            highlight_close: default_highlight_marker(),
        }
    }
}

impl Default for WatcherConfig {
    fn default() -> Self {
        Self {
            enabled: default_watch_enabled(),
            debounce_window_ms: default_debounce_window_ms(),
        }
    }
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            backend: default_embedding_backend(),
            endpoint: default_embedding_endpoint(),
            model: default_embedding_model(),
            api_key_env: default_api_key_env(),
            dimension: None,
            max_retries: default_max_retries(),
            initial_backoff_ms: default_initial_backoff_ms(),
            max_concurrent_requests: default_max_concurrent_requests(),
            request_timeout_sec: default_request_timeout(),
        }
    }
}

impl WatcherConfig {
    pub fn debounce_window(&self) -> Duration {
        Duration::from_millis(self.debounce_window_ms)
    }
}

impl Config {
    /// Load configuration from TOML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .map_err(|e| DocseekError::ConfigError(format!("Failed to read config file: {e}")))?;

        let config: Config = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Load config with priority: env vars > TOML > defaults
    ///
    /// File lookup order:
    /// 1. DOCSEEK_CONFIG env var
    /// 2. User config file (~/.config/docseek/config.toml)
    /// 3. ./docseek.toml
    /// 4. Defaults
    pub fn load() -> Result<Self> {
        let mut config = if let Ok(config_path) = env::var("DOCSEEK_CONFIG") {
            Self::from_file(config_path)?
        } else {
            match user_config_file() {
                Some(path) if path.exists() => Self::from_file(path)?,
                _ if Path::new("docseek.toml").exists() => Self::from_file("docseek.toml")?,
                _ => Self::default(),
            }
        };

        config.merge_env();
        config.validate()?;

        Ok(config)
    }

    /// Merge configuration with environment variables
    pub fn merge_env(&mut self) {
        if let Ok(dir) = env::var("DOCSEEK_DATA_DIR") {
            self.source.dir = PathBuf::from(dir);
        }

        if let Ok(granularity) = env::var("DOCSEEK_GRANULARITY") {
            match granularity.parse() {
                Ok(g) => self.indexing.granularity = g,
                Err(e) => tracing::warn!("Ignoring DOCSEEK_GRANULARITY: {}", e),
            }
        }
        if let Ok(size) = env::var("DOCSEEK_FIXED_WORDS_SIZE") {
            if let Ok(n) = size.parse() {
                self.indexing.fixed_words_size = n;
            }
        }
        if let Ok(strategy) = env::var("DOCSEEK_STRATEGY") {
            match strategy.parse() {
                Ok(s) => self.indexing.strategy = s,
                Err(e) => tracing::warn!("Ignoring DOCSEEK_STRATEGY: {}", e),
            }
        }

        if let Ok(default_k) = env::var("DOCSEEK_DEFAULT_K") {
            if let Ok(k) = default_k.parse() {
                self.search.default_k = k;
            }
        }
        if let Ok(max_k) = env::var("DOCSEEK_MAX_K") {
            if let Ok(k) = max_k.parse() {
                self.search.max_k = k;
            }
        }

        if let Ok(debounce) = env::var("DOCSEEK_DEBOUNCE_MS") {
            if let Ok(ms) = debounce.parse() {
                self.watcher.debounce_window_ms = ms;
            }
        }

        if let Ok(endpoint) = env::var("DOCSEEK_EMBEDDING_ENDPOINT") {
            self.embedding.endpoint = endpoint;
        }
        if let Ok(model) = env::var("DOCSEEK_EMBEDDING_MODEL") {
            self.embedding.model = model;
        }
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if self.indexing.fixed_words_size == 0 {
            return Err(DocseekError::ConfigError(
                "Fixed word window must be non-zero".to_string(),
            ));
        }

        if self.indexing.max_concurrent_extractions == 0 {
            return Err(DocseekError::ConfigError(
                "Max concurrent extractions must be non-zero".to_string(),
            ));
        }

        if self.search.default_k == 0 {
            return Err(DocseekError::ConfigError(
                "Default k must be non-zero".to_string(),
            ));
        }

        if self.search.default_k > self.search.max_k {
            return Err(DocseekError::ConfigError(
                "Default k cannot exceed max k".to_string(),
            ));
        }

        if self.search.max_query_length == 0 {
            return Err(DocseekError::ConfigError(
                "Max query length must be non-zero".to_string(),
            ));
        }

        if !(50..=2000).contains(&self.search.snippet_length) {
            return Err(DocseekError::ConfigError(
                "Snippet length must be between 50 and 2000 characters".to_string(),
            ));
        }

        if !(self.search.fuzzy_threshold > 0.0 && self.search.fuzzy_threshold <= 1.0) {
            return Err(DocseekError::ConfigError(
                "Fuzzy threshold must be in (0, 1]".to_string(),
            ));
        }

        if self.search.highlight_open.is_empty() || self.search.highlight_close.is_empty() {
            return Err(DocseekError::ConfigError(
                "Highlight markers must be non-empty".to_string(),
            ));
        }

        if self.watcher.debounce_window_ms == 0 {
            return Err(DocseekError::ConfigError(
                "Debounce window must be non-zero".to_string(),
            ));
        }

        if self.indexing.strategy == Strategy::Vector {
            self.validate_embedding()?;
        }

        Ok(())
    }

    fn validate_embedding(&self) -> Result<()> {
        let embedding = &self.embedding;

        if embedding.model.trim().is_empty() {
            return Err(DocseekError::ConfigError(
                "Embedding model must be set for the vector strategy".to_string(),
            ));
        }

        if embedding.max_retries == 0 {
            return Err(DocseekError::ConfigError(
                "Embedding retries must be at least 1".to_string(),
            ));
        }

        if embedding.max_concurrent_requests == 0 {
            return Err(DocseekError::ConfigError(
                "Max concurrent embedding requests must be non-zero".to_string(),
            ));
        }

        if embedding.backend == EmbeddingBackend::Hashing
            && embedding.dimension.unwrap_or(0) == 0
        {
            return Err(DocseekError::ConfigError(
                "Hashing embedder requires a non-zero dimension".to_string(),
            ));
        }

        Ok(())
    }

    /// Log configuration (redacting sensitive values)
    pub fn log_config(&self) {
        tracing::info!("Configuration loaded:");
        tracing::info!("  Source dir: {:?}", self.source.dir);
        tracing::info!("  Recursive: {}", self.source.recursive);
        tracing::info!("  Max file size: {} MB", self.source.max_file_size_mb);
        tracing::info!("  Granularity: {}", self.indexing.granularity);
        if self.indexing.granularity == Granularity::FixedWords {
            tracing::info!("  Fixed window: {} words", self.indexing.fixed_words_size);
        }
        tracing::info!("  Strategy: {}", self.indexing.strategy);
        tracing::info!("  Default k: {}", self.search.default_k);
        tracing::info!("  Max k: {}", self.search.max_k);
        tracing::info!("  Snippet length: {} chars", self.search.snippet_length);
        tracing::info!("  Empty result policy: {:?}", self.search.empty_result_policy);
        tracing::info!("  Watcher enabled: {}", self.watcher.enabled);
        tracing::info!("  Debounce window: {}ms", self.watcher.debounce_window_ms);
        if self.indexing.strategy == Strategy::Vector {
            tracing::info!("  Embedding backend: {:?}", self.embedding.backend);
            tracing::info!("  Embedding model: {}", self.embedding.model);
            tracing::info!("  Embedding endpoint: {}", self.embedding.endpoint);
            tracing::info!("  API key env: {}", self.embedding.api_key_env);
        }
    }
}

fn user_config_file() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("docseek").join("config.toml"))
}
