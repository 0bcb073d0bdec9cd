//! Unified service container for docseek
//!
//! Wires configuration, the snapshot store, the index builder, the
//! query engine and (optionally) the directory watcher together.

use async_trait::async_trait;
use std::fs;
use std::path::Path;
use std::sync::Arc;

use crate::core::config::Config;
use crate::core::embed::{self, EmbedderPool, EmbeddingProvider};
use crate::core::error::{DocseekError, Result};
use crate::core::index::IndexStore;
use crate::core::indexer::IndexBuilder;
use crate::core::search::SearchService;
use crate::core::types::{IndexStats, SearchResponse, Strategy};
use crate::core::watcher::{DirectoryWatcher, RebuildTarget};

/// Unified services container
///
/// Cheap to clone; every clone shares the same store and builder.
#[derive(Clone)]
pub struct Services {
    /// Application configuration
    pub config: Arc<Config>,

    /// Current index snapshot
    pub store: IndexStore,

    /// Produces new snapshots
    pub builder: Arc<IndexBuilder>,

    /// Query engine over `store`
    pub search: Arc<SearchService>,
}

impl Services {
    /// Create services from configuration, building the configured
    /// embedding provider for the vector strategy.
    pub fn new(config: Config) -> Result<Self> {
        let provider = match config.indexing.strategy {
            Strategy::Vector => Some(embed::provider_from_config(&config.embedding)?),
            Strategy::Lexical => None,
        };
        Self::with_provider(config, provider)
    }

    /// Create services with an explicit embedding provider
    pub fn with_provider(
        config: Config,
        provider: Option<Arc<dyn EmbeddingProvider>>,
    ) -> Result<Self> {
        config.validate()?;

        let pool = match (config.indexing.strategy, provider) {
            (Strategy::Vector, Some(provider)) => {
                Some(Arc::new(EmbedderPool::from_config(provider, &config.embedding)))
            }
            (Strategy::Vector, None) => {
                return Err(DocseekError::ConfigError(
                    "Vector strategy requires an embedding provider".to_string(),
                ))
            }
            (Strategy::Lexical, _) => None,
        };

        let store = IndexStore::new();
        let builder = Arc::new(IndexBuilder::from_config(&config, pool.clone())?);
        let search = Arc::new(SearchService::new(
            store.clone(),
            config.search.clone(),
            pool,
        )?);

        Ok(Self {
            config: Arc::new(config),
            store,
            builder,
            search,
        })
    }

    pub fn source_dir(&self) -> &Path {
        &self.config.source.dir
    }

    /// Rebuild from the source directory and publish the result
    pub async fn rebuild(&self) -> Result<IndexStats> {
        self.builder.rebuild(self.source_dir(), &self.store).await
    }

    /// Search the current snapshot
    pub async fn search(&self, query: &str, top_k: Option<usize>) -> SearchResponse {
        self.search.search(query, top_k).await
    }

    /// Create the source directory if it does not exist yet
    pub fn ensure_source_dir(&self) -> Result<()> {
        let dir = self.source_dir();
        if !dir.exists() {
            tracing::info!("Creating source directory {:?}", dir);
            fs::create_dir_all(dir)?;
        }
        Ok(())
    }

    /// Create the source directory if needed and run the initial
    /// build. A failed initial build leaves the empty index in
    /// place and is not fatal.
    pub async fn initialize(&self) -> Result<()> {
        self.ensure_source_dir()?;

        if let Err(e) = self.rebuild().await {
            tracing::warn!("Initial build failed, serving empty index: {}", e);
        }
        Ok(())
    }

    /// Start watching the source directory
    pub fn watch(&self) -> Result<DirectoryWatcher> {
        DirectoryWatcher::start(
            self.source_dir(),
            self.config.source.recursive,
            Arc::new(self.clone()),
            self.config.watcher.debounce_window(),
        )
    }

    /// Initialise and, when enabled, start the watcher
    pub async fn start(config: Config) -> Result<(Self, Option<DirectoryWatcher>)> {
        let services = Self::new(config)?;
        services.initialize().await?;

        let watcher = if services.config.watcher.enabled {
            Some(services.watch()?)
        } else {
            None
        };

        Ok((services, watcher))
    }
}

#[async_trait]
impl RebuildTarget for Services {
    async fn rebuild(&self) -> Result<IndexStats> {
        Services::rebuild(self).await
    }
}
