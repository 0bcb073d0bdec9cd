//! Index builder.
//!
//! Produces a complete, immutable [`Index`] from the source
//! directory:
//! 1. Scan the directory for supported documents
//! 2. Extract and chunk each document (bounded parallelism)
//! 3. Build the strategy index (lexical tables or embeddings)
//!
//! A document that fails extraction is logged and left out; the
//! rest of the rebuild goes on. Only an unreadable source directory
//! or an embedding dimension mismatch fails the whole rebuild, and
//! in that case the previously published snapshot stays current.

use std::fs;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

use crate::core::config::Config;
use crate::core::embed::EmbedderPool;
use crate::core::error::{DocseekError, Result};
use crate::core::extract::ExtractorRegistry;
use crate::core::index::{Index, IndexStore};
use crate::core::indexer::walker::SourceFile;
use crate::core::indexer::{Chunker, FileWalker};
use crate::core::types::{Chunk, Document, IndexStats};

/// Outcome of extracting and chunking one document
struct Processed {
    document: Document,
    chunks: Result<Vec<Chunk>>,
}

/// Builds index snapshots and hands out generation numbers.
pub struct IndexBuilder {
    walker: FileWalker,
    chunker: Chunker,
    extractors: ExtractorRegistry,

    /// Present for the vector strategy
    embedder: Option<Arc<EmbedderPool>>,

    max_concurrent: usize,
    generation: AtomicU64,
}

impl IndexBuilder {
    /// Create a lexical-strategy builder
    pub fn new(
        walker: FileWalker,
        chunker: Chunker,
        extractors: ExtractorRegistry,
        max_concurrent: usize,
    ) -> Self {
        Self {
            walker,
            chunker,
            extractors,
            embedder: None,
            max_concurrent: max_concurrent.max(1),
            generation: AtomicU64::new(0),
        }
    }

    /// Switch to the vector strategy, embedding through `pool`
    pub fn with_embedder(mut self, pool: Arc<EmbedderPool>) -> Self {
        self.embedder = Some(pool);
        self
    }

    /// Builder for `config`. `embedder` is used when the configured
    /// strategy is vector.
    pub fn from_config(config: &Config, embedder: Option<Arc<EmbedderPool>>) -> Result<Self> {
        let walker = FileWalker::new(
            config.source.exclude_patterns.clone(),
            config.source.max_file_size_mb,
            config.source.recursive,
        )?;
        let chunker = Chunker::new(
            config.indexing.granularity,
            config.indexing.fixed_words_size,
        );

        let builder = Self::new(
            walker,
            chunker,
            ExtractorRegistry::with_defaults(),
            config.indexing.max_concurrent_extractions,
        );

        Ok(match embedder {
            Some(pool) => builder.with_embedder(pool),
            None => builder,
        })
    }

    /// Generation of the most recent build attempt
    pub fn last_generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    /// Build a fresh snapshot of `root`.
    pub async fn build(&self, root: &Path) -> Result<(Index, IndexStats)> {
        let start = Instant::now();

        tracing::info!("Scanning {:?}", root);
        let files = self.walker.collect_documents(root)?;
        tracing::info!("Found {} documents to index", files.len());

        let processed = self.process_all(files).await?;

        let mut documents = Vec::new();
        let mut chunks = Vec::new();
        let mut documents_skipped = 0;

        for Processed {
            document,
            chunks: outcome,
        } in processed
        {
            match outcome {
                Ok(doc_chunks) => {
                    tracing::debug!("Indexed {} ({} chunks)", document.id, doc_chunks.len());
                    chunks.extend(doc_chunks);
                    documents.push(document);
                }
                Err(e) => {
                    tracing::warn!("Skipping {}: {}", document.id, e);
                    documents_skipped += 1;
                }
            }
        }

        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let documents_indexed = documents.len();
        let chunks_created = chunks.len();

        let (index, embeddings_omitted) = match &self.embedder {
            Some(pool) => {
                let batch = pool.embed_chunks(&chunks).await?;
                let omitted = batch.omitted;
                (
                    Index::vector(generation, documents, chunks, batch.index),
                    omitted,
                )
            }
            None => {
                let index = tokio::task::spawn_blocking(move || {
                    Index::lexical(generation, documents, chunks)
                })
                .await
                .map_err(|e| DocseekError::IndexingFailed(format!("lexical build: {e}")))?;
                (index, 0)
            }
        };

        let duration_ms = start.elapsed().as_millis() as u64;

        tracing::info!(
            "Index generation {} built: {} documents indexed, {} skipped, \
             {} chunks in {}ms",
            generation,
            documents_indexed,
            documents_skipped,
            chunks_created,
            duration_ms
        );

        let stats = IndexStats {
            generation,
            documents_indexed,
            documents_skipped,
            chunks_created,
            embeddings_omitted,
            duration_ms,
            built_at: index.built_at(),
        };

        Ok((index, stats))
    }

    /// Build and publish. On failure the store keeps serving the
    /// previous generation.
    pub async fn rebuild(&self, root: &Path, store: &IndexStore) -> Result<IndexStats> {
        match self.build(root).await {
            Ok((index, stats)) => {
                store.publish(index);
                Ok(stats)
            }
            Err(e) => {
                tracing::error!(
                    "Rebuild failed, keeping generation {}: {}",
                    store.generation(),
                    e
                );
                Err(e)
            }
        }
    }

    /// Extract and chunk every file on blocking tasks, at most
    /// `max_concurrent` at a time. Output is ordered by document id.
    async fn process_all(&self, files: Vec<SourceFile>) -> Result<Vec<Processed>> {
        let total = files.len();
        let semaphore = Arc::new(Semaphore::new(self.max_concurrent));
        let mut tasks = JoinSet::new();

        for file in files {
            let permit = Arc::clone(&semaphore)
                .acquire_owned()
                .await
                .map_err(|e| DocseekError::IndexingFailed(format!("semaphore error: {e}")))?;
            let extractors = self.extractors.clone();
            let chunker = self.chunker;

            tasks.spawn_blocking(move || {
                let _permit = permit;
                process_file(&extractors, &chunker, file)
            });
        }

        let mut processed = Vec::with_capacity(total);
        while let Some(joined) = tasks.join_next().await {
            let item =
                joined.map_err(|e| DocseekError::IndexingFailed(format!("extraction task: {e}")))?;
            processed.push(item);

            if processed.len() % 100 == 0 {
                tracing::info!("Progress: {}/{} documents processed", processed.len(), total);
            }
        }

        processed.sort_by(|a, b| a.document.id.cmp(&b.document.id));
        Ok(processed)
    }
}

/// Read, extract and chunk a single file
fn process_file(extractors: &ExtractorRegistry, chunker: &Chunker, file: SourceFile) -> Processed {
    let SourceFile { path, document } = file;

    let chunks = fs::read(&path)
        .map_err(|e| DocseekError::ExtractionFailed {
            doc_id: document.id.clone(),
            reason: format!("read failed: {e}"),
        })
        .and_then(|bytes| extractors.extract(&document.id, &bytes, document.format))
        .map(|extracted| {
            if extracted.is_blank() {
                tracing::debug!("No text in {}", document.id);
            }
            chunker.chunk(&document.id, &extracted)
        });

    Processed { document, chunks }
}
