//! Immutable index snapshots.
//!
//! An [`Index`] is built once by the index builder and never
//! mutated afterwards. Readers obtain it from the [`IndexStore`]
//! as an `Arc` and keep a consistent view for the whole query,
//! even if a newer generation is published meanwhile.

pub mod lexical;
pub mod store;
pub mod vector;

pub use lexical::LexicalIndex;
pub use store::IndexStore;
pub use vector::{cosine_similarity, Embedding, VectorIndex};

use chrono::{DateTime, Utc};

use crate::core::types::{Chunk, Document, Strategy};

/// A chunk matched by a strategy, before ranking.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoredChunk {
    /// Position of the chunk in [`Index::chunks`]
    pub chunk: usize,

    pub score: f32,

    /// Byte offset of the best match inside the chunk text, used to
    /// centre the snippet
    pub offset: Option<usize>,
}

/// Strategy-specific lookup structure
#[derive(Debug, Clone)]
pub enum IndexKind {
    Lexical(LexicalIndex),
    Vector(VectorIndex),
}

/// One generation of searchable state.
#[derive(Debug, Clone)]
pub struct Index {
    generation: u64,
    built_at: DateTime<Utc>,
    documents: Vec<Document>,
    chunks: Vec<Chunk>,
    kind: IndexKind,
}

impl Index {
    /// Generation 0: nothing indexed yet
    pub fn empty() -> Self {
        Self {
            generation: 0,
            built_at: Utc::now(),
            documents: Vec::new(),
            chunks: Vec::new(),
            kind: IndexKind::Lexical(LexicalIndex::default()),
        }
    }

    /// Build a lexical snapshot over `chunks`
    pub fn lexical(generation: u64, documents: Vec<Document>, chunks: Vec<Chunk>) -> Self {
        let lexical = LexicalIndex::build(&chunks);
        Self {
            generation,
            built_at: Utc::now(),
            documents,
            chunks,
            kind: IndexKind::Lexical(lexical),
        }
    }

    /// Wrap precomputed embeddings in a vector snapshot
    pub fn vector(
        generation: u64,
        documents: Vec<Document>,
        chunks: Vec<Chunk>,
        vectors: VectorIndex,
    ) -> Self {
        Self {
            generation,
            built_at: Utc::now(),
            documents,
            chunks,
            kind: IndexKind::Vector(vectors),
        }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn built_at(&self) -> DateTime<Utc> {
        self.built_at
    }

    pub fn documents(&self) -> &[Document] {
        &self.documents
    }

    pub fn chunks(&self) -> &[Chunk] {
        &self.chunks
    }

    pub fn chunk(&self, idx: usize) -> Option<&Chunk> {
        self.chunks.get(idx)
    }

    pub fn kind(&self) -> &IndexKind {
        &self.kind
    }

    pub fn strategy(&self) -> Strategy {
        match self.kind {
            IndexKind::Lexical(_) => Strategy::Lexical,
            IndexKind::Vector(_) => Strategy::Vector,
        }
    }

    /// No chunks to search
    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }
}

impl Default for Index {
    fn default() -> Self {
        Self::empty()
    }
}
