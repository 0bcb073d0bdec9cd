//! Dense vector index and cosine similarity.

use crate::core::error::{DocseekError, Result};
use crate::core::index::ScoredChunk;

/// Score given to vectors whose cosine is undefined
const MIN_SCORE: f32 = -1.0;

/// One chunk's embedding
#[derive(Debug, Clone, PartialEq)]
pub struct Embedding {
    /// Position of the chunk in the snapshot's chunk list
    pub chunk: usize,
    pub vector: Vec<f32>,
}

/// Embeddings produced by a single provider model.
///
/// Every vector has exactly `dimension` components; insertion
/// rejects anything else, so vectors from different models or
/// configurations can never be mixed in one index.
#[derive(Debug, Clone, PartialEq)]
pub struct VectorIndex {
    model_id: String,
    dimension: usize,
    embeddings: Vec<Embedding>,
}

impl VectorIndex {
    pub fn new(model_id: impl Into<String>, dimension: usize) -> Self {
        Self {
            model_id: model_id.into(),
            dimension,
            embeddings: Vec::new(),
        }
    }

    pub fn insert(&mut self, chunk: usize, vector: Vec<f32>) -> Result<()> {
        if vector.len() != self.dimension {
            return Err(DocseekError::DimensionMismatch {
                expected: self.dimension,
                actual: vector.len(),
            });
        }
        self.embeddings.push(Embedding { chunk, vector });
        Ok(())
    }

    pub fn model_id(&self) -> &str {
        &self.model_id
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    pub fn embeddings(&self) -> &[Embedding] {
        &self.embeddings
    }

    pub fn len(&self) -> usize {
        self.embeddings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.embeddings.is_empty()
    }

    /// Cosine similarity of `query` against every stored embedding.
    pub fn search(&self, query: &[f32]) -> Result<Vec<ScoredChunk>> {
        if self.is_empty() {
            return Ok(Vec::new());
        }
        if query.len() != self.dimension {
            return Err(DocseekError::DimensionMismatch {
                expected: self.dimension,
                actual: query.len(),
            });
        }

        Ok(self
            .embeddings
            .iter()
            .map(|e| ScoredChunk {
                chunk: e.chunk,
                score: cosine_similarity(query, &e.vector),
                offset: None,
            })
            .collect())
    }
}

/// Cosine similarity in [-1, 1].
///
/// Mismatched lengths or a zero-magnitude operand yield -1.0, the
/// lowest possible score.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return MIN_SCORE;
    }

    let mut dot = 0.0f64;
    let mut norm_a = 0.0f64;
    let mut norm_b = 0.0f64;
    for (x, y) in a.iter().zip(b) {
        let (x, y) = (*x as f64, *y as f64);
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    if norm_a == 0.0 || norm_b == 0.0 {
        return MIN_SCORE;
    }

    (dot / (norm_a.sqrt() * norm_b.sqrt())).clamp(-1.0, 1.0) as f32
}
