//! Single-writer, many-reader holder of the current snapshot.
//!
//! Publication swaps one `Arc<Index>` for another, so a reader
//! sees either the old or the new generation in full and never a
//! mix of both. Readers holding an old `Arc` keep it alive until
//! they drop it.

use std::sync::Arc;
use tokio::sync::watch;

use crate::core::index::Index;

#[derive(Debug, Clone)]
pub struct IndexStore {
    sender: Arc<watch::Sender<Arc<Index>>>,
}

impl IndexStore {
    /// Store seeded with the empty generation-0 index
    pub fn new() -> Self {
        Self::with_index(Index::empty())
    }

    pub fn with_index(index: Index) -> Self {
        let (sender, _receiver) = watch::channel(Arc::new(index));
        Self {
            sender: Arc::new(sender),
        }
    }

    /// Current snapshot. Never blocks on a running rebuild.
    pub fn get(&self) -> Arc<Index> {
        self.sender.borrow().clone()
    }

    /// Replace the current snapshot, returning the previous one
    pub fn publish(&self, index: Index) -> Arc<Index> {
        let generation = index.generation();
        let previous = self.sender.send_replace(Arc::new(index));
        tracing::debug!(
            "Published index generation {} (was {})",
            generation,
            previous.generation()
        );
        previous
    }

    /// Receiver notified on every publication
    pub fn subscribe(&self) -> watch::Receiver<Arc<Index>> {
        self.sender.subscribe()
    }

    pub fn generation(&self) -> u64 {
        self.sender.borrow().generation()
    }
}

impl Default for IndexStore {
    fn default() -> Self {
        Self::new()
    }
}
