//! Readers never observe a partially published snapshot

use docseek::core::index::{Index, IndexStore};
use docseek::core::types::{Chunk, Document, DocumentFormat, Granularity, Locator};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crate::common::{create_test_services, TestCorpus};

/// A snapshot whose every chunk and document is tagged with its
/// generation
fn tagged_index(generation: u64, size: usize) -> Index {
    let documents = (0..size)
        .map(|i| Document {
            id: format!("gen{generation}-doc{i}.txt"),
            size_bytes: 1,
            format: DocumentFormat::Txt,
        })
        .collect();
    let chunks = (0..size)
        .map(|i| Chunk {
            doc_id: format!("gen{generation}-doc{i}.txt"),
            ordinal: 0,
            locator: Locator::default(),
            text: format!("generation {generation}"),
        })
        .collect();
    Index::lexical(generation, documents, chunks)
}

fn assert_consistent(index: &Index) {
    let generation = index.generation();
    if generation == 0 {
        assert!(index.is_empty());
        return;
    }

    let prefix = format!("gen{generation}-");
    let text = format!("generation {generation}");
    assert!(index.documents().iter().all(|d| d.id.starts_with(&prefix)));
    assert!(index.chunks().iter().all(|c| c.doc_id.starts_with(&prefix)));
    assert!(index.chunks().iter().all(|c| c.text == text));
}

#[test]
fn test_concurrent_readers_see_whole_generations() {
    let store = IndexStore::new();
    let done = Arc::new(AtomicBool::new(false));

    let readers: Vec<_> = (0..4)
        .map(|_| {
            let store = store.clone();
            let done = Arc::clone(&done);
            thread::spawn(move || {
                let mut last_seen = 0;
                let mut reads = 0usize;
                while !done.load(Ordering::SeqCst) {
                    let index = store.get();
                    assert_consistent(&index);
                    assert!(
                        index.generation() >= last_seen,
                        "generation went backwards"
                    );
                    last_seen = index.generation();
                    reads += 1;
                }
                reads
            })
        })
        .collect();

    for generation in 1..=200 {
        store.publish(tagged_index(generation, 20));
    }
    thread::sleep(Duration::from_millis(20));
    done.store(true, Ordering::SeqCst);

    for reader in readers {
        assert!(reader.join().unwrap() > 0);
    }
    assert_eq!(store.generation(), 200);
}

#[test]
fn test_held_snapshot_survives_publication() {
    let store = IndexStore::new();
    store.publish(tagged_index(1, 5));
    let held = store.get();

    for generation in 2..10 {
        store.publish(tagged_index(generation, 5));
    }

    assert_eq!(held.generation(), 1);
    assert_consistent(&held);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_search_during_rebuilds() {
    let files: Vec<(String, String)> = (0..30)
        .map(|i| (format!("doc{i:02}.txt"), format!("shared keyword number {i}")))
        .collect();
    let refs: Vec<(&str, &str)> = files
        .iter()
        .map(|(n, c)| (n.as_str(), c.as_str()))
        .collect();
    let corpus = TestCorpus::with_texts(&refs);
    let services = create_test_services(corpus.path(), Granularity::Document);
    services.rebuild().await.unwrap();

    let rebuilder = {
        let services = services.clone();
        tokio::spawn(async move {
            for _ in 0..5 {
                services.rebuild().await.unwrap();
            }
        })
    };

    for _ in 0..50 {
        let response = services.search("keyword", Some(100)).await;
        assert_eq!(response.count, 30);
        assert!(response.generation >= 1);
    }

    rebuilder.await.unwrap();
    assert_eq!(services.store.generation(), 6);
}
