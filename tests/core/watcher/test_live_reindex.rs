//! File changes on disk reach search results through the watcher

use docseek::core::services::Services;
use docseek::core::types::Granularity;
use std::time::Duration;

use crate::common::{test_config, wait_for_generation, TestCorpus};

const TIMEOUT: Duration = Duration::from_secs(10);

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_added_and_removed_documents_are_picked_up() {
    let mut corpus = TestCorpus::with_texts(&[("first.txt", "original contents")]);

    let mut config = test_config(corpus.path(), Granularity::Document);
    config.watcher.enabled = true;
    config.watcher.debounce_window_ms = 100;

    let (services, watcher) = Services::start(config).await.unwrap();
    let watcher = watcher.expect("watcher should be enabled");
    assert_eq!(services.store.generation(), 1);
    assert!(services.search("hedgehog", None).await.results.is_empty());

    corpus.write("second.txt", b"a hedgehog appeared");
    wait_for_generation(&services, 2, TIMEOUT).await;

    let found = tokio::time::timeout(TIMEOUT, async {
        loop {
            let response = services.search("hedgehog", None).await;
            if !response.results.is_empty() {
                return response;
            }
            tokio::time::sleep(Duration::from_millis(50)).await;
        }
    })
    .await
    .expect("new document never became searchable");
    assert_eq!(found.results[0].doc_id, "second.txt");

    corpus.remove("second.txt");
    tokio::time::timeout(TIMEOUT, async {
        while !services.search("hedgehog", None).await.results.is_empty() {
            tokio::time::sleep(Duration::from_millis(50)).await;
        }
    })
    .await
    .expect("removed document stayed searchable");

    watcher.stop().await;
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_ignored_files_do_not_trigger_rebuilds() {
    let mut corpus = TestCorpus::with_texts(&[("notes.txt", "stable")]);

    let mut config = test_config(corpus.path(), Granularity::Document);
    config.watcher.enabled = true;
    config.watcher.debounce_window_ms = 50;

    let (services, watcher) = Services::start(config).await.unwrap();
    let watcher = watcher.expect("watcher should be enabled");

    corpus.write("image.png", b"binary");
    corpus.write(".hidden.txt", b"secret");
    tokio::time::sleep(Duration::from_millis(500)).await;

    assert_eq!(services.store.generation(), 1);
    watcher.stop().await;
}
