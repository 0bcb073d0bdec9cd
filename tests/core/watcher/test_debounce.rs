//! Debounce and supersede behaviour of the rebuild coordinator

use async_trait::async_trait;
use docseek::core::error::Result;
use docseek::core::types::IndexStats;
use docseek::core::watcher::{CoordinatorState, RebuildCoordinator, RebuildTarget, WatchEvent};
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Counts rebuilds and tracks how many overlap
struct MockTarget {
    started: AtomicUsize,
    running: AtomicUsize,
    max_running: AtomicUsize,
    build_time: Duration,
}

impl MockTarget {
    fn new(build_time: Duration) -> Arc<Self> {
        Arc::new(Self {
            started: AtomicUsize::new(0),
            running: AtomicUsize::new(0),
            max_running: AtomicUsize::new(0),
            build_time,
        })
    }

    fn builds(&self) -> usize {
        self.started.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RebuildTarget for MockTarget {
    async fn rebuild(&self) -> Result<IndexStats> {
        let n = self.started.fetch_add(1, Ordering::SeqCst) + 1;
        let running = self.running.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_running.fetch_max(running, Ordering::SeqCst);

        tokio::time::sleep(self.build_time).await;

        self.running.fetch_sub(1, Ordering::SeqCst);
        Ok(IndexStats {
            generation: n as u64,
            documents_indexed: 0,
            documents_skipped: 0,
            chunks_created: 0,
            embeddings_omitted: 0,
            duration_ms: self.build_time.as_millis() as u64,
            built_at: chrono::Utc::now(),
        })
    }
}

fn change(i: usize) -> WatchEvent {
    WatchEvent::Modified(PathBuf::from(format!("doc{i}.txt")))
}

#[tokio::test]
async fn test_burst_of_events_coalesces_into_one_rebuild() {
    let target = MockTarget::new(Duration::from_millis(10));
    let handle = RebuildCoordinator::spawn(target.clone(), Duration::from_millis(300));

    for i in 0..10 {
        handle.notify(change(i)).await.unwrap();
        tokio::time::sleep(Duration::from_millis(10)).await;
    }

    // Still inside the trailing window: nothing has started yet
    assert_eq!(target.builds(), 0);

    tokio::time::sleep(Duration::from_millis(700)).await;
    assert_eq!(target.builds(), 1);
    assert_eq!(handle.state(), CoordinatorState::Idle);

    handle.shutdown().await;
    assert_eq!(target.builds(), 1);
}

#[tokio::test]
async fn test_events_during_build_queue_exactly_one_more() {
    let target = MockTarget::new(Duration::from_millis(200));
    let handle = RebuildCoordinator::spawn(target.clone(), Duration::from_millis(50));

    handle.notify(change(0)).await.unwrap();
    tokio::time::sleep(Duration::from_millis(100)).await;
    assert_eq!(target.builds(), 1);
    assert_eq!(handle.state(), CoordinatorState::Building);

    // Several bursts while the first build is still running
    for i in 1..4 {
        handle.notify(change(i)).await.unwrap();
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    tokio::time::sleep(Duration::from_millis(60)).await;
    assert_eq!(
        handle.state(),
        CoordinatorState::BuildingWithPendingRequest
    );

    tokio::time::sleep(Duration::from_millis(600)).await;
    assert_eq!(target.builds(), 2);
    assert_eq!(target.max_running.load(Ordering::SeqCst), 1);
    assert_eq!(handle.state(), CoordinatorState::Idle);

    handle.shutdown().await;
}

#[tokio::test]
async fn test_separate_bursts_rebuild_separately() {
    let target = MockTarget::new(Duration::from_millis(5));
    let handle = RebuildCoordinator::spawn(target.clone(), Duration::from_millis(50));

    handle.notify(change(0)).await.unwrap();
    tokio::time::sleep(Duration::from_millis(250)).await;
    handle.notify(change(1)).await.unwrap();
    tokio::time::sleep(Duration::from_millis(250)).await;

    assert_eq!(target.builds(), 2);
    assert_eq!(target.max_running.load(Ordering::SeqCst), 1);
    handle.shutdown().await;
}
