// Test helper functions

use docseek::core::config::Config;
use docseek::core::services::Services;
use docseek::core::types::{Granularity, IndexStats};
use std::path::Path;
use std::time::Duration;

/// Configuration rooted at `dir` with the watcher disabled and a
/// short debounce window
#[allow(dead_code)] // Used in integration tests
pub fn test_config(dir: &Path, granularity: Granularity) -> Config {
    let mut config = Config::default();
    config.source.dir = dir.to_path_buf();
    config.indexing.granularity = granularity;
    config.watcher.enabled = false;
    config.watcher.debounce_window_ms = 100;
    config
}

/// Create lexical services over `dir`
#[allow(dead_code)] // Used in integration tests
pub fn create_test_services(dir: &Path, granularity: Granularity) -> Services {
    Services::new(test_config(dir, granularity)).expect("Failed to create services")
}

/// Assert that index stats are valid
#[allow(dead_code)] // Used in integration tests
pub fn assert_valid_stats(stats: &IndexStats) {
    assert!(
        stats.documents_indexed > 0,
        "Expected documents_indexed > 0, got {}",
        stats.documents_indexed
    );
    assert!(
        stats.chunks_created >= stats.documents_indexed,
        "Expected chunks_created ({}) >= documents_indexed ({})",
        stats.chunks_created,
        stats.documents_indexed
    );
    assert!(
        stats.generation > 0,
        "Expected a published generation, got {}",
        stats.generation
    );
}

/// Poll until the store publishes at least `generation`, or fail
/// after `timeout`
#[allow(dead_code)] // Used in integration tests
pub async fn wait_for_generation(services: &Services, generation: u64, timeout: Duration) {
    let deadline = tokio::time::Instant::now() + timeout;
    while services.store.generation() < generation {
        assert!(
            tokio::time::Instant::now() < deadline,
            "Timed out waiting for generation {generation} (at {})",
            services.store.generation()
        );
        tokio::time::sleep(Duration::from_millis(25)).await;
    }
}
