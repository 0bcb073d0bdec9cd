//! Tests for the index, search and show-config handlers

use docseek::cli::commands::config::{self, ConfigArgs};
use docseek::cli::commands::index::{self, IndexArgs};
use docseek::cli::commands::search::{self, SearchArgs};
use docseek::cli::OutputFormat;
use docseek::core::types::Granularity;

use crate::common::{create_test_services, test_config, TestCorpus};

#[tokio::test]
async fn test_index_human_and_json() {
    let corpus = TestCorpus::small();
    let services = create_test_services(corpus.path(), Granularity::Paragraph);

    let result = index::execute(IndexArgs { list: true }, &services, OutputFormat::Human).await;
    assert!(result.is_ok(), "index should succeed: {:?}", result.err());
    assert_eq!(services.store.generation(), 1);

    let result = index::execute(IndexArgs { list: false }, &services, OutputFormat::Json).await;
    assert!(result.is_ok());
    assert_eq!(services.store.generation(), 2);
}

#[tokio::test]
async fn test_index_creates_missing_directory() {
    let corpus = TestCorpus::empty();
    let missing = corpus.path().join("absent");
    let services = create_test_services(&missing, Granularity::Document);

    let result = index::execute(IndexArgs { list: false }, &services, OutputFormat::Human).await;
    assert!(result.is_ok(), "index should succeed: {:?}", result.err());
    assert!(missing.is_dir());
    assert_eq!(services.store.generation(), 1);
    assert!(services.store.get().is_empty());
}

#[tokio::test]
async fn test_search_creates_missing_directory() {
    let corpus = TestCorpus::empty();
    let missing = corpus.path().join("nested").join("docs");
    let services = create_test_services(&missing, Granularity::Document);

    let args = SearchArgs {
        query: "anything".to_string(),
        limit: None,
        files_only: false,
    };
    let result = search::execute(args, &services, OutputFormat::Json).await;
    assert!(result.is_ok(), "search should succeed: {:?}", result.err());
    assert!(missing.is_dir());
}

#[tokio::test]
async fn test_index_unreadable_source_fails() {
    let mut corpus = TestCorpus::empty();
    let file = corpus.write("not_a_dir.txt", b"plain file");
    let services = create_test_services(&file, Granularity::Document);

    let result = index::execute(IndexArgs { list: false }, &services, OutputFormat::Human).await;
    assert!(result.is_err());
    assert_eq!(services.store.generation(), 0);
}

#[tokio::test]
async fn test_search_builds_then_queries() {
    let corpus = TestCorpus::small();
    let services = create_test_services(corpus.path(), Granularity::Paragraph);

    let args = SearchArgs {
        query: "lazy dog".to_string(),
        limit: Some(2),
        files_only: false,
    };
    let result = search::execute(args, &services, OutputFormat::Human).await;
    assert!(result.is_ok(), "search should succeed: {:?}", result.err());
    assert_eq!(services.store.generation(), 1);
}

#[tokio::test]
async fn test_search_json_and_files_only() {
    let corpus = TestCorpus::small();
    let services = create_test_services(corpus.path(), Granularity::Document);

    for (format, files_only) in [(OutputFormat::Json, false), (OutputFormat::Human, true)] {
        let args = SearchArgs {
            query: "tomatoes".to_string(),
            limit: None,
            files_only,
        };
        assert!(search::execute(args, &services, format).await.is_ok());
    }
}

#[tokio::test]
async fn test_search_with_no_hits_still_succeeds() {
    let corpus = TestCorpus::small();
    let services = create_test_services(corpus.path(), Granularity::Document);

    let args = SearchArgs {
        query: "xylophone".to_string(),
        limit: None,
        files_only: false,
    };
    assert!(search::execute(args, &services, OutputFormat::Human).await.is_ok());
}

#[test]
fn test_show_config_all_formats() {
    let corpus = TestCorpus::empty();
    let config = test_config(corpus.path(), Granularity::Page);

    assert!(config::execute(&ConfigArgs { toml: false }, &config, OutputFormat::Human).is_ok());
    assert!(config::execute(&ConfigArgs { toml: false }, &config, OutputFormat::Json).is_ok());
    assert!(config::execute(&ConfigArgs { toml: true }, &config, OutputFormat::Human).is_ok());
}
