//! End-to-end lexical search

use crate::common::{create_test_services, test_config, TestCorpus};
use docseek::core::services::Services;
use docseek::core::types::{EmptyResultPolicy, Granularity};

#[tokio::test]
async fn test_lazy_dog_end_to_end() {
    let corpus = TestCorpus::small();
    let services = create_test_services(corpus.path(), Granularity::Paragraph);
    services.rebuild().await.unwrap();

    let response = services.search("lazy dog", Some(3)).await;

    assert!(response.count >= 2);
    let top = &response.results[0];
    assert_eq!(top.doc_id, "animals.txt");
    assert!(top.score > 1.0, "exact phrase should score above 1.0");
    assert!(top.highlighted.contains("**lazy** **dog**"));

    // "The dog was lazy" has both tokens but not the phrase
    let garden = response
        .results
        .iter()
        .find(|r| r.doc_id == "garden.txt")
        .expect("garden paragraph should match");
    assert!(garden.score <= 1.0);
    assert_eq!(garden.locator.paragraph, Some(2));
}

#[tokio::test]
async fn test_exact_substring_always_ranks_first() {
    let corpus = TestCorpus::with_texts(&[
        ("a.txt", "report report report annual annual summary"),
        ("b.txt", "see the annual report attached"),
        ("c.txt", "annual figures and a report"),
    ]);
    let services = create_test_services(corpus.path(), Granularity::Document);
    services.rebuild().await.unwrap();

    let response = services.search("annual report", None).await;

    assert_eq!(response.results[0].doc_id, "b.txt");
    for other in &response.results[1..] {
        assert!(response.results[0].score > other.score);
    }
}

#[tokio::test]
async fn test_fuzzy_match_with_typo() {
    let corpus = TestCorpus::with_texts(&[("doc.txt", "Maintenance procedures for the pump")]);
    let services = create_test_services(corpus.path(), Granularity::Document);
    services.rebuild().await.unwrap();

    let response = services.search("maintenence", None).await;

    assert_eq!(response.count, 1);
    assert!(response.results[0].score < 1.0);
}

#[tokio::test]
async fn test_empty_query_returns_empty() {
    let corpus = TestCorpus::small();
    let services = create_test_services(corpus.path(), Granularity::Document);
    services.rebuild().await.unwrap();

    for query in ["", "   ", "\t\n"] {
        let response = services.search(query, None).await;
        assert!(response.results.is_empty());
        assert_eq!(response.count, 0);
    }
}

#[tokio::test]
async fn test_search_before_first_build() {
    let corpus = TestCorpus::small();
    let services = create_test_services(corpus.path(), Granularity::Document);

    let response = services.search("lazy", None).await;
    assert!(response.results.is_empty());
    assert_eq!(response.generation, 0);
}

#[tokio::test]
async fn test_placeholder_policy_end_to_end() {
    let corpus = TestCorpus::small();
    let mut config = test_config(corpus.path(), Granularity::Document);
    config.search.empty_result_policy = EmptyResultPolicy::PlaceholderMessage;
    config.search.placeholder_message = "Nothing found.".to_string();
    let services = Services::new(config).unwrap();
    services.rebuild().await.unwrap();

    let response = services.search("xylophone", None).await;
    assert_eq!(response.count, 1);
    assert_eq!(response.results[0].doc_id, "");
    assert_eq!(response.results[0].snippet, "Nothing found.");
    assert_eq!(response.results[0].highlighted, "Nothing found.");
}

#[tokio::test]
async fn test_default_k_and_ordering_stable() {
    let files: Vec<(String, String)> = (0..8)
        .map(|i| (format!("doc{i}.txt"), "identical contract text".to_string()))
        .collect();
    let refs: Vec<(&str, &str)> = files
        .iter()
        .map(|(n, c)| (n.as_str(), c.as_str()))
        .collect();
    let corpus = TestCorpus::with_texts(&refs);
    let services = create_test_services(corpus.path(), Granularity::Document);
    services.rebuild().await.unwrap();

    let first = services.search("contract", None).await;
    let second = services.search("contract", None).await;

    assert_eq!(first.count, 5);
    let ids: Vec<_> = first.results.iter().map(|r| r.doc_id.as_str()).collect();
    assert_eq!(ids, vec!["doc0.txt", "doc1.txt", "doc2.txt", "doc3.txt", "doc4.txt"]);
    let again: Vec<_> = second.results.iter().map(|r| r.doc_id.as_str()).collect();
    assert_eq!(ids, again);
}

#[tokio::test]
async fn test_custom_highlight_markers() {
    let corpus = TestCorpus::with_texts(&[("a.txt", "Invoice overdue")]);
    let mut config = test_config(corpus.path(), Granularity::Document);
    config.search.highlight_open = "<mark>".to_string();
    config.search.highlight_close = "</mark>".to_string();
    let services = Services::new(config).unwrap();
    services.rebuild().await.unwrap();

    let response = services.search("invoice", None).await;
    assert_eq!(response.results[0].highlighted, "<mark>Invoice</mark> overdue");
    assert_eq!(response.results[0].snippet, "Invoice overdue");
}

#[tokio::test]
async fn test_query_inside_longer_word_is_found() {
    let corpus = TestCorpus::with_texts(&[("a.txt", "hotdog stand"), ("b.txt", "dogs bark")]);
    let services = create_test_services(corpus.path(), Granularity::Document);
    services.rebuild().await.unwrap();

    let response = services.search("dog", None).await;

    let ids: Vec<_> = response.results.iter().map(|r| r.doc_id.as_str()).collect();
    assert!(ids.contains(&"a.txt"), "hotdog contains the query: {ids:?}");
    assert!(response.results.iter().all(|r| r.score >= 1.0));
}
