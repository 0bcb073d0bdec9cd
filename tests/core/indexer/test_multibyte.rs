//! Multi-byte text through the whole pipeline

use crate::common::{create_test_services, TestCorpus};
use docseek::core::types::Granularity;

#[tokio::test]
async fn test_multibyte_corpus_searchable() {
    let text = "Überprüfung der Qualität.  日本語のテキスト 🦀 crab.\n\nRésumé café naïve.";
    let corpus = TestCorpus::with_texts(&[("intl.txt", text)]);

    for granularity in [
        Granularity::Document,
        Granularity::Paragraph,
        Granularity::FixedWords,
    ] {
        let services = create_test_services(corpus.path(), granularity);
        services.rebuild().await.unwrap();

        let response = services.search("café", None).await;
        assert!(!response.results.is_empty(), "{granularity}: no results");
        assert!(response.results[0].highlighted.contains("**café**"));
    }
}

#[tokio::test]
async fn test_long_multibyte_snippet_is_char_safe() {
    let text = format!("{} needle {}", "é🦀中".repeat(400), "ü".repeat(400));
    let corpus = TestCorpus::with_texts(&[("long.txt", text.as_str())]);

    let services = create_test_services(corpus.path(), Granularity::Document);
    services.rebuild().await.unwrap();

    let response = services.search("needle", None).await;
    let snippet = &response.results[0].snippet;

    assert!(snippet.contains("needle"));
    assert!(snippet.chars().count() <= 300 + 6);
}
