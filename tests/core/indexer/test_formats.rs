//! Extraction and chunking across formats and granularities

use crate::common::{assert_valid_stats, create_test_services, TestCorpus};
use docseek::core::types::Granularity;

#[tokio::test]
async fn test_small_corpus_document_granularity() {
    let corpus = TestCorpus::small();
    let services = create_test_services(corpus.path(), Granularity::Document);

    let stats = services.rebuild().await.unwrap();

    assert_valid_stats(&stats);
    assert_eq!(stats.documents_indexed, 3);
    assert_eq!(stats.chunks_created, 3);
}

#[tokio::test]
async fn test_docx_paragraphs_become_chunks() {
    let mut corpus = TestCorpus::empty();
    corpus.write_docx("memo.docx", &["First point", "", "Second point", "Third point"]);

    let services = create_test_services(corpus.path(), Granularity::Paragraph);
    services.rebuild().await.unwrap();

    let index = services.store.get();
    let texts: Vec<_> = index.chunks().iter().map(|c| c.text.as_str()).collect();
    assert_eq!(texts, vec!["First point", "Second point", "Third point"]);
    let paragraphs: Vec<_> = index.chunks().iter().map(|c| c.locator.paragraph).collect();
    assert_eq!(paragraphs, vec![Some(1), Some(2), Some(3)]);
}

#[tokio::test]
async fn test_pdf_pages_become_page_chunks() {
    let mut corpus = TestCorpus::empty();
    corpus.write_pdf("report.pdf", &["alpha page one", "omega page two"]);

    let services = create_test_services(corpus.path(), Granularity::Page);
    let stats = services.rebuild().await.unwrap();
    assert_eq!(stats.documents_indexed, 1);
    assert_eq!(stats.documents_skipped, 0);

    let index = services.store.get();
    let pages: Vec<_> = index.chunks().iter().map(|c| c.locator.page).collect();
    assert_eq!(pages, vec![Some(1), Some(2)]);
    assert!(index.chunks()[0].text.contains("alpha page one"));
    assert!(index.chunks()[1].text.contains("omega page two"));
    assert!(index.chunks().iter().all(|c| !c.text.contains("oneomega")));

    let response = services.search("omega", None).await;
    assert_eq!(response.results[0].doc_id, "report.pdf");
    assert_eq!(response.results[0].locator.page, Some(2));
}

#[tokio::test]
async fn test_pdf_pages_stay_separate_in_document_chunk() {
    let mut corpus = TestCorpus::empty();
    corpus.write_pdf("report.pdf", &["alpha page one", "omega page two"]);

    let services = create_test_services(corpus.path(), Granularity::Document);
    services.rebuild().await.unwrap();

    let index = services.store.get();
    assert_eq!(index.chunks().len(), 1);
    let tokens: Vec<_> = index.chunks()[0].text.split_whitespace().collect();
    assert!(tokens.contains(&"one"));
    assert!(tokens.contains(&"omega"));
}

#[tokio::test]
async fn test_form_feed_pages_in_text() {
    let corpus = TestCorpus::with_texts(&[("paged.txt", "cover page\x0Cbody page\x0Cappendix")]);

    let services = create_test_services(corpus.path(), Granularity::Page);
    services.rebuild().await.unwrap();

    let index = services.store.get();
    let pages: Vec<_> = index.chunks().iter().map(|c| c.locator.page).collect();
    assert_eq!(pages, vec![Some(1), Some(2), Some(3)]);

    let response = services.search("appendix", None).await;
    assert_eq!(response.results[0].locator.page, Some(3));
}

#[tokio::test]
async fn test_fixed_word_windows() {
    let words: Vec<String> = (0..25).map(|i| format!("w{i}")).collect();
    let corpus = TestCorpus::with_texts(&[("long.txt", words.join(" ").as_str())]);

    let mut config = crate::common::test_config(corpus.path(), Granularity::FixedWords);
    config.indexing.fixed_words_size = 10;
    let services = docseek::core::services::Services::new(config).unwrap();
    services.rebuild().await.unwrap();

    let index = services.store.get();
    let sizes: Vec<_> = index
        .chunks()
        .iter()
        .map(|c| c.text.split_whitespace().count())
        .collect();
    assert_eq!(sizes, vec![10, 10, 5]);
    let ordinals: Vec<_> = index.chunks().iter().map(|c| c.ordinal).collect();
    assert_eq!(ordinals, vec![0, 1, 2]);
}

#[tokio::test]
async fn test_unsupported_and_hidden_files_ignored() {
    let corpus = TestCorpus::with_texts(&[
        ("notes.txt", "visible"),
        ("image.png", "not a document"),
        (".secret.txt", "hidden"),
        ("README", "no extension"),
    ]);

    let services = create_test_services(corpus.path(), Granularity::Document);
    let stats = services.rebuild().await.unwrap();

    assert_eq!(stats.documents_indexed, 1);
    assert_eq!(stats.documents_skipped, 0);
}

#[tokio::test]
async fn test_empty_text_file_has_no_chunks() {
    let corpus = TestCorpus::with_texts(&[("blank.txt", "   \n\n  "), ("full.txt", "words")]);

    let services = create_test_services(corpus.path(), Granularity::Paragraph);
    let stats = services.rebuild().await.unwrap();

    assert_eq!(stats.documents_indexed, 2);
    assert_eq!(stats.chunks_created, 1);
}
