//! Corrupt documents are skipped without failing the rebuild

use crate::common::{create_test_services, TestCorpus};
use docseek::core::types::Granularity;

#[tokio::test]
async fn test_one_corrupt_document_out_of_five() {
    let mut corpus = TestCorpus::with_texts(&[
        ("one.txt", "alpha document"),
        ("two.txt", "beta document"),
        ("three.txt", "gamma document"),
    ]);
    corpus.write_docx("four.docx", &["delta document"]);
    corpus.write("five.pdf", b"%PDF-1.4\nthis is not really a pdf");

    let services = create_test_services(corpus.path(), Granularity::Document);
    let stats = services.rebuild().await.unwrap();

    assert_eq!(corpus.file_count(), 5);
    assert_eq!(stats.documents_indexed, 4);
    assert_eq!(stats.documents_skipped, 1);

    let index = services.store.get();
    let ids: Vec<_> = index.documents().iter().map(|d| d.id.as_str()).collect();
    assert_eq!(ids, vec!["four.docx", "one.txt", "three.txt", "two.txt"]);
    assert!(index.chunks().iter().all(|c| c.doc_id != "five.pdf"));

    let response = services.search("delta", None).await;
    assert_eq!(response.results[0].doc_id, "four.docx");
}

#[tokio::test]
async fn test_non_utf8_text_is_skipped() {
    let mut corpus = TestCorpus::with_texts(&[("good.txt", "valid words")]);
    corpus.write("binary.txt", &[0xff, 0xfe, 0x00, 0x80, 0x81]);

    let services = create_test_services(corpus.path(), Granularity::Document);
    let stats = services.rebuild().await.unwrap();

    assert_eq!(stats.documents_indexed, 1);
    assert_eq!(stats.documents_skipped, 1);
}

#[tokio::test]
async fn test_all_documents_corrupt_yields_empty_index() {
    let mut corpus = TestCorpus::empty();
    corpus.write("a.pdf", b"garbage");
    corpus.write("b.docx", b"garbage");

    let services = create_test_services(corpus.path(), Granularity::Document);
    let stats = services.rebuild().await.unwrap();

    assert_eq!(stats.documents_indexed, 0);
    assert_eq!(stats.documents_skipped, 2);
    assert!(services.store.get().is_empty());
    assert!(services.search("garbage", None).await.results.is_empty());
}

#[tokio::test]
async fn test_unreadable_source_keeps_previous_generation() {
    let corpus = TestCorpus::with_texts(&[("a.txt", "persistent text")]);
    let services = create_test_services(corpus.path(), Granularity::Document);
    services.rebuild().await.unwrap();
    let generation = services.store.generation();

    let path = corpus.path().to_path_buf();
    drop(corpus);
    assert!(!path.exists());

    assert!(services.rebuild().await.is_err());
    assert_eq!(services.store.generation(), generation);

    let response = services.search("persistent", None).await;
    assert_eq!(response.count, 1);
}
