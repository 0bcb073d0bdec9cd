//! Tests for configuration resolution from CLI flags

use clap::Parser;
use docseek::cli::{load_config, Cli};
use docseek::core::types::{Granularity, Strategy};
use serial_test::serial;
use std::path::PathBuf;

use crate::common::TestCorpus;

#[test]
#[serial]
fn test_config_file_and_dir_override() {
    let mut corpus = TestCorpus::empty();
    let config_path = corpus.write(
        "docseek.toml",
        br#"
[source]
dir = "/srv/ignored"

[indexing]
granularity = "page"

[search]
default_k = 7
"#,
    );

    let cli = Cli::try_parse_from([
        "docseek",
        "--config",
        config_path.to_str().unwrap(),
        "--dir",
        "/srv/docs",
        "show-config",
    ])
    .unwrap();
    let config = load_config(&cli).unwrap();

    assert_eq!(config.source.dir, PathBuf::from("/srv/docs"));
    assert_eq!(config.indexing.granularity, Granularity::Page);
    assert_eq!(config.indexing.strategy, Strategy::Lexical);
    assert_eq!(config.search.default_k, 7);
}

#[test]
#[serial]
fn test_invalid_config_is_rejected() {
    let mut corpus = TestCorpus::empty();
    let config_path = corpus.write(
        "docseek.toml",
        br#"
[search]
default_k = 0
"#,
    );

    let cli = Cli::try_parse_from([
        "docseek",
        "--config",
        config_path.to_str().unwrap(),
        "index",
    ])
    .unwrap();

    assert!(load_config(&cli).is_err());
}
