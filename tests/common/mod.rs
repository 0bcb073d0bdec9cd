// Common test utilities and fixtures

pub mod helpers;

// Re-export commonly used items
// Note: These may appear unused in unit tests but are used in integration tests
#[allow(unused_imports)]
pub use fixtures::{build_docx, build_pdf, TestCorpus};
#[allow(unused_imports)]
pub use helpers::{
    assert_valid_stats, create_test_services, test_config, wait_for_generation,
};
