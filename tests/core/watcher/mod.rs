//! Rebuild coordination tests
//!
//! Timing-based: these use real time with generous margins.

mod test_debounce;
mod test_live_reindex;
