//! Snapshot publication tests

mod test_atomicity;
