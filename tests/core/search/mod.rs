//! Search layer tests

mod test_search;
