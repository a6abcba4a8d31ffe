use std::collections::HashMap;
use once_cell::sync::Lazy;
use super::PostingStore;
use super::pl::{PostingList, PostingEncoding};
use crate::rankcore::error::StoreResult;

static FIXTURE: Lazy<Vec<(&'static str, &'static str)>> = Lazy::new(|| vec![
    ("computer", "1,2"),
    ("cats", "3,4"),
]);

/// Small in-memory index used when the real one cannot be opened.
pub struct MockStore {
    postings: HashMap<String, Vec<u8>>,
}

impl MockStore {
    pub fn new() -> Self {
        let mut store = MockStore { postings: HashMap::new() };
        for (term, raw) in FIXTURE.iter() {
            store.insert(term, raw);
        }
        store
    }

    pub fn empty() -> Self {
        MockStore { postings: HashMap::new() }
    }

    // raw value in the delimited encoding
    pub fn insert(&mut self, term: &str, raw: &str) {
        self.postings.insert(term.to_owned(), raw.as_bytes().to_vec());
    }

    pub fn with(mut self, term: &str, raw: &str) -> Self {
        self.insert(term, raw);
        self
    }
}

impl Default for MockStore {
    fn default() -> Self {
        Self::new()
    }
}

impl PostingStore for MockStore {
    fn lookup(&self, term: &str) -> StoreResult<Option<PostingList>> {
        match self.postings.get(term) {
            Some(raw) => PostingEncoding::Delimited.decode(raw).map(Some),
            None => Ok(None),
        }
    }

    fn name(&self) -> &'static str {
        "mock"
    }
}
