pub mod pl;
pub mod live;
pub mod mock;

use std::path::Path;
use std::sync::Arc;
use pl::{PostingList, PostingEncoding};
use live::LiveStore;
use mock::MockStore;
use super::error::StoreResult;

/// Read-only term -> posting list lookup.
///
/// An unseen term is `Ok(None)`, never an error. Implementations
/// are shared by every in-flight query and must not mutate the index.
pub trait PostingStore: Send + Sync {
    fn lookup(&self, term: &str) -> StoreResult<Option<PostingList>>;

    fn name(&self) -> &'static str;
}

/// Opens the on-disk index, or falls back to the built-in fixture.
/// The flag tells whether the fallback was taken.
pub fn open_posting_store(path: &Path, encoding: PostingEncoding) -> (Arc<dyn PostingStore>, bool) {
    match LiveStore::open(path, encoding) {
        Ok(store) => {
            log::info!("opened posting index at {}", path.display());
            (Arc::new(store), false)
        }
        Err(e) => {
            log::warn!("failed to open posting index at {}: {}, serving mock index", path.display(), e);
            (Arc::new(MockStore::new()), true)
        }
    }
}
