pub mod pg;

use std::collections::HashMap;
use async_trait::async_trait;
use serde::{Serialize, Deserialize};
use super::DocId;
use super::error::{StoreError, StoreResult};

/// Presentable fields of a document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocMeta {
    pub url: String,
    pub title: String,
}

/// Read-only access to the relational side of the corpus.
///
/// Ids the store does not know are left out of the returned maps.
#[async_trait]
pub trait MetadataStore: Send + Sync {
    /// document count and average document length (None when undefined)
    async fn corpus_summary(&self) -> StoreResult<(u64, Option<f64>)>;

    async fn document_lengths(&self, ids: &[DocId]) -> StoreResult<HashMap<DocId, u32>>;

    async fn resolve(&self, ids: &[DocId]) -> StoreResult<HashMap<DocId, DocMeta>>;

    fn name(&self) -> &'static str;
}

/// Stand-in used while the relational store is unreachable.
/// Every id resolves to synthetic fields keyed by the id.
pub struct PlaceholderMetadata;

impl PlaceholderMetadata {
    pub fn meta_for(id: DocId) -> DocMeta {
        DocMeta {
            url: format!("http://mock-url.com/{}", id),
            title: format!("Mock Document {}", id),
        }
    }
}

#[async_trait]
impl MetadataStore for PlaceholderMetadata {
    async fn corpus_summary(&self) -> StoreResult<(u64, Option<f64>)> {
        Err(StoreError::Unavailable("no relational store".to_string()))
    }

    async fn document_lengths(&self, _ids: &[DocId]) -> StoreResult<HashMap<DocId, u32>> {
        Ok(HashMap::new())
    }

    async fn resolve(&self, ids: &[DocId]) -> StoreResult<HashMap<DocId, DocMeta>> {
        Ok(ids.iter().map(|&id| (id, Self::meta_for(id))).collect())
    }

    fn name(&self) -> &'static str {
        "placeholder"
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// In-memory relational store for ranker tests.
    #[derive(Default)]
    pub(crate) struct MemoryMetadata {
        pub docs: HashMap<DocId, (DocMeta, u32)>,
        pub fail_resolve: bool,
        pub fail_lengths: bool,
        pub calls: AtomicUsize,
    }

    impl MemoryMetadata {
        pub(crate) fn with_doc(mut self, id: DocId, url: &str, doc_length: u32) -> Self {
            let meta = DocMeta { url: url.to_string(), title: url.to_string() };
            self.docs.insert(id, (meta, doc_length));
            self
        }
    }

    #[async_trait]
    impl MetadataStore for MemoryMetadata {
        async fn corpus_summary(&self) -> StoreResult<(u64, Option<f64>)> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let count = self.docs.len() as u64;
            if count == 0 {
                return Ok((0, None));
            }
            let total: u64 = self.docs.values().map(|(_, len)| *len as u64).sum();
            Ok((count, Some(total as f64 / count as f64)))
        }

        async fn document_lengths(&self, ids: &[DocId]) -> StoreResult<HashMap<DocId, u32>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail_lengths {
                return Err(StoreError::Lookup("lengths".to_string()));
            }
            Ok(ids.iter()
                .filter_map(|id| self.docs.get(id).map(|(_, len)| (*id, *len)))
                .collect())
        }

        async fn resolve(&self, ids: &[DocId]) -> StoreResult<HashMap<DocId, DocMeta>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail_resolve {
                return Err(StoreError::Lookup("resolve".to_string()));
            }
            Ok(ids.iter()
                .filter_map(|id| self.docs.get(id).map(|(meta, _)| (*id, meta.clone())))
                .collect())
        }

        fn name(&self) -> &'static str {
            "memory"
        }
    }

    #[tokio::test]
    async fn test_placeholder() {
        let store = PlaceholderMetadata;
        assert!(store.corpus_summary().await.is_err());
        assert!(store.document_lengths(&[1, 2]).await.unwrap().is_empty());
        let resolved = store.resolve(&[3, 4]).await.unwrap();
        assert_eq!(resolved.len(), 2);
        assert_eq!(resolved[&3].url, "http://mock-url.com/3");
        assert_eq!(resolved[&4].title, "Mock Document 4");
    }
}
