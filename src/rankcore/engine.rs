use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};
use serde::Serialize;
use crate::rankcore::DocId;
use crate::rankcore::cfg::{DbTarget, RankerCfg};
use crate::rankcore::error::{StoreError, StoreResult};
use crate::rankcore::index::{open_posting_store, PostingStore};
use crate::rankcore::index::pl::PostingList;
use crate::rankcore::meta::{DocMeta, MetadataStore, PlaceholderMetadata};
use crate::rankcore::meta::pg::PgMetadataStore;
use crate::rankcore::ranking::{top_k, Scorer};
use crate::rankcore::ranking::bm25::OkapiBm25;
use crate::rankcore::stats::{compute_stats, CorpusStats, StatsDefaults};
use crate::rankcore::tokenizer::tokenize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchResult {
    pub id: DocId,
    pub url: String,
    pub title: String,
    pub score: f64,
}

/// Which backing stores were unavailable at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Degraded {
    pub postings: bool,
    pub metadata: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Status {
    Ready,
    Degraded(Degraded),
}

impl Status {
    fn from_flags(flags: Degraded) -> Self {
        if flags.postings || flags.metadata {
            Status::Degraded(flags)
        } else {
            Status::Ready
        }
    }

    pub fn is_degraded(&self) -> bool {
        matches!(self, Status::Degraded(_))
    }
}

/// Query-time ranking over a posting index and a metadata store.
///
/// Everything a search reads is fixed at construction, so one instance
/// is shared by all concurrent searches. Rebuilding the instance is the
/// only way to pick up new corpus statistics.
pub struct Ranker {
    postings: Arc<dyn PostingStore>,
    metadata: Arc<dyn MetadataStore>,
    stats: CorpusStats,
    scorer: OkapiBm25,
    status: Status,
    query_timeout: Duration,
}

impl Ranker {
    /// Connects the metadata store, opens the index, then computes the
    /// corpus statistics. Unavailable stores degrade, they never fail.
    pub async fn connect(db: &DbTarget, index_path: &Path, cfg: &RankerCfg) -> Self {
        log::info!("ranker initializing");
        let mut degraded = Degraded::default();
        let metadata: Arc<dyn MetadataStore> =
            match PgMetadataStore::connect(db, cfg.max_connections, cfg.connect_timeout()).await {
                Ok(store) => {
                    log::info!("connected to postgres at {}:{}/{}", db.host, db.port, db.database);
                    Arc::new(store)
                }
                Err(e) => {
                    log::warn!("failed to connect to postgres at {}:{}: {}, serving placeholder metadata",
                        db.host, db.port, e);
                    degraded.metadata = true;
                    Arc::new(PlaceholderMetadata)
                }
            };
        let (postings, postings_degraded) = open_posting_store(index_path, cfg.encoding);
        degraded.postings = postings_degraded;
        Self::with_stores(postings, metadata, cfg, degraded).await
    }

    pub async fn with_stores(
        postings: Arc<dyn PostingStore>,
        metadata: Arc<dyn MetadataStore>,
        cfg: &RankerCfg,
        degraded: Degraded,
    ) -> Self {
        let defaults = StatsDefaults {
            total_documents: cfg.default_total_documents,
            average_document_length: cfg.default_avgdl,
        };
        let stats = compute_stats(metadata.as_ref(), defaults, cfg.query_timeout()).await;
        let status = Status::from_flags(degraded);
        log::info!("ranker initialized. documents: {}, avgdl: {}, postings: {}, metadata: {}, status: {:?}",
            stats.total_documents, stats.average_document_length,
            postings.name(), metadata.name(), status);
        Ranker {
            postings,
            metadata,
            stats,
            scorer: OkapiBm25 { k1: cfg.k1, b: cfg.b },
            status,
            query_timeout: cfg.query_timeout(),
        }
    }

    pub fn stats(&self) -> &CorpusStats {
        &self.stats
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub async fn search(&self, query: &str, k: usize) -> Vec<SearchResult> {
        let started = Instant::now();
        let terms = tokenize(query);
        if terms.is_empty() {
            return vec![];
        }
        let deadline = started + self.query_timeout;

        let postings = self.fetch_postings(terms, deadline).await;
        let candidates: Vec<DocId> = postings.iter()
            .flat_map(|list| list.entries().iter().map(|e| e.doc_id))
            .collect::<HashSet<_>>()
            .into_iter()
            .collect();
        if candidates.is_empty() {
            log::debug!("query '{}': no postings", query);
            return vec![];
        }

        let lengths = match within(deadline, self.metadata.document_lengths(&candidates)).await {
            Ok(lengths) => lengths,
            Err(e) => {
                log::warn!("document lengths unavailable, using avgdl: {}", e);
                HashMap::new()
            }
        };
        let scores = self.scorer.score(&postings, &self.stats, &|id| lengths.get(&id).copied());
        let ranked = top_k(scores, k.max(1));

        let ids: Vec<DocId> = ranked.iter().map(|d| d.docid).collect();
        let resolved: HashMap<DocId, DocMeta> = match within(deadline, self.metadata.resolve(&ids)).await {
            Ok(resolved) => resolved,
            Err(e) => {
                log::warn!("error fetching metadata for {} documents: {}", ids.len(), e);
                HashMap::new()
            }
        };

        let mut results = Vec::with_capacity(ranked.len());
        for doc in ranked {
            match resolved.get(&doc.docid) {
                Some(meta) => results.push(SearchResult {
                    id: doc.docid,
                    url: meta.url.clone(),
                    title: meta.title.clone(),
                    score: doc.score,
                }),
                None => log::debug!("no metadata for document {}, dropped", doc.docid),
            }
        }
        log::debug!("query '{}': {} candidates, {} results in {:?}",
            query, candidates.len(), results.len(), started.elapsed());
        results
    }

    // absent or failed terms come back as empty lists, so a term is
    // either folded in for every document or for none
    async fn fetch_postings(&self, terms: Vec<String>, deadline: Instant) -> Vec<PostingList> {
        let store = Arc::clone(&self.postings);
        let task = tokio::task::spawn_blocking(move || {
            terms.iter()
                .map(|term| match store.lookup(term) {
                    Ok(Some(list)) => list,
                    Ok(None) => PostingList::new(),
                    Err(e) => {
                        log::warn!("error fetching token {}: {}", term, e);
                        PostingList::new()
                    }
                })
                .collect::<Vec<_>>()
        });
        let remaining = deadline.saturating_duration_since(Instant::now());
        match tokio::time::timeout(remaining, task).await {
            Ok(Ok(lists)) => lists,
            Ok(Err(e)) => {
                log::warn!("posting lookup task failed: {}", e);
                vec![]
            }
            Err(_) => {
                log::warn!("posting lookups exceeded the {:?} deadline", self.query_timeout);
                vec![]
            }
        }
    }
}

async fn within<T, F>(deadline: Instant, fut: F) -> StoreResult<T>
    where F: std::future::Future<Output = StoreResult<T>> {
    let remaining = deadline.saturating_duration_since(Instant::now());
    match tokio::time::timeout(remaining, fut).await {
        Ok(res) => res,
        Err(_) => Err(StoreError::Timeout(remaining)),
    }
}
