use std::time::Duration;
use serde::Serialize;
use super::meta::MetadataStore;

/// Global corpus statistics, fixed for the lifetime of a ranker.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CorpusStats {
    pub total_documents: u64,
    pub average_document_length: f64,
}

/// Values served when the relational store cannot tell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StatsDefaults {
    pub total_documents: u64,
    pub average_document_length: f64,
}

impl StatsDefaults {
    fn stats(&self) -> CorpusStats {
        CorpusStats {
            total_documents: self.total_documents,
            average_document_length: self.average_document_length,
        }
    }
}

// never fails: any problem is logged and answered with the defaults
pub async fn compute_stats(
    metadata: &dyn MetadataStore,
    defaults: StatsDefaults,
    timeout: Duration,
) -> CorpusStats {
    let summary = match tokio::time::timeout(timeout, metadata.corpus_summary()).await {
        Ok(res) => res,
        Err(_) => {
            log::warn!("corpus statistics query timed out after {:?}, using defaults", timeout);
            return defaults.stats();
        }
    };
    match summary {
        Ok((0, _)) => {
            log::warn!("documents table is empty, using default corpus statistics");
            defaults.stats()
        }
        Ok((count, Some(avg))) if avg.is_finite() && avg > 0.0 => CorpusStats {
            total_documents: count,
            average_document_length: avg,
        },
        Ok((count, avg)) => {
            log::warn!("unusable average document length {:?}, using {}", avg, defaults.average_document_length);
            CorpusStats {
                total_documents: count,
                average_document_length: defaults.average_document_length,
            }
        }
        Err(e) => {
            log::warn!("error computing corpus statistics from {}: {}", metadata.name(), e);
            defaults.stats()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rankcore::meta::PlaceholderMetadata;
    use crate::rankcore::meta::tests::MemoryMetadata;

    const DEFAULTS: StatsDefaults = StatsDefaults {
        total_documents: 1000,
        average_document_length: 100.0,
    };
    const TIMEOUT: Duration = Duration::from_secs(1);

    #[tokio::test]
    async fn test_stats_from_store() {
        let store = MemoryMetadata::default()
            .with_doc(1, "a", 10)
            .with_doc(2, "b", 30);
        let stats = compute_stats(&store, DEFAULTS, TIMEOUT).await;
        assert_eq!(stats, CorpusStats { total_documents: 2, average_document_length: 20.0 });
    }

    #[tokio::test]
    async fn test_stats_fallback() {
        let stats = compute_stats(&PlaceholderMetadata, DEFAULTS, TIMEOUT).await;
        assert_eq!(stats.average_document_length, 100.0);
        assert_eq!(stats.total_documents, 1000);

        let stats = compute_stats(&MemoryMetadata::default(), DEFAULTS, TIMEOUT).await;
        assert_eq!(stats.average_document_length, 100.0);
    }

    #[tokio::test]
    async fn test_zero_average_length() {
        let store = MemoryMetadata::default().with_doc(7, "x", 0);
        let stats = compute_stats(&store, DEFAULTS, TIMEOUT).await;
        assert_eq!(stats.total_documents, 1);
        assert_eq!(stats.average_document_length, 100.0);
    }
}
