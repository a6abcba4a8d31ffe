use std::collections::HashMap;
use std::time::Duration;
use async_trait::async_trait;
use sqlx::postgres::{PgConnectOptions, PgPool, PgPoolOptions};
use super::{DocMeta, MetadataStore};
use crate::rankcore::DocId;
use crate::rankcore::cfg::DbTarget;
use crate::rankcore::error::{StoreError, StoreResult};

/// `documents` table reached through a bounded connection pool,
/// so concurrent searches never share a connection.
pub struct PgMetadataStore {
    pool: PgPool,
}

impl PgMetadataStore {
    pub async fn connect(target: &DbTarget, max_connections: u32, timeout: Duration) -> StoreResult<Self> {
        let options = PgConnectOptions::new()
            .host(&target.host)
            .port(target.port)
            .database(&target.database)
            .username(&target.user)
            .password(&target.password);
        let pool = PgPoolOptions::new()
            .max_connections(max_connections.max(1))
            .acquire_timeout(timeout)
            .connect_with(options)
            .await
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;
        Ok(PgMetadataStore { pool })
    }
}

#[async_trait]
impl MetadataStore for PgMetadataStore {
    async fn corpus_summary(&self) -> StoreResult<(u64, Option<f64>)> {
        let (count, avg): (i64, Option<f64>) = sqlx::query_as(
            "SELECT COUNT(*)::BIGINT, AVG(doc_length)::FLOAT8 FROM documents")
            .fetch_one(&self.pool)
            .await?;
        Ok((count.max(0) as u64, avg))
    }

    async fn document_lengths(&self, ids: &[DocId]) -> StoreResult<HashMap<DocId, u32>> {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }
        let rows: Vec<(i64, Option<i64>)> = sqlx::query_as(
            "SELECT id::BIGINT, doc_length::BIGINT FROM documents WHERE id = ANY($1)")
            .bind(ids)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter()
            .filter_map(|(id, len)| {
                let len = u32::try_from(len?).ok()?;
                Some((id, len))
            })
            .collect())
    }

    async fn resolve(&self, ids: &[DocId]) -> StoreResult<HashMap<DocId, DocMeta>> {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }
        let rows: Vec<(i64, Option<String>)> = sqlx::query_as(
            "SELECT id::BIGINT, url FROM documents WHERE id = ANY($1)")
            .bind(ids)
            .fetch_all(&self.pool)
            .await?;
        // the schema carries no title, the url doubles as one
        Ok(rows.into_iter()
            .filter_map(|(id, url)| {
                let url = url?;
                Some((id, DocMeta { title: url.clone(), url }))
            })
            .collect())
    }

    fn name(&self) -> &'static str {
        "postgres"
    }
}
