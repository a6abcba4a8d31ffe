use std::net::SocketAddr;
use std::sync::Arc;
use axum::{Json, Router};
use axum::extract::{Query, State};
use axum::routing::get;
use serde::{Serialize, Deserialize};
use crate::rankcore::SERVICE_NAME;
use crate::rankcore::engine::{Ranker, SearchResult};

#[derive(Clone)]
pub struct AppState {
    pub ranker: Arc<Ranker>,
    pub default_k: usize,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
}

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    q: Option<String>,
    // kept as text so a bad value falls back to the default
    k: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub query: String,
    pub results: Vec<SearchResult>,
}

async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let status = if state.ranker.status().is_degraded() { "degraded" } else { "healthy" };
    Json(HealthResponse {
        status: status.to_string(),
        service: SERVICE_NAME.to_string(),
    })
}

async fn search(State(state): State<AppState>, Query(params): Query<SearchParams>) -> Json<SearchResponse> {
    let query = params.q.unwrap_or_default();
    let k = params.k
        .and_then(|k| k.trim().parse::<usize>().ok())
        .filter(|k| *k > 0)
        .unwrap_or(state.default_k);
    log::info!("received query: {}", query);
    let results = state.ranker.search(&query, k).await;
    Json(SearchResponse { query, results })
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/search", get(search))
        .with_state(state)
}

pub async fn serve(addr: SocketAddr, state: AppState) -> std::io::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    log::info!("listening on {}", listener.local_addr()?);
    axum::serve(listener, create_router(state))
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            log::info!("shutting down");
        })
        .await
}
