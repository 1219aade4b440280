//! Health and statistics endpoints

use crate::state::AppState;
use axum::extract::State;
use axum::Json;
use serde::Serialize;
use std::sync::Arc;

/// Health check response
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

/// GET /health
pub async fn health() -> Json<HealthResponse> {
    tracing::debug!("health check requested");
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Server statistics response
#[derive(Serialize)]
pub struct StatsResponse {
    /// Server uptime in seconds
    pub uptime_secs: u64,
    /// Resolved labels held in the cache
    pub cached_labels: usize,
    /// Identifiers known to have no label
    pub no_label_entries: usize,
    /// Properties in the banned-property ledger
    pub banned_properties: usize,
    /// Server version
    pub version: &'static str,
}

/// GET /stats
pub async fn stats(State(state): State<Arc<AppState>>) -> Json<StatsResponse> {
    let (cached_labels, no_label_entries) = state.api.cache_sizes().await;
    Json(StatsResponse {
        uptime_secs: state.uptime_secs(),
        cached_labels,
        no_label_entries,
        banned_properties: state.api.banned_count().await,
        version: env!("CARGO_PKG_VERSION"),
    })
}
