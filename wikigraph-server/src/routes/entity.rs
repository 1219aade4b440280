//! Entity projection endpoints: /entity/triples/{id}, /entity/table/{id}

use crate::error::Result;
use crate::state::AppState;
use axum::extract::{Path, State};
use axum::Json;
use serde::Serialize;
use std::sync::Arc;
use tracing::info;
use wikigraph_api::TableOutput;

/// Triple-document response body
#[derive(Serialize)]
pub struct TriplesResponse {
    /// N-Triples-style document, one statement per line
    pub triples: String,
}

/// GET /entity/triples/:id
pub async fn triples(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<TriplesResponse>> {
    info!(entity = %id, "triples requested");
    let triples = state.api.produce_triples(&id).await?;
    Ok(Json(TriplesResponse { triples }))
}

/// GET /entity/table/:id
pub async fn table(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<TableOutput>> {
    info!(entity = %id, "table requested");
    let output = state.api.produce_table(&id).await?;
    Ok(Json(output))
}
