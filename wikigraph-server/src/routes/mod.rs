//! HTTP route handlers and router configuration

mod admin;
mod entity;

use crate::state::AppState;
use axum::{routing::get, Router};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Build the main application router
pub fn build_router(state: Arc<AppState>) -> Router {
    let cors_enabled = state.config.cors_enabled;

    let mut router = Router::new()
        // Health check and server statistics
        .route("/health", get(admin::health))
        .route("/stats", get(admin::stats))
        // Entity projections
        .route("/entity/triples/:id", get(entity::triples))
        .route("/entity/table/:id", get(entity::table))
        .with_state(state)
        .layer(TraceLayer::new_for_http());

    if cors_enabled {
        router = router.layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        );
    }

    router
}
