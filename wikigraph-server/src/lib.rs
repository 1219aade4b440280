//! Wikigraph HTTP Server
//!
//! A thin HTTP REST API around `wikigraph-api`, exposing a knowledge-graph
//! entity as an RDF-style triple document or a dual-table projection.
//!
//! # Endpoints
//!
//! - `GET /entity/triples/{id}` — triple document
//! - `GET /entity/table/{id}` — URI table + labels table
//! - `GET /health`, `GET /stats`
//!
//! # Example
//!
//! ```ignore
//! use wikigraph_server::{ServerConfig, WikigraphServer};
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = ServerConfig::default();
//!     let server = WikigraphServer::new(config).unwrap();
//!     server.run().await.unwrap();
//! }
//! ```

pub mod config;
pub mod error;
pub mod routes;
pub mod state;
pub mod telemetry;

pub use config::ServerConfig;
pub use error::{ErrorResponse, Result, ServerError};
pub use routes::build_router;
pub use state::AppState;
pub use telemetry::{init_logging, LogFormat, TelemetryConfig};

use axum::Router;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

/// Wikigraph HTTP server
pub struct WikigraphServer {
    /// Application state
    state: Arc<AppState>,
    /// Configured router
    router: Router,
}

impl WikigraphServer {
    /// Create a new server with the given configuration
    pub fn new(config: ServerConfig) -> Result<Self> {
        let state = Arc::new(AppState::new(config)?);
        let router = routes::build_router(state.clone());
        Ok(Self { state, router })
    }

    /// Get a reference to the application state
    pub fn state(&self) -> &Arc<AppState> {
        &self.state
    }

    /// Get the router for testing
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server
    pub async fn run(self) -> std::result::Result<(), std::io::Error> {
        let addr = self.state.config.listen_addr;
        let listener = TcpListener::bind(addr).await?;

        let (cached_labels, no_label_entries) = self.state.api.cache_sizes().await;
        info!(
            addr = %addr,
            entity_data_url = %self.state.config.entity_data_url,
            query_endpoint = %self.state.config.query_endpoint,
            cached_labels,
            no_label_entries,
            banned_properties = self.state.api.banned_count().await,
            "Wikigraph server starting"
        );

        axum::serve(listener, self.router).await
    }
}
