//! Application state management
//!
//! One `EntityApi` instance per process; it owns the label store and
//! ban ledger exclusively. Collaborators are injected as trait objects
//! so tests can swap the HTTP clients for fixtures.

use crate::config::ServerConfig;
use crate::error::{Result, ServerError};
use std::sync::Arc;
use std::time::Instant;
use wikigraph_api::{EntityApi, EntityFetch};
use wikigraph_labels::{BanLedger, LabelQuery, LabelResolver, LabelStore};
use wikigraph_remote::{HttpEntityClient, HttpSparqlClient};

/// Shared application state
pub struct AppState {
    /// Server configuration
    pub config: ServerConfig,
    /// The normalization pipeline
    pub api: EntityApi,
    /// Startup instant, for the stats endpoint
    pub started: Instant,
}

impl AppState {
    /// Create state with the real HTTP collaborators from config.
    pub fn new(config: ServerConfig) -> Result<Self> {
        let fetcher = Arc::new(HttpEntityClient::new(config.entity_data_url.clone())?);
        let query = Arc::new(HttpSparqlClient::new(
            config.query_endpoint.clone(),
            config.label_query.clone(),
            config.sparql_prefix.clone(),
        )?);
        Self::with_collaborators(config, fetcher, query)
    }

    /// Create state with injected collaborators (used by tests).
    pub fn with_collaborators(
        config: ServerConfig,
        fetcher: Arc<dyn EntityFetch>,
        query: Arc<dyn LabelQuery>,
    ) -> Result<Self> {
        config.validate().map_err(ServerError::config)?;

        let store = LabelStore::open(config.labels_path())
            .map_err(|e| ServerError::config(format!("cannot open label store: {e}")))?;
        let ledger = BanLedger::open(config.ledger_path(), config.banned_words.clone())
            .map_err(|e| ServerError::config(format!("cannot open ban ledger: {e}")))?;

        let resolver = LabelResolver::new(store, query, config.entity_prefix.clone());
        let api = EntityApi::new(
            fetcher,
            resolver,
            ledger,
            config.entity_prefix.clone(),
            config.banned_datatypes.clone(),
        );

        Ok(Self {
            config,
            api,
            started: Instant::now(),
        })
    }

    /// Server uptime in seconds
    pub fn uptime_secs(&self) -> u64 {
        self.started.elapsed().as_secs()
    }
}
