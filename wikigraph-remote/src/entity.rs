//! Entity-fetch client
//!
//! Fetches the raw entity document from the knowledge base's entity-data
//! endpoint (`{base_url}{id}.json`) and unwraps the record nested under
//! `entities.{id}`.

use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::debug;
use wikigraph_api::{ApiError, EntityFetch, Result};
use wikigraph_core::EntityRecord;

const USER_AGENT: &str = concat!(
    "WikigraphBot/",
    env!("CARGO_PKG_VERSION"),
    " (entity projection service)"
);

/// HTTP client for the entity-data endpoint
pub struct HttpEntityClient {
    client: Client,
    base_url: String,
}

impl HttpEntityClient {
    /// Create a client against `base_url` (e.g. the wikibase
    /// `Special:EntityData/` URL).
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| ApiError::internal(format!("failed to build entity client: {e}")))?;
        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }
}

#[async_trait]
impl EntityFetch for HttpEntityClient {
    async fn fetch_entity(&self, id: &str) -> Result<EntityRecord> {
        let url = format!("{}{}.json", self.base_url, id);
        debug!(entity = id, url = %url, "fetching entity data");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| ApiError::upstream(502, e.to_string()))?;

        let status = response.status();
        if status == reqwest::StatusCode::BAD_REQUEST
            || status == reqwest::StatusCode::NOT_FOUND
        {
            let text = response.text().await.unwrap_or_default();
            return Err(ApiError::entity_not_found(format!(
                "{id} (status {}): {}",
                status.as_u16(),
                truncate(&text)
            )));
        }
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(ApiError::upstream(status.as_u16(), truncate(&text)));
        }

        let mut body: serde_json::Value = response
            .json()
            .await
            .map_err(|e| ApiError::internal(format!("invalid entity payload: {e}")))?;
        let record = body
            .get_mut("entities")
            .and_then(|entities| entities.get_mut(id))
            .map(serde_json::Value::take)
            .ok_or_else(|| {
                ApiError::internal(format!("entity payload is missing record for {id}"))
            })?;

        serde_json::from_value(record)
            .map_err(|e| ApiError::internal(format!("malformed entity record for {id}: {e}")))
    }
}

/// Cap upstream error bodies so they stay log- and response-sized.
fn truncate(text: &str) -> String {
    const MAX: usize = 512;
    if text.len() <= MAX {
        text.to_string()
    } else {
        let cut: String = text.chars().take(MAX).collect();
        format!("{cut}…")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_caps_long_bodies() {
        let long = "x".repeat(2000);
        let out = truncate(&long);
        assert!(out.chars().count() <= 513);
        assert!(out.ends_with('…'));
        assert_eq!(truncate("short"), "short");
    }
}
