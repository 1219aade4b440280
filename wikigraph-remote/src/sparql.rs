//! SPARQL label-query client
//!
//! Issues one parameterized label query per unknown identifier against
//! the knowledge base's query endpoint and returns the `object.value`
//! strings of the result bindings.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;
use wikigraph_labels::{LabelError, LabelQuery, Result};

/// Default label query template. `$prefix` and `$uid` are substituted
/// per lookup; the display language is fixed to English.
pub const DEFAULT_LABEL_QUERY: &str =
    "SELECT ?object WHERE { $prefix:$uid rdfs:label ?object . FILTER(LANG(?object) = \"en\") }";

const USER_AGENT: &str = concat!(
    "WikigraphBot/",
    env!("CARGO_PKG_VERSION"),
    " (entity projection service)"
);

/// SPARQL JSON results envelope (the slice of it we read).
#[derive(Debug, Deserialize)]
struct SparqlResults {
    results: SparqlBindings,
}

#[derive(Debug, Deserialize)]
struct SparqlBindings {
    bindings: Vec<Binding>,
}

#[derive(Debug, Deserialize)]
struct Binding {
    object: BoundValue,
}

#[derive(Debug, Deserialize)]
struct BoundValue {
    value: String,
}

/// HTTP client for the SPARQL query endpoint
pub struct HttpSparqlClient {
    client: Client,
    endpoint: String,
    template: String,
    source_prefix: String,
}

impl HttpSparqlClient {
    pub fn new(
        endpoint: impl Into<String>,
        template: impl Into<String>,
        source_prefix: impl Into<String>,
    ) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| LabelError::transport(format!("failed to build sparql client: {e}")))?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
            template: template.into(),
            source_prefix: source_prefix.into(),
        })
    }

    fn build_query(&self, uid: &str) -> String {
        self.template
            .replace("$prefix", &self.source_prefix)
            .replace("$uid", uid)
    }
}

#[async_trait]
impl LabelQuery for HttpSparqlClient {
    async fn query_label(&self, uid: &str) -> Result<Vec<String>> {
        let sparql = self.build_query(uid);
        debug!(uid, "querying label");

        let response = self
            .client
            .post(&self.endpoint)
            .query(&[("format", "json")])
            .form(&[("query", sparql.as_str())])
            .send()
            .await
            .map_err(|e| LabelError::transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(LabelError::remote(status.as_u16(), text));
        }

        let results: SparqlResults = response
            .json()
            .await
            .map_err(|e| LabelError::transport(format!("invalid sparql response: {e}")))?;
        Ok(results
            .results
            .bindings
            .into_iter()
            .map(|b| b.object.value)
            .collect())
    }
}
