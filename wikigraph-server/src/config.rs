//! Server configuration

use clap::Parser;
use std::net::SocketAddr;
use std::path::PathBuf;

/// Wikigraph HTTP server configuration
#[derive(Parser, Debug, Clone)]
#[command(name = "wikigraph-server")]
#[command(about = "Knowledge-graph entity projection REST API")]
pub struct ServerConfig {
    /// Address to listen on
    #[arg(long, env = "WIKIGRAPH_LISTEN_ADDR", default_value = "0.0.0.0:8099")]
    pub listen_addr: SocketAddr,

    /// Entity-URI prefix prepended to bare identifiers
    #[arg(
        long,
        env = "WIKIGRAPH_ENTITY_PREFIX",
        default_value = "http://www.wikidata.org/entity/"
    )]
    pub entity_prefix: String,

    /// Base URL of the entity-data endpoint (record fetched as {url}{id}.json)
    #[arg(
        long,
        env = "WIKIGRAPH_ENTITY_DATA_URL",
        default_value = "https://www.wikidata.org/wiki/Special:EntityData/"
    )]
    pub entity_data_url: String,

    /// SPARQL query endpoint for label lookups
    #[arg(
        long,
        env = "WIKIGRAPH_QUERY_ENDPOINT",
        default_value = "https://query.wikidata.org/sparql"
    )]
    pub query_endpoint: String,

    /// Source prefix substituted into the label query template
    #[arg(long, env = "WIKIGRAPH_SPARQL_PREFIX", default_value = "wd")]
    pub sparql_prefix: String,

    /// Label query template ($prefix and $uid are substituted per lookup)
    #[arg(long, env = "WIKIGRAPH_LABEL_QUERY", default_value = wikigraph_remote::DEFAULT_LABEL_QUERY)]
    pub label_query: String,

    /// Directory holding the persisted label cache and ban ledger
    #[arg(long, env = "WIKIGRAPH_DATA_DIR", default_value = "./data")]
    pub data_dir: PathBuf,

    /// Claim datatype to exclude from all outputs (repeatable)
    #[arg(
        long = "banned-datatype",
        env = "WIKIGRAPH_BANNED_DATATYPES",
        value_delimiter = ' ',
        default_values_t = vec!["external-id".to_string(), "commonsMedia".to_string()]
    )]
    pub banned_datatypes: Vec<String>,

    /// Word banning any property whose resolved label contains it (repeatable)
    #[arg(
        long = "banned-word",
        env = "WIKIGRAPH_BANNED_WORDS",
        value_delimiter = ' ',
        default_values_t = vec!["category".to_string(), "commons".to_string()]
    )]
    pub banned_words: Vec<String>,

    /// Enable CORS (Cross-Origin Resource Sharing)
    #[arg(long, env = "WIKIGRAPH_CORS_ENABLED", default_value = "true")]
    pub cors_enabled: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "WIKIGRAPH_LOG_LEVEL", default_value = "info")]
    pub log_level: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: "0.0.0.0:8099".parse().unwrap(),
            entity_prefix: "http://www.wikidata.org/entity/".to_string(),
            entity_data_url: "https://www.wikidata.org/wiki/Special:EntityData/".to_string(),
            query_endpoint: "https://query.wikidata.org/sparql".to_string(),
            sparql_prefix: "wd".to_string(),
            label_query: wikigraph_remote::DEFAULT_LABEL_QUERY.to_string(),
            data_dir: PathBuf::from("./data"),
            banned_datatypes: vec!["external-id".to_string(), "commonsMedia".to_string()],
            banned_words: vec!["category".to_string(), "commons".to_string()],
            cors_enabled: true,
            log_level: "info".to_string(),
        }
    }
}

impl ServerConfig {
    /// Create config from CLI args
    pub fn from_args() -> Self {
        Self::parse()
    }

    /// Path of the persisted banned-property ledger
    pub fn ledger_path(&self) -> PathBuf {
        self.data_dir.join("banned_data.json")
    }

    /// Path of the persisted label cache
    pub fn labels_path(&self) -> PathBuf {
        self.data_dir.join("labels_map.json")
    }

    /// Validate configuration at startup
    pub fn validate(&self) -> Result<(), String> {
        if self.entity_prefix.is_empty() {
            return Err("entity_prefix must not be empty".to_string());
        }
        if !self.label_query.contains("$uid") {
            return Err("label_query template must contain the $uid placeholder".to_string());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_validates() {
        assert!(ServerConfig::default().validate().is_ok());
    }

    #[test]
    fn template_without_uid_is_rejected() {
        let cfg = ServerConfig {
            label_query: "SELECT ?object WHERE { }".to_string(),
            ..Default::default()
        };
        assert!(cfg.validate().is_err());
    }
}
