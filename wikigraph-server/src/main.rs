//! Wikigraph server CLI
//!
//! Run with: `cargo run -p wikigraph-server -- --help`

use wikigraph_server::{init_logging, ServerConfig, TelemetryConfig, WikigraphServer};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = ServerConfig::from_args();
    if let Err(e) = config.validate() {
        eprintln!("Invalid configuration: {e}");
        std::process::exit(1);
    }

    let telemetry = TelemetryConfig::with_server_config(&config);
    init_logging(&telemetry);

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        addr = %config.listen_addr,
        data_dir = %config.data_dir.display(),
        entity_prefix = %config.entity_prefix,
        banned_datatypes = ?config.banned_datatypes,
        banned_words = ?config.banned_words,
        "Starting wikigraph server"
    );

    let server = WikigraphServer::new(config)?;
    server.run().await.map_err(Into::into)
}
