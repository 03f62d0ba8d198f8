//! Duelwire server binary.
//!
//! Usage: `duelwire-server [CONFIG.json]`
//!
//! Without a config file the server listens on `0.0.0.0:8080`. Log
//! verbosity follows `RUST_LOG` and defaults to `info`.

use duelwire::{DuelwireError, DuelwireServer, ServerConfig};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), DuelwireError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = match std::env::args().nth(1) {
        Some(path) => {
            tracing::info!(%path, "loading configuration");
            ServerConfig::from_file(&path)?
        }
        None => ServerConfig::default(),
    };

    let server = DuelwireServer::builder().config(config).build().await?;
    server.run().await
}
