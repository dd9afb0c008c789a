//! API forwarder.
//!
//! Serves the built frontend and forwards `/api/*` to the upstream API,
//! answering CORS preflights itself.
//!
//! ```text
//!   client ──▶ request id ─▶ trace ─▶ panic boundary ─▶ interceptor
//!                                                        │
//!                  ┌─────────────────────────────────────┼──────────────────┐
//!                  ▼                                     ▼                  ▼
//!             OPTIONS: 204                       /api*: upstream      static site
//! ```

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use api_forwarder::config::{load_config, ForwarderConfig};
use api_forwarder::http::HttpServer;
use api_forwarder::lifecycle::{wait_for_termination, Shutdown};
use api_forwarder::observability::{logging, metrics};

#[derive(Parser)]
#[command(name = "api-forwarder")]
#[command(about = "Static frontend server with an /api forwarding proxy", long_about = None)]
struct Cli {
    /// TOML configuration file. Defaults are used when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => load_config(path)?,
        None => ForwarderConfig::default(),
    };

    logging::init_logging(&config.observability.log_level);
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "api-forwarder starting");

    tracing::info!(
        config_file = ?cli.config,
        bind_address = %config.listener.bind_address,
        upstream = %config.upstream.base_url,
        site_root = %config.site.root.display(),
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(e) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                error = %e,
                "Failed to parse metrics address"
            ),
        }
    }

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    let server = HttpServer::new(config)?;
    let server_shutdown = shutdown.listener();

    tokio::spawn(async move {
        wait_for_termination().await;
        shutdown.trigger();
    });

    server.run(listener, server_shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
