//! Storage Order Bridge
//!
//! Accepts a content identifier over HTTP, makes sure the content is pinned,
//! places a signed storage order on chain and reports how the order resolved.
//!
//! # Architecture Overview
//!
//! ```text
//!                        ┌────────────────────────────────────────────────────┐
//!                        │                 STORAGE ORDER BRIDGE               │
//!                        │                                                    │
//!   POST /api/v1/orders  │  ┌─────────┐    ┌───────────┐    ┌─────────────┐   │
//!   ─────────────────────┼─▶│  http   │───▶│  orders   │───▶│   pinning   │───┼──▶ IPFS API
//!                        │  │ server  │    │  service  │    │   client    │   │
//!                        │  └─────────┘    └─────┬─────┘    └─────────────┘   │
//!                        │                       │                            │
//!                        │                       ▼                            │
//!                        │                 ┌───────────┐    ┌─────────────┐   │
//!                        │                 │  orders   │───▶│ blockchain  │───┼──▶ Chain node
//!                        │                 │ pipeline  │    │ ws + signer │   │    (WebSocket)
//!                        │                 └─────┬─────┘    └─────────────┘   │
//!                        │                       │                            │
//!                        │                       ▼                            │
//!   JSON outcome         │                 ┌───────────┐                      │
//!   ◀────────────────────┼─────────────────│ observer  │◀── status updates    │
//!                        │                 └───────────┘                      │
//!                        │                                                    │
//!                        │  config · observability · resilience · lifecycle   │
//!                        └────────────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use storage_order_bridge::config::{load_or_default, BridgeConfig};
use storage_order_bridge::lifecycle::{spawn_signal_listener, AppContext, Shutdown};
use storage_order_bridge::observability::{logging, metrics};
use storage_order_bridge::HttpServer;

#[derive(Parser)]
#[command(name = "storage-order-bridge")]
#[command(about = "Pins content and places storage orders on chain", long_about = None)]
struct Args {
    /// Path to the TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let config: BridgeConfig = load_or_default(args.config.as_deref())?;

    logging::init_logging(&config.observability);
    tracing::info!("storage-order-bridge v{} starting", env!("CARGO_PKG_VERSION"));

    tracing::info!(
        bind_address = %config.listener.bind_address,
        chain = %config.chain.ws_url,
        pinning = %config.pinning.endpoint,
        observe_timeout_secs = ?config.orders.observe_timeout_secs,
        serialize_submissions = config.orders.serialize_submissions,
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

    let context = AppContext::init(config).await?;

    let listener = TcpListener::bind(&context.config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    spawn_signal_listener(shutdown.clone());

    let server = HttpServer::new(&context.config, context.state());
    let result = server.run(listener, shutdown.subscribe()).await;

    context.shutdown().await;
    result?;

    tracing::info!("Shutdown complete");
    Ok(())
}
