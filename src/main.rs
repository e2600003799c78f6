//! Unified API gateway.
//!
//! # Architecture Overview
//!
//! ```text
//!     Client Request          ┌──────────────────────────────────────────────┐
//!     ────────────────────────┼─▶ http server ─▶ route table ─▶ handlers    │
//!                             │   (request id,     (prefix +      │         │
//!                             │    trace, CORS,     suffix)       ▼         │
//!                             │    body limit)              collaborators ──┼──▶ config / chatbot /
//!     Client Response         │                                    │        │    tts / logs / email
//!     ◀───────────────────────┼──────────── verbatim response ◀────┘        │
//!                             │                                             │
//!                             │   config · health aggregate · observability │
//!                             │   lifecycle (signals, graceful shutdown)    │
//!                             └──────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use unified_gateway::config::load_config;
use unified_gateway::lifecycle::{signals, Shutdown};
use unified_gateway::observability::{logging, metrics};
use unified_gateway::GatewayServer;

#[derive(Parser, Debug)]
#[command(name = "unified-gateway", version, about = "Unified API gateway")]
struct Cli {
    /// Path to a TOML configuration file
    #[arg(short, long, env = "GATEWAY_CONFIG")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = load_config(cli.config.as_deref())?;
    logging::init_logging(&config.observability);

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        bind_address = %config.listener.bind_address(),
        max_body_size = config.limits.max_body_size,
        "unified-gateway starting"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let listener = TcpListener::bind(config.listener.bind_address()).await?;

    let shutdown = Shutdown::new();
    signals::spawn_signal_listener(&shutdown);

    let server = GatewayServer::new(config)?;
    server.run(listener, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
