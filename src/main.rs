//! Catalog proxy service.
//!
//! # Architecture Overview
//!
//! ```text
//!                  ┌──────────────────────────────────────────────┐
//!                  │                CATALOG PROXY                 │
//!                  │                                              │
//!   Client GET     │  ┌────────┐   ┌───────────┐   ┌───────────┐  │
//!   ───────────────┼─▶│  http  │──▶│ translate │──▶│ upstream  │──┼──▶ Catalog API
//!                  │  │ server │   │ query+path│   │    GET    │  │
//!                  │  └────────┘   └───────────┘   └─────┬─────┘  │
//!                  │                                     │        │
//!   JSON response  │  ┌────────────────┐   ┌─────────────▼─────┐  │
//!   ◀──────────────┼──│ fixed error or │◀──│ catalog::sort     │  │
//!                  │  │ JSON array     │   │ (sort + truncate) │  │
//!                  │  └────────────────┘   └───────────────────┘  │
//!                  │                                              │
//!                  │  cross-cutting: config (+hot reload), the    │
//!                  │  lifecycle coordinator, logging and metrics  │
//!                  └──────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;
use tokio::sync::mpsc;

use catalog_proxy::config::{load_config, ConfigWatcher, ProxyConfig};
use catalog_proxy::http::HttpServer;
use catalog_proxy::lifecycle::Shutdown;
use catalog_proxy::observability::{logging, metrics};

#[derive(Parser)]
#[command(name = "catalog-proxy", about = "Thin proxy for a remote product catalog API")]
struct Args {
    /// Path to the TOML configuration file. Defaults apply when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => load_config(path)?,
        None => ProxyConfig::default(),
    };

    logging::init_logging(&config.observability.log_level);

    tracing::info!(
        bind_address = %config.listener.bind_address,
        upstream = %config.upstream.base_url,
        request_timeout_secs = config.timeouts.request_secs,
        "configuration loaded"
    );

    if config.observability.metrics_enabled {
        if let Ok(addr) = config.observability.metrics_address.parse() {
            metrics::init_metrics(addr);
        } else {
            tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "failed to parse metrics address"
            );
        }
    }

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "listening for connections");

    // Hot reload only applies when running from a config file.
    let (_watch_guard, config_updates) = match &args.config {
        Some(path) => {
            let (watcher, updates) = ConfigWatcher::new(path);
            (Some(watcher.run()?), updates)
        }
        None => {
            let (_tx, updates) = mpsc::unbounded_channel();
            (None, updates)
        }
    };

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            shutdown.trigger();
        }
    });

    let server = HttpServer::new(config)?;
    server.run(listener, config_updates, server_shutdown).await?;

    tracing::info!("shutdown complete");
    Ok(())
}
