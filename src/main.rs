//! XUI Gateway
//!
//! A request-interception gateway that redirects legacy classic UI
//! URLs to their XUI single-page-app equivalents, built with Tokio
//! and Axum.
//!
//! # Architecture Overview
//!
//! ```text
//!                          ┌───────────────────────────────────────────────┐
//!                          │                  XUI GATEWAY                  │
//!                          │                                               │
//!   Client Request         │  ┌─────────┐   ┌────────────┐   ┌─────────┐  │
//!   ───────────────────────┼─▶│  http   │──▶│ intercept  │──▶│ forward │──┼──▶ Upstream
//!                          │  │ server  │   │ middleware │   │ handler │  │    (legacy AM)
//!                          │  └─────────┘   └─────┬──────┘   └─────────┘  │
//!                          │                      │ matched               │
//!   302 → /XUI/#route/     │                      ▼                       │
//!   ◀──────────────────────┼───────────────┌────────────┐                 │
//!                          │               │ XuiFilter  │                 │
//!                          │               └────────────┘                 │
//!                          │                                              │
//!                          │  ┌────────────────────────────────────────┐  │
//!                          │  │        Cross-Cutting Concerns          │  │
//!                          │  │  config │ admin │ observability │ life │  │
//!                          │  └────────────────────────────────────────┘  │
//!                          └───────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tokio::net::TcpListener;
use tokio::sync::mpsc;

use xui_gateway::admin::setup_admin_router;
use xui_gateway::config::{load_config, ConfigWatcher, GatewayConfig};
use xui_gateway::filter::XuiFlag;
use xui_gateway::http::HttpServer;
use xui_gateway::lifecycle::signals::spawn_signal_listener;
use xui_gateway::lifecycle::Shutdown;
use xui_gateway::observability::{logging, metrics};

#[derive(Parser)]
#[command(name = "xui-gateway")]
#[command(about = "Classic UI to XUI redirect gateway", version)]
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
        None => GatewayConfig::default(),
    };

    logging::init_logging(&config.observability.log_level);

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        bind_address = %config.listener.bind_address,
        upstream = %config.upstream.address,
        context_path = %config.upstream.context_path,
        xui_enabled = config.xui.enabled,
        "xui-gateway starting"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => {
                tracing::error!(
                    metrics_address = %config.observability.metrics_address,
                    "Failed to parse metrics address"
                );
            }
        }
    }

    let flag = XuiFlag::new(config.xui.enabled);

    let shutdown = Arc::new(Shutdown::new());
    spawn_signal_listener(shutdown.clone());

    // The watcher handle must stay alive for change events to flow.
    let (config_updates, _watcher) = match &args.config {
        Some(path) => {
            let (watcher, updates) = ConfigWatcher::new(path);
            (updates, Some(watcher.run()?))
        }
        None => {
            let (_, updates) = mpsc::unbounded_channel();
            (updates, None)
        }
    };

    let server = HttpServer::new(config.clone(), flag);

    if config.admin.enabled {
        let admin_router = setup_admin_router(server.state());
        let admin_addr = config.admin.bind_address.clone();
        let mut admin_shutdown = shutdown.subscribe();

        tokio::spawn(async move {
            match TcpListener::bind(&admin_addr).await {
                Ok(listener) => {
                    tracing::info!(address = %admin_addr, "Admin API listening");
                    let _ = axum::serve(listener, admin_router)
                        .with_graceful_shutdown(async move {
                            let _ = admin_shutdown.recv().await;
                        })
                        .await;
                }
                Err(e) => {
                    tracing::error!(
                        address = %admin_addr,
                        error = %e,
                        "Failed to bind admin API"
                    );
                }
            }
        });
    }

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    server
        .run(listener, config_updates, shutdown.subscribe())
        .await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
