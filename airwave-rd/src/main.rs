//! Airwave Radio Daemon (airwave-rd) - Main entry point
//!
//! Server-authoritative playback synchronization for a collaborative
//! radio: one shared deck, many listeners, kept in agreement over a
//! WebSocket fan-out.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::signal;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use airwave_common::config::FileConfig;
use airwave_rd::api;
use airwave_rd::registry::{Broadcaster, ConnectionRegistry};
use airwave_rd::resolver::HttpTrackResolver;
use airwave_rd::sync::SyncEngine;
use airwave_rd::Config;

/// Command-line arguments for airwave-rd
#[derive(Parser, Debug)]
#[command(name = "airwave-rd")]
#[command(about = "Collaborative radio synchronization daemon")]
#[command(version)]
struct Args {
    /// Port to listen on
    #[arg(short, long, env = "AIRWAVE_PORT")]
    port: Option<u16>,

    /// Base URL of the track catalog service
    #[arg(long, env = "AIRWAVE_CATALOG_URL")]
    catalog_url: Option<String>,

    /// Path to a TOML config file
    #[arg(short, long, env = "AIRWAVE_CONFIG")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "airwave_rd=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();

    let file_config =
        FileConfig::load(args.config.as_deref()).context("Failed to load config file")?;
    let config = Config::resolve(args.port, args.catalog_url, file_config);

    info!("Starting Airwave radio daemon on port {}", config.port);
    info!("Catalog endpoint: {}", config.catalog_url);

    // Wire up registry, broadcaster, and the sync engine
    let registry = Arc::new(ConnectionRegistry::new());
    let broadcaster = Broadcaster::new(Arc::clone(&registry));
    let resolver = Arc::new(
        HttpTrackResolver::new(config.catalog_url.clone())
            .context("Failed to build catalog client")?,
    );
    let engine = SyncEngine::new(resolver, broadcaster.clone());

    let ctx = api::AppContext {
        engine,
        registry,
        broadcaster,
        port: config.port,
    };
    let app = api::create_router(ctx);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    info!("Starting HTTP server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Failed to bind to address")?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down");
        },
        _ = terminate => {
            info!("Received terminate signal, shutting down");
        },
    }
}
