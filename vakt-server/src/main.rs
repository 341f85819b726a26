//! Vakt server - Main entry point
//!
//! Backend for the Iceland seismic & volcanic activity dashboard:
//! dataset storage behind a hosted key-value store, normalized
//! earthquake feeds, and SSE push for client revalidation.

use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::signal;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use vakt_server::config::{Config, Overrides};
use vakt_server::{build_router, AppState};

/// Command-line arguments for vakt-server
#[derive(Parser, Debug)]
#[command(name = "vakt-server")]
#[command(about = "Backend for the Vakt dashboard")]
#[command(version)]
struct Args {
    /// Port to listen on
    #[arg(short, long, env = "VAKT_PORT")]
    port: Option<u16>,

    /// Path to a TOML config file
    #[arg(short, long, env = "VAKT_CONFIG")]
    config: Option<PathBuf>,

    /// Admin token required on mutating routes (open when unset)
    #[arg(long, env = "VAKT_ADMIN_TOKEN", hide_env_values = true)]
    admin_token: Option<String>,

    /// Override the live seismic API endpoint
    #[arg(long, env = "VAKT_SEISMIC_API_URL")]
    seismic_api_url: Option<String>,

    /// Override the historical seismic API endpoint
    #[arg(long, env = "VAKT_HISTORY_API_URL")]
    history_api_url: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "vakt_server=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();

    info!("Starting Vakt server v{}", env!("CARGO_PKG_VERSION"));

    let config = Config::resolve(Overrides {
        port: args.port,
        config_file: args.config,
        seismic_api_url: args.seismic_api_url,
        history_api_url: args.history_api_url,
        heartbeat_secs: None,
        admin_token: args.admin_token,
    })
    .context("Failed to resolve configuration")?;

    let port = config.port;
    if config.admin_token.is_none() {
        info!("No admin token configured; mutating routes are open");
    }

    let state = AppState::new(config).context("Failed to initialize application state")?;
    let app = build_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
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
