//! Wema donation backend.
//!
//! Starts hosted checkout sessions for donations, lists completed ones and
//! serves a small admin dashboard API.

mod api;
mod config;
mod server;
mod shutdown;
mod state;

use clap::Parser;
use config::ConfigLoader;
use server::{build_router, run_server};
use shutdown::spawn_config_reload_handler;
use state::AppState;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};
use wema_core::provider::StripeCheckout;

/// Wema - charity donation checkout backend
#[derive(Parser, Debug)]
#[command(name = "wema-server")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to the configuration file
    #[arg(short, long, env = "WEMA_CONFIG", default_value = "./wema-config.toml")]
    config: PathBuf,

    /// Override the listen address (e.g., 0.0.0.0:5000)
    #[arg(short, long)]
    listen: Option<SocketAddr>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    init_tracing();

    // Parse command line arguments
    let args = Args::parse();

    tracing::info!("Starting wema-server v{}", env!("CARGO_PKG_VERSION"));

    // Load configuration
    let config_loader = Arc::new(ConfigLoader::new(&args.config, args.listen));
    let loaded_config = config_loader.load().map_err(|e| {
        tracing::error!("Failed to load configuration: {}", e);
        e
    })?;

    let listen_addr = loaded_config.server.listen;
    let allowed_origins = loaded_config.frontend.allowed_origins();
    tracing::info!(
        origins = ?allowed_origins,
        provider = ?loaded_config.provider,
        admin_enabled = loaded_config.admin.is_some(),
        "Configuration loaded"
    );

    // The provider client is built once; reloads do not replace it
    let provider = StripeCheckout::new(&loaded_config.provider).map_err(|e| {
        tracing::error!("Failed to initialize payment provider: {}", e);
        e
    })?;
    let provider = Arc::new(provider);

    // Create application state
    let state = AppState::new(
        provider,
        loaded_config.to_shared(),
        loaded_config.rate_limit,
    );

    // Spawn config reload handler (listens for SIGHUP)
    let shutdown_notify = spawn_config_reload_handler(state.clone(), config_loader);

    // Build the router
    let router = build_router(state, &allowed_origins);

    // Run the server
    tracing::info!("Starting HTTP server on {}", listen_addr);
    let result = run_server(router, listen_addr).await;

    // Signal the config reload handler to stop
    shutdown_notify.notify_one();
    tracing::info!("Server shutdown complete");

    result.map_err(Into::into)
}

/// Initialize the tracing subscriber with environment-based filtering.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,tower_http=debug"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}
