mod config;
mod errors;
mod models;
mod routes;
mod sow_client;
mod state;
mod workflow;

use anyhow::{Context, Result};
use std::net::SocketAddr;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use std::sync::Arc;

use crate::config::Config;
use crate::routes::build_router;
use crate::sow_client::SowClient;
use crate::state::AppState;
use crate::workflow::sessions::SessionStore;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails fast on malformed values)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting SOW Analyzer API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize the extraction / recommendation client
    let client = SowClient::new(
        config.extract_url.clone(),
        config.recommend_url.clone(),
        config.request_timeout,
    )
    .context("Failed to build SOW service client")?;
    info!(
        extract_url = %config.extract_url,
        recommend_url = %config.recommend_url,
        timeout_secs = config.request_timeout.as_secs(),
        "SOW service client initialized"
    );

    let sessions = Arc::new(SessionStore::new(Arc::new(client)));
    sessions
        .clone()
        .spawn_sweeper(config.session_ttl, config.session_sweep_interval);

    let state = AppState {
        sessions,
        config: config.clone(),
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
