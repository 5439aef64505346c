//! Byte API service
//!
//! Main entry point for the HTTP service.

use anyhow::Context;
use byte_api::{build_router, AppState};
use byte_infra::config;
use byte_infra::observability::logging::init_tracing;
use tokio::net::TcpListener;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env before reading config so its variables take part
    let dotenv = dotenvy::dotenv();

    let config = config::load().context("failed to load configuration")?;
    init_tracing(&config.logging).context("failed to initialise tracing")?;

    match dotenv {
        Ok(path) => info!(path = %path.display(), "Loaded .env"),
        Err(err) => warn!(error = %err, "Could not load .env file"),
    }

    let state = AppState::in_memory().context("failed to register metrics")?;
    let app = build_router(state);

    let address = config.server.bind_address();
    let listener =
        TcpListener::bind(&address).await.with_context(|| format!("failed to bind {address}"))?;
    info!(address = %listener.local_addr()?, "Byte API listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    info!("Byte API stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!(error = %err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received");
}
