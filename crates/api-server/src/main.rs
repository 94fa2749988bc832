//! API Server for Taskdesk
//!
//! Serves the task REST API on `TASKDESK_ADDR` (default port 8081).

use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use api_server::config::{ServerConfig, DEFAULT_LOG_FILTER};
use api_server::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| DEFAULT_LOG_FILTER.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ServerConfig::from_env()?;
    match &config.data_file {
        Some(path) => tracing::info!("Using task file: {:?}", path),
        None => tracing::info!("Using in-memory task store"),
    }

    let app_state = AppState::new(&config)
        .await
        .context("failed to initialize task store")?;

    let app = api_server::app(app_state);

    let listener = tokio::net::TcpListener::bind(config.addr)
        .await
        .with_context(|| format!("failed to bind {}", config.addr))?;
    tracing::info!("REST API listening on {}", config.addr);

    axum::serve(listener, app).await?;
    Ok(())
}
