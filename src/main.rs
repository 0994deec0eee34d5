//! Ranking Trend Service — Binary Entrypoint
//! Boots the Axum HTTP server serving the trend report from a snapshot dump.

use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use ranking_trend_analyzer::{api, repo::SnapshotStore};

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("ranking_trend_analyzer=info,warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact())
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env in local/dev; no-op in prod environments.
    let _ = dotenvy::dotenv();
    init_tracing();

    let rankings_path =
        std::env::var("RANKINGS_PATH").unwrap_or_else(|_| "data/rankings.json".to_string());
    let store = SnapshotStore::load_from_file(&rankings_path)
        .with_context(|| format!("loading snapshot store from {rankings_path}"))?;
    tracing::info!(rows = store.len(), %rankings_path, "snapshot store loaded");

    let router = api::create_router(Arc::new(store));

    let addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:8000".to_string());
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("binding {addr}"))?;
    tracing::info!(%addr, "trend report service listening");
    axum::serve(listener, router).await?;
    Ok(())
}
