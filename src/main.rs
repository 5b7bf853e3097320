//! Process bootstrap: config, storage, router, listener

use anyhow::{Context, Result};
use chainstay::config::{AppConfig, LISTEN_PORT};
use chainstay::core::auth::TokenSigner;
use chainstay::server::{AppState, build_router};
use chainstay::storage::{MongoStore, connect};
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = AppConfig::from_env()?;

    let database = connect(&config.mongo_uri, &config.database_name).await?;
    tracing::info!(database = %config.database_name, "connected to MongoDB");

    let state = AppState::new(
        Arc::new(MongoStore::new(database)),
        TokenSigner::new(&config.token_secret),
    );
    let app = build_router(state);

    let listener = TcpListener::bind(("0.0.0.0", LISTEN_PORT))
        .await
        .with_context(|| format!("failed to bind port {LISTEN_PORT}"))?;
    tracing::info!("server running on port {LISTEN_PORT}");

    axum::serve(listener, app).await.context("server exited")?;

    Ok(())
}
