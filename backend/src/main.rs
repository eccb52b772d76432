//! Main entry point for the ThreadCraft backend.
//!
//! This file initializes tracing, loads configuration, sets up the database,
//! builds the shared state and serves the API until a shutdown signal arrives.

mod api;
mod auth;
mod config;
mod database;
mod errors;
mod repositories;
mod services;
mod utils;

use anyhow::{Context, Result};
use api::AppState;
use config::Config;
use database::Database;
use services::token_cleanup::TokenCleanupScheduler;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::fmt::init;
use utils::jwt::JwtUtils;
use utils::object_storage::R2Signer;

#[tokio::main]
async fn main() -> Result<()> {
    init();

    let config = Config::from_env()?;
    let db = Database::new(&config).await?;
    db.migrate().await?;

    let jwt_utils = JwtUtils::new(&config.jwt_secret).context("Invalid JWT configuration")?;

    let state = AppState {
        pool: db.pool().clone(),
        jwt_utils: Arc::new(jwt_utils),
        password_cost: config.bcrypt_cost,
        upload_signer: Arc::new(R2Signer::new(&config.storage)),
        public_url: config.storage.public_url.clone(),
    };

    let cleanup = TokenCleanupScheduler::new(db.pool().clone()).start();

    let app = api::router(state);

    let bind_address = format!("0.0.0.0:{}", config.server_port);
    let listener = tokio::net::TcpListener::bind(&bind_address)
        .await
        .with_context(|| format!("Failed to bind {}", bind_address))?;

    info!("Starting ThreadCraft server on port {}", config.server_port);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    cleanup.abort();
    db.close().await;
    info!("Server stopped");
    Ok(())
}

/// Resolves on Ctrl+C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", e);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}
