// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

use anyhow::{Context, Result};
use clap::Parser;
use local_login::app::{create_router, AppState, VERSION};
use local_login::config::{self, Config, StoreBackend};
use local_login::services::auth_db::{MemoryUserStore, PgUserStore, UserStore};
use local_login::services::logging;
use local_login::services::session_store::SessionStore;
use std::net::SocketAddr;
use std::sync::Arc;

async fn open_user_store(backend: StoreBackend) -> Result<Arc<dyn UserStore>> {
    match backend {
        StoreBackend::Memory => {
            tracing::warn!("Using the in-memory user store; users are lost on restart");
            Ok(Arc::new(MemoryUserStore::new()))
        }
        StoreBackend::Postgres(url) => {
            let store = PgUserStore::connect(&url)
                .await
                .inspect_err(|e| tracing::error!("Database connection error: {e}"))
                .context("Failed to connect to the database")?;
            store
                .migrate()
                .await
                .context("Failed to run database migrations")?;
            tracing::info!("Connected to PostgreSQL");
            Ok(Arc::new(store))
        }
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {e}");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutting down");
}

#[tokio::main]
async fn main() -> Result<()> {
    config::load_dotenv()?;
    let config = Config::parse();
    logging::init(config.verbosity)?;

    let users = open_user_store(config.store_backend()).await?;

    let sessions = Arc::new(SessionStore::new());
    let _pruner = sessions
        .clone()
        .spawn_pruner(config.session_prune_interval());

    let state = AppState::new(users, sessions, config.auth_config());
    let app = create_router(state);

    // Bind to 0.0.0.0 to accept connections from any network interface (required for Docker)
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;

    tracing::info!(app_env = %config.app_env, "local-login v{} listening on {}", VERSION, addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")
}
