// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

//! Application state and router construction.
//!
//! This module is `pub` so that integration tests can build a test router directly
//! without starting the full binary.

use crate::routes::{auth_router, AuthApiDoc};
use crate::services::auth::{AuthConfig, AuthService};
use crate::services::auth_db::UserStore;
use crate::services::session_store::SessionStore;
use axum::{routing::get, Json, Router};
use std::sync::Arc;
use tower_cookies::CookieManagerLayer;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;

/// Application version extracted from `Cargo.toml` at compile time.
/// The patch segment can be overridden via `LOCAL_LOGIN_PATCH_VERSION` (see `build.rs`).
pub const VERSION: &str = env!("LOCAL_LOGIN_VERSION");

/// Shared application state injected into every route handler via `State<AppState>`.
#[derive(Clone)]
pub struct AppState {
    pub auth_service: Arc<AuthService>,
}

impl AppState {
    pub fn new(users: Arc<dyn UserStore>, sessions: Arc<SessionStore>, config: AuthConfig) -> Self {
        Self {
            auth_service: Arc::new(AuthService::new(users, sessions, config)),
        }
    }
}

async fn openapi_handler() -> Json<utoipa::openapi::OpenApi> {
    let mut doc = AuthApiDoc::openapi();
    doc.info.version = VERSION.to_string();
    Json(doc)
}

/// Build the Axum application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .merge(auth_router())
        .route("/api-docs/openapi.json", get(openapi_handler))
        .with_state(state)
        .layer(CookieManagerLayer::new())
        .layer(TraceLayer::new_for_http())
}
