// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

//! Authentication middleware helpers for Axum.
//!
//! - `SESSION_COOKIE_NAME`: the cookie that carries the session token
//! - `CurrentUser`: extractor that restores the logged-in user from the session
//! - `AppError`: the generic error handler every route forwards to

use crate::app::AppState;
use crate::models::auth::User;
use crate::services::auth_db::StoreError;
use crate::views;
use anyhow::anyhow;
use axum::extract::FromRequestParts;
use axum::http::{request::Parts, StatusCode};
use axum::response::{IntoResponse, Response};
use tower_cookies::{Cookie, Cookies};

/// Cookie name for the session.
pub const SESSION_COOKIE_NAME: &str = "sid";

/// Errors surfaced by route handlers.
#[derive(Debug)]
pub enum AppError {
    /// The submitted user failed validation.
    Validation(String),
    InternalError(anyhow::Error),
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        match err.downcast_ref::<StoreError>() {
            Some(StoreError::Validation(validation)) => AppError::Validation(validation.to_string()),
            _ => AppError::InternalError(err),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::Validation(msg) => {
                tracing::info!(reason = %msg, "Rejected submission");
                (StatusCode::BAD_REQUEST, msg)
            }
            AppError::InternalError(err) => {
                tracing::error!("Internal error: {err:#}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal Server Error".to_string(),
                )
            }
        };
        (status, views::error_page(status, &message)).into_response()
    }
}

/// Extract the session token from cookies.
pub fn extract_session_token(cookies: &Cookies) -> Option<String> {
    cookies
        .get(SESSION_COOKIE_NAME)
        .map(|c| c.value().to_string())
        .filter(|token| !token.is_empty())
}

/// Create a session cookie with the given token.
/// `Max-Age` saturates instead of overflowing for very long lifetimes.
pub fn create_session_cookie(token: &str, max_age_days: u64, secure: bool) -> Cookie<'static> {
    let max_age_secs = i64::try_from(max_age_days)
        .unwrap_or(i64::MAX)
        .saturating_mul(24 * 60 * 60);
    Cookie::build((SESSION_COOKIE_NAME, token.to_string()))
        .path("/")
        .http_only(true)
        .secure(secure)
        .same_site(tower_cookies::cookie::SameSite::Lax)
        .max_age(tower_cookies::cookie::time::Duration::seconds(max_age_secs))
        .build()
}

/// Create a cookie that clears the session (for log out).
pub fn clear_session_cookie() -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE_NAME, ""))
        .path("/")
        .http_only(true)
        .max_age(tower_cookies::cookie::time::Duration::ZERO)
        .build()
}

/// The user attached to the current request, if its session is valid.
///
/// A cookie that no longer maps to a live session is cleared.
pub struct CurrentUser(pub Option<User>);

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let cookies = Cookies::from_request_parts(parts, state)
            .await
            .map_err(|(_, msg)| AppError::InternalError(anyhow!(msg)))?;

        let Some(session_token) = extract_session_token(&cookies) else {
            return Ok(CurrentUser(None));
        };

        let user = state.auth_service.current_user(&session_token).await?;
        if user.is_none() {
            cookies.remove(clear_session_cookie());
        }

        Ok(CurrentUser(user))
    }
}
