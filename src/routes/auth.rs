// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

//! Authentication route handlers.

use crate::app::AppState;
use crate::models::auth::{LogInForm, SignUpForm};
use crate::services::auth::Authentication;
use crate::services::auth_middleware::{
    clear_session_cookie, create_session_cookie, extract_session_token, AppError, CurrentUser,
};
use crate::services::logging::redact_username;
use crate::views;
use axum::{
    extract::{rejection::FormRejection, State},
    response::{Html, Redirect},
    routing::{get, post},
    Form, Router,
};
use tower_cookies::Cookies;
use utoipa::OpenApi;

/// OpenAPI description of the authentication routes.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "local-login",
        description = "Username/password sign-up, log-in and log-out backed by server-side sessions"
    ),
    paths(
        home_handler,
        sign_up_form_handler,
        sign_up_handler,
        log_in_handler,
        log_out_handler
    ),
    components(schemas(SignUpForm, LogInForm)),
    tags((name = "auth", description = "Pages and form submissions"))
)]
pub struct AuthApiDoc;

/// Create auth router with all authentication routes.
pub fn auth_router() -> Router<AppState> {
    Router::new()
        .route("/", get(home_handler))
        .route("/sign-up", get(sign_up_form_handler).post(sign_up_handler))
        .route("/log-in", post(log_in_handler))
        .route("/log-out", get(log_out_handler))
}

/// GET / - Home page, greeting the current user if there is one.
#[utoipa::path(
    get,
    path = "/",
    tag = "auth",
    responses(
        (status = 200, description = "Home page", body = String, content_type = "text/html"),
        (status = 500, description = "Session could not be restored", body = String, content_type = "text/html")
    )
)]
async fn home_handler(CurrentUser(user): CurrentUser) -> Html<String> {
    views::index(user.as_ref())
}

/// GET /sign-up - Sign-up form.
#[utoipa::path(
    get,
    path = "/sign-up",
    tag = "auth",
    responses((status = 200, description = "Sign-up form", body = String, content_type = "text/html"))
)]
async fn sign_up_form_handler() -> Html<String> {
    views::sign_up_form()
}

/// POST /sign-up - Create a user and go home.
#[utoipa::path(
    post,
    path = "/sign-up",
    tag = "auth",
    request_body(content = SignUpForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 303, description = "User created, redirect to /"),
        (status = 400, description = "username or password missing", body = String, content_type = "text/html"),
        (status = 500, description = "User could not be stored", body = String, content_type = "text/html")
    )
)]
async fn sign_up_handler(
    State(state): State<AppState>,
    Form(form): Form<SignUpForm>,
) -> Result<Redirect, AppError> {
    state.auth_service.sign_up(form).await?;
    Ok(Redirect::to("/"))
}

/// POST /log-in - Run the local strategy and go home.
///
/// Success sets the session cookie. Failure redirects to the same place without
/// one; the reason is only logged. A body that cannot be read as a form counts as
/// missing credentials.
#[utoipa::path(
    post,
    path = "/log-in",
    tag = "auth",
    request_body(content = LogInForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 303, description = "Redirect to / whether or not the credentials matched"),
        (status = 500, description = "User store error", body = String, content_type = "text/html")
    )
)]
async fn log_in_handler(
    State(state): State<AppState>,
    cookies: Cookies,
    form: Result<Form<LogInForm>, FormRejection>,
) -> Result<Redirect, AppError> {
    let form = match form {
        Ok(Form(form)) => form,
        Err(rejection) => {
            tracing::debug!(error = %rejection, "Unreadable log-in body");
            LogInForm::default()
        }
    };

    let outcome = state
        .auth_service
        .authenticate(form.username.as_deref(), form.password.as_deref())
        .await?;

    match outcome {
        Authentication::Success(user) => {
            let previous = extract_session_token(&cookies);
            let session_token = state.auth_service.log_in(&user, previous.as_deref()).await;

            let config = state.auth_service.config();
            cookies.add(create_session_cookie(
                &session_token,
                config.session_max_age_days,
                config.secure_cookies,
            ));
        }
        Authentication::Failure(failure) => {
            tracing::info!(
                reason = failure.message(),
                username = %redact_username(form.username.as_deref().unwrap_or_default()),
                "Log in rejected"
            );
        }
    }

    Ok(Redirect::to("/"))
}

/// GET /log-out - Destroy the session and go home.
#[utoipa::path(
    get,
    path = "/log-out",
    tag = "auth",
    responses((status = 303, description = "Session cleared, redirect to /"))
)]
async fn log_out_handler(State(state): State<AppState>, cookies: Cookies) -> Redirect {
    if let Some(session_token) = extract_session_token(&cookies) {
        state.auth_service.log_out(&session_token).await;
    }

    // Clear the cookie regardless
    cookies.remove(clear_session_cookie());

    Redirect::to("/")
}
