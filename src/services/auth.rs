// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

//! Authentication service: sign-up, the local username/password strategy, and
//! the session glue that serializes a user into a session and back.
//!
//! Passwords are compared as plain strings and stored exactly as submitted.

use crate::models::auth::{NewUser, SignUpForm, User};
use crate::services::auth_db::UserStore;
use crate::services::logging::redact_username;
use crate::services::session_store::{CreateSessionParams, SessionStore};
use anyhow::{Context, Result};
use rand::RngCore;
use sha2::{Digest, Sha256};
use std::sync::Arc;

/// Configuration for the auth service.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// Session lifetime in days
    pub session_max_age_days: u64,
    /// Mark the session cookie `Secure`
    pub secure_cookies: bool,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            session_max_age_days: 1,
            secure_cookies: false,
        }
    }
}

impl AuthConfig {
    /// Session lifetime in milliseconds, saturating at `i64::MAX`.
    pub fn session_max_age_millis(&self) -> i64 {
        i64::try_from(self.session_max_age_days)
            .unwrap_or(i64::MAX)
            .saturating_mul(24 * 60 * 60 * 1000)
    }
}

/// Why the local strategy rejected a login.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthFailure {
    MissingCredentials,
    IncorrectUsername,
    IncorrectPassword,
}

impl AuthFailure {
    pub fn message(&self) -> &'static str {
        match self {
            AuthFailure::MissingCredentials => "Missing credentials",
            AuthFailure::IncorrectUsername => "Incorrect username",
            AuthFailure::IncorrectPassword => "Incorrect password",
        }
    }
}

/// Outcome of running the local strategy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Authentication {
    Success(User),
    Failure(AuthFailure),
}

/// Authentication service.
pub struct AuthService {
    users: Arc<dyn UserStore>,
    sessions: Arc<SessionStore>,
    config: AuthConfig,
}

impl AuthService {
    /// Create a new auth service.
    pub fn new(users: Arc<dyn UserStore>, sessions: Arc<SessionStore>, config: AuthConfig) -> Self {
        Self {
            users,
            sessions,
            config,
        }
    }

    pub fn config(&self) -> &AuthConfig {
        &self.config
    }

    // ========== Token Generation ==========

    /// Generate a secure random token.
    /// Returns (raw_token, hash) - raw_token goes in the cookie, hash keys the session.
    pub fn generate_token() -> (String, String) {
        let mut bytes = [0u8; 32];
        rand::thread_rng().fill_bytes(&mut bytes);
        let raw_token = hex::encode(bytes);
        let hash = Self::hash_token(&raw_token);
        (raw_token, hash)
    }

    /// Hash a token for storage.
    pub fn hash_token(token: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(token.as_bytes());
        hex::encode(hasher.finalize())
    }

    // ========== Sign Up ==========

    /// Create a user from a sign-up form.
    /// Fails with a validation error when either field is missing or empty.
    pub async fn sign_up(&self, form: SignUpForm) -> Result<User> {
        let user = self
            .users
            .create(NewUser::from(form))
            .await
            .context("Failed to create user")?;

        tracing::info!(
            user_id = %user.id,
            username = %redact_username(&user.username),
            "New user signed up"
        );

        Ok(user)
    }

    // ========== Local Strategy ==========

    /// Verify a username/password pair against the user store.
    ///
    /// Rejected credentials are reported as `Authentication::Failure`; only store
    /// errors come back as `Err`.
    pub async fn authenticate(
        &self,
        username: Option<&str>,
        password: Option<&str>,
    ) -> Result<Authentication> {
        let (Some(username), Some(password)) = (
            username.filter(|u| !u.is_empty()),
            password.filter(|p| !p.is_empty()),
        ) else {
            return Ok(Authentication::Failure(AuthFailure::MissingCredentials));
        };

        let Some(user) = self
            .users
            .find_by_username(username)
            .await
            .context("Failed to get user")?
        else {
            return Ok(Authentication::Failure(AuthFailure::IncorrectUsername));
        };

        if user.password != password {
            return Ok(Authentication::Failure(AuthFailure::IncorrectPassword));
        }

        Ok(Authentication::Success(user))
    }

    // ========== Session Management ==========

    /// Serialize `user` into a fresh session and return its token.
    /// Any session held under `previous_token` is destroyed first.
    pub async fn log_in(&self, user: &User, previous_token: Option<&str>) -> String {
        if let Some(previous) = previous_token {
            self.sessions
                .delete_session(&Self::hash_token(previous))
                .await;
        }

        let (session_token, session_hash) = Self::generate_token();
        let expires_at = chrono::Utc::now()
            .timestamp_millis()
            .saturating_add(self.config.session_max_age_millis());

        self.sessions
            .create_session(&CreateSessionParams {
                session_id_hash: &session_hash,
                user_id: user.id,
                expires_at,
            })
            .await;

        tracing::info!(
            user_id = %user.id,
            username = %redact_username(&user.username),
            "User logged in"
        );

        session_token
    }

    /// Deserialize a session token back into its user.
    ///
    /// Unknown and expired sessions yield `None`, as does a session whose user no
    /// longer exists (that session is destroyed).
    pub async fn current_user(&self, session_token: &str) -> Result<Option<User>> {
        let session_hash = Self::hash_token(session_token);

        let Some(session) = self.sessions.get_session(&session_hash).await else {
            return Ok(None);
        };

        if session.is_expired() {
            // Clean up expired session
            self.sessions.delete_session(&session_hash).await;
            return Ok(None);
        }

        let user = self
            .users
            .find_by_id(session.user_id)
            .await
            .context("Failed to deserialize user")?;

        match user {
            Some(user) => Ok(Some(user)),
            None => {
                tracing::warn!(user_id = %session.user_id, "Session refers to a missing user");
                self.sessions.delete_session(&session_hash).await;
                Ok(None)
            }
        }
    }

    /// Log out - invalidate session.
    pub async fn log_out(&self, session_token: &str) {
        let session_hash = Self::hash_token(session_token);
        if self.sessions.delete_session(&session_hash).await {
            tracing::info!("User logged out");
        }
    }
}
