// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;
use uuid::Uuid;

// ============================================================================
// Database Models
// ============================================================================

/// User record from the user store.
///
/// `password` holds the submitted value verbatim. Nothing here hashes it and
/// nothing enforces that `username` is unique.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub password: String,
    pub created_at: i64,
}

/// Fields required to create a user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub username: String,
    pub password: String,
}

/// A user failed presence validation on create.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("User validation failed: {}", describe_missing(.missing))]
pub struct ValidationError {
    pub missing: Vec<&'static str>,
}

fn describe_missing(missing: &[&'static str]) -> String {
    missing
        .iter()
        .map(|field| format!("{field} is required"))
        .collect::<Vec<_>>()
        .join(", ")
}

impl NewUser {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    /// Both fields must be present and non-empty. Values are not trimmed.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut missing = Vec::new();
        if self.username.is_empty() {
            missing.push("username");
        }
        if self.password.is_empty() {
            missing.push("password");
        }

        if missing.is_empty() {
            Ok(())
        } else {
            Err(ValidationError { missing })
        }
    }
}

impl From<SignUpForm> for NewUser {
    fn from(form: SignUpForm) -> Self {
        Self {
            username: form.username.unwrap_or_default(),
            password: form.password.unwrap_or_default(),
        }
    }
}

/// Session record from the session store.
#[derive(Debug, Clone)]
pub struct Session {
    pub session_id: String, // SHA-256 hash
    pub user_id: Uuid,
    pub expires_at: i64,
}

impl Session {
    /// Check if the session has expired
    pub fn is_expired(&self) -> bool {
        let now = chrono::Utc::now().timestamp_millis();
        self.expires_at < now
    }
}

// ============================================================================
// Form Types
// ============================================================================

/// Body of `POST /sign-up`. Fields are optional so that a missing field
/// reaches validation instead of being rejected by the extractor.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
pub struct SignUpForm {
    pub username: Option<String>,
    pub password: Option<String>,
}

/// Body of `POST /log-in`.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
pub struct LogInForm {
    pub username: Option<String>,
    pub password: Option<String>,
}
