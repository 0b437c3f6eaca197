// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

//! Server-side session storage.
//!
//! Sessions live in process memory, keyed by the SHA-256 hash of the token that
//! the browser holds in its cookie. They do not survive a restart.

use crate::models::auth::Session;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use uuid::Uuid;

/// Parameters for creating a session.
pub struct CreateSessionParams<'a> {
    pub session_id_hash: &'a str,
    pub user_id: Uuid,
    pub expires_at: i64,
}

#[derive(Default)]
pub struct SessionStore {
    sessions: RwLock<HashMap<String, Session>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new session, replacing any session stored under the same hash.
    pub async fn create_session(&self, params: &CreateSessionParams<'_>) {
        let session = Session {
            session_id: params.session_id_hash.to_string(),
            user_id: params.user_id,
            expires_at: params.expires_at,
        };
        self.sessions
            .write()
            .await
            .insert(session.session_id.clone(), session);
    }

    /// Get a session by its hash. Expired sessions are returned as-is.
    pub async fn get_session(&self, session_id_hash: &str) -> Option<Session> {
        self.sessions.read().await.get(session_id_hash).cloned()
    }

    /// Delete a session. Returns whether a session was removed.
    pub async fn delete_session(&self, session_id_hash: &str) -> bool {
        self.sessions
            .write()
            .await
            .remove(session_id_hash)
            .is_some()
    }

    /// Remove every expired session and return how many were removed.
    pub async fn prune_expired(&self) -> usize {
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, session| !session.is_expired());
        before - sessions.len()
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }

    /// Spawn a background task that prunes expired sessions every `interval`.
    pub fn spawn_pruner(self: Arc<Self>, interval: Duration) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            // The first tick completes immediately.
            ticker.tick().await;
            loop {
                ticker.tick().await;
                let removed = self.prune_expired().await;
                if removed > 0 {
                    tracing::debug!(removed, "Pruned expired sessions");
                }
            }
        })
    }
}
