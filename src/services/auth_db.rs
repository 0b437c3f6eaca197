// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

//! User storage for authentication.
//!
//! `UserStore` is the create / find / find-by-id contract the auth service relies
//! on. `PgUserStore` backs it with PostgreSQL; `MemoryUserStore` keeps users in
//! process for `memory://` deployments and tests.

use crate::models::auth::{NewUser, User, ValidationError};
use async_trait::async_trait;
use sqlx::migrate::MigrateError;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use thiserror::Error;
use tokio::sync::RwLock;
use uuid::Uuid;

/// Errors returned by a user store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("Migration error: {0}")]
    Migration(#[from] MigrateError),
}

/// User persistence contract.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Validate and persist a new user.
    async fn create(&self, new_user: NewUser) -> Result<User, StoreError>;

    /// Get the oldest user with this username.
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, StoreError>;

    /// Get a user by ID.
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError>;
}

fn build_user(new_user: NewUser) -> Result<User, ValidationError> {
    new_user.validate()?;
    Ok(User {
        id: Uuid::now_v7(),
        username: new_user.username,
        password: new_user.password,
        created_at: chrono::Utc::now().timestamp_millis(),
    })
}

// ============================================================================
// PostgreSQL
// ============================================================================

/// PostgreSQL-backed user store.
#[derive(Clone)]
pub struct PgUserStore {
    pool: PgPool,
}

impl PgUserStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Open a connection pool for `database_url`.
    pub async fn connect(database_url: &str) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(5)
            .connect(database_url)
            .await?;
        Ok(Self::new(pool))
    }

    /// Apply pending schema migrations.
    pub async fn migrate(&self) -> Result<(), StoreError> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn create(&self, new_user: NewUser) -> Result<User, StoreError> {
        let user = build_user(new_user)?;

        sqlx::query(
            "INSERT INTO users (id, username, password, created_at)
             VALUES ($1, $2, $3, $4)",
        )
        .bind(user.id)
        .bind(&user.username)
        .bind(&user.password)
        .bind(user.created_at)
        .execute(&self.pool)
        .await?;

        Ok(user)
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, username, password, created_at
             FROM users WHERE username = $1
             ORDER BY created_at, id LIMIT 1",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, username, password, created_at FROM users WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }
}

// ============================================================================
// In-memory
// ============================================================================

/// User store held in process memory. Contents are lost on restart.
#[derive(Default)]
pub struct MemoryUserStore {
    users: RwLock<Vec<User>>,
}

impl MemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.users.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.users.read().await.is_empty()
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn create(&self, new_user: NewUser) -> Result<User, StoreError> {
        let user = build_user(new_user)?;
        self.users.write().await.push(user.clone());
        Ok(user)
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        // Insertion order is creation order, so the first hit is the oldest.
        Ok(self
            .users
            .read()
            .await
            .iter()
            .find(|u| u.username == username)
            .cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        Ok(self.users.read().await.iter().find(|u| u.id == id).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_memory_create_and_find_by_username() {
        let store = MemoryUserStore::new();
        let created = store
            .create(NewUser::new("alice", "secret"))
            .await
            .expect("Failed to create user");

        let found = store
            .find_by_username("alice")
            .await
            .expect("Failed to get user")
            .expect("User should exist");

        assert_eq!(found, created);
        assert_eq!(found.username, "alice");
        assert_eq!(found.password, "secret");
    }

    #[tokio::test]
    async fn test_memory_find_by_id() {
        let store = MemoryUserStore::new();
        let created = store.create(NewUser::new("bob", "pw")).await.unwrap();

        let found = store.find_by_id(created.id).await.unwrap();
        assert_eq!(found, Some(created));

        let missing = store.find_by_id(Uuid::now_v7()).await.unwrap();
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn test_memory_rejects_missing_fields() {
        let store = MemoryUserStore::new();

        let err = store.create(NewUser::new("", "pw")).await.unwrap_err();
        assert!(matches!(err, StoreError::Validation(ref v) if v.missing == vec!["username"]));

        let err = store.create(NewUser::new("dave", "")).await.unwrap_err();
        assert!(matches!(err, StoreError::Validation(ref v) if v.missing == vec!["password"]));

        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_memory_accepts_duplicate_usernames() {
        let store = MemoryUserStore::new();
        let first = store.create(NewUser::new("erin", "one")).await.unwrap();
        store.create(NewUser::new("erin", "two")).await.unwrap();

        assert_eq!(store.len().await, 2);

        let found = store.find_by_username("erin").await.unwrap().unwrap();
        assert_eq!(found.id, first.id);
        assert_eq!(found.password, "one");
    }

    #[tokio::test]
    async fn test_memory_username_lookup_is_exact() {
        let store = MemoryUserStore::new();
        store.create(NewUser::new("Frank", "pw")).await.unwrap();

        assert!(store.find_by_username("frank").await.unwrap().is_none());
        assert!(store.find_by_username("Frank ").await.unwrap().is_none());
    }

    #[test]
    fn test_validation_error_is_transparent() {
        let err = StoreError::from(NewUser::new("", "pw").validate().unwrap_err());
        assert_eq!(
            err.to_string(),
            "User validation failed: username is required"
        );
    }

    // ========== Integration Tests (require PostgreSQL) ==========

    /// Helper to create a migrated PgUserStore for tests.
    async fn create_test_store() -> PgUserStore {
        let url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");
        let store = PgUserStore::connect(&url)
            .await
            .expect("Failed to connect to PostgreSQL");
        store.migrate().await.expect("Failed to run migrations");
        store
    }

    #[tokio::test]
    #[ignore]
    async fn test_pg_create_and_find_user() {
        let store = create_test_store().await;
        let username = format!("test-{}", Uuid::now_v7());

        let created = store
            .create(NewUser::new(username.clone(), "plain"))
            .await
            .expect("Failed to create user");

        let by_name = store
            .find_by_username(&username)
            .await
            .expect("Failed to get user")
            .expect("User should exist");
        assert_eq!(by_name, created);

        let by_id = store
            .find_by_id(created.id)
            .await
            .expect("Failed to get user")
            .expect("User should exist");
        assert_eq!(by_id.password, "plain");

        // Cleanup
        sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(created.id)
            .execute(&store.pool)
            .await
            .ok();
    }

    #[tokio::test]
    #[ignore]
    async fn test_pg_duplicate_usernames_return_oldest() {
        let store = create_test_store().await;
        let username = format!("dup-{}", Uuid::now_v7());

        let first = store
            .create(NewUser::new(username.clone(), "first"))
            .await
            .unwrap();
        let second = store
            .create(NewUser::new(username.clone(), "second"))
            .await
            .unwrap();

        let found = store.find_by_username(&username).await.unwrap().unwrap();
        assert_eq!(found.id, first.id);

        sqlx::query("DELETE FROM users WHERE id = ANY($1)")
            .bind(vec![first.id, second.id])
            .execute(&store.pool)
            .await
            .ok();
    }

    #[tokio::test]
    #[ignore]
    async fn test_pg_rejects_missing_password() {
        let store = create_test_store().await;
        let err = store.create(NewUser::new("nopass", "")).await.unwrap_err();
        assert!(matches!(err, StoreError::Validation(_)));
    }
}
