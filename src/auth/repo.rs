use async_trait::async_trait;
use sqlx::PgPool;
use tracing::debug;

use crate::auth::errors::StoreError;
use crate::auth::repo_types::User;

/// Write side of the user store.
#[async_trait]
pub trait UserSaver: Send + Sync {
    /// Insert a new user and return its id.
    ///
    /// Fails with [`StoreError::DuplicateUser`] when the email or login is
    /// already taken; that is decided by the store's uniqueness constraint,
    /// never by a lookup beforehand.
    async fn insert(
        &self,
        email: &str,
        login: &str,
        password_hash: &[u8],
    ) -> Result<i64, StoreError>;
}

/// Read side of the user store.
#[async_trait]
pub trait UserProvider: Send + Sync {
    async fn find_by_id(&self, id: i64) -> Result<User, StoreError>;
    async fn find_by_login(&self, login: &str) -> Result<User, StoreError>;
}

/// Postgres-backed user store.
#[derive(Clone)]
pub struct PgUserStore {
    db: PgPool,
}

impl PgUserStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserSaver for PgUserStore {
    async fn insert(
        &self,
        email: &str,
        login: &str,
        password_hash: &[u8],
    ) -> Result<i64, StoreError> {
        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO users (email, login, pass_hash)
            VALUES ($1, $2, $3)
            RETURNING id
            "#,
        )
        .bind(email)
        .bind(login)
        .bind(password_hash)
        .fetch_one(&self.db)
        .await
        .map_err(StoreError::classify)?;

        debug!(user_id = id, "user row inserted");
        Ok(id)
    }
}

#[async_trait]
impl UserProvider for PgUserStore {
    async fn find_by_id(&self, id: i64) -> Result<User, StoreError> {
        sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, login, pass_hash
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await
        .map_err(StoreError::classify)?
        .ok_or(StoreError::NotFound)
    }

    async fn find_by_login(&self, login: &str) -> Result<User, StoreError> {
        sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, login, pass_hash
            FROM users
            WHERE login = $1
            "#,
        )
        .bind(login)
        .fetch_optional(&self.db)
        .await
        .map_err(StoreError::classify)?
        .ok_or(StoreError::NotFound)
    }
}
