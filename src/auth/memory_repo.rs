use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::auth::errors::StoreError;
use crate::auth::repo::{UserProvider, UserSaver};
use crate::auth::repo_types::User;

#[derive(Default)]
struct Rows {
    next_id: i64,
    by_id: HashMap<i64, User>,
}

/// In-process user store with the same contract as the Postgres one.
///
/// The uniqueness check and the insert happen under one lock, which plays the
/// role of the table's unique constraints: of two racing inserts for the same
/// email or login exactly one wins.
#[derive(Default)]
pub struct InMemoryUserStore {
    rows: Mutex<Rows>,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.rows.lock().await.by_id.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl UserSaver for InMemoryUserStore {
    async fn insert(
        &self,
        email: &str,
        login: &str,
        password_hash: &[u8],
    ) -> Result<i64, StoreError> {
        let mut rows = self.rows.lock().await;
        if rows
            .by_id
            .values()
            .any(|u| u.email == email || u.login == login)
        {
            return Err(StoreError::DuplicateUser);
        }

        rows.next_id += 1;
        let id = rows.next_id;
        rows.by_id.insert(
            id,
            User {
                id,
                email: email.to_string(),
                login: login.to_string(),
                password_hash: password_hash.to_vec(),
            },
        );
        Ok(id)
    }
}

#[async_trait]
impl UserProvider for InMemoryUserStore {
    async fn find_by_id(&self, id: i64) -> Result<User, StoreError> {
        self.rows
            .lock()
            .await
            .by_id
            .get(&id)
            .cloned()
            .ok_or(StoreError::NotFound)
    }

    async fn find_by_login(&self, login: &str) -> Result<User, StoreError> {
        self.rows
            .lock()
            .await
            .by_id
            .values()
            .find(|u| u.login == login)
            .cloned()
            .ok_or(StoreError::NotFound)
    }
}
