use serde::Serialize;
use sqlx::FromRow;

/// User record in the database.
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct User {
    pub id: i64,        // assigned by the store
    pub email: String,  // unique
    pub login: String,  // unique, alternate lookup key
    #[sqlx(rename = "pass_hash")]
    pub password_hash: Vec<u8>, // PHC-encoded Argon2 hash
}

/// Outward view of a user. Carries no credential material.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserProfile {
    pub user_id: i64,
    pub email: String,
    pub login: String,
}

impl From<User> for UserProfile {
    fn from(u: User) -> Self {
        Self {
            user_id: u.id,
            email: u.email,
            login: u.login,
        }
    }
}
