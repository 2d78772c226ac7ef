use thiserror::Error;

/// Failures of the user record store, classified once at the store boundary.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("user already exists")]
    DuplicateUser,

    #[error("user not found")]
    NotFound,

    #[error("storage unavailable")]
    Unavailable(#[source] sqlx::Error),
}

impl StoreError {
    /// Sorts a driver error into the store taxonomy.
    pub fn classify(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::RowNotFound => Self::NotFound,
            sqlx::Error::Database(db) if db.is_unique_violation() => Self::DuplicateUser,
            _ => Self::Unavailable(err),
        }
    }
}

#[derive(Debug, Error)]
pub enum CodecError {
    #[error("password hashing failed: {0}")]
    Hash(String),

    #[error("stored password hash is malformed: {0}")]
    MalformedHash(String),
}

#[derive(Debug, Error)]
pub enum SigningError {
    #[error("token expiry is out of range")]
    ExpiryOutOfRange,

    #[error("token signing failed")]
    Encode(#[from] jsonwebtoken::errors::Error),
}

/// Errors surfaced by [`AuthService`](super::services::AuthService).
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("user already exists")]
    DuplicateUser,

    #[error("user not found")]
    NotFound,

    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("storage unavailable")]
    Storage(#[source] sqlx::Error),

    #[error(transparent)]
    Codec(#[from] CodecError),

    #[error(transparent)]
    Signing(#[from] SigningError),

    #[error("credential task failed")]
    Task(#[from] tokio::task::JoinError),
}

impl From<StoreError> for AuthError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::DuplicateUser => Self::DuplicateUser,
            StoreError::NotFound => Self::NotFound,
            StoreError::Unavailable(e) => Self::Storage(e),
        }
    }
}
