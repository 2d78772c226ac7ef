use std::sync::Arc;

use tracing::{debug, error, info, instrument, warn};

use crate::auth::errors::AuthError;
use crate::auth::jwt::JwtIssuer;
use crate::auth::password::CredentialCodec;
use crate::auth::repo::{UserProvider, UserSaver};
use crate::auth::repo_types::{User, UserProfile};

/// Registration, authentication and profile lookup.
///
/// Holds nothing but its collaborators, so one instance is shared by every
/// request.
#[derive(Clone)]
pub struct AuthService {
    saver: Arc<dyn UserSaver>,
    provider: Arc<dyn UserProvider>,
    codec: CredentialCodec,
    issuer: JwtIssuer,
}

impl AuthService {
    pub fn new(
        saver: Arc<dyn UserSaver>,
        provider: Arc<dyn UserProvider>,
        codec: CredentialCodec,
        issuer: JwtIssuer,
    ) -> Self {
        Self {
            saver,
            provider,
            codec,
            issuer,
        }
    }

    /// Hash the password, then insert. A hashing failure never reaches the store.
    #[instrument(skip(self, password))]
    pub async fn register(
        &self,
        email: &str,
        login: &str,
        password: &str,
    ) -> Result<i64, AuthError> {
        info!("registering user");

        let codec = self.codec.clone();
        let plain = password.to_owned();
        let hash = tokio::task::spawn_blocking(move || codec.hash(&plain))
            .await?
            .map_err(|e| {
                error!(error = %e, "failed to generate password hash");
                e
            })?;

        match self.saver.insert(email, login, &hash).await {
            Ok(id) => {
                info!(user_id = id, "user registered");
                Ok(id)
            }
            Err(e) => {
                let err = AuthError::from(e);
                match &err {
                    AuthError::DuplicateUser => warn!("user already exists"),
                    other => error!(error = %other, "failed to save user"),
                }
                Err(err)
            }
        }
    }

    /// Verify the password of user `user_id` and issue a token.
    ///
    /// An unknown id fails exactly like a wrong password.
    #[instrument(skip(self, password))]
    pub async fn authenticate(&self, user_id: i64, password: &str) -> Result<String, AuthError> {
        info!("attempting to login user");
        let user = self
            .provider
            .find_by_id(user_id)
            .await
            .map_err(AuthError::from)
            .map_err(hide_not_found)?;
        self.check_and_issue(user, password).await
    }

    /// Resolve `login` to a user, then proceed as [`Self::authenticate`].
    #[instrument(skip(self, password))]
    pub async fn authenticate_by_login(
        &self,
        login: &str,
        password: &str,
    ) -> Result<String, AuthError> {
        let user = self
            .provider
            .find_by_login(login)
            .await
            .map_err(AuthError::from)
            .map_err(hide_not_found)?;
        self.authenticate(user.id, password).await
    }

    #[instrument(skip(self))]
    pub async fn get_user(&self, user_id: i64) -> Result<UserProfile, AuthError> {
        let user = self
            .provider
            .find_by_id(user_id)
            .await
            .map_err(|e| log_lookup_failure(AuthError::from(e)))?;
        debug!("user found");
        Ok(user.into())
    }

    #[instrument(skip(self))]
    pub async fn get_user_by_login(&self, login: &str) -> Result<UserProfile, AuthError> {
        let user = self
            .provider
            .find_by_login(login)
            .await
            .map_err(|e| log_lookup_failure(AuthError::from(e)))?;
        debug!(user_id = user.id, "user found");
        Ok(user.into())
    }

    async fn check_and_issue(&self, user: User, password: &str) -> Result<String, AuthError> {
        let codec = self.codec.clone();
        let plain = password.to_owned();
        let stored = user.password_hash.clone();
        let ok = tokio::task::spawn_blocking(move || codec.verify(&plain, &stored)).await??;
        if !ok {
            info!(user_id = user.id, "invalid credentials");
            return Err(AuthError::InvalidCredentials);
        }

        let token = self.issuer.issue(&user).map_err(|e| {
            error!(error = %e, "failed to generate token");
            e
        })?;
        info!(user_id = user.id, "user logged in successfully");
        Ok(token)
    }
}

fn log_lookup_failure(err: AuthError) -> AuthError {
    match &err {
        AuthError::NotFound => warn!("user not found"),
        other => error!(error = %other, "failed to get user"),
    }
    err
}

fn hide_not_found(err: AuthError) -> AuthError {
    match err {
        AuthError::NotFound => {
            warn!("user not found");
            AuthError::InvalidCredentials
        }
        other => {
            error!(error = %other, "failed to get user");
            other
        }
    }
}
