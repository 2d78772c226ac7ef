use std::time::Duration;

use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use time::{Duration as TimeDuration, OffsetDateTime};
use tracing::debug;

use crate::auth::claims::Claims;
use crate::auth::errors::SigningError;
use crate::auth::repo_types::User;
use crate::config::JwtConfig;

/// Signs HS256 bearer tokens with a pre-shared secret.
#[derive(Clone)]
pub struct JwtIssuer {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
}

impl JwtIssuer {
    pub fn new(secret: &str, ttl: Duration) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            ttl,
        }
    }

    pub fn from_config(cfg: &JwtConfig) -> Self {
        Self::new(
            &cfg.secret,
            Duration::from_secs(cfg.ttl_minutes.unsigned_abs().saturating_mul(60)),
        )
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Build `{uid, email, login, exp = now + ttl}` and sign it.
    ///
    /// Fails with [`SigningError::ExpiryOutOfRange`] when `now + ttl` is not a
    /// representable timestamp.
    pub fn issue(&self, user: &User) -> Result<String, SigningError> {
        let ttl = i64::try_from(self.ttl.as_secs()).map_err(|_| SigningError::ExpiryOutOfRange)?;
        let exp = OffsetDateTime::now_utc()
            .checked_add(TimeDuration::seconds(ttl))
            .ok_or(SigningError::ExpiryOutOfRange)?;
        let claims = Claims {
            uid: user.id,
            email: user.email.clone(),
            login: user.login.clone(),
            exp: exp.unix_timestamp(),
        };
        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)?;
        debug!(user_id = user.id, "jwt signed");
        Ok(token)
    }

    /// Check signature and expiry. Consumers holding the same secret do this;
    /// the service itself only issues.
    pub fn verify(&self, token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
        let validation = Validation::new(Algorithm::HS256);
        let data = decode::<Claims>(token, &self.decoding, &validation)?;
        debug!(user_id = data.claims.uid, "jwt verified");
        Ok(data.claims)
    }
}
