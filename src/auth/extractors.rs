use std::future::Future;
use std::time::Duration;

use axum::{
    async_trait,
    extract::{FromRequest, FromRequestParts, Request},
    http::request::Parts,
    Json,
};
use serde::de::DeserializeOwned;
use tracing::warn;

use crate::auth::status::{Code, RpcError};
use crate::state::AppState;

/// Header carrying the caller's remaining budget in milliseconds.
pub const TIMEOUT_HEADER: &str = "x-request-timeout-ms";

/// Per-call deadline: the caller's budget, capped at the configured timeout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Deadline(pub Duration);

impl Deadline {
    /// Run `fut` under the deadline. On expiry the future is dropped, which
    /// aborts any storage call it is waiting on.
    pub async fn run<F, T>(self, fut: F) -> Result<T, tokio::time::error::Elapsed>
    where
        F: Future<Output = T>,
    {
        tokio::time::timeout(self.0, fut).await
    }

    /// An absent header means the full `max`; so does a malformed one, which
    /// is logged.
    fn from_header(value: Option<&str>, max: Duration) -> Self {
        let Some(raw) = value else {
            return Self(max);
        };
        match raw.trim().parse::<u64>() {
            Ok(ms) => Self(Duration::from_millis(ms).min(max)),
            Err(_) => {
                warn!("ignoring malformed {TIMEOUT_HEADER} header");
                Self(max)
            }
        }
    }
}

#[async_trait]
impl FromRequestParts<AppState> for Deadline {
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let max = Duration::from_secs(state.config.request_timeout_secs);
        let value = parts
            .headers
            .get(TIMEOUT_HEADER)
            .map(|h| h.to_str().unwrap_or_default());
        Ok(Deadline::from_header(value, max))
    }
}

/// JSON request body whose rejections use the RPC error envelope.
///
/// Any body that fails to decode yields `invalid_argument`; the decoder's
/// message is only logged.
#[derive(Debug)]
pub struct RpcJson<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for RpcJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = RpcError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(Self(value)),
            Err(rejection) => {
                warn!(
                    status = %rejection.status(),
                    error = %rejection.body_text(),
                    "rejected request body"
                );
                Err(RpcError::new(Code::InvalidArgument, "invalid request body"))
            }
        }
    }
}
