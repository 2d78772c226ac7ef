use axum::{extract::State, routing::post, Json, Router};
use tracing::{error, instrument, warn};

use crate::{
    auth::{
        dto::{
            GetUserRequest, GetUserResponse, LoginRequest, LoginResponse, RegisterRequest,
            RegisterResponse,
        },
        errors::AuthError,
        extractors::{Deadline, RpcJson},
        status::{Code, RpcError},
    },
    state::AppState,
};

pub const SERVICE_PREFIX: &str = "/user.v1.UserService";

pub fn rpc_routes() -> Router<AppState> {
    Router::new()
        .route(&format!("{SERVICE_PREFIX}/Register"), post(register))
        .route(&format!("{SERVICE_PREFIX}/Login"), post(login))
        .route(&format!("{SERVICE_PREFIX}/GetUser"), post(get_user))
}

/// First empty field wins; later fields are not looked at.
fn require(fields: &[(&str, &str)]) -> Result<(), RpcError> {
    match fields.iter().find(|(_, value)| value.is_empty()) {
        Some((name, _)) => {
            warn!(field = *name, "missing required field");
            Err(RpcError::required(name))
        }
        None => Ok(()),
    }
}

#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    deadline: Deadline,
    RpcJson(payload): RpcJson<RegisterRequest>,
) -> Result<Json<RegisterResponse>, RpcError> {
    require(&[
        ("email", payload.email.as_str()),
        ("login", payload.login.as_str()),
        ("password", payload.password.as_str()),
    ])?;

    let result = deadline
        .run(
            state
                .auth
                .register(&payload.email, &payload.login, &payload.password),
        )
        .await
        .map_err(|_| RpcError::deadline_exceeded())?;

    match result {
        Ok(user_id) => Ok(Json(RegisterResponse { user_id })),
        Err(AuthError::DuplicateUser) => {
            Err(RpcError::new(Code::AlreadyExists, "user already exists"))
        }
        Err(e) => {
            error!(error = %e, "register failed");
            Err(RpcError::internal("failed to register user"))
        }
    }
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    deadline: Deadline,
    RpcJson(payload): RpcJson<LoginRequest>,
) -> Result<Json<LoginResponse>, RpcError> {
    require(&[
        ("login", payload.login.as_str()),
        ("password", payload.password.as_str()),
    ])?;

    let token = deadline
        .run(
            state
                .auth
                .authenticate_by_login(&payload.login, &payload.password),
        )
        .await
        .map_err(|_| RpcError::deadline_exceeded())?
        .map_err(|e| {
            warn!(error = %e, "login failed");
            RpcError::internal("failed to login")
        })?;

    Ok(Json(LoginResponse { token }))
}

#[instrument(skip(state))]
pub async fn get_user(
    State(state): State<AppState>,
    deadline: Deadline,
    RpcJson(payload): RpcJson<GetUserRequest>,
) -> Result<Json<GetUserResponse>, RpcError> {
    let profile = deadline
        .run(state.auth.get_user(payload.user_id))
        .await
        .map_err(|_| RpcError::deadline_exceeded())?
        .map_err(|e| {
            warn!(error = %e, user_id = payload.user_id, "get_user failed");
            RpcError::internal("failed to get user")
        })?;

    Ok(Json(GetUserResponse {
        user_details: profile.into(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn require_reports_first_missing_field() {
        let err = require(&[("email", ""), ("login", ""), ("password", "")]).unwrap_err();
        assert_eq!(err.msg, "email is required");

        let err = require(&[("email", "a@x.com"), ("login", ""), ("password", "")]).unwrap_err();
        assert_eq!(err.msg, "login is required");

        let err = require(&[("login", "alice"), ("password", "")]).unwrap_err();
        assert_eq!(err.code, Code::InvalidArgument);
        assert_eq!(err.msg, "password is required");

        assert!(require(&[("login", "alice"), ("password", "p")]).is_ok());
    }
}
