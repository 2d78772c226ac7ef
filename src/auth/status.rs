use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

/// Coarse status surfaced to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Code {
    InvalidArgument,
    AlreadyExists,
    DeadlineExceeded,
    Internal,
}

impl Code {
    pub fn http_status(self) -> StatusCode {
        match self {
            Code::InvalidArgument => StatusCode::BAD_REQUEST,
            Code::AlreadyExists => StatusCode::CONFLICT,
            Code::DeadlineExceeded => StatusCode::GATEWAY_TIMEOUT,
            Code::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Error returned over the wire: a code and a short, fixed message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RpcError {
    pub code: Code,
    pub msg: String,
}

impl RpcError {
    pub fn new(code: Code, msg: impl Into<String>) -> Self {
        Self {
            code,
            msg: msg.into(),
        }
    }

    pub fn required(field: &str) -> Self {
        Self::new(Code::InvalidArgument, format!("{field} is required"))
    }

    pub fn internal(msg: &str) -> Self {
        Self::new(Code::Internal, msg)
    }

    pub fn deadline_exceeded() -> Self {
        Self::new(Code::DeadlineExceeded, "deadline exceeded")
    }
}

impl IntoResponse for RpcError {
    fn into_response(self) -> Response {
        (self.code.http_status(), Json(self)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_serialize_snake_case() {
        let err = RpcError::required("email");
        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(json["code"], "invalid_argument");
        assert_eq!(json["msg"], "email is required");
    }

    #[test]
    fn http_statuses() {
        assert_eq!(Code::InvalidArgument.http_status(), StatusCode::BAD_REQUEST);
        assert_eq!(Code::AlreadyExists.http_status(), StatusCode::CONFLICT);
        assert_eq!(Code::DeadlineExceeded.http_status(), StatusCode::GATEWAY_TIMEOUT);
        assert_eq!(Code::Internal.http_status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn into_response_uses_code_status() {
        let res = RpcError::new(Code::AlreadyExists, "user already exists").into_response();
        assert_eq!(res.status(), StatusCode::CONFLICT);
    }
}
