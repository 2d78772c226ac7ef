use serde::{Deserialize, Serialize};

use crate::auth::repo_types::UserProfile;

// Absent fields deserialize to empty/zero, the same as an unset proto3 field,
// so presence checks see "" rather than a decode error.

/// Request body for `Register`.
#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct RegisterRequest {
    pub email: String,
    pub login: String,
    pub password: String,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct RegisterResponse {
    pub user_id: i64,
}

/// Request body for `Login`.
#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct LoginRequest {
    pub login: String,
    pub password: String,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct LoginResponse {
    pub token: String,
}

/// Request body for `GetUser`.
#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct GetUserRequest {
    pub user_id: i64,
}

/// Public part of the user returned to the caller.
#[derive(Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct UserDetails {
    pub user_id: i64,
    pub email: String,
    pub login: String,
}

impl From<UserProfile> for UserDetails {
    fn from(p: UserProfile) -> Self {
        Self {
            user_id: p.user_id,
            email: p.email,
            login: p.login,
        }
    }
}

#[derive(Debug, Deserialize, Serialize)]
pub struct GetUserResponse {
    pub user_details: UserDetails,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_default_to_empty() {
        let req: RegisterRequest = serde_json::from_str(r#"{"login":"alice"}"#).unwrap();
        assert_eq!(req.email, "");
        assert_eq!(req.login, "alice");
        assert_eq!(req.password, "");

        let req: GetUserRequest = serde_json::from_str("{}").unwrap();
        assert_eq!(req.user_id, 0);
    }

    #[test]
    fn user_details_serialization() {
        let body = GetUserResponse {
            user_details: UserDetails {
                user_id: 1,
                email: "a@x.com".into(),
                login: "alice".into(),
            },
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["user_details"]["user_id"], 1);
        assert_eq!(json["user_details"]["email"], "a@x.com");
        assert_eq!(json["user_details"]["login"], "alice");
        assert_eq!(json["user_details"].as_object().unwrap().len(), 3);
    }
}
