use serde::{Deserialize, Serialize};

/// JWT payload issued on login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub uid: i64,      // user ID
    pub email: String,
    pub login: String,
    pub exp: i64,      // expires at (unix timestamp)
}
