//! Wire messages of the identity service RPC.
//!
//! Four request/response methods plus a health probe, carried as JSON over
//! HTTP POST. Both the client ([`Authority`](crate::Authority) in the
//! delegated variant) and the service speak these types.

use serde::{Deserialize, Serialize};

use forum_core::Identity;

pub const REGISTER_PATH: &str = "/rpc/register";
pub const LOGIN_PATH: &str = "/rpc/login";
pub const REFRESH_PATH: &str = "/rpc/refresh";
pub const VALIDATE_PATH: &str = "/rpc/validate";
pub const HEALTH_PATH: &str = "/rpc/health";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

#[derive(Clone, Serialize, Deserialize)]
pub struct ValidateRequest {
    pub token: String,
}

/// Profile fields as sent over the wire. After a refresh only `id` is set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserReply {
    pub id: i64,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub username: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub email: String,
}

impl From<&Identity> for UserReply {
    fn from(value: &Identity) -> Self {
        Self {
            id: value.id.get(),
            username: value.username.clone(),
            email: value.email.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionReply {
    pub access_token: String,
    pub refresh_token: String,
    pub user: UserReply,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidateReply {
    pub valid: bool,
    /// Present exactly when `valid` is true.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<UserReply>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Body of every non-2xx RPC response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RpcError {
    pub error: String,
    pub code: String,
}
