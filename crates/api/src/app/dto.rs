use serde::{Deserialize, Serialize};

use forum_auth::Session;
use forum_core::Identity;

// -------------------------
// Request DTOs
// -------------------------

#[derive(Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

#[derive(Deserialize)]
pub struct ChangePasswordRequest {
    pub old_password: String,
    pub new_password: String,
}

// -------------------------
// Response DTOs
// -------------------------

#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: i64,
    pub username: String,
    pub email: String,
}

impl From<Identity> for UserResponse {
    fn from(value: Identity) -> Self {
        Self {
            id: value.id.get(),
            username: value.username,
            email: value.email,
        }
    }
}

/// Body of register and login responses.
#[derive(Serialize)]
pub struct SessionResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub user: Option<UserResponse>,
}

/// Body of a refresh response. Carries no profile fields.
#[derive(Serialize)]
pub struct RefreshResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub user_id: i64,
}

pub fn session_to_response(session: Session) -> SessionResponse {
    SessionResponse {
        access_token: session.tokens.access_token,
        refresh_token: session.tokens.refresh_token,
        user: session.identity.map(UserResponse::from),
    }
}

pub fn refreshed_to_response(session: Session) -> RefreshResponse {
    RefreshResponse {
        access_token: session.tokens.access_token,
        refresh_token: session.tokens.refresh_token,
        user_id: session.subject.get(),
    }
}
