use axum::{Router, routing::get};

use forum_auth::CredentialVerifier;

pub mod auth;
pub mod profile;
pub mod system;

/// Router for all endpoints that require a valid access token.
pub fn protected(credentials: Option<CredentialVerifier>) -> Router {
    let router = Router::new().route("/whoami", get(system::whoami));
    match credentials {
        Some(credentials) => router.nest("/profile", profile::router(credentials)),
        None => router,
    }
}
