//! HTTP application wiring (Axum router + service wiring).
//!
//! - `services.rs`: authority selection (local or remote)
//! - `routes/`: HTTP routes + handlers
//! - `dto.rs`: request/response DTOs
//! - `errors.rs`: consistent error responses
//! - `identity_service.rs`: the identity RPC service router

use std::sync::Arc;

use axum::{Extension, Router, routing::get};
use tower::ServiceBuilder;

use crate::middleware;

pub mod dto;
pub mod errors;
pub mod identity_service;
pub mod routes;
pub mod services;

pub use services::AuthServices;

/// Build the full HTTP router (public entrypoint used by `main.rs`).
pub fn build_app(services: AuthServices) -> Router {
    let auth_state = middleware::AuthState {
        authority: services.authority.clone(),
    };
    let credentials = services.credentials.clone();
    let services = Arc::new(services);

    // Protected routes: require a valid access token.
    let protected = routes::protected(credentials).layer(
        ServiceBuilder::new().layer(axum::middleware::from_fn_with_state(
            auth_state,
            middleware::session_validator,
        )),
    );

    let api = Router::new()
        .nest("/auth", routes::auth::router().layer(Extension(services)))
        .merge(protected);

    Router::new()
        .route("/health", get(routes::system::health))
        .nest("/api", api)
}
