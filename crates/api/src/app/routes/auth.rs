use std::sync::Arc;

use axum::{
    Json, Router,
    extract::Extension,
    http::StatusCode,
    response::IntoResponse,
    routing::post,
};

use forum_core::{Credentials, Registration};

use crate::app::dto;
use crate::app::errors::{self, Surface};
use crate::app::services::AuthServices;

/// Public endpoints: nothing here requires a session.
pub fn router() -> Router {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/refresh", post(refresh))
}

pub async fn register(
    Extension(services): Extension<Arc<AuthServices>>,
    Json(body): Json<Registration>,
) -> axum::response::Response {
    match services.authority.register(body).await {
        Ok(session) => {
            (StatusCode::CREATED, Json(dto::session_to_response(session))).into_response()
        }
        Err(e) => errors::auth_error_to_response(e, Surface::Credentials),
    }
}

pub async fn login(
    Extension(services): Extension<Arc<AuthServices>>,
    Json(body): Json<Credentials>,
) -> axum::response::Response {
    match services.authority.login(body).await {
        Ok(session) => (StatusCode::OK, Json(dto::session_to_response(session))).into_response(),
        Err(e) => errors::auth_error_to_response(e, Surface::Credentials),
    }
}

pub async fn refresh(
    Extension(services): Extension<Arc<AuthServices>>,
    Json(body): Json<dto::RefreshRequest>,
) -> axum::response::Response {
    match services.authority.refresh(&body.refresh_token).await {
        Ok(session) => (StatusCode::OK, Json(dto::refreshed_to_response(session))).into_response(),
        Err(e) => errors::auth_error_to_response(e, Surface::Refresh),
    }
}
