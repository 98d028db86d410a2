use axum::{
    Json, Router,
    extract::Extension,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, put},
};

use forum_auth::{CredentialVerifier, StoreError, VerifyError};
use forum_core::ProfileUpdate;

use crate::app::dto;
use crate::app::errors;
use crate::context::SessionContext;

/// Profile endpoints. Needs direct access to the identity store, so only
/// the local variant mounts it.
pub fn router(credentials: CredentialVerifier) -> Router {
    Router::new()
        .route("/", get(get_profile).put(update_profile))
        .route("/password", put(change_password))
        .layer(Extension(credentials))
}

pub async fn get_profile(
    Extension(credentials): Extension<CredentialVerifier>,
    Extension(session): Extension<SessionContext>,
) -> axum::response::Response {
    match credentials.store().find(session.subject()).await {
        Ok(Some(identity)) => Json(dto::UserResponse::from(identity)).into_response(),
        Ok(None) => user_not_found(),
        Err(e) => {
            tracing::error!(error = %e, subject = %session.subject(), "profile lookup failed");
            errors::internal_error()
        }
    }
}

/// Replace username and email. The email is the login key, so it must stay
/// unique across identities.
pub async fn update_profile(
    Extension(credentials): Extension<CredentialVerifier>,
    Extension(session): Extension<SessionContext>,
    Json(body): Json<ProfileUpdate>,
) -> axum::response::Response {
    if let Err(e) = body.validate() {
        return errors::json_error(StatusCode::BAD_REQUEST, "validation_error", e.to_string());
    }

    match credentials
        .store()
        .update_profile(session.subject(), &body.username, &body.email)
        .await
    {
        Ok(Some(identity)) => {
            tracing::info!(subject = %session.subject(), "profile updated");
            Json(dto::UserResponse::from(identity)).into_response()
        }
        Ok(None) => user_not_found(),
        Err(StoreError::Duplicate) => {
            errors::json_error(StatusCode::CONFLICT, "conflict", "email already registered")
        }
        Err(e) => {
            tracing::error!(error = %e, subject = %session.subject(), "profile update failed");
            errors::internal_error()
        }
    }
}

fn user_not_found() -> axum::response::Response {
    errors::json_error(StatusCode::NOT_FOUND, "not_found", "user not found")
}

pub async fn change_password(
    Extension(credentials): Extension<CredentialVerifier>,
    Extension(session): Extension<SessionContext>,
    Json(body): Json<dto::ChangePasswordRequest>,
) -> axum::response::Response {
    if !(6..=50).contains(&body.new_password.chars().count()) {
        return errors::json_error(
            StatusCode::BAD_REQUEST,
            "validation_error",
            "password must be 6-50 characters",
        );
    }

    match credentials
        .change_password(session.subject(), &body.old_password, &body.new_password)
        .await
    {
        Ok(()) => {
            tracing::info!(subject = %session.subject(), "password changed");
            StatusCode::NO_CONTENT.into_response()
        }
        Err(VerifyError::Credentials(_)) => errors::json_error(
            StatusCode::UNAUTHORIZED,
            "invalid_credentials",
            "invalid credentials",
        ),
        Err(e) => {
            tracing::error!(error = %e, subject = %session.subject(), "password change failed");
            errors::internal_error()
        }
    }
}
