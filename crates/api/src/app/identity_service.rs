//! Identity RPC service: the remote end of the delegated authority.
//!
//! Serves register/login/refresh/validate over JSON from an in-process
//! [`LocalAuthority`]. Refusals are 4xx with an [`RpcError`] body; the
//! `validate` method instead answers 200 with `valid = false`.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};

use forum_auth::rpc::{
    HEALTH_PATH, LOGIN_PATH, REFRESH_PATH, REGISTER_PATH, RefreshRequest, RpcError, SessionReply,
    UserReply, VALIDATE_PATH, ValidateReply, ValidateRequest,
};
use forum_auth::{AuthError, Authority, LocalAuthority, Session};
use forum_core::{Credentials, Registration};

pub fn router(authority: Arc<LocalAuthority>) -> Router {
    Router::new()
        .route(HEALTH_PATH, get(health))
        .route(REGISTER_PATH, post(register))
        .route(LOGIN_PATH, post(login))
        .route(REFRESH_PATH, post(refresh))
        .route(VALIDATE_PATH, post(validate))
        .with_state(authority)
}

async fn health() -> StatusCode {
    StatusCode::OK
}

async fn register(
    State(authority): State<Arc<LocalAuthority>>,
    Json(body): Json<Registration>,
) -> axum::response::Response {
    match authority.register(body).await {
        Ok(session) => Json(session_reply(session)).into_response(),
        Err(e) => rpc_error(e, "invalid_token"),
    }
}

async fn login(
    State(authority): State<Arc<LocalAuthority>>,
    Json(body): Json<Credentials>,
) -> axum::response::Response {
    match authority.login(body).await {
        Ok(session) => Json(session_reply(session)).into_response(),
        Err(e) => rpc_error(e, "invalid_token"),
    }
}

async fn refresh(
    State(authority): State<Arc<LocalAuthority>>,
    Json(body): Json<RefreshRequest>,
) -> axum::response::Response {
    match authority.refresh(&body.refresh_token).await {
        Ok(session) => Json(session_reply(session)).into_response(),
        Err(e) => rpc_error(e, "invalid_refresh_token"),
    }
}

async fn validate(
    State(authority): State<Arc<LocalAuthority>>,
    Json(body): Json<ValidateRequest>,
) -> axum::response::Response {
    let subject = match authority.validate(&body.token).await {
        Ok(subject) => subject,
        Err(AuthError::Token(e)) => {
            return Json(ValidateReply {
                valid: false,
                user_id: None,
                user: None,
                error: Some(e.to_string()),
            })
            .into_response();
        }
        Err(e) => return rpc_error(e, "invalid_token"),
    };

    // Display attributes ride along when the store still has the record.
    let user = match authority.credentials().store().find(subject).await {
        Ok(found) => found.as_ref().map(UserReply::from),
        Err(e) => {
            tracing::warn!(error = %e, subject = %subject, "profile lookup failed during validate");
            None
        }
    };

    Json(ValidateReply {
        valid: true,
        user_id: Some(subject.get()),
        user,
        error: None,
    })
    .into_response()
}

fn session_reply(session: Session) -> SessionReply {
    let user = match &session.identity {
        Some(identity) => UserReply::from(identity),
        None => UserReply {
            id: session.subject.get(),
            username: String::new(),
            email: String::new(),
        },
    };
    SessionReply {
        access_token: session.tokens.access_token,
        refresh_token: session.tokens.refresh_token,
        user,
    }
}

fn rpc_error(err: AuthError, token_code: &str) -> axum::response::Response {
    let (status, code) = match &err {
        AuthError::Credentials(_) => (StatusCode::UNAUTHORIZED, "invalid_credentials"),
        AuthError::Token(_) => (StatusCode::UNAUTHORIZED, token_code),
        AuthError::Validation(_) => (StatusCode::BAD_REQUEST, "validation_error"),
        AuthError::Conflict(_) => (StatusCode::CONFLICT, "conflict"),
        _ => {
            tracing::error!(error = %err, "identity service failure");
            (StatusCode::INTERNAL_SERVER_ERROR, "internal_error")
        }
    };
    let error = match status {
        StatusCode::INTERNAL_SERVER_ERROR => "internal error".to_string(),
        _ => err.to_string(),
    };
    (
        status,
        Json(RpcError {
            error,
            code: code.to_string(),
        }),
    )
        .into_response()
}
