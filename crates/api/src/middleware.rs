use std::sync::Arc;

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    middleware::Next,
    response::Response,
};

use forum_auth::Authority;

use crate::app::errors::{self, Surface};
use crate::context::SessionContext;

#[derive(Clone)]
pub struct AuthState {
    pub authority: Arc<dyn Authority>,
}

/// Why a request never reached the authority.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    MissingCredentials,
    MalformedHeader,
    EmptyToken,
}

impl Rejection {
    pub fn code(self) -> &'static str {
        match self {
            Rejection::MissingCredentials => "missing_credentials",
            Rejection::MalformedHeader => "malformed_header",
            Rejection::EmptyToken => "empty_token",
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            Rejection::MissingCredentials => "missing credentials",
            Rejection::MalformedHeader => "malformed header",
            Rejection::EmptyToken => "empty token",
        }
    }

    fn into_response(self) -> Response {
        errors::json_error(StatusCode::UNAUTHORIZED, self.code(), self.message())
    }
}

/// Resolve the bearer token to a subject and attach a [`SessionContext`].
///
/// Nothing is kept between requests.
pub async fn session_validator(
    State(state): State<AuthState>,
    mut req: axum::http::Request<axum::body::Body>,
    next: Next,
) -> Response {
    let token = match extract_bearer(req.headers()) {
        Ok(token) => token.to_owned(),
        Err(rejection) => {
            tracing::debug!(code = rejection.code(), "request rejected before validation");
            return rejection.into_response();
        }
    };

    let subject = match state.authority.validate(&token).await {
        Ok(subject) => subject,
        Err(err) => return errors::auth_error_to_response(err, Surface::Access),
    };

    req.extensions_mut().insert(SessionContext::new(subject));

    next.run(req).await
}

/// The header must be exactly `Bearer <token>`: two space-separated parts.
///
/// A bare `Bearer` is an empty token. HTTP servers strip trailing
/// whitespace, so that is what `Bearer ` arrives as.
pub fn extract_bearer(headers: &HeaderMap) -> Result<&str, Rejection> {
    let header = headers
        .get(axum::http::header::AUTHORIZATION)
        .ok_or(Rejection::MissingCredentials)?;

    let header = header.to_str().map_err(|_| Rejection::MalformedHeader)?;
    if header == "Bearer" {
        return Err(Rejection::EmptyToken);
    }

    let parts: Vec<&str> = header.split(' ').collect();
    let [scheme, token] = parts.as_slice() else {
        return Err(Rejection::MalformedHeader);
    };
    if *scheme != "Bearer" {
        return Err(Rejection::MalformedHeader);
    }
    if token.is_empty() {
        return Err(Rejection::EmptyToken);
    }

    Ok(*token)
}
