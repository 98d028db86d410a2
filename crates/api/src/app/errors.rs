use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use forum_auth::AuthError;

/// Which endpoint family an error surfaced on.
///
/// Token failures carry a different code on the refresh path: there the
/// client has to log in again instead of refreshing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Surface {
    /// Register and login.
    Credentials,
    /// Any route authorized by an access token.
    Access,
    /// The refresh endpoint.
    Refresh,
}

impl Surface {
    fn rejection_code(self) -> &'static str {
        match self {
            Surface::Credentials => "invalid_credentials",
            Surface::Access => "invalid_access_token",
            Surface::Refresh => "invalid_refresh_token",
        }
    }
}

pub fn auth_error_to_response(err: AuthError, surface: Surface) -> axum::response::Response {
    match err {
        AuthError::Credentials(_) => json_error(
            StatusCode::UNAUTHORIZED,
            "invalid_credentials",
            "invalid credentials",
        ),
        AuthError::Token(e) => {
            tracing::debug!(reason = %e, "token refused");
            unauthorized(surface)
        }
        AuthError::Validation(msg) => json_error(StatusCode::BAD_REQUEST, "validation_error", msg),
        AuthError::Conflict(msg) => json_error(StatusCode::CONFLICT, "conflict", msg),
        AuthError::RemoteRejected { code, message } => remote_rejection(&code, message, surface),
        AuthError::Unavailable(msg) => {
            tracing::warn!(error = %msg, "authority unavailable");
            json_error(
                StatusCode::SERVICE_UNAVAILABLE,
                "auth_unavailable",
                "authentication service unavailable, try again",
            )
        }
        AuthError::OutcomeUnknown(msg) => {
            tracing::warn!(error = %msg, "authority outcome unknown");
            json_error(
                StatusCode::GATEWAY_TIMEOUT,
                "auth_outcome_unknown",
                "authentication service did not answer in time",
            )
        }
        err @ (AuthError::Hashing(_) | AuthError::Signing(_) | AuthError::Store(_)) => {
            tracing::error!(error = %err, "authority failure");
            internal_error()
        }
    }
}

/// Map a refusal relayed from the identity service.
///
/// The remote code decides the status; unknown codes are treated as a
/// token or credential refusal for the surface they arrived on.
fn remote_rejection(code: &str, message: String, surface: Surface) -> axum::response::Response {
    match code {
        "conflict" => json_error(StatusCode::CONFLICT, "conflict", message),
        "validation_error" => json_error(StatusCode::BAD_REQUEST, "validation_error", message),
        "invalid_credentials" => json_error(
            StatusCode::UNAUTHORIZED,
            "invalid_credentials",
            "invalid credentials",
        ),
        _ => {
            tracing::debug!(code, reason = %message, "identity service refused token");
            unauthorized(surface)
        }
    }
}

fn unauthorized(surface: Surface) -> axum::response::Response {
    json_error(StatusCode::UNAUTHORIZED, surface.rejection_code(), "unauthorized")
}

pub fn internal_error() -> axum::response::Response {
    json_error(
        StatusCode::INTERNAL_SERVER_ERROR,
        "internal_error",
        "internal error",
    )
}

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use forum_auth::{CredentialError, StoreError, TokenError};

    fn status(err: AuthError) -> StatusCode {
        auth_error_to_response(err, Surface::Credentials).status()
    }

    #[test]
    fn token_codes_depend_on_surface() {
        assert_eq!(Surface::Access.rejection_code(), "invalid_access_token");
        assert_eq!(Surface::Refresh.rejection_code(), "invalid_refresh_token");
        for surface in [Surface::Access, Surface::Refresh] {
            let res = auth_error_to_response(AuthError::Token(TokenError::Expired), surface);
            assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
        }
    }

    #[test]
    fn statuses_follow_the_error_class() {
        let cases = [
            (
                AuthError::Credentials(CredentialError::WrongSecret),
                StatusCode::UNAUTHORIZED,
            ),
            (AuthError::validation("bad"), StatusCode::BAD_REQUEST),
            (AuthError::Conflict("dup".into()), StatusCode::CONFLICT),
            (AuthError::Unavailable("down".into()), StatusCode::SERVICE_UNAVAILABLE),
            (AuthError::OutcomeUnknown("slow".into()), StatusCode::GATEWAY_TIMEOUT),
            (
                AuthError::Store(StoreError::Backend("disk".into())),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (
                AuthError::RemoteRejected {
                    code: "conflict".into(),
                    message: "email already registered".into(),
                },
                StatusCode::CONFLICT,
            ),
            (
                AuthError::RemoteRejected {
                    code: "invalid_token".into(),
                    message: "expired".into(),
                },
                StatusCode::UNAUTHORIZED,
            ),
        ];
        for (err, expected) in cases {
            assert_eq!(status(err), expected);
        }
    }
}
