use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use forum_core::SubjectId;

/// Which half of a token pair a token is.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenKind {
    /// Short-lived, presented on every request.
    Access,
    /// Long-lived, presented only to mint a new pair.
    Refresh,
}

impl TokenKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenKind::Access => "access",
            TokenKind::Refresh => "refresh",
        }
    }
}

impl core::fmt::Display for TokenKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Claims carried inside a signed session token.
///
/// Timestamps are unix seconds, matching the registered JWT claim names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject identifier.
    pub sub: SubjectId,

    /// Token kind.
    pub typ: TokenKind,

    /// Issued-at.
    pub iat: i64,

    /// Expiry.
    pub exp: i64,
}

impl Claims {
    pub fn new(
        sub: SubjectId,
        typ: TokenKind,
        issued_at: DateTime<Utc>,
        ttl: chrono::Duration,
    ) -> Self {
        Self {
            sub,
            typ,
            iat: issued_at.timestamp(),
            exp: (issued_at + ttl).timestamp(),
        }
    }
}

/// Why a token was refused.
///
/// Callers at the HTTP boundary report every variant as the same
/// "unauthorized"; the variant only feeds logs.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TokenError {
    #[error("token signature is invalid")]
    InvalidSignature,

    #[error("wrong token kind: expected {expected}, got {found}")]
    WrongTokenKind { expected: TokenKind, found: TokenKind },

    #[error("token has expired")]
    Expired,
}

/// Check decoded claims against the expected kind and the current instant.
///
/// A token is still valid at exactly its expiry second and stops being valid
/// the second after.
pub fn validate_claims(
    claims: &Claims,
    expected: TokenKind,
    now: DateTime<Utc>,
) -> Result<SubjectId, TokenError> {
    if claims.typ != expected {
        return Err(TokenError::WrongTokenKind {
            expected,
            found: claims.typ,
        });
    }
    if now.timestamp() > claims.exp {
        return Err(TokenError::Expired);
    }
    Ok(claims.sub)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 1, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn kind_serializes_lowercase() {
        let claims = Claims::new(SubjectId::new(1), TokenKind::Refresh, t0(), Duration::minutes(1));
        let json = serde_json::to_value(&claims).unwrap();
        assert_eq!(json["typ"], "refresh");
        assert_eq!(json["sub"], 1);
        assert_eq!(json["exp"].as_i64().unwrap() - json["iat"].as_i64().unwrap(), 60);
    }

    #[test]
    fn expiry_boundary() {
        let claims = Claims::new(SubjectId::new(9), TokenKind::Access, t0(), Duration::minutes(15));
        let expiry = t0() + Duration::minutes(15);

        assert_eq!(
            validate_claims(&claims, TokenKind::Access, expiry - Duration::seconds(1)),
            Ok(SubjectId::new(9))
        );
        assert_eq!(validate_claims(&claims, TokenKind::Access, expiry), Ok(SubjectId::new(9)));
        assert_eq!(
            validate_claims(&claims, TokenKind::Access, expiry + Duration::seconds(1)),
            Err(TokenError::Expired)
        );
    }

    #[test]
    fn kind_is_checked_before_expiry() {
        let claims = Claims::new(SubjectId::new(9), TokenKind::Refresh, t0(), Duration::minutes(1));
        let later = t0() + Duration::days(1);
        let err = validate_claims(&claims, TokenKind::Access, later).unwrap_err();
        assert_eq!(
            err,
            TokenError::WrongTokenKind {
                expected: TokenKind::Access,
                found: TokenKind::Refresh,
            }
        );
    }
}
