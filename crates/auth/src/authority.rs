//! Self-contained signing authority.
//!
//! Owns the signing secret and the token lifetimes. Every operation is a pure
//! function of its inputs and the supplied instant, so one instance is shared
//! freely across request tasks.

use chrono::{DateTime, Utc};

use forum_core::SubjectId;

use crate::claims::{Claims, TokenError, TokenKind, validate_claims};
use crate::codec::{ClaimsCodec, SigningError};
use crate::error::{AuthError, AuthorityInitError};
use crate::token::{TokenPair, TokenTtl};

pub struct TokenAuthority {
    codec: ClaimsCodec,
    ttl: TokenTtl,
}

impl TokenAuthority {
    pub fn new(secret: impl AsRef<[u8]>, ttl: TokenTtl) -> Result<Self, AuthorityInitError> {
        let secret = secret.as_ref();
        if secret.is_empty() {
            return Err(AuthorityInitError::EmptySigningKey);
        }
        if ttl.access <= chrono::Duration::zero() || ttl.refresh <= chrono::Duration::zero() {
            return Err(AuthorityInitError::InvalidTtl);
        }
        Ok(Self {
            codec: ClaimsCodec::new(secret),
            ttl,
        })
    }

    pub fn ttl(&self) -> TokenTtl {
        self.ttl
    }

    /// Mint an access/refresh pair for `subject`, both issued at `now`.
    pub fn issue(&self, subject: SubjectId, now: DateTime<Utc>) -> Result<TokenPair, SigningError> {
        let access = Claims::new(subject, TokenKind::Access, now, self.ttl.access);
        let refresh = Claims::new(subject, TokenKind::Refresh, now, self.ttl.refresh);
        Ok(TokenPair {
            access_token: self.codec.encode(&access)?,
            refresh_token: self.codec.encode(&refresh)?,
        })
    }

    pub fn validate(
        &self,
        token: &str,
        expected: TokenKind,
        now: DateTime<Utc>,
    ) -> Result<SubjectId, TokenError> {
        let claims = self.codec.decode(token)?;
        validate_claims(&claims, expected, now)
    }

    /// Exchange a refresh token for a fresh pair.
    ///
    /// The presented refresh token is not consumed: it stays valid until its
    /// own expiry.
    pub fn refresh(
        &self,
        refresh_token: &str,
        now: DateTime<Utc>,
    ) -> Result<(TokenPair, SubjectId), AuthError> {
        let subject = self.validate(refresh_token, TokenKind::Refresh, now)?;
        let pair = self.issue(subject, now)?;
        Ok((pair, subject))
    }
}
