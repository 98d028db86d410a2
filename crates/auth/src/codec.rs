//! Compact signed token encoding (HS256 JWT).

use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use thiserror::Error;

use crate::claims::{Claims, TokenError};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("token signing failed: {0}")]
pub struct SigningError(pub String);

/// Encodes claims into `header.payload.signature` and back.
///
/// Only signature integrity and structure are checked here. Kind and expiry
/// are checked by [`crate::validate_claims`] against a caller-supplied clock.
pub struct ClaimsCodec {
    header: Header,
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
}

impl ClaimsCodec {
    pub fn new(secret: &[u8]) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.validate_aud = false;
        validation.required_spec_claims.clear();
        validation.leeway = 0;

        Self {
            header: Header::new(Algorithm::HS256),
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            validation,
        }
    }

    pub fn encode(&self, claims: &Claims) -> Result<String, SigningError> {
        jsonwebtoken::encode(&self.header, claims, &self.encoding)
            .map_err(|e| SigningError(e.to_string()))
    }

    /// Any structural, encoding or MAC failure is reported as
    /// [`TokenError::InvalidSignature`].
    pub fn decode(&self, token: &str) -> Result<Claims, TokenError> {
        jsonwebtoken::decode::<Claims>(token, &self.decoding, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| {
                tracing::debug!(reason = ?e.kind(), "token rejected by codec");
                TokenError::InvalidSignature
            })
    }
}
