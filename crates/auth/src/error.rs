use thiserror::Error;

use crate::claims::TokenError;
use crate::codec::SigningError;
use crate::credentials::{CredentialError, StoreError};
use crate::password::HashingError;

/// Startup-time failures. Never retried.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthorityInitError {
    #[error("signing key is empty")]
    EmptySigningKey,

    #[error("token lifetimes must be positive")]
    InvalidTtl,

    #[error("identity service unavailable: {0}")]
    ConnectionUnavailable(String),

    #[error(transparent)]
    Hashing(#[from] HashingError),
}

/// Per-call failures of an [`crate::Authority`].
#[derive(Debug, Error)]
pub enum AuthError {
    #[error(transparent)]
    Credentials(#[from] CredentialError),

    #[error(transparent)]
    Token(#[from] TokenError),

    #[error("invalid input: {0}")]
    Validation(String),

    #[error("conflict: {0}")]
    Conflict(String),

    /// The remote identity service answered and refused the request.
    #[error("rejected by identity service: {message}")]
    RemoteRejected { code: String, message: String },

    /// The remote identity service could not be reached for this call.
    #[error("identity service unavailable: {0}")]
    Unavailable(String),

    /// A mutating remote call timed out; it may or may not have been applied.
    #[error("identity service outcome unknown: {0}")]
    OutcomeUnknown(String),

    #[error(transparent)]
    Hashing(#[from] HashingError),

    #[error(transparent)]
    Signing(#[from] SigningError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl AuthError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }
}

impl From<forum_core::DomainError> for AuthError {
    fn from(value: forum_core::DomainError) -> Self {
        use forum_core::DomainError;
        match value {
            DomainError::Validation(msg) | DomainError::InvalidId(msg) => Self::Validation(msg),
        }
    }
}
