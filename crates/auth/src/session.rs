//! The capability set every authority variant provides.

use async_trait::async_trait;

use forum_core::{Credentials, Identity, Registration, SubjectId};

use crate::error::AuthError;
use crate::token::TokenPair;

/// Result of a successful register, login or refresh.
#[derive(Debug, Clone)]
pub struct Session {
    pub tokens: TokenPair,
    pub subject: SubjectId,
    /// Present after register/login. Always `None` after a refresh: the
    /// refresh path only proves the subject id, so callers that need profile
    /// data must fetch it from the identity store.
    pub identity: Option<Identity>,
}

impl Session {
    pub fn new(tokens: TokenPair, identity: Identity) -> Self {
        Self {
            tokens,
            subject: identity.id,
            identity: Some(identity),
        }
    }

    pub fn refreshed(tokens: TokenPair, subject: SubjectId) -> Self {
        Self {
            tokens,
            subject,
            identity: None,
        }
    }
}

/// Token authority contract shared by the local and the delegated variant.
///
/// Chosen once at startup and shared as `Arc<dyn Authority>`; callers never
/// know which variant they hold.
#[async_trait]
pub trait Authority: Send + Sync {
    async fn register(&self, registration: Registration) -> Result<Session, AuthError>;

    async fn login(&self, credentials: Credentials) -> Result<Session, AuthError>;

    /// Resolve an access token to its subject. Refresh tokens are refused.
    async fn validate(&self, access_token: &str) -> Result<SubjectId, AuthError>;

    async fn refresh(&self, refresh_token: &str) -> Result<Session, AuthError>;
}
