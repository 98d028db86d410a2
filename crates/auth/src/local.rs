//! Authority that signs and checks tokens in-process.

use async_trait::async_trait;
use chrono::Utc;

use forum_core::{Credentials, Registration, SubjectId};

use crate::authority::TokenAuthority;
use crate::claims::TokenKind;
use crate::credentials::{CredentialVerifier, StoreError, VerifyError};
use crate::error::AuthError;
use crate::session::{Authority, Session};

pub struct LocalAuthority {
    tokens: TokenAuthority,
    credentials: CredentialVerifier,
}

impl LocalAuthority {
    pub fn new(tokens: TokenAuthority, credentials: CredentialVerifier) -> Self {
        Self { tokens, credentials }
    }

    pub fn tokens(&self) -> &TokenAuthority {
        &self.tokens
    }

    pub fn credentials(&self) -> &CredentialVerifier {
        &self.credentials
    }
}

impl From<VerifyError> for AuthError {
    fn from(value: VerifyError) -> Self {
        match value {
            VerifyError::Credentials(e) => AuthError::Credentials(e),
            VerifyError::Store(StoreError::Duplicate) => {
                AuthError::Conflict("email already registered".to_string())
            }
            VerifyError::Store(e) => AuthError::Store(e),
            VerifyError::Hashing(e) => AuthError::Hashing(e),
        }
    }
}

#[async_trait]
impl Authority for LocalAuthority {
    async fn register(&self, registration: Registration) -> Result<Session, AuthError> {
        registration.validate()?;
        let identity = self.credentials.register(&registration).await?;
        let tokens = self.tokens.issue(identity.id, Utc::now())?;
        tracing::info!(subject = %identity.id, "identity registered");
        Ok(Session::new(tokens, identity))
    }

    async fn login(&self, credentials: Credentials) -> Result<Session, AuthError> {
        let identity = match self
            .credentials
            .verify_credentials(&credentials.email, &credentials.password)
            .await
        {
            Ok(identity) => identity,
            Err(e) => {
                tracing::info!(reason = ?e, "login refused");
                return Err(e.into());
            }
        };
        let tokens = self.tokens.issue(identity.id, Utc::now())?;
        tracing::info!(subject = %identity.id, "session issued");
        Ok(Session::new(tokens, identity))
    }

    async fn validate(&self, access_token: &str) -> Result<SubjectId, AuthError> {
        self.tokens
            .validate(access_token, TokenKind::Access, Utc::now())
            .map_err(|e| {
                tracing::debug!(reason = %e, "access token refused");
                AuthError::Token(e)
            })
    }

    async fn refresh(&self, refresh_token: &str) -> Result<Session, AuthError> {
        let (tokens, subject) = self.tokens.refresh(refresh_token, Utc::now())?;
        tracing::info!(subject = %subject, "session refreshed");
        Ok(Session::refreshed(tokens, subject))
    }
}
