//! Authority selection and wiring.
//!
//! The variant is decided here, once, from configuration. Everything past
//! this point holds an `Arc<dyn Authority>`.

use std::sync::Arc;

use forum_auth::{
    Authority, AuthorityInitError, CredentialVerifier, LocalAuthority, PasswordHasher,
    TokenAuthority,
};
use forum_infra::{InMemoryIdentityStore, RemoteAuthority, RemoteConfig};

use crate::config::{AuthMode, LocalSettings};

#[derive(Clone)]
pub struct AuthServices {
    pub authority: Arc<dyn Authority>,
    /// Direct access to stored credentials. Only the local variant has one;
    /// profile routes are mounted only when it is present.
    pub credentials: Option<CredentialVerifier>,
}

impl AuthServices {
    pub async fn from_mode(mode: &AuthMode) -> Result<Self, AuthorityInitError> {
        match mode {
            AuthMode::Local(settings) => {
                let local = build_local_authority(settings)?;
                Ok(Self::local(Arc::new(local)))
            }
            AuthMode::Remote(config) => Self::remote(config.clone()).await,
        }
    }

    pub fn local(authority: Arc<LocalAuthority>) -> Self {
        let credentials = authority.credentials().clone();
        Self {
            authority,
            credentials: Some(credentials),
        }
    }

    pub async fn remote(config: RemoteConfig) -> Result<Self, AuthorityInitError> {
        let remote = RemoteAuthority::connect(config).await?;
        Ok(Self {
            authority: Arc::new(remote),
            credentials: None,
        })
    }
}

/// In-process authority over the in-memory identity store.
pub fn build_local_authority(
    settings: &LocalSettings,
) -> Result<LocalAuthority, AuthorityInitError> {
    let tokens = TokenAuthority::new(settings.secret.as_bytes(), settings.ttl)?;
    let hasher = PasswordHasher::new(settings.cost)?;
    let store = Arc::new(InMemoryIdentityStore::new());
    let credentials = CredentialVerifier::new(store, hasher)?;
    Ok(LocalAuthority::new(tokens, credentials))
}
