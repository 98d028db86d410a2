//! Credential verification against the identity store.

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use forum_core::{Identity, Registration, SubjectId};

use crate::password::{HashingError, PasswordHash, PasswordHasher};

/// Identity record together with its stored credential hash.
#[derive(Debug, Clone)]
pub struct StoredCredential {
    pub identity: Identity,
    pub hash: PasswordHash,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("login key already registered")]
    Duplicate,

    #[error("identity store failure: {0}")]
    Backend(String),
}

/// Port to whatever owns durable user records.
#[async_trait]
pub trait IdentityStore: Send + Sync {
    async fn fetch_hash_by_login_key(
        &self,
        login_key: &str,
    ) -> Result<Option<StoredCredential>, StoreError>;

    /// Persist a new identity. The store assigns the subject identifier.
    async fn create(
        &self,
        username: &str,
        email: &str,
        hash: PasswordHash,
    ) -> Result<Identity, StoreError>;

    async fn find(&self, id: SubjectId) -> Result<Option<Identity>, StoreError>;

    /// Returns `false` when no identity has this id.
    async fn update_hash(&self, id: SubjectId, hash: PasswordHash) -> Result<bool, StoreError>;

    /// Replace username and email. `Ok(None)` when no identity has this id;
    /// [`StoreError::Duplicate`] when the email belongs to another identity.
    async fn update_profile(
        &self,
        id: SubjectId,
        username: &str,
        email: &str,
    ) -> Result<Option<Identity>, StoreError>;
}

#[async_trait]
impl<S> IdentityStore for Arc<S>
where
    S: IdentityStore + ?Sized,
{
    async fn fetch_hash_by_login_key(
        &self,
        login_key: &str,
    ) -> Result<Option<StoredCredential>, StoreError> {
        (**self).fetch_hash_by_login_key(login_key).await
    }

    async fn create(
        &self,
        username: &str,
        email: &str,
        hash: PasswordHash,
    ) -> Result<Identity, StoreError> {
        (**self).create(username, email, hash).await
    }

    async fn find(&self, id: SubjectId) -> Result<Option<Identity>, StoreError> {
        (**self).find(id).await
    }

    async fn update_hash(&self, id: SubjectId, hash: PasswordHash) -> Result<bool, StoreError> {
        (**self).update_hash(id, hash).await
    }

    async fn update_profile(
        &self,
        id: SubjectId,
        username: &str,
        email: &str,
    ) -> Result<Option<Identity>, StoreError> {
        (**self).update_profile(id, username, email).await
    }
}

/// Why credentials were refused.
///
/// Both variants display identically so that responses cannot be used to
/// enumerate registered login keys.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum CredentialError {
    #[error("invalid credentials")]
    UnknownLoginKey,

    #[error("invalid credentials")]
    WrongSecret,
}

#[derive(Debug, Error)]
pub enum VerifyError {
    #[error(transparent)]
    Credentials(#[from] CredentialError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Hashing(#[from] HashingError),
}

/// Checks login credentials and manages stored hashes.
///
/// Hashing is CPU-bound, so it is moved off the async executor.
#[derive(Clone)]
pub struct CredentialVerifier {
    store: Arc<dyn IdentityStore>,
    hasher: PasswordHasher,
    decoy: PasswordHash,
}

impl CredentialVerifier {
    pub fn new(
        store: Arc<dyn IdentityStore>,
        hasher: PasswordHasher,
    ) -> Result<Self, HashingError> {
        let decoy = hasher.hash("decoy")?;
        Ok(Self {
            store,
            hasher,
            decoy,
        })
    }

    pub fn store(&self) -> &Arc<dyn IdentityStore> {
        &self.store
    }

    pub async fn verify_credentials(
        &self,
        login_key: &str,
        secret: &str,
    ) -> Result<Identity, VerifyError> {
        let Some(stored) = self.store.fetch_hash_by_login_key(login_key).await? else {
            // Unknown keys cost one verification too.
            let _ = self.check(secret.to_owned(), self.decoy.clone()).await;
            return Err(CredentialError::UnknownLoginKey.into());
        };
        if self.check(secret.to_owned(), stored.hash).await? {
            Ok(stored.identity)
        } else {
            Err(CredentialError::WrongSecret.into())
        }
    }

    pub async fn register(&self, registration: &Registration) -> Result<Identity, VerifyError> {
        let hash = self.hash(registration.password.clone()).await?;
        let identity = self
            .store
            .create(&registration.username, &registration.email, hash)
            .await?;
        Ok(identity)
    }

    /// Replace the stored hash after re-checking the current secret.
    pub async fn change_password(
        &self,
        id: SubjectId,
        current: &str,
        replacement: &str,
    ) -> Result<(), VerifyError> {
        let identity = self
            .store
            .find(id)
            .await?
            .ok_or(CredentialError::UnknownLoginKey)?;
        self.verify_credentials(&identity.email, current).await?;
        let hash = self.hash(replacement.to_owned()).await?;
        if !self.store.update_hash(id, hash).await? {
            return Err(CredentialError::UnknownLoginKey.into());
        }
        Ok(())
    }

    async fn hash(&self, plaintext: String) -> Result<PasswordHash, HashingError> {
        let hasher = self.hasher.clone();
        tokio::task::spawn_blocking(move || hasher.hash(&plaintext))
            .await
            .map_err(|e| HashingError::Failure(e.to_string()))?
    }

    async fn check(&self, plaintext: String, hash: PasswordHash) -> Result<bool, HashingError> {
        let hasher = self.hasher.clone();
        tokio::task::spawn_blocking(move || hasher.verify(&plaintext, &hash))
            .await
            .map_err(|e| HashingError::Failure(e.to_string()))
    }
}
