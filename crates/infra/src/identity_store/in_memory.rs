use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;

use forum_auth::{IdentityStore, PasswordHash, StoreError, StoredCredential};
use forum_core::{Identity, SubjectId};

/// In-memory identity store for tests/dev.
///
/// Login keys (emails) are matched case-insensitively. Subject ids are
/// assigned sequentially from 1.
#[derive(Debug, Default)]
pub struct InMemoryIdentityStore {
    inner: RwLock<Inner>,
}

#[derive(Debug, Default)]
struct Inner {
    last_id: i64,
    records: HashMap<SubjectId, StoredCredential>,
    by_login_key: HashMap<String, SubjectId>,
}

impl InMemoryIdentityStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn login_key(email: &str) -> String {
    email.trim().to_lowercase()
}

fn poisoned() -> StoreError {
    StoreError::Backend("identity store lock poisoned".to_string())
}

#[async_trait]
impl IdentityStore for InMemoryIdentityStore {
    async fn fetch_hash_by_login_key(
        &self,
        key: &str,
    ) -> Result<Option<StoredCredential>, StoreError> {
        let inner = self.inner.read().map_err(|_| poisoned())?;
        Ok(inner
            .by_login_key
            .get(&login_key(key))
            .and_then(|id| inner.records.get(id))
            .cloned())
    }

    async fn create(
        &self,
        username: &str,
        email: &str,
        hash: PasswordHash,
    ) -> Result<Identity, StoreError> {
        let mut inner = self.inner.write().map_err(|_| poisoned())?;
        let key = login_key(email);
        if inner.by_login_key.contains_key(&key) {
            return Err(StoreError::Duplicate);
        }
        inner.last_id += 1;
        let identity = Identity::new(SubjectId::new(inner.last_id), username.trim(), email.trim());
        inner.by_login_key.insert(key, identity.id);
        inner.records.insert(
            identity.id,
            StoredCredential {
                identity: identity.clone(),
                hash,
            },
        );
        Ok(identity)
    }

    async fn find(&self, id: SubjectId) -> Result<Option<Identity>, StoreError> {
        let inner = self.inner.read().map_err(|_| poisoned())?;
        Ok(inner.records.get(&id).map(|r| r.identity.clone()))
    }

    async fn update_hash(&self, id: SubjectId, hash: PasswordHash) -> Result<bool, StoreError> {
        let mut inner = self.inner.write().map_err(|_| poisoned())?;
        match inner.records.get_mut(&id) {
            Some(record) => {
                record.hash = hash;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn update_profile(
        &self,
        id: SubjectId,
        username: &str,
        email: &str,
    ) -> Result<Option<Identity>, StoreError> {
        let mut inner = self.inner.write().map_err(|_| poisoned())?;
        let Some(old_key) = inner.records.get(&id).map(|r| login_key(&r.identity.email)) else {
            return Ok(None);
        };
        let key = login_key(email);
        if inner.by_login_key.get(&key).is_some_and(|owner| *owner != id) {
            return Err(StoreError::Duplicate);
        }
        inner.by_login_key.remove(&old_key);
        inner.by_login_key.insert(key, id);
        let Some(record) = inner.records.get_mut(&id) else {
            return Ok(None);
        };
        record.identity.username = username.trim().to_string();
        record.identity.email = email.trim().to_string();
        Ok(Some(record.identity.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn assigns_sequential_ids() {
        let store = InMemoryIdentityStore::new();
        let a = store.create("ann", "ann@example.com", PasswordHash::from_phc("x")).await.unwrap();
        let b = store.create("bob", "bob@example.com", PasswordHash::from_phc("y")).await.unwrap();
        assert_eq!(a.id, SubjectId::new(1));
        assert_eq!(b.id, SubjectId::new(2));
    }

    #[tokio::test]
    async fn login_key_is_unique_case_insensitively() {
        let store = InMemoryIdentityStore::new();
        store.create("ann", "ann@example.com", PasswordHash::from_phc("x")).await.unwrap();
        let err = store
            .create("ann2", "ANN@example.com", PasswordHash::from_phc("x"))
            .await
            .unwrap_err();
        assert_eq!(err, StoreError::Duplicate);
    }

    #[tokio::test]
    async fn fetch_and_update_hash() {
        let store = InMemoryIdentityStore::new();
        let ann = store
            .create("ann", "ann@example.com", PasswordHash::from_phc("old"))
            .await
            .unwrap();

        let found = store.fetch_hash_by_login_key("Ann@Example.com").await.unwrap().unwrap();
        assert_eq!(found.identity, ann);
        assert_eq!(found.hash.as_phc(), "old");

        assert!(store.update_hash(ann.id, PasswordHash::from_phc("new")).await.unwrap());
        let found = store.fetch_hash_by_login_key("ann@example.com").await.unwrap().unwrap();
        assert_eq!(found.hash.as_phc(), "new");

        let missing = SubjectId::new(99);
        assert!(!store.update_hash(missing, PasswordHash::from_phc("z")).await.unwrap());
        assert!(store.find(missing).await.unwrap().is_none());
        assert!(store.fetch_hash_by_login_key("nobody@example.com").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn profile_update_moves_the_login_key() {
        let store = InMemoryIdentityStore::new();
        let ann = store
            .create("ann", "ann@example.com", PasswordHash::from_phc("h"))
            .await
            .unwrap();

        let updated = store
            .update_profile(ann.id, " annie ", "Annie@Example.org")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated, Identity::new(ann.id, "annie", "Annie@Example.org"));
        assert_eq!(store.find(ann.id).await.unwrap(), Some(updated));

        assert!(store.fetch_hash_by_login_key("ann@example.com").await.unwrap().is_none());
        let found = store.fetch_hash_by_login_key("annie@example.org").await.unwrap().unwrap();
        assert_eq!(found.identity.id, ann.id);
        assert_eq!(found.hash.as_phc(), "h");

        // The old key is free again.
        store.create("ann", "ann@example.com", PasswordHash::from_phc("x")).await.unwrap();
    }

    #[tokio::test]
    async fn profile_update_refuses_another_identitys_email() {
        let store = InMemoryIdentityStore::new();
        let ann = store
            .create("ann", "ann@example.com", PasswordHash::from_phc("a"))
            .await
            .unwrap();
        store.create("bob", "bob@example.com", PasswordHash::from_phc("b")).await.unwrap();

        let err = store.update_profile(ann.id, "ann", "BOB@example.com").await.unwrap_err();
        assert_eq!(err, StoreError::Duplicate);
        assert_eq!(store.find(ann.id).await.unwrap().unwrap().email, "ann@example.com");

        // Keeping one's own email is not a conflict.
        let same = store.update_profile(ann.id, "ann2", "ANN@example.com").await.unwrap();
        assert_eq!(same.unwrap().username, "ann2");

        let missing = store.update_profile(SubjectId::new(99), "zed", "zed@example.com").await;
        assert_eq!(missing.unwrap(), None);
    }
}
