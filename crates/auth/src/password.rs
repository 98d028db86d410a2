//! One-way credential hashing (Argon2id, PHC string format).
//!
//! The cost parameters are chosen at runtime and embedded in every stored
//! hash. Verification reads them back from the hash, so raising the cost only
//! affects newly minted hashes.

use argon2::password_hash::SaltString;
use argon2::{Algorithm, Argon2, Params, PasswordHasher as _, PasswordVerifier as _, Version};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum HashingError {
    #[error("invalid hashing cost: {0}")]
    InvalidCost(String),

    #[error("password hashing failed: {0}")]
    Failure(String),
}

/// Argon2 work factor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HashCost {
    pub memory_kib: u32,
    pub iterations: u32,
    pub parallelism: u32,
}

impl Default for HashCost {
    fn default() -> Self {
        Self {
            memory_kib: Params::DEFAULT_M_COST,
            iterations: Params::DEFAULT_T_COST,
            parallelism: Params::DEFAULT_P_COST,
        }
    }
}

/// A stored credential hash.
///
/// Never logged: the `Debug` impl is redacted and there is deliberately no
/// `Serialize` impl.
#[derive(Clone, PartialEq, Eq)]
pub struct PasswordHash(String);

impl PasswordHash {
    /// Wrap a PHC string loaded from storage.
    pub fn from_phc(phc: impl Into<String>) -> Self {
        Self(phc.into())
    }

    /// PHC string, for persisting.
    pub fn as_phc(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Debug for PasswordHash {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str("PasswordHash(<redacted>)")
    }
}

#[derive(Debug, Clone)]
pub struct PasswordHasher {
    params: Params,
}

impl PasswordHasher {
    pub fn new(cost: HashCost) -> Result<Self, HashingError> {
        let params = Params::new(cost.memory_kib, cost.iterations, cost.parallelism, None)
            .map_err(|e| HashingError::InvalidCost(e.to_string()))?;
        Ok(Self { params })
    }

    fn argon2(&self) -> Argon2<'static> {
        Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params.clone())
    }

    pub fn hash(&self, plaintext: &str) -> Result<PasswordHash, HashingError> {
        let salt = salt()?;
        self.argon2()
            .hash_password(plaintext.as_bytes(), &salt)
            .map(|h| PasswordHash(h.to_string()))
            .map_err(|e| HashingError::Failure(e.to_string()))
    }

    /// Returns `false` on mismatch and on a stored value that does not parse.
    pub fn verify(&self, plaintext: &str, stored: &PasswordHash) -> bool {
        argon2::PasswordHash::new(stored.as_phc())
            .ok()
            .as_ref()
            .map(|hash| {
                self.argon2()
                    .verify_password(plaintext.as_bytes(), hash)
                    .is_ok()
            })
            .unwrap_or(false)
    }
}

fn salt() -> Result<SaltString, HashingError> {
    use rand::Rng;
    let mut bytes = [0u8; 16];
    rand::rng().fill(&mut bytes);
    SaltString::encode_b64(&bytes).map_err(|e| HashingError::Failure(e.to_string()))
}
