//! Account identity as seen by the session layer.

use serde::{Deserialize, Serialize};

use crate::{DomainError, DomainResult, SubjectId};

/// Display attributes of an account, keyed by its subject identifier.
///
/// Owned by the identity store. Copies of this record that arrive with a
/// session (for example from a remote authority) are informational only and
/// must be re-fetched from the store before being treated as authoritative.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub id: SubjectId,
    pub username: String,
    pub email: String,
}

impl Identity {
    pub fn new(id: SubjectId, username: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id,
            username: username.into(),
            email: email.into(),
        }
    }
}

/// Registration input: the identity attributes plus the plaintext credential.
///
/// The credential lives only as long as the request that carries it.
#[derive(Clone, Serialize, Deserialize)]
pub struct Registration {
    pub username: String,
    pub email: String,
    pub password: String,
}

impl Registration {
    /// Shape checks only; uniqueness is the identity store's concern.
    pub fn validate(&self) -> DomainResult<()> {
        check_username(&self.username)?;
        check_email(&self.email)?;
        if !(6..=50).contains(&self.password.chars().count()) {
            return Err(DomainError::validation("password must be 6-50 characters"));
        }
        Ok(())
    }
}

/// Replacement display attributes for an existing account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileUpdate {
    pub username: String,
    pub email: String,
}

impl ProfileUpdate {
    /// Same shape rules as registration. The email is also the login key,
    /// so uniqueness is checked again by the store.
    pub fn validate(&self) -> DomainResult<()> {
        check_username(&self.username)?;
        check_email(&self.email)
    }
}

fn check_username(username: &str) -> DomainResult<()> {
    if !(3..=50).contains(&username.trim().chars().count()) {
        return Err(DomainError::validation("username must be 3-50 characters"));
    }
    Ok(())
}

fn check_email(email: &str) -> DomainResult<()> {
    match email.trim().split_once('@') {
        Some((local, domain)) if !local.is_empty() && domain.contains('.') => Ok(()),
        _ => Err(DomainError::validation("email is not a valid address")),
    }
}

impl core::fmt::Debug for Registration {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Registration")
            .field("username", &self.username)
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Login input: the login key (email) and the plaintext credential.
#[derive(Clone, Serialize, Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl core::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registration(username: &str, email: &str, password: &str) -> Registration {
        Registration {
            username: username.to_string(),
            email: email.to_string(),
            password: password.to_string(),
        }
    }

    #[test]
    fn registration_shape_checks() {
        assert!(registration("ann", "ann@example.com", "secret1").validate().is_ok());
        assert!(registration("an", "ann@example.com", "secret1").validate().is_err());
        assert!(registration("ann", "ann.example.com", "secret1").validate().is_err());
        assert!(registration("ann", "@example.com", "secret1").validate().is_err());
        assert!(registration("ann", "ann@example.com", "short").validate().is_err());
    }

    #[test]
    fn profile_update_uses_registration_shape_rules() {
        let update = |username: &str, email: &str| ProfileUpdate {
            username: username.to_string(),
            email: email.to_string(),
        };
        assert!(update("ann", "ann@example.org").validate().is_ok());
        assert!(update("  a ", "ann@example.org").validate().is_err());
        assert!(update("ann", "ann@localhost").validate().is_err());
        assert!(update("ann", "").validate().is_err());
    }

    #[test]
    fn debug_output_never_contains_the_secret() {
        let creds = Credentials {
            email: "ann@example.com".to_string(),
            password: "hunter22".to_string(),
        };
        let reg = Registration {
            username: "ann".to_string(),
            email: "ann@example.com".to_string(),
            password: "hunter22".to_string(),
        };
        assert!(!format!("{creds:?}").contains("hunter22"));
        assert!(!format!("{reg:?}").contains("hunter22"));
    }
}
