//! `forum-auth`: session token authority (issue, validate, refresh) and
//! credential verification.
//!
//! This crate is decoupled from HTTP routing and storage: the identity store
//! is a port ([`IdentityStore`]) and the HTTP layer depends only on the
//! [`Authority`] contract.

pub mod authority;
pub mod claims;
pub mod codec;
pub mod credentials;
pub mod error;
pub mod local;
pub mod password;
pub mod rpc;
pub mod session;
pub mod token;

pub use authority::TokenAuthority;
pub use claims::{Claims, TokenError, TokenKind, validate_claims};
pub use codec::{ClaimsCodec, SigningError};
pub use credentials::{
    CredentialError, CredentialVerifier, IdentityStore, StoreError, StoredCredential, VerifyError,
};
pub use error::{AuthError, AuthorityInitError};
pub use local::LocalAuthority;
pub use password::{HashCost, HashingError, PasswordHash, PasswordHasher};
pub use session::{Authority, Session};
pub use token::{TokenPair, TokenTtl};
