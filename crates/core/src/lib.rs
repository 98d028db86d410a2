//! `forum-core`: shared identity primitives and the domain error model.
//!
//! This crate has no transport, storage or crypto concerns.

pub mod error;
pub mod id;
pub mod identity;

pub use error::{DomainError, DomainResult};
pub use id::SubjectId;
pub use identity::{Credentials, Identity, ProfileUpdate, Registration};
