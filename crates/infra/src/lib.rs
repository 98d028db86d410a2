//! Infrastructure layer: identity storage and the remote identity service
//! client.

pub mod identity_store;
pub mod remote;


pub use identity_store::InMemoryIdentityStore;
pub use remote::{RemoteAuthority, RemoteConfig};
