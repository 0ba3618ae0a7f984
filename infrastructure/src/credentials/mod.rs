//! Credential resolvers
//!
//! - [`EnvCredentialResolver`] reads process environment variables
//! - [`CachedCredentialResolver`] keeps resolved values for a TTL

mod cached;
mod env;

pub use cached::CachedCredentialResolver;
pub use env::EnvCredentialResolver;
