//! Credential resolution port
//!
//! The core only needs "given a name, return an optional string". Where the
//! value comes from (environment, a secret store, a file) is up to the
//! implementation. An absent value disables the provider; it is not an error.

use super::provider::{AwsCredentials, Credentials};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Looks up named credential or configuration values
#[async_trait]
pub trait CredentialResolver: Send + Sync {
    /// Resolve `name`, returning `None` when it is not set
    async fn resolve(&self, name: &str) -> Option<String>;
}

/// Which named values make up a provider's credentials
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CredentialSpec {
    /// A single API key
    ApiKey { name: String },
    /// An access key pair with an optional session token
    Aws {
        access_key_id: String,
        secret_access_key: String,
        session_token: String,
    },
}

impl CredentialSpec {
    pub fn api_key(name: impl Into<String>) -> Self {
        CredentialSpec::ApiKey { name: name.into() }
    }

    /// Resolve every required name; `None` if any required value is absent.
    pub async fn resolve(&self, resolver: &dyn CredentialResolver) -> Option<Credentials> {
        match self {
            CredentialSpec::ApiKey { name } => resolver.resolve(name).await.map(Credentials::ApiKey),
            CredentialSpec::Aws {
                access_key_id,
                secret_access_key,
                session_token,
            } => {
                let access_key_id = resolver.resolve(access_key_id).await?;
                let secret_access_key = resolver.resolve(secret_access_key).await?;
                let session_token = resolver.resolve(session_token).await;
                Some(Credentials::Aws(AwsCredentials {
                    access_key_id,
                    secret_access_key,
                    session_token,
                }))
            }
        }
    }

    /// Names this spec looks up, for diagnostics
    pub fn names(&self) -> Vec<&str> {
        match self {
            CredentialSpec::ApiKey { name } => vec![name.as_str()],
            CredentialSpec::Aws {
                access_key_id,
                secret_access_key,
                session_token,
            } => vec![
                access_key_id.as_str(),
                secret_access_key.as_str(),
                session_token.as_str(),
            ],
        }
    }
}

/// Resolver with no values, for mock mode and tests
pub struct NoCredentials;

#[async_trait]
impl CredentialResolver for NoCredentials {
    async fn resolve(&self, _name: &str) -> Option<String> {
        None
    }
}
