use async_trait::async_trait;
use dilemma_application::ports::credentials::CredentialResolver;
use tracing::debug;

/// Resolves names from the process environment; an empty value counts as unset
#[derive(Debug, Default, Clone, Copy)]
pub struct EnvCredentialResolver;

impl EnvCredentialResolver {
    fn lookup(name: &str) -> Option<String> {
        std::env::var(name).ok().filter(|value| !value.trim().is_empty())
    }
}

#[async_trait]
impl CredentialResolver for EnvCredentialResolver {
    async fn resolve(&self, name: &str) -> Option<String> {
        let value = Self::lookup(name);
        debug!(name, found = value.is_some(), "Resolved from environment");
        value
    }
}
