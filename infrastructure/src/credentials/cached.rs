//! TTL cache in front of another resolver.
//!
//! Only found values are cached, so a credential that appears later is
//! picked up on the next lookup.

use async_trait::async_trait;
use dilemma_application::ports::credentials::CredentialResolver;
use moka::future::Cache;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Default lifetime of a cached value
pub const DEFAULT_TTL: Duration = Duration::from_secs(5 * 60);

const MAX_ENTRIES: u64 = 256;

pub struct CachedCredentialResolver {
    inner: Arc<dyn CredentialResolver>,
    cache: Cache<String, String>,
}

impl CachedCredentialResolver {
    pub fn new(inner: Arc<dyn CredentialResolver>, ttl: Duration) -> Self {
        let cache = Cache::builder()
            .max_capacity(MAX_ENTRIES)
            .time_to_live(ttl)
            .build();

        Self { inner, cache }
    }

    pub fn with_default_ttl(inner: Arc<dyn CredentialResolver>) -> Self {
        Self::new(inner, DEFAULT_TTL)
    }

    /// Drop every cached value.
    pub fn invalidate_all(&self) {
        self.cache.invalidate_all();
    }
}

#[async_trait]
impl CredentialResolver for CachedCredentialResolver {
    async fn resolve(&self, name: &str) -> Option<String> {
        if let Some(value) = self.cache.get(name).await {
            debug!(name, "Credential cache hit");
            return Some(value);
        }

        let value = self.inner.resolve(name).await?;
        self.cache.insert(name.to_string(), value.clone()).await;
        Some(value)
    }
}
