//! Infrastructure layer for dilemma-panel
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer, including configuration file loading.

pub mod config;
pub mod credentials;
pub mod providers;

// Re-export commonly used types
pub use config::{ConfigLoader, ConfigValidationError, FileConfig, FileServerConfig};
pub use credentials::{CachedCredentialResolver, EnvCredentialResolver};
pub use providers::{BedrockAdapter, GeminiAdapter, OpenAiAdapter, build_adapters, http_client};
