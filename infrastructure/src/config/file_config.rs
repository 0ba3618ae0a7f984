//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! They are deserialized directly and converted into the application's
//! [`EvaluationConfig`] once merged.

mod providers;

pub use providers::{
    FileBedrockConfig, FileGeminiConfig, FileOpenAiConfig, FileProvidersConfig,
};

use dilemma_application::config::{EvaluationConfig, ProviderSettings};
use dilemma_domain::ProviderId;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Configuration validation errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigValidationError {
    #[error("timeout_seconds cannot be 0")]
    InvalidTimeout,

    #[error("model name for {0} cannot be empty")]
    EmptyModelName(ProviderId),

    #[error("providers.bedrock.region cannot be empty")]
    EmptyRegion,

    #[error("server.bind is not a socket address: {0}")]
    InvalidBind(String),
}

/// HTTP Basic auth for the API server.
///
/// Names the credentials holding the user and password. Auth is enforced
/// only when both resolve.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileBasicAuthConfig {
    pub user_env: String,
    pub password_env: String,
}

impl Default for FileBasicAuthConfig {
    fn default() -> Self {
        Self {
            user_env: "BASIC_AUTH_USER".to_string(),
            password_env: "BASIC_AUTH_PASSWORD".to_string(),
        }
    }
}

/// Raw HTTP server configuration from TOML
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileServerConfig {
    /// Address the API server listens on
    pub bind: String,
    pub basic_auth: FileBasicAuthConfig,
}

impl Default for FileServerConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1:3000".to_string(),
            basic_auth: FileBasicAuthConfig::default(),
        }
    }
}

/// Complete configuration file
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Answer from deterministic mock results instead of calling providers
    pub mock_mode: bool,
    /// Per-call timeout in seconds
    pub timeout_seconds: u64,
    pub providers: FileProvidersConfig,
    pub server: FileServerConfig,
}

impl Default for FileConfig {
    fn default() -> Self {
        Self {
            mock_mode: false,
            timeout_seconds: 60,
            providers: FileProvidersConfig::default(),
            server: FileServerConfig::default(),
        }
    }
}

impl FileConfig {
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.timeout_seconds == 0 {
            return Err(ConfigValidationError::InvalidTimeout);
        }

        for (provider, model) in [
            (ProviderId::Gpt, &self.providers.openai.model),
            (ProviderId::Gemini, &self.providers.gemini.model),
            (ProviderId::Claude, &self.providers.bedrock.model_id),
        ] {
            if model.trim().is_empty() {
                return Err(ConfigValidationError::EmptyModelName(provider));
            }
        }

        if self.providers.bedrock.region.trim().is_empty() {
            return Err(ConfigValidationError::EmptyRegion);
        }

        if self.server.bind.parse::<std::net::SocketAddr>().is_err() {
            return Err(ConfigValidationError::InvalidBind(self.server.bind.clone()));
        }

        Ok(())
    }

    /// Convert to the application's evaluation settings
    pub fn to_evaluation_config(&self) -> EvaluationConfig {
        let providers = &self.providers;
        EvaluationConfig::default()
            .with_mock_mode(self.mock_mode)
            .with_call_timeout(Duration::from_secs(self.timeout_seconds))
            .with_generator(providers.generator)
            .with_provider(
                ProviderId::Gpt,
                ProviderSettings::new(&providers.openai.model, providers.openai.credentials()),
            )
            .with_provider(
                ProviderId::Gemini,
                ProviderSettings::new(&providers.gemini.model, providers.gemini.credentials()),
            )
            .with_provider(
                ProviderId::Claude,
                ProviderSettings::new(&providers.bedrock.model_id, providers.bedrock.credentials()),
            )
    }
}
