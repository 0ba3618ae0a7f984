//! Provider configuration from TOML (`[providers]` section)
//!
//! Credentials are never stored in the file, only the names of the
//! environment variables that hold them.

use dilemma_application::ports::credentials::CredentialSpec;
use dilemma_domain::ProviderId;
use serde::{Deserialize, Serialize};

/// OpenAI Responses API settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileOpenAiConfig {
    pub model: String,
    /// Environment variable name for the API key (default: "OPENAI_API_KEY").
    pub api_key_env: String,
    pub base_url: String,
}

impl Default for FileOpenAiConfig {
    fn default() -> Self {
        Self {
            model: "gpt-4o-mini".to_string(),
            api_key_env: "OPENAI_API_KEY".to_string(),
            base_url: "https://api.openai.com/v1".to_string(),
        }
    }
}

impl FileOpenAiConfig {
    pub fn credentials(&self) -> CredentialSpec {
        CredentialSpec::api_key(&self.api_key_env)
    }
}

/// Gemini generateContent settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileGeminiConfig {
    pub model: String,
    /// Environment variable name for the API key (default: "GOOGLE_API_KEY").
    pub api_key_env: String,
    pub base_url: String,
}

impl Default for FileGeminiConfig {
    fn default() -> Self {
        Self {
            model: "gemini-1.5-flash".to_string(),
            api_key_env: "GOOGLE_API_KEY".to_string(),
            base_url: "https://generativelanguage.googleapis.com/v1beta".to_string(),
        }
    }
}

impl FileGeminiConfig {
    pub fn credentials(&self) -> CredentialSpec {
        CredentialSpec::api_key(&self.api_key_env)
    }
}

/// AWS Bedrock settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileBedrockConfig {
    pub model_id: String,
    /// AWS region for Bedrock models (default: "us-east-1")
    pub region: String,
    pub access_key_id_env: String,
    pub secret_access_key_env: String,
    /// Optional; only sent when the variable is set
    pub session_token_env: String,
}

impl Default for FileBedrockConfig {
    fn default() -> Self {
        Self {
            model_id: "anthropic.claude-3-5-sonnet-20240620-v1:0".to_string(),
            region: "us-east-1".to_string(),
            access_key_id_env: "AWS_ACCESS_KEY_ID".to_string(),
            secret_access_key_env: "AWS_SECRET_ACCESS_KEY".to_string(),
            session_token_env: "AWS_SESSION_TOKEN".to_string(),
        }
    }
}

impl FileBedrockConfig {
    pub fn credentials(&self) -> CredentialSpec {
        CredentialSpec::Aws {
            access_key_id: self.access_key_id_env.clone(),
            secret_access_key: self.secret_access_key_env.clone(),
            session_token: self.session_token_env.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileProvidersConfig {
    /// Provider used for scenario generation (default: "claude").
    pub generator: ProviderId,
    pub openai: FileOpenAiConfig,
    pub gemini: FileGeminiConfig,
    pub bedrock: FileBedrockConfig,
}

impl Default for FileProvidersConfig {
    fn default() -> Self {
        Self {
            generator: ProviderId::Claude,
            openai: FileOpenAiConfig::default(),
            gemini: FileGeminiConfig::default(),
            bedrock: FileBedrockConfig::default(),
        }
    }
}
