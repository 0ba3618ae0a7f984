//! Provider adapter port
//!
//! Defines the interface for sending one prompt pair to an LLM backend.

use async_trait::async_trait;
use dilemma_domain::ProviderId;
use thiserror::Error;

/// Errors that can occur during a single provider call
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GatewayError {
    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("{provider} API error ({status}): {body}")]
    Http {
        provider: &'static str,
        status: u16,
        body: String,
    },

    #[error("Timeout")]
    Timeout,

    #[error("{0} response missing text")]
    MissingOutput(&'static str),

    #[error("Invalid response envelope: {0}")]
    InvalidResponse(String),

    #[error("Request signing failed: {0}")]
    Signing(String),

    #[error("{0} was given the wrong kind of credentials")]
    CredentialKind(&'static str),
}

/// A named JSON schema the completion should conform to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputSchema {
    pub name: &'static str,
    pub schema: serde_json::Value,
}

impl OutputSchema {
    pub fn new(name: &'static str, schema: serde_json::Value) -> Self {
        Self { name, schema }
    }
}

/// Prompt pair and model identifier for one completion call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionRequest {
    pub system_prompt: String,
    pub user_prompt: String,
    pub model: String,
    /// Adapters with constrained decoding enforce this; others ignore it
    pub output_schema: Option<OutputSchema>,
}

impl CompletionRequest {
    pub fn new(
        system_prompt: impl Into<String>,
        user_prompt: impl Into<String>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            system_prompt: system_prompt.into(),
            user_prompt: user_prompt.into(),
            model: model.into(),
            output_schema: None,
        }
    }

    pub fn with_output_schema(mut self, schema: OutputSchema) -> Self {
        self.output_schema = Some(schema);
        self
    }
}

/// Static keys for request signing
#[derive(Clone, PartialEq, Eq)]
pub struct AwsCredentials {
    pub access_key_id: String,
    pub secret_access_key: String,
    pub session_token: Option<String>,
}

/// Resolved credentials handed to an adapter for one call
#[derive(Clone, PartialEq, Eq)]
pub enum Credentials {
    ApiKey(String),
    Aws(AwsCredentials),
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Credentials::ApiKey(_) => f.write_str("Credentials::ApiKey(<redacted>)"),
            Credentials::Aws(aws) => f
                .debug_struct("Credentials::Aws")
                .field("access_key_id", &aws.access_key_id)
                .field("session_token", &aws.session_token.is_some())
                .finish_non_exhaustive(),
        }
    }
}

/// Adapter for one external LLM backend
///
/// The contract is (prompt pair, model id, credentials) → raw completion
/// text. Each implementation owns its auth scheme, request body and response
/// envelope. Implementations live in the infrastructure layer.
#[async_trait]
pub trait ProviderAdapter: Send + Sync {
    /// The backend this adapter talks to
    fn provider(&self) -> ProviderId;

    /// Perform a single completion call and return the top completion's text
    async fn invoke(
        &self,
        request: &CompletionRequest,
        credentials: &Credentials,
    ) -> Result<String, GatewayError>;
}
