//! Evaluation configuration: what the coordinator needs from the outside.
//!
//! [`EvaluationConfig`] is built once by the composition root and threaded
//! explicitly through the use cases, so no use case reads process state.

use crate::ports::credentials::CredentialSpec;
use dilemma_domain::ProviderId;
use std::collections::BTreeMap;
use std::time::Duration;

/// Per-provider model id and credential names
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderSettings {
    pub model: String,
    pub credentials: CredentialSpec,
}

impl ProviderSettings {
    pub fn new(model: impl Into<String>, credentials: CredentialSpec) -> Self {
        Self {
            model: model.into(),
            credentials,
        }
    }

    /// Defaults matching the stock environment variable names
    pub fn default_for(provider: ProviderId) -> Self {
        match provider {
            ProviderId::Gpt => Self::new("gpt-4o-mini", CredentialSpec::api_key("OPENAI_API_KEY")),
            ProviderId::Gemini => {
                Self::new("gemini-1.5-flash", CredentialSpec::api_key("GOOGLE_API_KEY"))
            }
            ProviderId::Claude => Self::new(
                "anthropic.claude-3-5-sonnet-20240620-v1:0",
                CredentialSpec::Aws {
                    access_key_id: "AWS_ACCESS_KEY_ID".to_string(),
                    secret_access_key: "AWS_SECRET_ACCESS_KEY".to_string(),
                    session_token: "AWS_SESSION_TOKEN".to_string(),
                },
            ),
        }
    }
}

/// Configuration for evaluation and scenario generation.
#[derive(Debug, Clone)]
pub struct EvaluationConfig {
    /// Replace every provider call with deterministic synthesized results.
    pub mock_mode: bool,
    /// Upper bound for a single provider call (each attempt separately).
    pub call_timeout: Duration,
    /// Settings per provider; a provider without settings is never called.
    pub providers: BTreeMap<ProviderId, ProviderSettings>,
    /// Provider used to generate new scenarios.
    pub generator: ProviderId,
}

impl Default for EvaluationConfig {
    fn default() -> Self {
        Self {
            mock_mode: false,
            call_timeout: Duration::from_secs(60),
            providers: ProviderId::ALL
                .into_iter()
                .map(|p| (p, ProviderSettings::default_for(p)))
                .collect(),
            generator: ProviderId::Claude,
        }
    }
}

impl EvaluationConfig {
    // ==================== Builder Methods ====================

    pub fn with_mock_mode(mut self, mock_mode: bool) -> Self {
        self.mock_mode = mock_mode;
        self
    }

    pub fn with_call_timeout(mut self, timeout: Duration) -> Self {
        self.call_timeout = timeout;
        self
    }

    pub fn with_provider(mut self, provider: ProviderId, settings: ProviderSettings) -> Self {
        self.providers.insert(provider, settings);
        self
    }

    pub fn with_generator(mut self, provider: ProviderId) -> Self {
        self.generator = provider;
        self
    }

    pub fn settings(&self, provider: ProviderId) -> Option<&ProviderSettings> {
        self.providers.get(&provider)
    }
}
