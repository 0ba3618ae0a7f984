//! Generate scenario use case
//!
//! Asks the configured generator provider for a fresh binary thought
//! experiment. Always produces a proposal: any failure falls back to the
//! built-in pool with the reason attached.

use super::evaluate::invoke_with_timeout;
use super::retry::ProviderError;
use crate::config::EvaluationConfig;
use crate::ports::credentials::CredentialResolver;
use crate::ports::provider::{CompletionRequest, OutputSchema, ProviderAdapter};
use dilemma_domain::{PromptTemplate, ProviderId, ScenarioProposal};
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::{info, warn};

/// Schema name sent with scenario-generation requests
const SCENARIO_SCHEMA_NAME: &str = "generated_scenario";

/// Use case for proposing a new scenario
pub struct GenerateScenarioUseCase {
    adapters: HashMap<ProviderId, Arc<dyn ProviderAdapter>>,
    credentials: Arc<dyn CredentialResolver>,
    config: EvaluationConfig,
    next_pool_index: AtomicUsize,
}

impl GenerateScenarioUseCase {
    pub fn new(config: EvaluationConfig, credentials: Arc<dyn CredentialResolver>) -> Self {
        Self {
            adapters: HashMap::new(),
            credentials,
            config,
            next_pool_index: AtomicUsize::new(0),
        }
    }

    pub fn with_adapter(mut self, adapter: Arc<dyn ProviderAdapter>) -> Self {
        self.adapters.insert(adapter.provider(), adapter);
        self
    }

    pub async fn execute(&self) -> ScenarioProposal {
        if self.config.mock_mode {
            info!("Mock mode: picking scenario from pool");
            return self.next_from_pool();
        }

        match self.generate().await {
            Ok(proposal) => {
                info!("Generated scenario via {}", self.config.generator);
                proposal
            }
            Err(e) => {
                warn!("Scenario generation failed, using pool: {}", e);
                self.next_from_pool().with_error(e.to_string())
            }
        }
    }

    fn next_from_pool(&self) -> ScenarioProposal {
        let index = self.next_pool_index.fetch_add(1, Ordering::Relaxed);
        ScenarioProposal::from_pool(index)
    }

    async fn generate(&self) -> Result<ScenarioProposal, ProviderError> {
        let provider = self.config.generator;
        let (Some(settings), Some(adapter)) =
            (self.config.settings(provider), self.adapters.get(&provider))
        else {
            return Err(ProviderError::ConfigMissing(format!(
                "{} is not configured",
                provider.display_name()
            )));
        };

        let credentials = settings
            .credentials
            .resolve(self.credentials.as_ref())
            .await
            .ok_or_else(|| {
                ProviderError::ConfigMissing(format!(
                    "{} not set",
                    settings.credentials.names().join("/")
                ))
            })?;

        let request = CompletionRequest::new(
            PromptTemplate::scenario_system_prompt(),
            PromptTemplate::scenario_user_prompt(),
            &settings.model,
        )
        .with_output_schema(OutputSchema::new(
            SCENARIO_SCHEMA_NAME,
            ScenarioProposal::json_schema(),
        ));
        let text = invoke_with_timeout(
            adapter.as_ref(),
            &request,
            &credentials,
            self.config.call_timeout,
        )
        .await?;

        Ok(ScenarioProposal::parse(&text)?)
    }
}
