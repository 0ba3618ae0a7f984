//! The response envelope assembled from every provider's outcome

use crate::core::provider::ProviderId;
use crate::experiment::input::ThoughtExperimentInput;
use crate::result::model_result::ModelResult;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Results of posing one thought experiment, one entry per provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluationResponse {
    pub input_echo: ThoughtExperimentInput,
    pub results: BTreeMap<ProviderId, ModelResult>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub errors: Option<BTreeMap<ProviderId, String>>,
}

impl EvaluationResponse {
    /// Build a response; an empty error map is dropped.
    pub fn new(
        input_echo: ThoughtExperimentInput,
        results: BTreeMap<ProviderId, ModelResult>,
        errors: BTreeMap<ProviderId, String>,
    ) -> Self {
        Self {
            input_echo,
            results,
            errors: (!errors.is_empty()).then_some(errors),
        }
    }

    /// Check the assembled envelope before it leaves the process.
    ///
    /// Every provider must have a valid result (placeholders included), and
    /// an error map (when present) must be non-empty with non-empty messages
    /// for enabled providers only.
    pub fn validate(&self) -> Result<(), String> {
        self.input_echo
            .clone()
            .validate()
            .map_err(|e| format!("inputEcho: {}", e))?;

        let actual: Vec<ProviderId> = self.results.keys().copied().collect();
        if actual != ProviderId::ALL {
            return Err(format!(
                "results cover {:?}, expected {:?}",
                actual,
                ProviderId::ALL
            ));
        }

        for (provider, result) in &self.results {
            result
                .validate()
                .map_err(|e| format!("results.{}: {}", provider, e))?;
        }

        if let Some(errors) = &self.errors {
            let enabled = self.input_echo.enabled_providers();
            if errors.is_empty() {
                return Err("errors must be omitted when empty".to_string());
            }
            for (provider, message) in errors {
                if !enabled.contains(provider) {
                    return Err(format!("errors.{}: provider was not enabled", provider));
                }
                if message.trim().is_empty() {
                    return Err(format!("errors.{}: empty message", provider));
                }
            }
        }

        Ok(())
    }

    /// Number of providers that reported an error
    pub fn error_count(&self) -> usize {
        self.errors.as_ref().map_or(0, |e| e.len())
    }
}
