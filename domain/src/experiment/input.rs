//! The evaluation request and its validation rules

use super::principle::Principle;
use crate::core::error::{FieldViolation, InputError};
use crate::core::number::whole_number;
use crate::core::provider::ProviderId;
use serde::{Deserialize, Serialize};

/// Maximum number of conditional modifiers per request
pub const MAX_IF_CONDITIONS: usize = 2;

/// Lowest confidence a result may carry (a binary choice is never below a coin flip)
pub const MIN_CONFIDENCE: i64 = 51;

/// Highest confidence a result may carry
pub const MAX_CONFIDENCE: i64 = 100;

/// A thought experiment posed to the providers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThoughtExperimentInput {
    pub case_id: String,
    pub principle_id: Principle,
    #[serde(default)]
    pub if_conditions: Vec<String>,
    #[serde(deserialize_with = "whole_number")]
    pub target_confidence: i64,
    pub scenario_text: String,
    pub option_a: String,
    pub option_b: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled_models: Option<Vec<ProviderId>>,
}

impl ThoughtExperimentInput {
    /// Decode a request body and validate it.
    pub fn from_json(value: serde_json::Value) -> Result<Self, InputError> {
        let input: Self =
            serde_json::from_value(value).map_err(|e| InputError::Malformed(e.to_string()))?;
        input.validate()
    }

    /// Check every field and return a normalized copy.
    ///
    /// Conditional modifiers are trimmed; all violations are collected
    /// rather than stopping at the first one.
    pub fn validate(mut self) -> Result<Self, InputError> {
        let mut violations = Vec::new();

        if self.case_id.trim().is_empty() {
            violations.push(FieldViolation::new("caseId", "must not be empty"));
        }

        if self.if_conditions.len() > MAX_IF_CONDITIONS {
            violations.push(FieldViolation::new(
                "ifConditions",
                format!("at most {} entries", MAX_IF_CONDITIONS),
            ));
        }
        for condition in &mut self.if_conditions {
            let trimmed = condition.trim();
            if trimmed.is_empty() {
                violations.push(FieldViolation::new("ifConditions", "entries must not be empty"));
                break;
            }
            *condition = trimmed.to_string();
        }

        if !(MIN_CONFIDENCE..=MAX_CONFIDENCE).contains(&self.target_confidence) {
            violations.push(FieldViolation::new(
                "targetConfidence",
                format!("must be between {} and {}", MIN_CONFIDENCE, MAX_CONFIDENCE),
            ));
        }

        for (field, value) in [
            ("scenarioText", &self.scenario_text),
            ("optionA", &self.option_a),
            ("optionB", &self.option_b),
        ] {
            if value.trim().is_empty() {
                violations.push(FieldViolation::new(field, "must not be empty"));
            }
        }

        if let Some(models) = &mut self.enabled_models {
            if models.is_empty() {
                violations.push(FieldViolation::new("enabledModels", "at least one provider"));
            }
            models.sort();
            models.dedup();
        }

        if violations.is_empty() {
            Ok(self)
        } else {
            Err(InputError::Invalid(violations))
        }
    }

    /// Providers to invoke, in display order.
    ///
    /// An absent `enabledModels` means every provider, matching clients that
    /// predate the field.
    pub fn enabled_providers(&self) -> Vec<ProviderId> {
        match &self.enabled_models {
            Some(models) => ProviderId::ALL
                .into_iter()
                .filter(|p| models.contains(p))
                .collect(),
            None => ProviderId::ALL.to_vec(),
        }
    }
}
