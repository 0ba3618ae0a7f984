//! The structured-result contract every provider output must satisfy

use crate::core::error::ParseError;
use crate::core::number::whole_number;
use crate::experiment::input::{MAX_CONFIDENCE, MIN_CONFIDENCE};
use serde::{Deserialize, Serialize};

/// Sentinel for `what_changed_by_if` when no conditional modifier was supplied
pub const FIRST_RUN: &str = "初回";

/// Maximum number of key assumptions a result may list
pub const MAX_KEY_ASSUMPTIONS: usize = 3;

/// Binary choice between the two options of a thought experiment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Decision {
    A,
    B,
}

impl std::fmt::Display for Decision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Decision::A => write!(f, "A"),
            Decision::B => write!(f, "B"),
        }
    }
}

/// One provider's verdict on a thought experiment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelResult {
    pub decision: Decision,
    #[serde(deserialize_with = "whole_number")]
    pub confidence: i64,
    pub key_assumptions: Vec<String>,
    pub reasoning_summary: String,
    pub what_changed_by_if: String,
}

impl ModelResult {
    /// Placeholder result for a provider that produced no usable verdict.
    ///
    /// Decision A at minimum confidence, no assumptions, the first-run
    /// sentinel, and `reason` as the summary.
    pub fn fallback(reason: impl Into<String>) -> Self {
        Self {
            decision: Decision::A,
            confidence: MIN_CONFIDENCE,
            key_assumptions: Vec::new(),
            reasoning_summary: reason.into(),
            what_changed_by_if: FIRST_RUN.to_string(),
        }
    }

    /// Decode a JSON value and check it against the contract
    pub fn from_value(value: serde_json::Value) -> Result<Self, ParseError> {
        let result: Self =
            serde_json::from_value(value).map_err(|e| ParseError::Validation(e.to_string()))?;
        result.validate()?;
        Ok(result)
    }

    /// Check integer bounds, list length and non-empty text fields
    pub fn validate(&self) -> Result<(), ParseError> {
        if !(MIN_CONFIDENCE..=MAX_CONFIDENCE).contains(&self.confidence) {
            return Err(ParseError::Validation(format!(
                "confidence {} is outside {}..={}",
                self.confidence, MIN_CONFIDENCE, MAX_CONFIDENCE
            )));
        }
        if self.key_assumptions.len() > MAX_KEY_ASSUMPTIONS {
            return Err(ParseError::Validation(format!(
                "key_assumptions has {} entries (max {})",
                self.key_assumptions.len(),
                MAX_KEY_ASSUMPTIONS
            )));
        }
        if self.reasoning_summary.trim().is_empty() {
            return Err(ParseError::Validation(
                "reasoning_summary must not be empty".to_string(),
            ));
        }
        if self.what_changed_by_if.trim().is_empty() {
            return Err(ParseError::Validation(
                "what_changed_by_if must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    /// JSON Schema for providers that support constrained structured output
    pub fn json_schema() -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "additionalProperties": false,
            "required": [
                "decision",
                "confidence",
                "key_assumptions",
                "reasoning_summary",
                "what_changed_by_if"
            ],
            "properties": {
                "decision": { "type": "string", "enum": ["A", "B"] },
                "confidence": {
                    "type": "integer",
                    "minimum": MIN_CONFIDENCE,
                    "maximum": MAX_CONFIDENCE
                },
                "key_assumptions": {
                    "type": "array",
                    "items": { "type": "string" },
                    "maxItems": MAX_KEY_ASSUMPTIONS
                },
                "reasoning_summary": { "type": "string" },
                "what_changed_by_if": { "type": "string" }
            }
        })
    }
}
