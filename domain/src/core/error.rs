//! Domain error types

use thiserror::Error;

/// A single field-level violation found while validating a request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldViolation {
    pub field: &'static str,
    pub message: String,
}

impl FieldViolation {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl std::fmt::Display for FieldViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Malformed or missing request fields
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InputError {
    #[error("Malformed request body: {0}")]
    Malformed(String),

    #[error("Invalid input: {}", format_violations(.0))]
    Invalid(Vec<FieldViolation>),
}

impl InputError {
    /// Field violations, empty for a body that could not be decoded at all
    pub fn violations(&self) -> &[FieldViolation] {
        match self {
            InputError::Malformed(_) => &[],
            InputError::Invalid(v) => v,
        }
    }
}

fn format_violations(violations: &[FieldViolation]) -> String {
    violations
        .iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

/// Failure to turn raw model output into a validated result
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("No JSON object found in model output")]
    NoJsonObject,

    #[error("Invalid JSON: {0}")]
    InvalidJson(String),

    #[error("Schema violation: {0}")]
    Validation(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_input_display_lists_fields() {
        let error = InputError::Invalid(vec![
            FieldViolation::new("ifConditions", "at most 2 entries"),
            FieldViolation::new("targetConfidence", "must be between 51 and 100"),
        ]);
        assert_eq!(
            error.to_string(),
            "Invalid input: ifConditions: at most 2 entries; targetConfidence: must be between 51 and 100"
        );
        assert_eq!(error.violations().len(), 2);
    }

    #[test]
    fn test_malformed_has_no_violations() {
        let error = InputError::Malformed("expected value".to_string());
        assert!(error.violations().is_empty());
    }
}
