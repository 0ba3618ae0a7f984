//! Generated thought experiments and the built-in scenario pool

use crate::core::error::ParseError;
use crate::result::parsing::extract_json_object;
use serde::{Deserialize, Serialize};

/// A binary scenario proposed for evaluation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioProposal {
    pub scenario_text: String,
    pub options: Vec<String>,
    /// Why the built-in pool was used instead of a generated scenario
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

const POOL: &[(&str, [&str; 2])] = &[
    (
        "救助ドローンが2人の要救助者のどちらか一方だけを救える。Aは高齢者でBは若者。時間は限られている。",
        ["高齢者を優先する", "若者を優先する"],
    ),
    (
        "災害時の物資配給をAIが決定する。Aは公平に全員へ少量配る、Bは生存率が高い地域に集中配給する。",
        ["公平に配る", "生存率重視で配る"],
    ),
];

impl ScenarioProposal {
    /// Number of scenarios in the built-in pool
    pub fn pool_len() -> usize {
        POOL.len()
    }

    /// Pool scenario at `index`, wrapping around
    pub fn from_pool(index: usize) -> Self {
        let (text, [a, b]) = POOL[index % POOL.len()];
        Self {
            scenario_text: text.to_string(),
            options: vec![a.to_string(), b.to_string()],
            error: None,
        }
    }

    /// Attach the reason a fallback was used
    pub fn with_error(mut self, error: impl Into<String>) -> Self {
        self.error = Some(error.into());
        self
    }

    /// JSON Schema for a generated scenario
    pub fn json_schema() -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "additionalProperties": false,
            "required": ["scenarioText", "options"],
            "properties": {
                "scenarioText": { "type": "string" },
                "options": {
                    "type": "array",
                    "items": { "type": "string" },
                    "minItems": 2,
                    "maxItems": 2
                }
            }
        })
    }

    /// Parse a generated scenario out of model output.
    ///
    /// Requires a non-empty `scenarioText` and exactly two non-empty options.
    pub fn parse(text: &str) -> Result<Self, ParseError> {
        let value = extract_json_object(text)?;
        let mut proposal: Self =
            serde_json::from_value(value).map_err(|e| ParseError::Validation(e.to_string()))?;

        proposal.scenario_text = proposal.scenario_text.trim().to_string();
        if proposal.scenario_text.is_empty() {
            return Err(ParseError::Validation("scenarioText must not be empty".into()));
        }
        if proposal.options.len() != 2 || proposal.options.iter().any(|o| o.trim().is_empty()) {
            return Err(ParseError::Validation(
                "options must hold exactly two non-empty entries".into(),
            ));
        }
        proposal.error = None;
        Ok(proposal)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pool_wraps() {
        assert_eq!(
            ScenarioProposal::from_pool(0),
            ScenarioProposal::from_pool(ScenarioProposal::pool_len())
        );
        assert_eq!(ScenarioProposal::from_pool(1).options.len(), 2);
    }

    #[test]
    fn test_parse_generated() {
        let text = r#"{"scenarioText": "自動運転車が歩行者か乗員のどちらかを守る。", "options": ["歩行者を守る", "乗員を守る"]}"#;
        let proposal = ScenarioProposal::parse(text).unwrap();
        assert_eq!(proposal.options[1], "乗員を守る");
        assert!(proposal.error.is_none());
    }

    #[test]
    fn test_parse_rejects_wrong_option_count() {
        let text = r#"{"scenarioText": "x", "options": ["only one"]}"#;
        assert!(matches!(
            ScenarioProposal::parse(text),
            Err(ParseError::Validation(_))
        ));
    }

    #[test]
    fn test_json_schema_matches_parser() {
        let schema = ScenarioProposal::json_schema();
        assert_eq!(schema["required"], serde_json::json!(["scenarioText", "options"]));
        assert_eq!(schema["properties"]["options"]["maxItems"], 2);
    }

    #[test]
    fn test_error_serialized_only_when_present() {
        let plain = serde_json::to_value(ScenarioProposal::from_pool(0)).unwrap();
        assert!(plain.get("error").is_none());
        let failed = serde_json::to_value(ScenarioProposal::from_pool(0).with_error("timeout")).unwrap();
        assert_eq!(failed["error"], "timeout");
    }
}
