//! Provider value object identifying one external LLM backend

use serde::{Deserialize, Serialize};

/// The three LLM backends a thought experiment is posed to (Value Object)
///
/// Serialized as the short keys used in request and response payloads
/// (`gpt`, `gemini`, `claude`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderId {
    /// OpenAI Responses API
    Gpt,
    /// Google Gemini generateContent API
    Gemini,
    /// Anthropic Claude served through AWS Bedrock
    Claude,
}

impl ProviderId {
    /// Every provider, in display order
    pub const ALL: [ProviderId; 3] = [ProviderId::Gpt, ProviderId::Gemini, ProviderId::Claude];

    /// Get the payload key for this provider
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderId::Gpt => "gpt",
            ProviderId::Gemini => "gemini",
            ProviderId::Claude => "claude",
        }
    }

    /// Human-facing name of the backend
    pub fn display_name(&self) -> &'static str {
        match self {
            ProviderId::Gpt => "OpenAI",
            ProviderId::Gemini => "Gemini",
            ProviderId::Claude => "Bedrock",
        }
    }

    /// Confidence bias applied to synthesized mock results
    pub fn mock_bias(&self) -> i32 {
        match self {
            ProviderId::Gpt => 0,
            ProviderId::Gemini => 3,
            ProviderId::Claude => -2,
        }
    }
}

impl std::fmt::Display for ProviderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for ProviderId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "gpt" | "openai" => Ok(ProviderId::Gpt),
            "gemini" | "google" => Ok(ProviderId::Gemini),
            "claude" | "bedrock" | "anthropic" => Ok(ProviderId::Claude),
            other => Err(format!("unknown provider: {}", other)),
        }
    }
}
