//! Gemini generateContent adapter
//!
//! The API key travels as the `key` query parameter, so request URLs are
//! never logged.

use super::{MAX_OUTPUT_TOKENS, TEMPERATURE, non_empty, read_envelope, transport_error};
use async_trait::async_trait;
use dilemma_application::ports::provider::{
    CompletionRequest, Credentials, GatewayError, ProviderAdapter,
};
use dilemma_domain::ProviderId;
use serde::{Deserialize, Serialize};
use tracing::debug;

const PROVIDER: &str = "Gemini";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    system_instruction: Content<'a>,
    contents: [Content<'a>; 1],
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    role: &'static str,
    parts: [Part<'a>; 1],
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    max_output_tokens: u32,
}

#[derive(Debug, Default, Deserialize)]
struct GenerateContentEnvelope {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Default, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
}

#[derive(Debug, Default, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Default, Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: Option<String>,
}

fn request_body(request: &CompletionRequest) -> GenerateContentRequest<'_> {
    GenerateContentRequest {
        system_instruction: Content {
            role: "system",
            parts: [Part {
                text: &request.system_prompt,
            }],
        },
        contents: [Content {
            role: "user",
            parts: [Part {
                text: &request.user_prompt,
            }],
        }],
        generation_config: GenerationConfig {
            temperature: TEMPERATURE,
            max_output_tokens: MAX_OUTPUT_TOKENS,
        },
    }
}

/// `candidates[0].content.parts[0].text`
fn extract_text(envelope: GenerateContentEnvelope) -> Option<String> {
    let content = envelope.candidates.into_iter().next()?.content?;
    non_empty(content.parts.into_iter().next()?.text)
}

pub struct GeminiAdapter {
    client: reqwest::Client,
    base_url: String,
}

impl GeminiAdapter {
    pub fn new(client: reqwest::Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn endpoint(&self, model: &str) -> String {
        format!("{}/models/{}:generateContent", self.base_url, model)
    }
}

#[async_trait]
impl ProviderAdapter for GeminiAdapter {
    fn provider(&self) -> ProviderId {
        ProviderId::Gemini
    }

    async fn invoke(
        &self,
        request: &CompletionRequest,
        credentials: &Credentials,
    ) -> Result<String, GatewayError> {
        let Credentials::ApiKey(api_key) = credentials else {
            return Err(GatewayError::CredentialKind(PROVIDER));
        };

        debug!(model = %request.model, "Calling Gemini generateContent");
        let response = self
            .client
            .post(self.endpoint(&request.model))
            .query(&[("key", api_key.as_str())])
            .json(&request_body(request))
            .send()
            .await
            .map_err(transport_error)?;

        read_text(response).await
    }
}

/// Decode a Gemini generateContent response into its completion text
async fn read_text(response: reqwest::Response) -> Result<String, GatewayError> {
    let envelope: GenerateContentEnvelope = read_envelope(PROVIDER, response).await?;
    extract_text(envelope).ok_or(GatewayError::MissingOutput(PROVIDER))
}
