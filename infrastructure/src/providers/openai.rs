//! OpenAI Responses API adapter
//!
//! Bearer-token auth. When the request carries an output schema it is sent
//! as a strict `json_schema` text format; otherwise the format is omitted.

use super::{MAX_OUTPUT_TOKENS, TEMPERATURE, non_empty, read_envelope, transport_error};
use async_trait::async_trait;
use dilemma_application::ports::provider::{
    CompletionRequest, Credentials, GatewayError, ProviderAdapter,
};
use dilemma_domain::ProviderId;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

const PROVIDER: &str = "OpenAI";

// ─── Wire types ──────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct ResponsesRequest<'a> {
    model: &'a str,
    temperature: f32,
    max_output_tokens: u32,
    input: [InputMessage<'a>; 2],
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<TextConfig<'a>>,
}

#[derive(Debug, Serialize)]
struct InputMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct TextConfig<'a> {
    format: JsonSchemaFormat<'a>,
}

#[derive(Debug, Serialize)]
struct JsonSchemaFormat<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    name: &'static str,
    schema: &'a Value,
    strict: bool,
}

#[derive(Debug, Default, Deserialize)]
struct ResponsesEnvelope {
    #[serde(default)]
    output_text: Option<String>,
    #[serde(default)]
    output: Vec<OutputItem>,
}

#[derive(Debug, Default, Deserialize)]
struct OutputItem {
    #[serde(default)]
    content: Vec<OutputContent>,
}

#[derive(Debug, Default, Deserialize)]
struct OutputContent {
    #[serde(rename = "type", default)]
    kind: Option<String>,
    #[serde(default)]
    text: Option<String>,
}

fn request_body(request: &CompletionRequest) -> ResponsesRequest<'_> {
    ResponsesRequest {
        model: &request.model,
        temperature: TEMPERATURE,
        max_output_tokens: MAX_OUTPUT_TOKENS,
        input: [
            InputMessage {
                role: "system",
                content: &request.system_prompt,
            },
            InputMessage {
                role: "user",
                content: &request.user_prompt,
            },
        ],
        text: request.output_schema.as_ref().map(|output| TextConfig {
            format: JsonSchemaFormat {
                kind: "json_schema",
                name: output.name,
                schema: &output.schema,
                strict: true,
            },
        }),
    }
}

/// `output_text`, else the first `output_text` content part
fn extract_text(envelope: ResponsesEnvelope) -> Option<String> {
    if let Some(text) = non_empty(envelope.output_text) {
        return Some(text);
    }
    envelope
        .output
        .into_iter()
        .flat_map(|item| item.content)
        .find(|part| part.kind.as_deref() == Some("output_text"))
        .and_then(|part| non_empty(part.text))
}

pub struct OpenAiAdapter {
    client: reqwest::Client,
    base_url: String,
}

impl OpenAiAdapter {
    pub fn new(client: reqwest::Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn endpoint(&self) -> String {
        format!("{}/responses", self.base_url)
    }
}

#[async_trait]
impl ProviderAdapter for OpenAiAdapter {
    fn provider(&self) -> ProviderId {
        ProviderId::Gpt
    }

    async fn invoke(
        &self,
        request: &CompletionRequest,
        credentials: &Credentials,
    ) -> Result<String, GatewayError> {
        let Credentials::ApiKey(api_key) = credentials else {
            return Err(GatewayError::CredentialKind(PROVIDER));
        };

        debug!(model = %request.model, "Calling OpenAI Responses API");
        let response = self
            .client
            .post(self.endpoint())
            .bearer_auth(api_key)
            .json(&request_body(request))
            .send()
            .await
            .map_err(transport_error)?;

        read_text(response).await
    }
}

/// Decode a OpenAI Responses response into its completion text
async fn read_text(response: reqwest::Response) -> Result<String, GatewayError> {
    let envelope: ResponsesEnvelope = read_envelope(PROVIDER, response).await?;
    extract_text(envelope).ok_or(GatewayError::MissingOutput(PROVIDER))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::canned_response;
    use dilemma_application::ports::provider::OutputSchema;
    use dilemma_domain::{ModelResult, PromptTemplate, ScenarioProposal};
    use serde_json::json;

    fn envelope(value: Value) -> ResponsesEnvelope {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_request_body_shape() {
        let request = CompletionRequest::new("sys", "user", "gpt-4o-mini").with_output_schema(
            OutputSchema::new("thought_experiment_result", ModelResult::json_schema()),
        );
        let body = serde_json::to_value(request_body(&request)).unwrap();

        assert_eq!(body["model"], "gpt-4o-mini");
        assert_eq!(body["input"][0], json!({"role": "system", "content": "sys"}));
        assert_eq!(body["input"][1], json!({"role": "user", "content": "user"}));
        assert_eq!(body["text"]["format"]["type"], "json_schema");
        assert_eq!(body["text"]["format"]["name"], "thought_experiment_result");
        assert_eq!(body["text"]["format"]["strict"], true);
        assert_eq!(
            body["text"]["format"]["schema"]["additionalProperties"],
            false
        );
    }

    #[test]
    fn test_scenario_request_body_uses_scenario_schema() {
        let request = CompletionRequest::new(
            PromptTemplate::scenario_system_prompt(),
            PromptTemplate::scenario_user_prompt(),
            "gpt-4o-mini",
        )
        .with_output_schema(OutputSchema::new(
            "generated_scenario",
            ScenarioProposal::json_schema(),
        ));
        let body = serde_json::to_value(request_body(&request)).unwrap();

        let format = &body["text"]["format"];
        assert_eq!(format["name"], "generated_scenario");
        assert_eq!(format["schema"]["required"], json!(["scenarioText", "options"]));

        let reply = r#"{"scenarioText":"二つの村のどちらかにだけ水を送れる。","options":["東の村","西の村"]}"#;
        assert!(ScenarioProposal::parse(reply).is_ok());
    }

    #[test]
    fn test_request_without_schema_omits_format() {
        let request = CompletionRequest::new("sys", "user", "gpt-4o-mini");
        let body = serde_json::to_value(request_body(&request)).unwrap();
        assert!(body.get("text").is_none());
    }

    #[test]
    fn test_extract_output_text() {
        let text = extract_text(envelope(json!({"output_text": "{\"a\":1}"})));
        assert_eq!(text.as_deref(), Some("{\"a\":1}"));
    }

    #[test]
    fn test_extract_from_output_items() {
        let text = extract_text(envelope(json!({
            "output": [
                {"content": [{"type": "reasoning", "text": "thinking"}]},
                {"content": [{"type": "output_text", "text": "answer"}]}
            ]
        })));
        assert_eq!(text.as_deref(), Some("answer"));
    }

    #[test]
    fn test_extract_empty_output_text_falls_through() {
        let text = extract_text(envelope(json!({
            "output_text": "",
            "output": [{"content": [{"type": "output_text", "text": "answer"}]}]
        })));
        assert_eq!(text.as_deref(), Some("answer"));
    }

    #[test]
    fn test_extract_missing() {
        assert!(extract_text(envelope(json!({"output": []}))).is_none());
        assert!(extract_text(envelope(json!({}))).is_none());
    }

    #[test]
    fn test_endpoint_trims_slash() {
        let adapter = OpenAiAdapter::new(reqwest::Client::new(), "https://api.openai.com/v1/");
        assert_eq!(adapter.endpoint(), "https://api.openai.com/v1/responses");
    }

    #[tokio::test]
    async fn test_read_text_empty_envelope_is_missing_output() {
        let err = read_text(canned_response(200, r#"{"output": []}"#)).await.unwrap_err();
        assert_eq!(err, GatewayError::MissingOutput(PROVIDER));
    }

    #[tokio::test]
    async fn test_read_text_error_status() {
        let err = read_text(canned_response(429, "slow down")).await.unwrap_err();
        assert!(matches!(err, GatewayError::Http { status: 429, .. }));
    }

    #[tokio::test]
    async fn test_read_text_success() {
        let text = read_text(canned_response(200, r#"{"output_text": "{}"}"#)).await.unwrap();
        assert_eq!(text, "{}");
    }
}
