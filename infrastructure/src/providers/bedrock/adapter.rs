//! Bedrock InvokeModel adapter

use super::signing;
use crate::providers::{MAX_OUTPUT_TOKENS, TEMPERATURE, non_empty, read_envelope, transport_error};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dilemma_application::ports::provider::{
    AwsCredentials, CompletionRequest, Credentials, GatewayError, ProviderAdapter,
};
use dilemma_domain::ProviderId;
use serde::{Deserialize, Serialize};
use std::time::SystemTime;
use tracing::debug;

const PROVIDER: &str = "Bedrock";
const ANTHROPIC_VERSION: &str = "bedrock-2023-05-31";
const CONTENT_TYPE: &str = "content-type";
const ACCEPT: &str = "accept";
const JSON: &str = "application/json";

#[derive(Debug, Serialize)]
struct InvokeModelRequest<'a> {
    anthropic_version: &'static str,
    max_tokens: u32,
    temperature: f32,
    system: &'a str,
    messages: [Message<'a>; 1],
}

#[derive(Debug, Serialize)]
struct Message<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Default, Deserialize)]
struct InvokeModelEnvelope {
    #[serde(default)]
    content: Vec<ContentBlock>,
}

#[derive(Debug, Default, Deserialize)]
struct ContentBlock {
    #[serde(rename = "type", default)]
    kind: Option<String>,
    #[serde(default)]
    text: Option<String>,
}

fn request_body(request: &CompletionRequest) -> InvokeModelRequest<'_> {
    InvokeModelRequest {
        anthropic_version: ANTHROPIC_VERSION,
        max_tokens: MAX_OUTPUT_TOKENS,
        temperature: TEMPERATURE,
        system: &request.system_prompt,
        messages: [Message {
            role: "user",
            content: &request.user_prompt,
        }],
    }
}

/// First `content[]` block of type `text`
fn extract_text(envelope: InvokeModelEnvelope) -> Option<String> {
    envelope
        .content
        .into_iter()
        .find(|block| block.kind.as_deref() == Some("text"))
        .and_then(|block| non_empty(block.text))
}

/// A request ready to send: URL plus the signing headers
#[derive(Debug)]
struct SignedRequest {
    url: String,
    headers: Vec<(String, String)>,
}

pub struct BedrockAdapter {
    client: reqwest::Client,
    region: String,
}

impl BedrockAdapter {
    pub fn new(client: reqwest::Client, region: &str) -> Self {
        Self {
            client,
            region: region.to_string(),
        }
    }

    /// InvokeModel URL; the model id is percent-encoded once here
    fn url(&self, model_id: &str) -> String {
        format!(
            "https://bedrock-runtime.{}.amazonaws.com/model/{}/invoke",
            self.region,
            signing::encode_path_segment(model_id)
        )
    }

    fn sign(
        &self,
        model_id: &str,
        body: &[u8],
        credentials: &AwsCredentials,
        now: DateTime<Utc>,
    ) -> Result<SignedRequest, GatewayError> {
        let url = self.url(model_id);
        let request = signing::Signable {
            method: "POST",
            url: &url,
            headers: &[(CONTENT_TYPE, JSON), (ACCEPT, JSON)],
            body,
        };
        let headers = signing::sign_request(
            &request,
            credentials,
            &self.region,
            SystemTime::from(now),
            signing::settings(),
        )?;
        Ok(SignedRequest { url, headers })
    }
}

#[async_trait]
impl ProviderAdapter for BedrockAdapter {
    fn provider(&self) -> ProviderId {
        ProviderId::Claude
    }

    async fn invoke(
        &self,
        request: &CompletionRequest,
        credentials: &Credentials,
    ) -> Result<String, GatewayError> {
        let Credentials::Aws(credentials) = credentials else {
            return Err(GatewayError::CredentialKind(PROVIDER));
        };

        let body = serde_json::to_vec(&request_body(request))
            .map_err(|e| GatewayError::InvalidResponse(e.to_string()))?;
        let signed = self.sign(&request.model, &body, credentials, Utc::now())?;
        debug!(
            model = %request.model,
            region = %self.region,
            bytes = body.len(),
            "Calling Bedrock InvokeModel"
        );

        let mut builder = self
            .client
            .post(&signed.url)
            .header(CONTENT_TYPE, JSON)
            .header(ACCEPT, JSON);
        for (name, value) in &signed.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        let response = builder.body(body).send().await.map_err(transport_error)?;
        read_text(response).await
    }
}

/// Decode an InvokeModel response into its completion text
async fn read_text(response: reqwest::Response) -> Result<String, GatewayError> {
    let envelope: InvokeModelEnvelope = read_envelope(PROVIDER, response).await?;
    extract_text(envelope).ok_or(GatewayError::MissingOutput(PROVIDER))
}
