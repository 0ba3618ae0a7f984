//! HTTP adapters for the evaluation providers
//!
//! Each adapter speaks one vendor's wire format and implements the
//! application's `ProviderAdapter` port. All adapters share one
//! `reqwest::Client` so connections are pooled across requests.

pub mod bedrock;
pub mod gemini;
pub mod openai;

pub use bedrock::BedrockAdapter;
pub use gemini::GeminiAdapter;
pub use openai::OpenAiAdapter;

use crate::config::FileProvidersConfig;
use dilemma_application::ports::provider::{GatewayError, ProviderAdapter};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Sampling temperature sent to every provider
pub(crate) const TEMPERATURE: f32 = 0.1;

/// Output token cap sent to every provider
pub(crate) const MAX_OUTPUT_TOKENS: u32 = 300;

/// Build the HTTP client shared by all adapters
pub fn http_client(timeout: Duration) -> Result<reqwest::Client, GatewayError> {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| GatewayError::ConnectionError(e.to_string()))
}

/// Build one adapter per provider from the `[providers]` section
pub fn build_adapters(
    client: &reqwest::Client,
    config: &FileProvidersConfig,
) -> Vec<Arc<dyn ProviderAdapter>> {
    vec![
        Arc::new(OpenAiAdapter::new(client.clone(), &config.openai.base_url)),
        Arc::new(GeminiAdapter::new(client.clone(), &config.gemini.base_url)),
        Arc::new(BedrockAdapter::new(client.clone(), &config.bedrock.region)),
    ]
}

/// Map a transport failure, dropping the URL (it may carry an API key)
pub(crate) fn transport_error(error: reqwest::Error) -> GatewayError {
    if error.is_timeout() {
        GatewayError::Timeout
    } else {
        GatewayError::ConnectionError(error.without_url().to_string())
    }
}

/// Check the status and decode a JSON envelope
pub(crate) async fn read_envelope<T: DeserializeOwned>(
    provider: &'static str,
    response: reqwest::Response,
) -> Result<T, GatewayError> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(GatewayError::Http {
            provider,
            status: status.as_u16(),
            body,
        });
    }

    let bytes = response.bytes().await.map_err(transport_error)?;
    debug!(provider, bytes = bytes.len(), "Received response envelope");
    serde_json::from_slice(&bytes).map_err(|e| GatewayError::InvalidResponse(e.to_string()))
}

/// Treat empty text like missing text
pub(crate) fn non_empty(text: Option<String>) -> Option<String> {
    text.filter(|t| !t.is_empty())
}

#[cfg(test)]
pub(crate) fn canned_response(status: u16, body: &str) -> reqwest::Response {
    http::Response::builder()
        .status(status)
        .header("content-type", "application/json")
        .body(body.to_string())
        .map(reqwest::Response::from)
        .unwrap()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    #[tokio::test]
    async fn test_non_success_status_is_http_error() {
        let response = canned_response(503, "model overloaded");
        let err = read_envelope::<Value>("Gemini", response).await.unwrap_err();
        assert_eq!(
            err,
            GatewayError::Http {
                provider: "Gemini",
                status: 503,
                body: "model overloaded".to_string(),
            }
        );
    }

    #[tokio::test]
    async fn test_success_decodes_envelope() {
        let response = canned_response(200, r#"{"ok": true}"#);
        let value: Value = read_envelope("OpenAI", response).await.unwrap();
        assert_eq!(value["ok"], true);
    }

    #[tokio::test]
    async fn test_undecodable_body_is_invalid_response() {
        let response = canned_response(200, "<html>");
        let err = read_envelope::<Value>("Bedrock", response).await.unwrap_err();
        assert!(matches!(err, GatewayError::InvalidResponse(_)));
    }

    #[test]
    fn test_non_empty() {
        assert_eq!(non_empty(Some(String::new())), None);
        assert_eq!(non_empty(Some("x".to_string())).as_deref(), Some("x"));
    }
}
