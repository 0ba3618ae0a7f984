//! Optional HTTP Basic auth for every route
//!
//! The expected user and password are looked up through the credential
//! resolver on each request. When either is missing, requests pass through.

use super::AppState;
use axum::{
    extract::{Request, State},
    http::{
        StatusCode,
        header::{AUTHORIZATION, WWW_AUTHENTICATE},
    },
    middleware::Next,
    response::{IntoResponse, Response},
};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use dilemma_application::CredentialResolver;
use std::sync::Arc;
use tracing::warn;

const REALM: &str = r#"Basic realm="Secure Area""#;

/// Where the Basic auth user and password come from
pub struct BasicAuth {
    user_name: String,
    password_name: String,
    credentials: Arc<dyn CredentialResolver>,
}

impl BasicAuth {
    pub fn new(
        user_name: impl Into<String>,
        password_name: impl Into<String>,
        credentials: Arc<dyn CredentialResolver>,
    ) -> Self {
        Self {
            user_name: user_name.into(),
            password_name: password_name.into(),
            credentials,
        }
    }

    /// Expected `(user, password)`, or `None` when auth is not configured
    async fn expected(&self) -> Option<(String, String)> {
        let user = self.credentials.resolve(&self.user_name).await?;
        let password = self.credentials.resolve(&self.password_name).await?;
        Some((user, password))
    }
}

/// Decode `Basic <base64(user:password)>`
fn decode_basic(header: &str) -> Option<(String, String)> {
    let encoded = header.strip_prefix("Basic ")?;
    let decoded = STANDARD.decode(encoded.trim()).ok()?;
    let decoded = String::from_utf8(decoded).ok()?;
    let (user, password) = decoded.split_once(':')?;
    Some((user.to_string(), password.to_string()))
}

fn unauthorized() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        [(WWW_AUTHENTICATE, REALM)],
        "Unauthorized",
    )
        .into_response()
}

/// Reject requests without the configured Basic credentials
pub(super) async fn require_basic_auth(
    State(state): State<Arc<AppState>>,
    request: Request,
    next: Next,
) -> Response {
    let Some(auth) = &state.basic_auth else {
        return next.run(request).await;
    };
    let Some(expected) = auth.expected().await else {
        return next.run(request).await;
    };

    let supplied = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(decode_basic);

    if supplied.as_ref() == Some(&expected) {
        next.run(request).await
    } else {
        warn!("Unauthorized request to {}", request.uri().path());
        unauthorized()
    }
}
