//! Retry orchestrator
//!
//! Wraps one provider call in an explicit two-attempt state machine:
//!
//! ```text
//! First ──ok──▶ done
//!   │
//!  err
//!   ▼
//! Retry (corrective note appended) ──ok──▶ done (first error kept)
//!   │
//!  err ──▶ RetryFailure { first, second }
//! ```
//!
//! Any failure counts: transport, non-2xx status, timeout, missing text,
//! unparseable output or a schema violation.

use crate::ports::provider::GatewayError;
use dilemma_domain::{ModelResult, ParseError};
use std::future::Future;
use thiserror::Error;
use tracing::{debug, warn};

/// Why a single attempt did not produce a usable result
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProviderError {
    #[error("Missing configuration: {0}")]
    ConfigMissing(String),

    #[error(transparent)]
    Gateway(#[from] GatewayError),

    #[error("Invalid model output: {0}")]
    OutputShape(#[from] ParseError),
}

/// A result obtained within the two attempts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryOutcome {
    pub result: ModelResult,
    /// Error of the first attempt when the result came from the retry
    pub first_error: Option<ProviderError>,
}

impl RetryOutcome {
    pub fn retried(&self) -> bool {
        self.first_error.is_some()
    }
}

/// Both attempts failed
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{first} (retry: {second})")]
pub struct RetryFailure {
    pub first: ProviderError,
    pub second: ProviderError,
}

/// Where the state machine currently stands
#[derive(Debug)]
enum Attempt {
    First,
    Retry { first_error: ProviderError },
}

/// Run one attempt: invoke the provider, then parse and validate its text.
pub async fn attempt_once<I, Fut, P>(
    invoke: &I,
    parse: &P,
    note: Option<&str>,
) -> Result<ModelResult, ProviderError>
where
    I: Fn(Option<&str>) -> Fut,
    Fut: Future<Output = Result<String, ProviderError>>,
    P: Fn(&str) -> Result<ModelResult, ParseError>,
{
    let text = invoke(note).await?;
    debug!(bytes = text.len(), "Provider returned text");
    Ok(parse(&text)?)
}

/// Invoke, and on any failure invoke exactly once more with `retry_note`.
///
/// `invoke` is called at most twice. The first error is reported alongside a
/// successful retry so callers can tell a retry happened.
pub async fn run_with_retry<I, Fut, P>(
    invoke: I,
    parse: P,
    retry_note: &str,
) -> Result<RetryOutcome, RetryFailure>
where
    I: Fn(Option<&str>) -> Fut,
    Fut: Future<Output = Result<String, ProviderError>>,
    P: Fn(&str) -> Result<ModelResult, ParseError>,
{
    let mut attempt = Attempt::First;

    loop {
        let note = match attempt {
            Attempt::First => None,
            Attempt::Retry { .. } => Some(retry_note),
        };
        let outcome = attempt_once(&invoke, &parse, note).await;

        attempt = match (attempt, outcome) {
            (Attempt::First, Ok(result)) => {
                return Ok(RetryOutcome {
                    result,
                    first_error: None,
                });
            }
            (Attempt::First, Err(first_error)) => {
                warn!("First attempt failed, retrying once: {}", first_error);
                Attempt::Retry { first_error }
            }
            (Attempt::Retry { first_error }, Ok(result)) => {
                return Ok(RetryOutcome {
                    result,
                    first_error: Some(first_error),
                });
            }
            (Attempt::Retry { first_error }, Err(second)) => {
                warn!("Retry failed: {}", second);
                return Err(RetryFailure {
                    first: first_error,
                    second,
                });
            }
        };
    }
}
