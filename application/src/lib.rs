//! Application layer for dilemma-panel
//!
//! This crate contains use cases, port definitions, and application configuration.
//! It depends only on the domain layer.

pub mod config;
pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use config::{EvaluationConfig, ProviderSettings};
pub use ports::{
    credentials::{CredentialResolver, CredentialSpec, NoCredentials},
    progress::{NoProgress, ProgressNotifier},
    provider::{
        AwsCredentials, CompletionRequest, Credentials, GatewayError, OutputSchema, ProviderAdapter,
    },
};
pub use use_cases::evaluate::{EvaluateError, EvaluateUseCase};
pub use use_cases::generate_scenario::GenerateScenarioUseCase;
pub use use_cases::retry::{ProviderError, RetryFailure, RetryOutcome, run_with_retry};
