//! Application-level configuration.
//!
//! - [`EvaluationConfig`]: mock mode, call timeout, per-provider settings

pub mod evaluation_config;

pub use evaluation_config::{EvaluationConfig, ProviderSettings};
