//! Domain layer for dilemma-panel
//!
//! This crate contains the thought-experiment model, the structured result
//! contract, prompt templates and pure parsing logic. It has no I/O and no
//! dependencies on infrastructure or presentation concerns.
//!
//! # Core Concepts
//!
//! - **Thought experiment**: a binary scenario (option A / option B) posed
//!   under an ethical [`Principle`] with up to two conditional modifiers
//! - **Model result**: a provider's validated decision, confidence and reasoning
//! - **Evaluation response**: the per-provider results and errors of one request

pub mod core;
pub mod evaluation;
pub mod experiment;
pub mod mock;
pub mod prompt;
pub mod result;
pub mod scenario;

// Re-export commonly used types
pub use core::{
    error::{FieldViolation, InputError, ParseError},
    provider::ProviderId,
};
pub use evaluation::EvaluationResponse;
pub use experiment::{
    CUSTOM_CASE_ID, MAX_IF_CONDITIONS, Principle, ThoughtCase, ThoughtExperimentInput,
};
pub use mock::mock_result;
pub use prompt::{PromptTemplate, RETRY_NOTE, UserPromptArgs};
pub use result::{Decision, FIRST_RUN, ModelResult, parse_model_result};
pub use scenario::ScenarioProposal;
