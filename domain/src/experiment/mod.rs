//! Thought experiments: the predefined cases, the ethical principles a model
//! is asked to apply, and the validated request that combines them.

pub mod case;
pub mod input;
pub mod principle;

pub use case::{CUSTOM_CASE_ID, ThoughtCase};
pub use input::{MAX_IF_CONDITIONS, ThoughtExperimentInput};
pub use principle::Principle;
