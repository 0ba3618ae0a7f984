//! Prompt domain
//!
//! Templates for the system and user prompts sent to every provider.

mod template;

pub use template::{PromptTemplate, RETRY_NOTE, UserPromptArgs};
