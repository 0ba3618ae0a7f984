//! Structured verdicts returned by providers.
//!
//! - [`model_result::ModelResult`]: one provider's validated decision
//! - [`parsing`]: extraction of a result from free-form model output

pub mod model_result;
pub mod parsing;

pub use model_result::{Decision, FIRST_RUN, ModelResult};
pub use parsing::{extract_json_object, parse_model_result};
