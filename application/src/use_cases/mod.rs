//! Use cases
//!
//! Application-level operations that orchestrate domain logic.

pub mod evaluate;
pub mod generate_scenario;
pub mod retry;
