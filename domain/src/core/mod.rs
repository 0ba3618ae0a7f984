//! Core domain concepts shared across all subdomains.
//!
//! - [`provider::ProviderId`]: the three LLM backends
//! - [`error`]: input validation and output parsing errors
//! - [`number`]: lenient integer decoding

pub mod error;
pub(crate) mod number;
pub mod provider;
