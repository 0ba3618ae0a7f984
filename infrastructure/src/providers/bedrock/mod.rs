//! AWS Bedrock provider (Anthropic models via InvokeModel)
//!
//! Requests go over the shared reqwest client and are signed with
//! `aws-sigv4` using the keys from the credential resolver; see [`signing`].

mod adapter;
pub mod signing;

pub use adapter::BedrockAdapter;
