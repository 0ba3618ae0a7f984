//! Ports (interfaces) for the application layer
//!
//! Ports define the boundaries between the application and the outside
//! world. Adapters in the infrastructure layer implement them.

pub mod credentials;
pub mod progress;
pub mod provider;
