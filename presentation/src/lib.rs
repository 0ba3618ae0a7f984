//! Presentation layer for dilemma-panel
//!
//! This crate contains CLI definitions, output formatters,
//! progress reporters, and the HTTP API server.

pub mod cli;
pub mod output;
pub mod progress;
pub mod server;

// Re-export commonly used types
pub use cli::commands::{Cli, Command, EvalArgs, OutputFormat};
pub use output::console::ConsoleFormatter;
pub use progress::reporter::{ProgressReporter, SimpleProgress};
pub use server::{AppState, BasicAuth, router, serve};
