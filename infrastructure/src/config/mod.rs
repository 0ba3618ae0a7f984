//! Configuration file loading for dilemma-panel
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. `DILEMMA_*` environment variables (`__` separates nested keys)
//! 2. `--config <path>` specified file
//! 3. Project root: `./dilemma.toml` or `./.dilemma.toml`
//! 4. Global: `~/.config/dilemma-panel/config.toml`
//! 5. Default values

mod file_config;
mod loader;

pub use file_config::{
    ConfigValidationError, FileBasicAuthConfig, FileBedrockConfig, FileConfig, FileGeminiConfig,
    FileOpenAiConfig, FileProvidersConfig, FileServerConfig,
};
pub use loader::ConfigLoader;
