//! Configuration file loading for bizbrain
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. `BIZBRAIN_*` environment variables (`BIZBRAIN_GEMINI__MODEL=...`)
//! 2. `--config <path>` specified file
//! 3. Project root: `./bizbrain.toml` or `./.bizbrain.toml`
//! 4. Global: `$XDG_CONFIG_HOME/bizbrain/config.toml`
//! 5. Default values

mod file_config;
mod loader;

pub use file_config::{
    ConfigValidationError, FileConfig, FileGeminiConfig, FileLoggingConfig, FileOutputConfig,
    FileReplConfig, FileStorageConfig, expand_path,
};
pub use loader::ConfigLoader;
