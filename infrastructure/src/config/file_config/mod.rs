//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! They are deserialized directly and use domain types where appropriate.

mod gemini;
mod logging;
mod output;
mod repl;
mod storage;

pub use gemini::FileGeminiConfig;
pub use logging::FileLoggingConfig;
pub use output::FileOutputConfig;
pub use repl::FileReplConfig;
pub use storage::{FileStorageConfig, expand_path};

use serde::{Deserialize, Serialize};
use std::fmt;

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Remote API settings
    pub gemini: FileGeminiConfig,
    /// Where state and exports live
    pub storage: FileStorageConfig,
    /// REPL settings
    pub repl: FileReplConfig,
    /// Output settings
    pub output: FileOutputConfig,
    /// Log sinks
    pub logging: FileLoggingConfig,
}

/// A problem found in an otherwise loadable configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigValidationError {
    pub field: &'static str,
    pub message: String,
}

impl fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl FileConfig {
    /// Validate the entire configuration, returning all detected issues.
    ///
    /// Issues are warnings: the offending value is ignored and the default
    /// used instead.
    pub fn validate(&self) -> Vec<ConfigValidationError> {
        let mut issues = Vec::new();

        if let Some(model) = &self.gemini.model
            && model.trim().is_empty()
        {
            issues.push(ConfigValidationError {
                field: "gemini.model",
                message: "model name cannot be empty".to_string(),
            });
        }

        if let Some(temperature) = self.gemini.temperature
            && !(FileGeminiConfig::TEMPERATURE_RANGE).contains(&temperature)
        {
            issues.push(ConfigValidationError {
                field: "gemini.temperature",
                message: format!("{temperature} is outside 0.0..=2.0"),
            });
        }

        if self.gemini.timeout_seconds == Some(0) {
            issues.push(ConfigValidationError {
                field: "gemini.timeout_seconds",
                message: "must be greater than zero (omit to disable)".to_string(),
            });
        }

        issues
    }
}
