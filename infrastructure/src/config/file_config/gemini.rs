//! Remote API configuration from TOML (`[gemini]` section)

use bizbrain_domain::Model;
use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;
use std::time::Duration;

/// Raw Gemini configuration from TOML
///
/// # Example
///
/// ```toml
/// [gemini]
/// model = "gemini-3-flash-preview"
/// temperature = 0.7
/// api_base = "https://generativelanguage.googleapis.com/v1beta"
/// timeout_seconds = 120
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileGeminiConfig {
    pub model: Option<String>,
    pub temperature: Option<f32>,
    pub api_base: Option<String>,
    /// Prefer `GEMINI_API_KEY` in the environment over storing the key here.
    pub api_key: Option<String>,
    /// Per-request timeout; unset means wait indefinitely.
    pub timeout_seconds: Option<u64>,
}

impl FileGeminiConfig {
    pub const DEFAULT_TEMPERATURE: f32 = 0.7;
    pub const TEMPERATURE_RANGE: RangeInclusive<f32> = 0.0..=2.0;

    /// Configured model, or the default when unset or blank.
    pub fn parse_model(&self) -> Model {
        match self.model.as_deref().map(str::trim) {
            Some(name) if !name.is_empty() => {
                let Ok(model) = name.parse::<Model>();
                model
            }
            _ => Model::default(),
        }
    }

    /// Configured temperature when in range, otherwise the default.
    pub fn temperature(&self) -> f32 {
        self.temperature
            .filter(|t| Self::TEMPERATURE_RANGE.contains(t))
            .unwrap_or(Self::DEFAULT_TEMPERATURE)
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_seconds
            .filter(|s| *s > 0)
            .map(Duration::from_secs)
    }
}
