//! Chat settings — parameters of every conversation context the client creates.

use bizbrain_domain::Model;
use serde::{Deserialize, Serialize};

/// Model and sampling parameters used when a conversation context is created.
///
/// Changing these only affects contexts created after the next reset, the
/// same as profile edits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatSettings {
    pub model: Model,
    pub temperature: f32,
}

impl ChatSettings {
    pub const DEFAULT_TEMPERATURE: f32 = 0.7;

    pub fn new(model: Model) -> Self {
        Self {
            model,
            ..Self::default()
        }
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }
}

impl Default for ChatSettings {
    fn default() -> Self {
        Self {
            model: Model::default(),
            temperature: Self::DEFAULT_TEMPERATURE,
        }
    }
}
