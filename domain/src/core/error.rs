//! Domain error types

use thiserror::Error;

/// Domain-level errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Unknown profile field: {0}")]
    UnknownProfileField(String),

    #[error("Invalid value for {field}: {value}")]
    InvalidProfileValue { field: &'static str, value: String },

    #[error("Malformed transcript block {index}: {reason}")]
    MalformedTranscript { index: usize, reason: String },
}
