//! Error types for the Gemini adapter

use bizbrain_application::ports::llm_gateway::GatewayError;
use thiserror::Error;

/// Result type alias for Gemini operations
pub type Result<T> = std::result::Result<T, GeminiError>;

/// Errors that can occur when talking to the Gemini API
#[derive(Error, Debug)]
pub enum GeminiError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Gemini API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Failed to parse stream payload: {error}\nRaw payload: {raw}")]
    Parse { error: String, raw: String },

    #[error("Stream consumer went away")]
    ReceiverDropped,
}

impl From<GeminiError> for GatewayError {
    fn from(error: GeminiError) -> Self {
        match error {
            GeminiError::Http(e) if e.is_timeout() => GatewayError::Timeout,
            GeminiError::Http(e) if e.is_connect() => GatewayError::ConnectionError(e.to_string()),
            GeminiError::Http(e) => GatewayError::RequestFailed(e.to_string()),
            GeminiError::Api { status, message } => GatewayError::ApiError { status, message },
            GeminiError::Parse { error, .. } => GatewayError::MalformedResponse(error),
            GeminiError::ReceiverDropped => GatewayError::TransportClosed,
        }
    }
}
