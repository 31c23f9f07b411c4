//! Infrastructure layer for bizbrain
//!
//! This crate contains adapters that implement the ports defined in the
//! application layer: the Gemini streaming client, file-backed state,
//! transcript export, configuration loading, and the conversation log.

pub mod config;
pub mod gemini;
pub mod logging;
pub mod storage;

// Re-export commonly used types
pub use config::{
    ConfigLoader, ConfigValidationError, FileConfig, FileGeminiConfig, FileLoggingConfig,
    FileOutputConfig, FileReplConfig, FileStorageConfig,
};
pub use gemini::{
    error::{GeminiError, Result},
    gateway::{DEFAULT_API_BASE, GeminiConfig, GeminiGateway},
    session::GeminiSession,
};
pub use logging::JsonlConversationLogger;
pub use storage::{FileStateStore, TranscriptWriter};
