//! Application layer for bizbrain
//!
//! This crate contains the chat session use cases, the persisted state
//! stores, and the port definitions adapters implement. It depends only on
//! the domain layer.

pub mod config;
pub mod ports;
pub mod stores;
pub mod use_cases;

// Re-export commonly used types
pub use config::ChatSettings;
pub use ports::{
    conversation_logger::{ConversationEvent, ConversationLogger, NoConversationLogger},
    llm_gateway::{GatewayError, LlmGateway, LlmSession, SessionConfig, StreamHandle},
    session_observer::{ExchangeOutcome, NoObserver, SessionObserver},
    state_store::{InMemoryStateStore, StateStore, StoreError},
    transcript_sink::TranscriptSink,
};
pub use stores::{CHAT_HISTORY_KEY, MessageLogStore, PROFILE_KEY, ProfileStore};
pub use use_cases::chat_client::ChatSessionClient;
pub use use_cases::session_controller::{
    ERROR_REPLY, IgnoreReason, SessionController, SessionState, SubmitOutcome,
};
