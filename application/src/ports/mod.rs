//! Port definitions (interfaces for external adapters)
//!
//! Ports define the contracts that infrastructure and presentation
//! adapters must implement.

pub mod conversation_logger;
pub mod llm_gateway;
pub mod session_observer;
pub mod state_store;
pub mod transcript_sink;
