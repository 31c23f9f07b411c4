//! Domain layer for bizbrain
//!
//! This crate contains the core business logic, entities, and value objects
//! of the business-consultant chat client. It has no dependencies on
//! infrastructure or presentation concerns.
//!
//! - [`session`] — chat messages and stream events
//! - [`profile`] — the business profile and its catalogues
//! - [`prompt`] — the consultant system instruction
//! - [`content`] — Markdown-subset formatting into display nodes
//! - [`transcript`] — plain-text export of the chat log

pub mod content;
pub mod core;
pub mod profile;
pub mod prompt;
pub mod session;
pub mod transcript;

// Re-export commonly used types
pub use content::{DisplayNode, InlineSpan, StreamingFormatter, format};
pub use crate::core::{error::DomainError, model::Model, string::preview};
pub use profile::{
    catalog::{
        COMPANY_SIZES, INDUSTRIES, SUGGESTED_PROMPTS, SuggestedPrompt, resolve_choice,
        suggested_prompt,
    },
    entities::{BusinessProfile, ProfileField},
};
pub use prompt::ConsultantPrompt;
pub use session::{
    entities::{Message, Role, now_millis},
    stream::StreamEvent,
};
pub use transcript::{TranscriptEntry, export_file_name, export_transcript, parse_transcript};
