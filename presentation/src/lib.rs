//! Presentation layer for bizbrain
//!
//! This crate contains CLI definitions, the console renderer, the thinking
//! indicator, and the interactive chat interface.

pub mod chat;
pub mod cli;
pub mod config;
pub mod output;
pub mod progress;

// Re-export commonly used types
pub use chat::{ChatRepl, ReplCommand, send_with_interrupt};
pub use cli::commands::Cli;
pub use config::{OutputConfig, ReplConfig};
pub use output::console::ConsoleFormatter;
pub use output::stream::TerminalObserver;
pub use progress::spinner::ThinkingSpinner;
