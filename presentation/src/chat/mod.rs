//! Interactive chat module
//!
//! Provides a readline-based interactive chat interface for BizBrain.

mod command;
mod repl;

pub use command::{ProfileAction, ReplCommand};
pub use repl::{ChatRepl, send_with_interrupt};
