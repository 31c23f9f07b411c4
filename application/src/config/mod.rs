//! Application-level configuration.
//!
//! - [`ChatSettings`] — model and sampling parameters for new conversation contexts

pub mod chat_settings;

pub use chat_settings::ChatSettings;
