//! Prompt templates
//!
//! - [`ConsultantPrompt`] — system instruction for the business consultant

mod template;

pub use template::ConsultantPrompt;
