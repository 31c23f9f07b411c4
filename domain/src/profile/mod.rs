//! Business profile domain.
//!
//! - [`entities::BusinessProfile`] — the user's business context
//! - [`entities::ProfileField`] — addressable profile fields
//! - [`catalog`] — industry / company-size choices and suggested prompts

pub mod catalog;
pub mod entities;
