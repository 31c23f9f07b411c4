//! Chat session domain.
//!
//! - [`entities::Message`] — a single persisted chat message
//! - [`entities::Role`] — who authored a message
//! - [`stream::StreamEvent`] — incremental events of a streamed reply

pub mod entities;
pub mod stream;
