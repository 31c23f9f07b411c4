//! Markdown-subset content formatting.
//!
//! Turns assistant text into [`DisplayNode`]s that a view can render
//! without interpreting any other markup:
//!
//! - `#`, `##`, `###` headings
//! - `**emphasis**` inline spans
//! - flat `- ` / `* ` list items
//! - everything else as paragraphs, one per line

mod formatter;
mod streaming;

pub use formatter::{DisplayNode, InlineSpan, format, format_line};
pub use streaming::StreamingFormatter;
