//! Incremental formatting of streamed text

use super::formatter::{DisplayNode, format_line};

/// Formats text that arrives in fragments, one completed line at a time.
///
/// For any split of a text into fragments, the nodes returned by
/// [`push`](Self::push) followed by [`finish`](Self::finish) equal
/// [`format`](super::format) applied to the whole text.
#[derive(Debug, Default)]
pub struct StreamingFormatter {
    pending: String,
}

impl StreamingFormatter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed a fragment; returns nodes for every line it completed.
    pub fn push(&mut self, fragment: &str) -> Vec<DisplayNode> {
        self.pending.push_str(fragment);

        let mut nodes = Vec::new();
        while let Some(pos) = self.pending.find('\n') {
            nodes.push(format_line(&self.pending[..pos]));
            self.pending.drain(..=pos);
        }
        nodes
    }

    /// Text of the line not yet terminated by `\n`.
    pub fn pending(&self) -> &str {
        &self.pending
    }

    /// Format the trailing partial line (possibly empty).
    pub fn finish(self) -> DisplayNode {
        format_line(&self.pending)
    }
}
