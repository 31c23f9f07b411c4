//! Line-by-line formatter

use regex::Regex;
use std::sync::LazyLock;

static EMPHASIS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*\*(.*?)\*\*").expect("emphasis pattern is valid"));

/// A run of inline text, optionally emphasized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InlineSpan {
    pub text: String,
    pub emphasized: bool,
}

impl InlineSpan {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            emphasized: false,
        }
    }

    pub fn emphasized(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            emphasized: true,
        }
    }
}

/// A structured display node produced from one input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DisplayNode {
    /// `#` = 1, `##` = 2, `###` = 3. Heading text is never emphasis-split.
    Heading { level: u8, text: String },
    /// A flat bullet item with its marker removed.
    ListItem { spans: Vec<InlineSpan> },
    /// Any other line, including blank lines (empty `spans`).
    Paragraph { spans: Vec<InlineSpan> },
}

impl DisplayNode {
    /// The node's text with all emphasis dropped.
    pub fn plain_text(&self) -> String {
        match self {
            DisplayNode::Heading { text, .. } => text.clone(),
            DisplayNode::ListItem { spans } | DisplayNode::Paragraph { spans } => {
                spans.iter().map(|s| s.text.as_str()).collect()
            }
        }
    }
}

/// Format a block of text into display nodes, one node per `\n`-separated line.
pub fn format(text: &str) -> Vec<DisplayNode> {
    text.split('\n').map(format_line).collect()
}

/// Format a single line (no embedded `\n`).
pub fn format_line(line: &str) -> DisplayNode {
    let line = line.strip_suffix('\r').unwrap_or(line);

    for (marker, level) in [("###", 3), ("##", 2), ("#", 1)] {
        if let Some(rest) = line.strip_prefix(marker) {
            let text = rest.strip_prefix(' ').unwrap_or(rest);
            return DisplayNode::Heading {
                level,
                text: text.to_string(),
            };
        }
    }

    let trimmed = line.trim();
    if let Some(item) = trimmed
        .strip_prefix("- ")
        .or_else(|| trimmed.strip_prefix("* "))
    {
        return DisplayNode::ListItem {
            spans: emphasis_spans(item),
        };
    }

    DisplayNode::Paragraph {
        spans: emphasis_spans(line),
    }
}

/// Split on `**…**` pairs: text between delimiters is emphasized, text
/// outside is plain. Empty pieces are dropped.
fn emphasis_spans(line: &str) -> Vec<InlineSpan> {
    let mut spans = Vec::new();
    let mut last = 0;

    for caps in EMPHASIS.captures_iter(line) {
        let (Some(whole), Some(inner)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        push_span(&mut spans, &line[last..whole.start()], false);
        push_span(&mut spans, inner.as_str(), true);
        last = whole.end();
    }
    push_span(&mut spans, &line[last..], false);

    spans
}

fn push_span(spans: &mut Vec<InlineSpan>, text: &str, emphasized: bool) {
    if !text.is_empty() {
        spans.push(InlineSpan {
            text: text.to_string(),
            emphasized,
        });
    }
}
