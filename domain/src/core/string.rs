//! String utilities for the domain layer.

/// Shorten `s` to at most `max_len` bytes for log output.
///
/// Newlines are folded into spaces so a preview always fits on one log line.
/// Truncation respects UTF-8 character boundaries and appends `...`.
pub fn preview(s: &str, max_len: usize) -> String {
    let flat = s.replace(['\r', '\n'], " ");
    if flat.len() <= max_len {
        return flat;
    }
    let mut end = max_len.saturating_sub(3);
    while end > 0 && !flat.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &flat[..end])
}
