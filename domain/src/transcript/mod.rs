//! Plain-text transcript export ("Export Insights").
//!
//! Each message becomes a block
//!
//! ```text
//! ROLE (2024-06-10 14:03:27):
//! content
//! ```
//!
//! and blocks are joined by a `---` delimiter line. [`parse_transcript`]
//! reads the format back. A delimiter only starts a new block when a
//! `ROLE (timestamp):` header follows it, so horizontal rules in message
//! content survive the round trip.

use crate::core::error::DomainError;
use crate::session::entities::{Message, Role};
use chrono::{NaiveDate, NaiveDateTime, TimeZone};

/// Display precision of exported timestamps.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Separator placed between message blocks.
pub const BLOCK_SEPARATOR: &str = "\n---\n\n";

/// One message recovered from an exported transcript.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranscriptEntry {
    pub role: Role,
    pub displayed_at: NaiveDateTime,
    pub content: String,
}

/// Render the log as a transcript, showing timestamps in `tz`.
pub fn export_transcript<Tz>(messages: &[Message], tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    messages
        .iter()
        .map(|m| {
            format!(
                "{} ({}):\n{}\n",
                m.role.as_str().to_uppercase(),
                display_timestamp(m.timestamp, tz),
                m.content
            )
        })
        .collect::<Vec<_>>()
        .join(BLOCK_SEPARATOR)
}

/// `Business-Insights-<YYYY-MM-DD>.txt`
pub fn export_file_name(date: NaiveDate) -> String {
    format!("Business-Insights-{}.txt", date.format("%Y-%m-%d"))
}

/// Parse a transcript produced by [`export_transcript`].
pub fn parse_transcript(text: &str) -> Result<Vec<TranscriptEntry>, DomainError> {
    if text.is_empty() {
        return Ok(Vec::new());
    }

    let mut blocks: Vec<String> = Vec::new();
    for piece in text.split(BLOCK_SEPARATOR) {
        match blocks.last_mut() {
            Some(current) if !starts_with_header(piece) => {
                current.push_str(BLOCK_SEPARATOR);
                current.push_str(piece);
            }
            _ => blocks.push(piece.to_string()),
        }
    }

    blocks
        .iter()
        .enumerate()
        .map(|(index, block)| parse_block(index, block))
        .collect()
}

fn starts_with_header(piece: &str) -> bool {
    piece
        .split('\n')
        .next()
        .is_some_and(|line| parse_header(line).is_ok())
}

/// Parse a `ROLE (timestamp):` header line.
fn parse_header(line: &str) -> Result<(Role, NaiveDateTime), String> {
    let header = line
        .strip_suffix("):")
        .ok_or_else(|| "header must end with '):'".to_string())?;
    let (role, stamp) = header
        .split_once(" (")
        .ok_or_else(|| "header must contain '(timestamp)'".to_string())?;

    let role = role.parse::<Role>()?;
    let displayed_at = NaiveDateTime::parse_from_str(stamp, TIMESTAMP_FORMAT)
        .map_err(|e| format!("bad timestamp '{stamp}': {e}"))?;
    Ok((role, displayed_at))
}

fn parse_block(index: usize, block: &str) -> Result<TranscriptEntry, DomainError> {
    let malformed = |reason: &str| DomainError::MalformedTranscript {
        index,
        reason: reason.to_string(),
    };

    let (header, rest) = block
        .split_once('\n')
        .ok_or_else(|| malformed("missing header line"))?;
    let (role, displayed_at) = parse_header(header).map_err(|e| malformed(&e))?;
    let content = rest
        .strip_suffix('\n')
        .ok_or_else(|| malformed("block must end with a newline"))?;

    Ok(TranscriptEntry {
        role,
        displayed_at,
        content: content.to_string(),
    })
}

fn display_timestamp<Tz>(millis: i64, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    match tz.timestamp_millis_opt(millis).single() {
        Some(at) => at.format(TIMESTAMP_FORMAT).to_string(),
        None => millis.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn message(role: Role, content: &str, timestamp: i64) -> Message {
        Message::new(role, content, timestamp)
    }

    #[test]
    fn test_export_block_layout() {
        let log = vec![
            message(Role::User, "How do I grow?", 1_718_028_207_000),
            message(Role::Assistant, "## Plan\n- Focus", 1_718_028_210_500),
        ];
        let text = export_transcript(&log, &Utc);
        assert_eq!(
            text,
            "USER (2024-06-10 14:03:27):\nHow do I grow?\n\n---\n\nASSISTANT (2024-06-10 14:03:30):\n## Plan\n- Focus\n"
        );
    }

    #[test]
    fn test_export_then_parse_recovers_every_message() {
        let log = vec![
            message(Role::User, "Perform a SWOT analysis.", 1_718_028_207_123),
            message(
                Role::Assistant,
                "### Strengths\n**Brand** loyalty\n\n- Next Steps: survey users",
                1_718_028_215_999,
            ),
            message(Role::User, "", 1_718_028_300_000),
            message(Role::System, "note", 1_718_028_400_000),
        ];
        let entries = parse_transcript(&export_transcript(&log, &Utc)).unwrap();

        assert_eq!(entries.len(), log.len());
        for (entry, original) in entries.iter().zip(&log) {
            assert_eq!(entry.role, original.role);
            assert_eq!(entry.content, original.content);
            let expected = Utc
                .timestamp_millis_opt(original.timestamp)
                .unwrap()
                .naive_utc()
                .format(TIMESTAMP_FORMAT)
                .to_string();
            assert_eq!(entry.displayed_at.format(TIMESTAMP_FORMAT).to_string(), expected);
        }
    }

    #[test]
    fn test_horizontal_rule_in_content_stays_in_its_block() {
        let log = vec![
            message(
                Role::Assistant,
                "## Plan\nGrow.\n---\n\n## Next Steps\n- ship",
                1_718_028_207_000,
            ),
            message(Role::User, "thanks", 1_718_028_210_000),
            message(Role::Assistant, "---\n\nleading rule", 1_718_028_220_000),
        ];
        let entries = parse_transcript(&export_transcript(&log, &Utc)).unwrap();

        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0].role, Role::Assistant);
        assert_eq!(entries[0].content, "## Plan\nGrow.\n---\n\n## Next Steps\n- ship");
        assert_eq!(entries[1].role, Role::User);
        assert_eq!(entries[1].content, "thanks");
        assert_eq!(entries[2].content, "---\n\nleading rule");
    }

    #[test]
    fn test_empty_log_exports_empty_text() {
        assert_eq!(export_transcript(&[], &Utc), "");
        assert!(parse_transcript("").unwrap().is_empty());
    }

    #[test]
    fn test_parse_rejects_garbage() {
        let err = parse_transcript("not a transcript").unwrap_err();
        assert!(matches!(err, DomainError::MalformedTranscript { index: 0, .. }));
    }

    #[test]
    fn test_export_file_name() {
        let date = NaiveDate::from_ymd_opt(2026, 10, 16).unwrap();
        assert_eq!(export_file_name(date), "Business-Insights-2026-10-16.txt");
    }
}
