//! Transcript sink port
//!
//! Where exported transcripts are saved. The file adapter lives in the
//! infrastructure layer; the REPL only sees this trait.

use std::io;
use std::path::{Path, PathBuf};

/// Saves an exported transcript and reports where it went.
pub trait TranscriptSink: Send + Sync {
    /// Save `transcript`, into `dir` when given or the sink's default
    /// location otherwise.
    fn save(&self, transcript: &str, dir: Option<&Path>) -> io::Result<PathBuf>;
}
