//! Writes exported transcripts to disk.

use bizbrain_application::ports::transcript_sink::TranscriptSink;
use bizbrain_domain::export_file_name;
use chrono::NaiveDate;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::info;

/// Writes `Business-Insights-<date>.txt` files into one directory.
pub struct TranscriptWriter {
    dir: PathBuf,
}

impl TranscriptWriter {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Write `transcript` under today's (UTC) file name.
    pub fn write(&self, transcript: &str) -> io::Result<PathBuf> {
        self.write_dated(transcript, chrono::Utc::now().date_naive())
    }

    /// Write `transcript` under the file name for `date`, replacing any
    /// earlier export of the same day.
    pub fn write_dated(&self, transcript: &str, date: NaiveDate) -> io::Result<PathBuf> {
        write_into(&self.dir, transcript, date)
    }
}

impl TranscriptSink for TranscriptWriter {
    fn save(&self, transcript: &str, dir: Option<&Path>) -> io::Result<PathBuf> {
        let dir = dir.unwrap_or(&self.dir);
        write_into(dir, transcript, chrono::Utc::now().date_naive())
    }
}

fn write_into(dir: &Path, transcript: &str, date: NaiveDate) -> io::Result<PathBuf> {
    fs::create_dir_all(dir)?;
    let path = dir.join(export_file_name(date));
    fs::write(&path, transcript)?;
    info!(path = %path.display(), bytes = transcript.len(), "Transcript exported");
    Ok(path)
}
