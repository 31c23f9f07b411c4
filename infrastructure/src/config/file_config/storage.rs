//! Storage configuration from TOML (`[storage]` section)

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Raw storage configuration from TOML
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileStorageConfig {
    /// Directory for the profile and chat history slots
    pub data_dir: Option<String>,
    /// Directory transcripts are exported to (default: current directory)
    pub export_dir: Option<String>,
}

impl FileStorageConfig {
    pub fn data_dir(&self) -> Option<PathBuf> {
        self.data_dir.as_deref().map(expand_path)
    }

    pub fn export_dir(&self) -> PathBuf {
        self.export_dir
            .as_deref()
            .map(expand_path)
            .unwrap_or_else(|| PathBuf::from("."))
    }
}

/// Expand a leading `~/` to the home directory.
pub fn expand_path(path: &str) -> PathBuf {
    match (path.strip_prefix("~/"), dirs::home_dir()) {
        (Some(rest), Some(home)) => home.join(rest),
        _ if path == "~" => dirs::home_dir().unwrap_or_else(|| PathBuf::from(path)),
        _ => PathBuf::from(path),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_export_dir_defaults_to_current_directory() {
        assert_eq!(FileStorageConfig::default().export_dir(), PathBuf::from("."));
        assert!(FileStorageConfig::default().data_dir().is_none());
    }

    #[test]
    fn test_expand_path() {
        assert_eq!(expand_path("/var/data"), PathBuf::from("/var/data"));
        assert_eq!(expand_path("relative/dir"), PathBuf::from("relative/dir"));
        if let Some(home) = dirs::home_dir() {
            assert_eq!(expand_path("~/exports"), home.join("exports"));
        }
    }
}
