//! Log sink configuration from TOML (`[logging]` section)

use serde::{Deserialize, Serialize};

/// Raw logging configuration from TOML
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileLoggingConfig {
    /// Also write tracing output to `<data_dir>/logs/bizbrain.log`
    pub file: bool,
    /// Record exchanges to a JSONL conversation log
    pub conversation_log: bool,
}
