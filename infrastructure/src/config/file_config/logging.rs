//! Logging configuration from TOML (`[logging]` section)

use serde::{Deserialize, Serialize};

/// Raw logging configuration from TOML
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileLoggingConfig {
    /// Chain event log (one JSON object per line)
    pub jsonl_path: Option<String>,
    /// Directory for the daily rolling tracing log
    pub log_dir: Option<String>,
    /// Mirror chain events into tracing output
    pub trace_events: bool,
}
