//! JSONL file writer for chain events.
//!
//! Each [`ChainEvent`] is serialized as a single JSON line: the event's own
//! fields (`type`, `metadata`, payload) plus a `logged_at` write timestamp,
//! appended to the file via a buffered writer.

use enzymeml_application::ChainObserver;
use enzymeml_domain::ChainEvent;
use serde_json::Value;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::warn;

/// JSONL chain logger that writes one JSON object per line.
///
/// Thread-safe via `Mutex<BufWriter<File>>`. Flushes on `Drop`.
pub struct JsonlChainLogger {
    writer: Mutex<BufWriter<File>>,
    path: PathBuf,
}

impl JsonlChainLogger {
    /// Create a new logger writing to the given path.
    ///
    /// Creates the file (and parent directories) if they don't exist.
    /// Returns `None` if the file cannot be created.
    pub fn new(path: impl AsRef<Path>) -> Option<Self> {
        let path = path.as_ref();

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
            && let Err(e) = std::fs::create_dir_all(parent)
        {
            warn!(
                "Could not create chain log directory {}: {}",
                parent.display(),
                e
            );
            return None;
        }

        let file = match File::create(path) {
            Ok(f) => f,
            Err(e) => {
                warn!("Could not create chain log file {}: {}", path.display(), e);
                return None;
            }
        };

        Some(Self {
            writer: Mutex::new(BufWriter::new(file)),
            path: path.to_path_buf(),
        })
    }

    /// Get the path to the log file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn record(event: &ChainEvent) -> Option<Value> {
        let logged_at = chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true);
        match serde_json::to_value(event) {
            Ok(Value::Object(mut map)) => {
                map.insert("logged_at".to_string(), Value::String(logged_at));
                Some(Value::Object(map))
            }
            Ok(_) => None,
            Err(e) => {
                warn!("Could not serialize {} event: {}", event.name(), e);
                None
            }
        }
    }
}

impl ChainObserver for JsonlChainLogger {
    fn on_event(&self, event: &ChainEvent) {
        let Some(record) = Self::record(event) else {
            return;
        };
        let Ok(line) = serde_json::to_string(&record) else {
            return;
        };

        if let Ok(mut writer) = self.writer.lock() {
            let _ = writeln!(writer, "{}", line);
            // Append-only: flush each line so a crash keeps what was written
            let _ = writer.flush();
        }
    }
}

impl Drop for JsonlChainLogger {
    fn drop(&mut self) {
        if let Ok(mut writer) = self.writer.lock() {
            let _ = writer.flush();
        }
    }
}
