//! Persistent log of every event the hook has seen.
//!
//! The log is a single JSON array on disk. Writers go through the narrow
//! [`EventLog`] trait so a locking or serializing implementation can replace
//! [`JsonArrayLog`] without touching callers.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::protocol::Event;

/// Default log location, relative to the working directory.
pub const DEFAULT_LOG_PATH: &str = "logs/post_tool_use.json";

/// Errors that can occur while appending to the log.
#[derive(Debug, thiserror::Error)]
pub enum LogError {
    #[error("failed to create log directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to read log file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to write log file {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to serialize log: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Append-only sink for hook events.
pub trait EventLog {
    fn append(&self, event: &Event) -> Result<(), LogError>;
}

/// Log stored as a pretty-printed JSON array in a single file.
///
/// Each append is a full read-modify-write of the file. No locking is
/// performed; concurrent hook processes may lose each other's entries.
#[derive(Debug, Clone)]
pub struct JsonArrayLog {
    path: PathBuf,
}

impl JsonArrayLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the current entries.
    ///
    /// A missing file, contents that are not UTF-8 JSON, or a JSON document
    /// that is not an array all yield an empty list. Only I/O errors other
    /// than not-found are reported.
    pub fn entries(&self) -> Result<Vec<Value>, LogError> {
        let content = match std::fs::read(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(source) => {
                return Err(LogError::Read {
                    path: self.path.clone(),
                    source,
                })
            }
        };

        match serde_json::from_slice::<Value>(&content) {
            Ok(Value::Array(entries)) => Ok(entries),
            Ok(_) => {
                log::warn!(
                    "{} does not hold a JSON array, starting a new log",
                    self.path.display()
                );
                Ok(Vec::new())
            }
            Err(e) => {
                log::warn!(
                    "{} is not valid JSON ({e}), starting a new log",
                    self.path.display()
                );
                Ok(Vec::new())
            }
        }
    }

    fn ensure_parent_dir(&self) -> Result<(), LogError> {
        match self.path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => {
                std::fs::create_dir_all(dir).map_err(|source| LogError::CreateDir {
                    path: dir.to_path_buf(),
                    source,
                })
            }
            _ => Ok(()),
        }
    }
}

impl EventLog for JsonArrayLog {
    fn append(&self, event: &Event) -> Result<(), LogError> {
        self.ensure_parent_dir()?;

        let mut entries = self.entries()?;
        entries.push(event.as_value().clone());

        let json = serde_json::to_string_pretty(&entries)?;
        std::fs::write(&self.path, json).map_err(|source| LogError::Write {
            path: self.path.clone(),
            source,
        })?;

        log::debug!(
            "appended event to {} ({} entries)",
            self.path.display(),
            entries.len()
        );
        Ok(())
    }
}
