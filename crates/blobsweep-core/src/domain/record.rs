//! FileRecord: one discovered blob and its recency signal.

use std::path::{Path, PathBuf};
use std::time::SystemTime;

use chrono::{DateTime, Utc};
use serde::Serialize;

/// A regular file found under the blob root.
///
/// Created once per file during the scan and never updated afterwards: the
/// access time is a snapshot and is not re-checked before deletion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileRecord {
    path: PathBuf,
    last_access: DateTime<Utc>,
    size_bytes: u64,
}

impl FileRecord {
    pub fn new(path: impl Into<PathBuf>, last_access: DateTime<Utc>, size_bytes: u64) -> Self {
        Self {
            path: path.into(),
            last_access,
            size_bytes,
        }
    }

    /// Build from filesystem metadata values (`Metadata::accessed()`, `len()`).
    pub fn from_system_time(path: impl Into<PathBuf>, accessed: SystemTime, size_bytes: u64) -> Self {
        Self::new(path, DateTime::<Utc>::from(accessed), size_bytes)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn last_access(&self) -> DateTime<Utc> {
        self.last_access
    }

    pub fn size_bytes(&self) -> u64 {
        self.size_bytes
    }
}
