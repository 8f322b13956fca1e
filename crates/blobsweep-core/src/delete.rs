//! Sequential deletion of a plan's files, oldest first.

use std::io;

use serde::Serialize;

use crate::domain::{DeleteError, FileRecord, SweepEvent};
use crate::ports::EventSink;

/// What to do when a selected file is already gone at deletion time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MissingFilePolicy {
    /// Treat it like any other removal failure.
    #[default]
    Fail,
    /// Report it and continue with the next file.
    Skip,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DeleteReport {
    pub deleted: usize,
    pub already_absent: usize,
    /// Sum of sizes recorded at scan time for the removed files.
    pub bytes_removed: u64,
}

/// Remove `selected` in order.
///
/// Stops at the first failure and returns it; files removed before it stay
/// removed. On success every selected path no longer exists.
pub fn delete_in_order(
    selected: &[FileRecord],
    missing: MissingFilePolicy,
    sink: &dyn EventSink,
) -> Result<DeleteReport, DeleteError> {
    let mut report = DeleteReport::default();

    for record in selected {
        match std::fs::remove_file(record.path()) {
            Ok(()) => {
                report.deleted += 1;
                report.bytes_removed = report.bytes_removed.saturating_add(record.size_bytes());
                sink.emit(SweepEvent::FileDeleted {
                    path: record.path().to_path_buf(),
                });
            }
            Err(err) if err.kind() == io::ErrorKind::NotFound && missing == MissingFilePolicy::Skip => {
                report.already_absent += 1;
                sink.emit(SweepEvent::AlreadyAbsent {
                    path: record.path().to_path_buf(),
                });
            }
            Err(source) => {
                sink.emit(SweepEvent::DeletionFailed {
                    path: record.path().to_path_buf(),
                    deleted: report.deleted,
                    error: source.to_string(),
                });
                return Err(DeleteError {
                    path: record.path().to_path_buf(),
                    deleted: report.deleted,
                    source,
                });
            }
        }
    }

    Ok(report)
}
