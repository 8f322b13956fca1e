//! Single-shard walk: collects a FileRecord per regular file under one shard.
//!
//! Blocking; runs on the blocking thread pool via the scan pool.

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use super::progress::ScanProgress;
use crate::domain::{FileRecord, SweepEvent};
use crate::ports::EventSink;

/// What one shard walk produced.
#[derive(Debug, Default)]
pub struct ShardScan {
    pub records: Vec<FileRecord>,
    /// Files (or unreadable subtrees) skipped because stat/readdir failed.
    pub skipped: usize,
    /// The walk could not even start on the shard itself.
    pub failed: bool,
}

/// One step of a shard walk, decoupled from walkdir's entry type.
#[derive(Debug)]
pub(crate) enum Visit {
    /// A regular file; it still has to be statted.
    File(PathBuf),
    /// Directory, symlink or anything else that is not a candidate.
    Other,
    /// walkdir could not read `path`. Depth 0 is the shard itself.
    Error {
        path: PathBuf,
        depth: usize,
        error: String,
    },
}

/// Walk `shard` recursively. Directories and symlinks are not candidates.
///
/// Per-entry errors are reported to `sink` and skipped. An error on the shard
/// itself (depth 0) marks the shard failed; nothing else is cancelled.
pub fn walk_shard(shard: &Path, progress: &ScanProgress, sink: &dyn EventSink) -> ShardScan {
    let walker = WalkDir::new(shard)
        .follow_links(false)
        .follow_root_links(false);

    let visits = walker.into_iter().map(|entry| match entry {
        Ok(entry) if entry.file_type().is_file() => Visit::File(entry.into_path()),
        Ok(_) => Visit::Other,
        Err(err) => Visit::Error {
            path: err.path().map(Path::to_path_buf).unwrap_or_else(|| shard.to_path_buf()),
            depth: err.depth(),
            error: err.to_string(),
        },
    });

    collect_visits(visits, progress, sink)
}

pub(crate) fn collect_visits(
    visits: impl IntoIterator<Item = Visit>,
    progress: &ScanProgress,
    sink: &dyn EventSink,
) -> ShardScan {
    let mut out = ShardScan::default();

    for visit in visits {
        match visit {
            Visit::Other => {}
            Visit::Error { path, depth: 0, error } => {
                out.failed = true;
                sink.emit(SweepEvent::ShardFailed { path, error });
            }
            Visit::Error { path, error, .. } => {
                out.skipped += 1;
                sink.emit(SweepEvent::FileSkipped { path, error });
            }
            Visit::File(path) => match stat_record(&path) {
                Ok(record) => {
                    if let Some(event) = progress.record(record.size_bytes()) {
                        sink.emit(event);
                    }
                    out.records.push(record);
                }
                Err(err) => {
                    out.skipped += 1;
                    sink.emit(SweepEvent::FileSkipped {
                        path,
                        error: err.to_string(),
                    });
                }
            },
        }
    }

    out
}

/// Fresh lstat of the file: it may have vanished since the directory listing.
fn stat_record(path: &Path) -> std::io::Result<FileRecord> {
    let meta = std::fs::symlink_metadata(path)?;
    let accessed = meta.accessed()?;
    Ok(FileRecord::from_system_time(PathBuf::from(path), accessed, meta.len()))
}
