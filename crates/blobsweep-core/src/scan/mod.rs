//! Concurrent tree scan of a sharded blob root.
//!
//! Root children are shards (a regular file directly under the root is a
//! one-file shard). Shards go through [`ScanPool`]; the per-shard walk is
//! [`walk_shard`].

pub mod pool;
pub mod progress;
pub mod walker;

use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;

pub use self::pool::{ScanPool, default_workers};
pub use self::progress::ScanProgress;
pub use self::walker::{ShardScan, walk_shard};

use crate::domain::{FileRecord, ScanError, SweepEvent};
use crate::ports::EventSink;

/// Counters describing one scan.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ScanStats {
    pub shards: usize,
    pub failed_shards: usize,
    pub files: usize,
    pub skipped_files: usize,
    pub bytes: u64,
    pub elapsed_ms: u64,
}

#[derive(Debug)]
pub struct ScanOutput {
    pub records: Vec<FileRecord>,
    pub stats: ScanStats,
}

#[derive(Debug, Clone, Copy)]
pub struct TreeScanner {
    pool: ScanPool,
    progress_every: u64,
}

impl TreeScanner {
    pub fn new(workers: usize, progress_every: u64) -> Self {
        Self {
            pool: ScanPool::new(workers),
            progress_every,
        }
    }

    /// Scan every regular file under `root`.
    ///
    /// `expected_bytes` only feeds the ETA in progress events.
    pub async fn scan(
        &self,
        root: &Path,
        expected_bytes: u64,
        sink: Arc<dyn EventSink>,
    ) -> Result<ScanOutput, ScanError> {
        let progress = Arc::new(ScanProgress::new(self.progress_every, expected_bytes));

        let list_root = root.to_path_buf();
        let list_sink = Arc::clone(&sink);
        let listing =
            tokio::task::spawn_blocking(move || list_shards(&list_root, list_sink.as_ref()))
                .await??;

        let out = self
            .pool
            .run(listing.shards, Arc::clone(&progress), Arc::clone(&sink))
            .await?;

        let elapsed = progress.elapsed();
        // unreadable root entries count as shards that failed to start
        let shards = out.shards + listing.unreadable;
        sink.emit(SweepEvent::ScanCompleted {
            shards,
            files: out.records.len(),
            elapsed,
        });

        let stats = ScanStats {
            shards,
            failed_shards: out.failed_shards + listing.unreadable,
            files: out.records.len(),
            skipped_files: out.skipped_files,
            bytes: out.records.iter().map(FileRecord::size_bytes).sum(),
            elapsed_ms: duration_ms(elapsed),
        };
        Ok(ScanOutput {
            records: out.records,
            stats,
        })
    }
}

/// Root children to scan, plus the entries that could not be read.
#[derive(Debug, Default)]
struct ShardListing {
    shards: Vec<PathBuf>,
    unreadable: usize,
}

/// Immediate children of `root`. Failing to list the root is fatal; a bad
/// individual entry is reported and left out.
fn list_shards(root: &Path, sink: &dyn EventSink) -> Result<ShardListing, ScanError> {
    let entries = std::fs::read_dir(root).map_err(|source| ScanError::ListRoot {
        path: root.to_path_buf(),
        source,
    })?;
    Ok(collect_shards(
        root,
        entries.map(|entry| entry.map(|e| e.path())),
        sink,
    ))
}

fn collect_shards(
    root: &Path,
    entries: impl IntoIterator<Item = io::Result<PathBuf>>,
    sink: &dyn EventSink,
) -> ShardListing {
    let mut listing = ShardListing::default();
    for entry in entries {
        match entry {
            Ok(path) => listing.shards.push(path),
            Err(err) => {
                listing.unreadable += 1;
                sink.emit(SweepEvent::ShardFailed {
                    path: root.to_path_buf(),
                    error: err.to_string(),
                });
            }
        }
    }
    listing
}

fn duration_ms(d: Duration) -> u64 {
    u64::try_from(d.as_millis()).unwrap_or(u64::MAX)
}
