//! ScanPool - shard を bounded worker pool で並列に walk する
//!
//! # 構成
//! - controller が bounded channel（容量 = worker 数）に shard path を流す
//!   - channel が詰まれば send が待つ（backpressure）
//! - worker は channel から 1 件ずつ取り、walk 本体は spawn_blocking で実行
//! - 結果は worker ごとに手元で貯め、最後に controller がまとめる（共有 lock なし）
//! - cancel なし: 兄弟 shard が失敗しても他は最後まで走る

use std::path::PathBuf;
use std::sync::Arc;

use tokio::sync::{Mutex, mpsc};
use tokio::task::JoinHandle;

use super::progress::ScanProgress;
use super::walker::{ShardScan, walk_shard};
use crate::domain::{FileRecord, ScanError, SweepEvent};
use crate::ports::EventSink;

/// Default worker count: one less than available parallelism, at least one.
pub fn default_workers() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(2)
        .saturating_sub(1)
        .max(1)
}

/// Everything one worker (or the whole pool) collected.
#[derive(Debug, Default)]
pub struct PoolOutput {
    pub records: Vec<FileRecord>,
    pub shards: usize,
    pub failed_shards: usize,
    pub skipped_files: usize,
}

impl PoolOutput {
    fn absorb(&mut self, scan: ShardScan) {
        self.shards += 1;
        self.skipped_files += scan.skipped;
        if scan.failed {
            self.failed_shards += 1;
        }
        self.records.extend(scan.records);
    }

    fn merge(&mut self, other: PoolOutput) {
        self.shards += other.shards;
        self.failed_shards += other.failed_shards;
        self.skipped_files += other.skipped_files;
        self.records.extend(other.records);
    }
}

/// Fixed-size worker pool over a fixed-size shard queue.
#[derive(Debug, Clone, Copy)]
pub struct ScanPool {
    workers: usize,
}

impl ScanPool {
    /// `workers` of zero is treated as one.
    pub fn new(workers: usize) -> Self {
        Self {
            workers: workers.max(1),
        }
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Scan every shard exactly once and return the combined records.
    pub async fn run(
        &self,
        shards: Vec<PathBuf>,
        progress: Arc<ScanProgress>,
        sink: Arc<dyn EventSink>,
    ) -> Result<PoolOutput, ScanError> {
        let (tx, rx) = mpsc::channel::<PathBuf>(self.workers);
        let rx = Arc::new(Mutex::new(rx));

        let mut joins: Vec<JoinHandle<PoolOutput>> = Vec::with_capacity(self.workers);
        for worker_id in 0..self.workers {
            let rx = Arc::clone(&rx);
            let progress = Arc::clone(&progress);
            let sink = Arc::clone(&sink);
            joins.push(tokio::spawn(async move {
                worker_loop(worker_id, rx, progress, sink).await
            }));
        }

        for shard in shards {
            // all receivers gone means every worker died; the joins below report it
            if tx.send(shard).await.is_err() {
                break;
            }
        }
        drop(tx);

        let mut out = PoolOutput::default();
        for join in joins {
            out.merge(join.await?);
        }
        Ok(out)
    }
}

async fn worker_loop(
    worker_id: usize,
    rx: Arc<Mutex<mpsc::Receiver<PathBuf>>>,
    progress: Arc<ScanProgress>,
    sink: Arc<dyn EventSink>,
) -> PoolOutput {
    let mut out = PoolOutput::default();
    loop {
        // lock は recv の間だけ。walk 中は持たない
        let next = { rx.lock().await.recv().await };
        let Some(shard) = next else {
            break;
        };

        let walk_progress = Arc::clone(&progress);
        let walk_sink = Arc::clone(&sink);
        let walk_path = shard.clone();
        let result = tokio::task::spawn_blocking(move || {
            walk_shard(&walk_path, &walk_progress, walk_sink.as_ref())
        })
        .await;

        match result {
            Ok(scan) => out.absorb(scan),
            Err(err) => {
                out.shards += 1;
                out.failed_shards += 1;
                sink.emit(SweepEvent::ShardFailed {
                    path: shard,
                    error: format!("[worker-{worker_id}] {err}"),
                });
            }
        }
    }
    out
}
