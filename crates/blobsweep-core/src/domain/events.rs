//! Events - run 中に発生する進捗・診断イベント
//!
//! core はイベントを EventSink に渡すだけで、整形や出力先は知らない。

use std::path::PathBuf;
use std::time::Duration;

use super::state::SweepPhase;
use super::usage::UsageSnapshot;

/// どの時点で測った usage か
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UsageStage {
    Before,
    After,
}

/// SweepEvent は run の進行を表す
#[derive(Debug, Clone, PartialEq)]
pub enum SweepEvent {
    PhaseChanged {
        from: SweepPhase,
        to: SweepPhase,
    },
    UsageMeasured {
        stage: UsageStage,
        usage: UsageSnapshot,
    },
    BelowThreshold {
        fill_ratio: f64,
        threshold: f64,
    },
    CleanupTriggered {
        fill_ratio: f64,
        threshold: f64,
    },
    ScanProgress {
        files: u64,
        bytes: u64,
        bytes_per_sec: f64,
        eta: Option<Duration>,
    },
    FileSkipped {
        path: PathBuf,
        error: String,
    },
    ShardFailed {
        path: PathBuf,
        error: String,
    },
    ScanCompleted {
        shards: usize,
        files: usize,
        elapsed: Duration,
    },
    PlanComputed {
        policy: &'static str,
        target_mb: Option<f64>,
        blobs: usize,
        candidates: usize,
    },
    FileDeleted {
        path: PathBuf,
    },
    /// MissingFilePolicy::Skip のときだけ発生
    AlreadyAbsent {
        path: PathBuf,
    },
    DeletionFailed {
        path: PathBuf,
        deleted: usize,
        error: String,
    },
    CleanupFinished {
        deleted: usize,
    },
}
