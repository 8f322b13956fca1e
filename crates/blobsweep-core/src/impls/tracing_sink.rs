//! TracingEventSink - SweepEvent を tracing のイベントに変換する
//!
//! subscriber（整形・出力先）の設定は binary 側の責務。

use tracing::{debug, error, info, warn};

use crate::domain::{SweepEvent, UsageStage};
use crate::ports::EventSink;
use crate::units::{BYTES_PER_GIGABYTE, BYTES_PER_MEGABYTE};

#[derive(Debug, Clone, Copy, Default)]
pub struct TracingEventSink;

impl TracingEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for TracingEventSink {
    fn emit(&self, event: SweepEvent) {
        match event {
            SweepEvent::PhaseChanged { from, to } => debug!(%from, %to, "phase changed"),
            SweepEvent::UsageMeasured { stage, usage } => {
                let stage = match stage {
                    UsageStage::Before => "before",
                    UsageStage::After => "after",
                };
                info!(
                    stage,
                    used_bytes = usage.used_bytes,
                    total_bytes = usage.total_bytes,
                    "disk usage: {:.2}%",
                    usage.percent()
                );
            }
            SweepEvent::BelowThreshold {
                fill_ratio,
                threshold,
            } => info!(
                "usage {:.2}% is within {:.2}%, nothing to do",
                fill_ratio * 100.0,
                threshold * 100.0
            ),
            SweepEvent::CleanupTriggered { threshold, .. } => {
                info!("over {:.2}%, cleaning up", threshold * 100.0)
            }
            SweepEvent::ScanProgress {
                files,
                bytes,
                bytes_per_sec,
                eta,
            } => {
                info!("checked {files} blobs");
                let eta = eta
                    .map(|d| format!("{}s", d.as_secs()))
                    .unwrap_or_else(|| "unknown".to_string());
                info!(
                    "{:.2} GB checked (speed: {:.2} MB/s) ETA: {eta}",
                    bytes as f64 / BYTES_PER_GIGABYTE,
                    bytes_per_sec / BYTES_PER_MEGABYTE,
                );
            }
            SweepEvent::FileSkipped { path, error } => {
                warn!(path = %path.display(), %error, "skipping file: stat failed")
            }
            SweepEvent::ShardFailed { path, error } => {
                error!(path = %path.display(), %error, "shard walk failed")
            }
            SweepEvent::ScanCompleted {
                shards,
                files,
                elapsed,
            } => info!(shards, files, elapsed_ms = elapsed.as_millis() as u64, "scan complete"),
            SweepEvent::PlanComputed {
                policy,
                target_mb,
                blobs,
                candidates,
            } => match target_mb {
                Some(mb) => info!(policy, candidates, "space to free: {mb:.2} MB - {blobs} blobs"),
                None => info!(policy, candidates, "deleting oldest {blobs} blobs"),
            },
            SweepEvent::FileDeleted { path } => debug!(path = %path.display(), "deleted"),
            SweepEvent::AlreadyAbsent { path } => {
                warn!(path = %path.display(), "already gone, skipping")
            }
            SweepEvent::DeletionFailed {
                path,
                deleted,
                error,
            } => error!(path = %path.display(), deleted, %error, "delete failed, aborting"),
            SweepEvent::CleanupFinished { deleted } => info!(deleted, "Done cleaning up"),
        }
    }
}
