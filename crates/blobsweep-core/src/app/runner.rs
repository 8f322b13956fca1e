//! Sweeper - probe → scan → rank → select → delete → re-probe
//!
//! # フロー
//! 1. UsageProbe で使用率を測る（失敗したら run 終了）
//! 2. 閾値以下なら何もせず終了
//! 3. TreeScanner で全 blob の atime を集める
//! 4. 古い順に並べ、SelectionPolicy で削除数を決める（usage は 1 の値を使う）
//! 5. 古い順に削除。最初の失敗で中断
//! 6. もう一度 probe して報告
//!
//! run をまたぐ状態は持たない。

use std::path::Path;
use std::sync::{Arc, Mutex};

use super::config::SweepConfig;
use super::report::SweepReport;
use crate::delete::delete_in_order;
use crate::domain::{
    EvictionTarget, SweepError, SweepEvent, SweepPhase, UsageSnapshot, UsageStage,
};
use crate::impls::{StatvfsProbe, TracingEventSink};
use crate::ports::{EventSink, UsageProbe};
use crate::rank::rank_oldest_first;
use crate::scan::TreeScanner;
use crate::select::SelectionPolicy;
use crate::units::bytes_to_megabytes;

/// Sweeper は 1 回分の eviction を実行する
pub struct Sweeper {
    config: SweepConfig,
    probe: Arc<dyn UsageProbe>,
    sink: Arc<dyn EventSink>,
    policy: Box<dyn SelectionPolicy>,
    scanner: TreeScanner,
    phase: Mutex<SweepPhase>,
}

/// SweeperBuilder は port の差し替え口
///
/// 未指定なら StatvfsProbe / TracingEventSink を使う。
pub struct SweeperBuilder {
    config: SweepConfig,
    probe: Option<Arc<dyn UsageProbe>>,
    sink: Option<Arc<dyn EventSink>>,
}

impl SweeperBuilder {
    pub fn probe(mut self, probe: Arc<dyn UsageProbe>) -> Self {
        self.probe = Some(probe);
        self
    }

    pub fn sink(mut self, sink: Arc<dyn EventSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    pub fn build(self) -> Sweeper {
        let scanner = TreeScanner::new(self.config.scan_workers, self.config.progress_every);
        Sweeper {
            policy: self.config.policy.into_policy(),
            scanner,
            probe: self.probe.unwrap_or_else(|| Arc::new(StatvfsProbe::new())),
            sink: self.sink.unwrap_or_else(|| Arc::new(TracingEventSink::new())),
            config: self.config,
            phase: Mutex::new(SweepPhase::Idle),
        }
    }
}

impl Sweeper {
    pub fn builder(config: SweepConfig) -> SweeperBuilder {
        SweeperBuilder {
            config,
            probe: None,
            sink: None,
        }
    }

    pub fn config(&self) -> &SweepConfig {
        &self.config
    }

    pub fn phase(&self) -> SweepPhase {
        *self.phase.lock().unwrap_or_else(|p| p.into_inner())
    }

    /// Run one cold eviction pass.
    pub async fn run(&self) -> Result<SweepReport, SweepError> {
        // a previous run that failed mid-way leaves its phase behind
        self.reset_phase();

        let root = self.config.root.as_path();
        let threshold = self.config.threshold;

        self.advance(SweepPhase::Probing);
        let before = self.measure(root, UsageStage::Before).await?;

        if !before.exceeds(threshold) {
            self.sink.emit(SweepEvent::BelowThreshold {
                fill_ratio: before.fill_ratio,
                threshold,
            });
            self.advance(SweepPhase::Idle);
            return Ok(SweepReport::BelowThreshold { threshold, before });
        }
        self.sink.emit(SweepEvent::CleanupTriggered {
            fill_ratio: before.fill_ratio,
            threshold,
        });

        self.advance(SweepPhase::Scanning);
        let scan = self
            .scanner
            .scan(root, before.used_bytes, Arc::clone(&self.sink))
            .await?;

        self.advance(SweepPhase::Ranking);
        let ranked = rank_oldest_first(scan.records);

        self.advance(SweepPhase::Selecting);
        let plan = self.policy.select(&before, ranked);
        let plan_summary = plan.summary();
        self.sink.emit(SweepEvent::PlanComputed {
            policy: plan.policy,
            target_mb: match plan.target {
                EvictionTarget::Bytes { bytes_to_free, .. } => {
                    Some(bytes_to_megabytes(bytes_to_free))
                }
                EvictionTarget::Count { .. } => None,
            },
            blobs: plan.len(),
            candidates: plan.candidate_count,
        });

        self.advance(SweepPhase::Deleting);
        let missing = self.config.missing_files;
        let sink = Arc::clone(&self.sink);
        let delete = tokio::task::spawn_blocking(move || {
            delete_in_order(&plan.selected, missing, sink.as_ref())
        })
        .await??;

        self.advance(SweepPhase::Reporting);
        let after = self.measure(root, UsageStage::After).await?;
        self.sink.emit(SweepEvent::CleanupFinished {
            deleted: delete.deleted,
        });
        self.advance(SweepPhase::Idle);

        Ok(SweepReport::Evicted {
            threshold,
            before,
            after,
            scan: scan.stats,
            plan: plan_summary,
            delete,
        })
    }

    async fn measure(&self, root: &Path, stage: UsageStage) -> Result<UsageSnapshot, SweepError> {
        let usage = self.probe.probe(root).await?;
        self.sink.emit(SweepEvent::UsageMeasured { stage, usage });
        Ok(usage)
    }

    fn advance(&self, next: SweepPhase) {
        let mut phase = self.phase.lock().unwrap_or_else(|p| p.into_inner());
        debug_assert!(phase.can_advance_to(next), "illegal transition {} -> {next}", *phase);
        let from = *phase;
        *phase = next;
        drop(phase);
        self.sink.emit(SweepEvent::PhaseChanged { from, to: next });
    }

    fn reset_phase(&self) {
        *self.phase.lock().unwrap_or_else(|p| p.into_inner()) = SweepPhase::Idle;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ProbeError;
    use crate::impls::{FixedUsageProbe, RecordingEventSink};
    use crate::select::{FixedCountPolicy, PolicyConfig};
    use async_trait::async_trait;
    use std::fs;

    struct FailingProbe;

    #[async_trait]
    impl UsageProbe for FailingProbe {
        async fn probe(&self, root: &Path) -> Result<UsageSnapshot, ProbeError> {
            Err(ProbeError::EmptyFilesystem(root.to_path_buf()))
        }
    }

    fn blob_root() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        for shard in ["aa", "bb"] {
            fs::create_dir(dir.path().join(shard)).unwrap();
            fs::write(dir.path().join(shard).join(format!("{shard}01")), b"blob").unwrap();
        }
        dir
    }

    fn config(dir: &tempfile::TempDir, policy: PolicyConfig) -> SweepConfig {
        let mut config = SweepConfig::new(dir.path()).unwrap();
        config.policy = policy;
        config.scan_workers = 2;
        config
    }

    #[tokio::test]
    async fn below_threshold_stops_after_probe() {
        let dir = blob_root();
        let sink = Arc::new(RecordingEventSink::new());
        let sweeper = Sweeper::builder(config(&dir, PolicyConfig::Fixed(FixedCountPolicy::new(10))))
            .probe(Arc::new(FixedUsageProbe::with_bytes(100, 50)))
            .sink(sink.clone())
            .build();

        let report = sweeper.run().await.unwrap();

        assert!(!report.triggered());
        assert_eq!(sink.count(|e| matches!(e, SweepEvent::ScanCompleted { .. })), 0);
        assert!(dir.path().join("aa").join("aa01").exists());
        assert_eq!(sweeper.phase(), SweepPhase::Idle);
    }

    #[tokio::test]
    async fn over_threshold_runs_every_phase() {
        let dir = blob_root();
        let sink = Arc::new(RecordingEventSink::new());
        let sweeper = Sweeper::builder(config(&dir, PolicyConfig::Fixed(FixedCountPolicy::new(10))))
            .probe(Arc::new(FixedUsageProbe::with_bytes(100, 95)))
            .sink(sink.clone())
            .build();

        let report = sweeper.run().await.unwrap();

        assert_eq!(report.deleted(), 2);
        let phases: Vec<SweepPhase> = sink
            .events()
            .into_iter()
            .filter_map(|e| match e {
                SweepEvent::PhaseChanged { to, .. } => Some(to),
                _ => None,
            })
            .collect();
        assert_eq!(
            phases,
            vec![
                SweepPhase::Probing,
                SweepPhase::Scanning,
                SweepPhase::Ranking,
                SweepPhase::Selecting,
                SweepPhase::Deleting,
                SweepPhase::Reporting,
                SweepPhase::Idle,
            ]
        );
        assert_eq!(
            sink.count(|e| matches!(e, SweepEvent::UsageMeasured { stage: UsageStage::After, .. })),
            1
        );
        assert_eq!(sink.count(|e| matches!(e, SweepEvent::CleanupTriggered { .. })), 1);
    }

    #[tokio::test]
    async fn probe_failure_aborts_without_deleting() {
        let dir = blob_root();
        let sweeper = Sweeper::builder(config(&dir, PolicyConfig::Fixed(FixedCountPolicy::new(10))))
            .probe(Arc::new(FailingProbe))
            .sink(Arc::new(RecordingEventSink::new()))
            .build();

        let err = sweeper.run().await.unwrap_err();

        assert!(matches!(err, SweepError::Probe(_)));
        assert!(dir.path().join("aa").join("aa01").exists());
        assert!(dir.path().join("bb").join("bb01").exists());
    }
}
