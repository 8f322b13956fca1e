//! End-to-end runs against a temp blob root with a fixed usage probe.

use std::fs::{self, File, FileTimes};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use blobsweep_core::delete::MissingFilePolicy;
use blobsweep_core::domain::SweepError;
use blobsweep_core::impls::{FixedUsageProbe, RecordingEventSink};
use blobsweep_core::ports::EventSink;
use blobsweep_core::select::{FixedCountPolicy, PolicyConfig, ReclaimFractionPolicy};
use blobsweep_core::units::BYTES_PER_MEGABYTE;
use blobsweep_core::{SweepConfig, SweepEvent, SweepReport, Sweeper};
use rstest::rstest;

const MB: u64 = BYTES_PER_MEGABYTE as u64;

fn at(secs: u64) -> SystemTime {
    UNIX_EPOCH + Duration::from_secs(secs)
}

/// Write a blob and pin its access time.
fn blob(root: &Path, shard: &str, name: &str, accessed: SystemTime) -> PathBuf {
    let dir = root.join(shard);
    fs::create_dir_all(&dir).unwrap();
    let path = dir.join(name);
    fs::write(&path, b"blob-bytes").unwrap();
    File::options()
        .write(true)
        .open(&path)
        .unwrap()
        .set_times(FileTimes::new().set_accessed(accessed))
        .unwrap();
    path
}

fn config(root: &Path, threshold: f64, policy: PolicyConfig) -> SweepConfig {
    let mut config = SweepConfig::new(root).unwrap();
    config.threshold = threshold;
    config.policy = policy;
    config.scan_workers = 2;
    config
}

#[tokio::test]
async fn scenario_a_oldest_blob_is_evicted() {
    let dir = tempfile::tempdir().unwrap();
    let t1 = blob(dir.path(), "00", "0001", at(1));
    let t2 = blob(dir.path(), "01", "0102", at(2));
    let t3 = blob(dir.path(), "02", "0203", at(3));

    // 10% of 20 MB used = 2 MB = one 2 MB blob
    let probe = FixedUsageProbe::with_bytes(21 * MB, 20 * MB);
    let sweeper = Sweeper::builder(config(
        dir.path(),
        0.9,
        PolicyConfig::Reclaim(ReclaimFractionPolicy::default()),
    ))
    .probe(Arc::new(probe))
    .sink(Arc::new(RecordingEventSink::new()))
    .build();

    let report = sweeper.run().await.unwrap();

    assert_eq!(report.deleted(), 1);
    assert!(!t1.exists());
    assert!(t2.exists());
    assert!(t3.exists());
    match report {
        SweepReport::Evicted { scan, plan, .. } => {
            assert_eq!(scan.files, 3);
            assert_eq!(plan.candidate_count, 3);
            assert_eq!(plan.selected, 1);
        }
        other => panic!("expected eviction, got {other:?}"),
    }
}

#[tokio::test]
async fn scenario_b_below_threshold_changes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let blobs: Vec<_> = (0..4)
        .map(|i| blob(dir.path(), &format!("{i:02}"), "blob", at(i)))
        .collect();

    let sink = Arc::new(RecordingEventSink::new());
    let sweeper = Sweeper::builder(config(
        dir.path(),
        0.9,
        PolicyConfig::Fixed(FixedCountPolicy::new(100)),
    ))
    .probe(Arc::new(FixedUsageProbe::with_bytes(100, 50)))
    .sink(sink.clone())
    .build();

    let report = sweeper.run().await.unwrap();

    assert!(!report.triggered());
    assert!(blobs.iter().all(|p| p.exists()));
    assert_eq!(sink.count(|e| matches!(e, SweepEvent::CleanupTriggered { .. })), 0);
    assert_eq!(sink.count(|e| matches!(e, SweepEvent::ScanProgress { .. })), 0);
}

/// Removes `victim` as soon as the plan is known, like another process would.
struct RacingSink {
    victim: PathBuf,
    inner: RecordingEventSink,
}

impl EventSink for RacingSink {
    fn emit(&self, event: SweepEvent) {
        if matches!(event, SweepEvent::PlanComputed { .. }) {
            let _ = fs::remove_file(&self.victim);
        }
        self.inner.emit(event);
    }
}

#[rstest]
#[case::fail(MissingFilePolicy::Fail)]
#[case::skip(MissingFilePolicy::Skip)]
#[tokio::test]
async fn scenario_c_file_vanishes_before_delete(#[case] missing: MissingFilePolicy) {
    let dir = tempfile::tempdir().unwrap();
    let oldest = blob(dir.path(), "aa", "aa01", at(10));
    let middle = blob(dir.path(), "bb", "bb01", at(20));
    let newest = blob(dir.path(), "cc", "cc01", at(30));

    let mut cfg = config(dir.path(), 0.5, PolicyConfig::Fixed(FixedCountPolicy::new(2)));
    cfg.missing_files = missing;
    let sink = Arc::new(RacingSink {
        victim: oldest.clone(),
        inner: RecordingEventSink::new(),
    });
    let sweeper = Sweeper::builder(cfg)
        .probe(Arc::new(FixedUsageProbe::with_bytes(100, 99)))
        .sink(sink.clone())
        .build();

    let result = sweeper.run().await;

    match missing {
        MissingFilePolicy::Fail => {
            let err = result.unwrap_err();
            match err {
                SweepError::Delete(e) => {
                    assert_eq!(e.path.file_name(), oldest.file_name());
                    assert_eq!(e.deleted, 0);
                }
                other => panic!("expected delete error, got {other:?}"),
            }
            // nothing after the failing path is touched
            assert!(middle.exists());
        }
        MissingFilePolicy::Skip => {
            let report = result.unwrap();
            assert_eq!(report.deleted(), 1);
            assert!(!middle.exists());
        }
    }
    assert!(newest.exists());
}

#[rstest]
#[case::one_worker(1)]
#[case::many_workers(8)]
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn every_blob_is_scanned_once_regardless_of_workers(#[case] workers: usize) {
    let dir = tempfile::tempdir().unwrap();
    let mut expected = 0;
    for shard in 0..16u64 {
        for i in 0..5u64 {
            let shard_dir = format!("{shard:02x}/sub{}", i % 2);
            blob(dir.path(), &shard_dir, &i.to_string(), at(shard * 10 + i));
            expected += 1;
        }
    }

    let mut cfg = config(dir.path(), 0.0, PolicyConfig::Fixed(FixedCountPolicy::new(0)));
    cfg.scan_workers = workers;
    let sweeper = Sweeper::builder(cfg)
        .probe(Arc::new(FixedUsageProbe::with_bytes(100, 1)))
        .sink(Arc::new(RecordingEventSink::new()))
        .build();

    match sweeper.run().await.unwrap() {
        SweepReport::Evicted { scan, delete, .. } => {
            assert_eq!(scan.files, expected);
            assert_eq!(scan.shards, 16);
            assert_eq!(scan.failed_shards, 0);
            assert_eq!(delete.deleted, 0);
        }
        other => panic!("expected a scan, got {other:?}"),
    }
}

#[tokio::test]
async fn deletes_in_access_order_across_shards() {
    let dir = tempfile::tempdir().unwrap();
    let a = blob(dir.path(), "zz", "late", at(500));
    let b = blob(dir.path(), "aa", "early", at(100));
    let c = blob(dir.path(), "mm", "mid", at(300));
    let d = blob(dir.path(), "aa", "earliest", at(50));

    let sweeper = Sweeper::builder(config(
        dir.path(),
        0.9,
        PolicyConfig::Fixed(FixedCountPolicy::new(2)),
    ))
    .probe(Arc::new(FixedUsageProbe::with_bytes(100, 95)))
    .sink(Arc::new(RecordingEventSink::new()))
    .build();

    sweeper.run().await.unwrap();

    assert!(!d.exists());
    assert!(!b.exists());
    assert!(c.exists());
    assert!(a.exists());
}
