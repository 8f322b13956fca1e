//! Scan progress counters and throughput/ETA estimation.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use crate::domain::SweepEvent;

/// Shared across all scan workers. Counters are atomics; reads for display are
/// unsynchronized and only need to be roughly current.
#[derive(Debug)]
pub struct ScanProgress {
    files: AtomicU64,
    bytes: AtomicU64,
    every: u64,
    expected_bytes: u64,
    started: Instant,
}

impl ScanProgress {
    /// `expected_bytes` is the total the ETA projects against (the pre-scan
    /// used-bytes figure). `every` of zero is treated as one.
    pub fn new(every: u64, expected_bytes: u64) -> Self {
        Self {
            files: AtomicU64::new(0),
            bytes: AtomicU64::new(0),
            every: every.max(1),
            expected_bytes,
            started: Instant::now(),
        }
    }

    /// Count one file. Returns a progress event on every `every`-th file.
    pub fn record(&self, size_bytes: u64) -> Option<SweepEvent> {
        let bytes = self.bytes.fetch_add(size_bytes, Ordering::Relaxed) + size_bytes;
        let files = self.files.fetch_add(1, Ordering::Relaxed) + 1;
        if files % self.every != 0 {
            return None;
        }
        let elapsed = self.started.elapsed();
        let bytes_per_sec = throughput(bytes, elapsed);
        Some(SweepEvent::ScanProgress {
            files,
            bytes,
            bytes_per_sec,
            eta: estimate_eta(bytes, self.expected_bytes, bytes_per_sec),
        })
    }

    pub fn files(&self) -> u64 {
        self.files.load(Ordering::Relaxed)
    }

    pub fn bytes(&self) -> u64 {
        self.bytes.load(Ordering::Relaxed)
    }

    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }
}

/// Measured bytes per second; zero when no time has passed.
pub fn throughput(bytes: u64, elapsed: Duration) -> f64 {
    let secs = elapsed.as_secs_f64();
    if secs <= 0.0 {
        return 0.0;
    }
    bytes as f64 / secs
}

/// Time left to cover `expected - done` at `bytes_per_sec`.
///
/// `None` while throughput is unknown or the estimate does not fit a
/// `Duration`. Once `done` passes `expected` the estimate is zero.
pub fn estimate_eta(done: u64, expected: u64, bytes_per_sec: f64) -> Option<Duration> {
    if !bytes_per_sec.is_finite() || bytes_per_sec <= 0.0 {
        return None;
    }
    let remaining = expected.saturating_sub(done) as f64;
    Duration::try_from_secs_f64(remaining / bytes_per_sec).ok()
}
