//! Eviction selection: how many of the oldest candidates to delete.
//!
//! Two policies share one trait:
//! - [`ReclaimFractionPolicy`]: a byte goal derived from measured usage,
//!   converted to a blob count with an assumed average blob size.
//! - [`FixedCountPolicy`]: always the oldest N, whatever the usage.
//!
//! Both decide once, up front, from the snapshot taken before the scan.

use crate::domain::{EvictionPlan, EvictionTarget, FileRecord, UsageSnapshot};
use crate::units::megabytes_to_bytes;

/// SelectionPolicy は usage から削除目標を決める
///
/// Pure: no I/O and no re-check of usage while deleting.
pub trait SelectionPolicy: Send + Sync {
    fn name(&self) -> &'static str;

    fn target(&self, usage: &UsageSnapshot) -> EvictionTarget;

    /// Take the ranked prefix the target asks for, bounded by `ranked.len()`.
    fn select(&self, usage: &UsageSnapshot, ranked: Vec<FileRecord>) -> EvictionPlan {
        EvictionPlan::from_ranked(self.name(), self.target(usage), ranked)
    }
}

/// Reclaim a fraction of the currently used bytes.
///
/// bytes_to_free = used_bytes × fraction; blobs = ⌊bytes_to_free / avg_blob_bytes⌋.
/// Blob sizes are not measured for this estimate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReclaimFractionPolicy {
    pub fraction: f64,
    pub avg_blob_mb: f64,
}

impl ReclaimFractionPolicy {
    pub const DEFAULT_FRACTION: f64 = 0.1;
    pub const DEFAULT_AVG_BLOB_MB: f64 = 2.0;

    pub fn new(fraction: f64, avg_blob_mb: f64) -> Self {
        Self {
            fraction,
            avg_blob_mb,
        }
    }

    pub fn bytes_to_free(&self, usage: &UsageSnapshot) -> f64 {
        usage.used_bytes as f64 * self.fraction
    }

    pub fn avg_blob_bytes(&self) -> f64 {
        megabytes_to_bytes(self.avg_blob_mb)
    }
}

impl Default for ReclaimFractionPolicy {
    fn default() -> Self {
        Self::new(Self::DEFAULT_FRACTION, Self::DEFAULT_AVG_BLOB_MB)
    }
}

impl SelectionPolicy for ReclaimFractionPolicy {
    fn name(&self) -> &'static str {
        "reclaim"
    }

    fn target(&self, usage: &UsageSnapshot) -> EvictionTarget {
        EvictionTarget::Bytes {
            bytes_to_free: self.bytes_to_free(usage),
            avg_blob_bytes: self.avg_blob_bytes(),
        }
    }
}

/// Delete the oldest `max_blobs` files.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedCountPolicy {
    pub max_blobs: usize,
}

impl FixedCountPolicy {
    pub const DEFAULT_MAX_BLOBS: usize = 5000;

    pub fn new(max_blobs: usize) -> Self {
        Self { max_blobs }
    }
}

impl Default for FixedCountPolicy {
    fn default() -> Self {
        Self::new(Self::DEFAULT_MAX_BLOBS)
    }
}

impl SelectionPolicy for FixedCountPolicy {
    fn name(&self) -> &'static str {
        "fixed"
    }

    fn target(&self, _usage: &UsageSnapshot) -> EvictionTarget {
        EvictionTarget::Count {
            max_blobs: self.max_blobs,
        }
    }
}

/// Configured policy choice.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PolicyConfig {
    Reclaim(ReclaimFractionPolicy),
    Fixed(FixedCountPolicy),
}

impl PolicyConfig {
    pub fn into_policy(self) -> Box<dyn SelectionPolicy> {
        match self {
            PolicyConfig::Reclaim(p) => Box::new(p),
            PolicyConfig::Fixed(p) => Box::new(p),
        }
    }
}

impl Default for PolicyConfig {
    fn default() -> Self {
        PolicyConfig::Reclaim(ReclaimFractionPolicy::default())
    }
}
