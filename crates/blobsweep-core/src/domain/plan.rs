//! EvictionPlan: which ranked candidates a run will delete, and why.

use serde::Serialize;

use super::record::FileRecord;

/// What the selection policy aimed for.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EvictionTarget {
    /// Byte goal translated to a blob count via an assumed average blob size.
    Bytes {
        bytes_to_free: f64,
        avg_blob_bytes: f64,
    },
    /// Fixed ceiling on the number of blobs, independent of usage.
    Count { max_blobs: usize },
}

impl EvictionTarget {
    /// Number of blobs this target asks for, before bounding by candidates.
    pub fn requested_blobs(&self) -> usize {
        match *self {
            EvictionTarget::Bytes {
                bytes_to_free,
                avg_blob_bytes,
            } => {
                if avg_blob_bytes <= 0.0 || !bytes_to_free.is_finite() || bytes_to_free <= 0.0 {
                    return 0;
                }
                // `as` saturates for floats beyond usize::MAX
                (bytes_to_free / avg_blob_bytes).floor() as usize
            }
            EvictionTarget::Count { max_blobs } => max_blobs,
        }
    }
}

/// A deletion set: a prefix of the ranked candidate sequence.
#[derive(Debug, Clone)]
pub struct EvictionPlan {
    pub policy: &'static str,
    pub target: EvictionTarget,
    pub candidate_count: usize,
    pub selected: Vec<FileRecord>,
}

impl EvictionPlan {
    /// Keep the first `target.requested_blobs()` of `ranked`, never more than exist.
    pub fn from_ranked(policy: &'static str, target: EvictionTarget, mut ranked: Vec<FileRecord>) -> Self {
        let candidate_count = ranked.len();
        ranked.truncate(target.requested_blobs().min(candidate_count));
        Self {
            policy,
            target,
            candidate_count,
            selected: ranked,
        }
    }

    pub fn len(&self) -> usize {
        self.selected.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    pub fn summary(&self) -> PlanSummary {
        PlanSummary {
            policy: self.policy,
            target: self.target,
            candidate_count: self.candidate_count,
            selected: self.selected.len(),
            selected_bytes: self.selected.iter().map(FileRecord::size_bytes).sum(),
        }
    }
}

/// Serializable view of a plan without the file list.
#[derive(Debug, Clone, Serialize)]
pub struct PlanSummary {
    pub policy: &'static str,
    pub target: EvictionTarget,
    pub candidate_count: usize,
    pub selected: usize,
    pub selected_bytes: u64,
}
