//! SweepReport - 1 回の run の結果（binary が JSON 1 行で出す）

use serde::Serialize;

use crate::delete::DeleteReport;
use crate::domain::{PlanSummary, UsageSnapshot};
use crate::scan::ScanStats;

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum SweepReport {
    /// 閾値以下。probe 以外は何もしていない
    BelowThreshold {
        threshold: f64,
        before: UsageSnapshot,
    },
    Evicted {
        threshold: f64,
        before: UsageSnapshot,
        after: UsageSnapshot,
        scan: ScanStats,
        plan: PlanSummary,
        delete: DeleteReport,
    },
}

impl SweepReport {
    pub fn deleted(&self) -> usize {
        match self {
            SweepReport::BelowThreshold { .. } => 0,
            SweepReport::Evicted { delete, .. } => delete.deleted,
        }
    }

    pub fn triggered(&self) -> bool {
        matches!(self, SweepReport::Evicted { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn below_threshold_serializes_with_outcome_tag() {
        let report = SweepReport::BelowThreshold {
            threshold: 0.9,
            before: UsageSnapshot::from_total_and_free(100, 50).unwrap(),
        };
        let v = serde_json::to_value(&report).unwrap();
        assert_eq!(v["outcome"], "below_threshold");
        assert_eq!(v["before"]["used_bytes"], 50);
        assert_eq!(report.deleted(), 0);
        assert!(!report.triggered());
    }
}
