//! State - 1 回の run の状態
//!
//! # 状態遷移
//! ```text
//! Idle -> Probing -> Idle                (閾値以下)
//!                 -> Scanning -> Ranking -> Selecting -> Deleting -> Reporting -> Idle
//! ```
//! run をまたいで保持する状態はない（毎回 cold start）。

use serde::Serialize;

/// SweepPhase は run の現在フェーズ
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SweepPhase {
    Idle,
    Probing,
    Scanning,
    Ranking,
    Selecting,
    Deleting,
    Reporting,
}

impl SweepPhase {
    /// 許可された遷移かどうか
    pub fn can_advance_to(self, next: SweepPhase) -> bool {
        use SweepPhase::*;
        matches!(
            (self, next),
            (Idle, Probing)
                | (Probing, Idle)
                | (Probing, Scanning)
                | (Scanning, Ranking)
                | (Ranking, Selecting)
                | (Selecting, Deleting)
                | (Deleting, Reporting)
                | (Reporting, Idle)
        )
    }
}

impl std::fmt::Display for SweepPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            SweepPhase::Idle => "idle",
            SweepPhase::Probing => "probing",
            SweepPhase::Scanning => "scanning",
            SweepPhase::Ranking => "ranking",
            SweepPhase::Selecting => "selecting",
            SweepPhase::Deleting => "deleting",
            SweepPhase::Reporting => "reporting",
        };
        f.write_str(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(SweepPhase::Idle, SweepPhase::Probing)]
    #[case(SweepPhase::Probing, SweepPhase::Idle)]
    #[case(SweepPhase::Selecting, SweepPhase::Deleting)]
    #[case(SweepPhase::Reporting, SweepPhase::Idle)]
    fn allowed_transitions(#[case] from: SweepPhase, #[case] to: SweepPhase) {
        assert!(from.can_advance_to(to));
    }

    #[rstest]
    #[case(SweepPhase::Idle, SweepPhase::Scanning)]
    #[case(SweepPhase::Scanning, SweepPhase::Deleting)]
    #[case(SweepPhase::Deleting, SweepPhase::Idle)]
    fn skipped_phases_are_rejected(#[case] from: SweepPhase, #[case] to: SweepPhase) {
        assert!(!from.can_advance_to(to));
    }
}
