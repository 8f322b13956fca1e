//! Usage snapshot: filesystem fill level at one point in time.

use serde::Serialize;

/// Fill level of the filesystem hosting the blob root.
///
/// Computed fresh on every probe; never cached across calls.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct UsageSnapshot {
    pub total_bytes: u64,
    pub used_bytes: u64,
    /// `used_bytes / total_bytes`, in `[0, 1]`.
    pub fill_ratio: f64,
}

impl UsageSnapshot {
    /// Build a snapshot from total/free byte counts.
    ///
    /// Returns `None` when `total_bytes` is zero (fill ratio undefined).
    pub fn from_total_and_free(total_bytes: u64, free_bytes: u64) -> Option<Self> {
        if total_bytes == 0 {
            return None;
        }
        let used_bytes = total_bytes.saturating_sub(free_bytes);
        Some(Self {
            total_bytes,
            used_bytes,
            fill_ratio: used_bytes as f64 / total_bytes as f64,
        })
    }

    pub fn percent(&self) -> f64 {
        self.fill_ratio * 100.0
    }

    /// Strictly greater: a fill ratio equal to the threshold does not trigger.
    pub fn exceeds(&self, threshold: f64) -> bool {
        self.fill_ratio > threshold
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn computes_used_and_ratio() {
        let s = UsageSnapshot::from_total_and_free(1000, 250).unwrap();
        assert_eq!(s.used_bytes, 750);
        assert!((s.fill_ratio - 0.75).abs() < f64::EPSILON);
        assert!((s.percent() - 75.0).abs() < 1e-9);
    }

    #[test]
    fn zero_total_is_rejected() {
        assert!(UsageSnapshot::from_total_and_free(0, 0).is_none());
    }

    #[test]
    fn free_larger_than_total_saturates() {
        let s = UsageSnapshot::from_total_and_free(100, 200).unwrap();
        assert_eq!(s.used_bytes, 0);
        assert_eq!(s.fill_ratio, 0.0);
    }

    #[rstest]
    #[case::below(500, false)]
    #[case::equal(100, false)]
    #[case::above(50, true)]
    fn exceeds_is_strict(#[case] free: u64, #[case] expected: bool) {
        // threshold 0.9 of 1000 bytes => 100 free is exactly at the threshold
        let s = UsageSnapshot::from_total_and_free(1000, free).unwrap();
        assert_eq!(s.exceeds(0.9), expected);
    }
}
