//! Candidate ranking: oldest access first.

use crate::domain::FileRecord;

/// Sort `records` ascending by last access time.
///
/// Stable: records with equal access times keep their input order, so ranking
/// an already-ranked sequence is a no-op.
pub fn rank_oldest_first(mut records: Vec<FileRecord>) -> Vec<FileRecord> {
    records.sort_by_key(FileRecord::last_access);
    records
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn rec(name: &str, secs: i64) -> FileRecord {
        FileRecord::new(format!("/b/{name}"), Utc.timestamp_opt(secs, 0).unwrap(), 1)
    }

    fn names(records: &[FileRecord]) -> Vec<String> {
        records
            .iter()
            .map(|r| r.path().to_string_lossy().into_owned())
            .collect()
    }

    #[test]
    fn orders_by_access_time() {
        let ranked = rank_oldest_first(vec![rec("c", 30), rec("a", 10), rec("b", 20)]);
        assert_eq!(names(&ranked), vec!["/b/a", "/b/b", "/b/c"]);
    }

    #[test]
    fn ties_keep_input_order() {
        let ranked = rank_oldest_first(vec![rec("x", 5), rec("y", 1), rec("z", 5), rec("w", 5)]);
        assert_eq!(names(&ranked), vec!["/b/y", "/b/x", "/b/z", "/b/w"]);
    }

    #[test]
    fn is_idempotent() {
        let once = rank_oldest_first(vec![rec("a", 3), rec("b", 1), rec("c", 3), rec("d", 2)]);
        let twice = rank_oldest_first(once.clone());
        assert_eq!(once, twice);
    }

    #[test]
    fn every_permutation_ends_non_decreasing() {
        let base = [rec("a", 4), rec("b", 1), rec("c", 3), rec("d", 1)];
        // all rotations and their reverses
        for shift in 0..base.len() {
            let mut input: Vec<_> = base.to_vec();
            input.rotate_left(shift);
            for candidate in [input.clone(), input.into_iter().rev().collect()] {
                let ranked = rank_oldest_first(candidate);
                assert!(ranked.windows(2).all(|w| w[0].last_access() <= w[1].last_access()));
            }
        }
    }

    #[test]
    fn empty_input() {
        assert!(rank_oldest_first(Vec::new()).is_empty());
    }
}
