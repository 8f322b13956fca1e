//! FixedUsageProbe - 決まった usage を返す UsageProbe（テスト・dry run 用）

use std::collections::VecDeque;
use std::path::Path;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::domain::{ProbeError, UsageSnapshot};
use crate::ports::UsageProbe;

/// 登録した snapshot を順に返す。最後の 1 つは何度でも返す。
#[derive(Debug)]
pub struct FixedUsageProbe {
    snapshots: Mutex<VecDeque<UsageSnapshot>>,
}

impl FixedUsageProbe {
    pub fn new(usage: UsageSnapshot) -> Self {
        Self::sequence(vec![usage])
    }

    /// 空の場合、probe は常に ProbeError を返す
    pub fn sequence(snapshots: Vec<UsageSnapshot>) -> Self {
        Self {
            snapshots: Mutex::new(snapshots.into()),
        }
    }

    /// total/used から組み立てる近道。total が 0 なら probe は失敗する。
    pub fn with_bytes(total_bytes: u64, used_bytes: u64) -> Self {
        let free_bytes = total_bytes.saturating_sub(used_bytes);
        Self::sequence(
            UsageSnapshot::from_total_and_free(total_bytes, free_bytes)
                .into_iter()
                .collect(),
        )
    }
}

#[async_trait]
impl UsageProbe for FixedUsageProbe {
    async fn probe(&self, root: &Path) -> Result<UsageSnapshot, ProbeError> {
        let mut q = self.snapshots.lock().unwrap_or_else(|p| p.into_inner());
        let usage = if q.len() > 1 { q.pop_front() } else { q.front().copied() };
        usage.ok_or_else(|| ProbeError::EmptyFilesystem(root.to_path_buf()))
    }
}
