//! StatvfsProbe - statvfs による UsageProbe 実装

use std::path::Path;

use async_trait::async_trait;

use crate::domain::{ProbeError, UsageSnapshot};
use crate::ports::UsageProbe;

/// used = total - free（どちらも block 数 × block size）
///
/// `free` は root 用の予約領域を含む値（f_bfree）。
/// statvfs はブロックし得るので blocking pool で呼ぶ。
#[derive(Debug, Clone, Copy, Default)]
pub struct StatvfsProbe;

impl StatvfsProbe {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl UsageProbe for StatvfsProbe {
    async fn probe(&self, root: &Path) -> Result<UsageSnapshot, ProbeError> {
        let path = root.to_path_buf();
        let stats = tokio::task::spawn_blocking(move || fs4::statvfs(&path))
            .await?
            .map_err(|source| ProbeError::Stat {
                path: root.to_path_buf(),
                source,
            })?;
        UsageSnapshot::from_total_and_free(stats.total_space(), stats.free_space())
            .ok_or_else(|| ProbeError::EmptyFilesystem(root.to_path_buf()))
    }
}
