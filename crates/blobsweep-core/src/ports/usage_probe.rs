//! UsageProbe port - ディスク使用率の取得
//!
//! 本番は statvfs、テストでは固定値を返す実装に差し替える。

use std::path::Path;

use async_trait::async_trait;

use crate::domain::{ProbeError, UsageSnapshot};

/// UsageProbe は root を含む filesystem の使用率を返す
///
/// # 契約
/// - 呼び出しごとに測り直す（キャッシュしない）
/// - retry しない。失敗はそのまま返し、run を中断させる
#[async_trait]
pub trait UsageProbe: Send + Sync {
    async fn probe(&self, root: &Path) -> Result<UsageSnapshot, ProbeError>;
}
