//! EventSink port - 進捗・診断イベントの出口
//!
//! 本番: TracingEventSink（tracing に流す）
//! テスト: RecordingEventSink（Vec に貯める）

use crate::domain::SweepEvent;

/// EventSink は SweepEvent を受け取る
///
/// scan worker（blocking thread）からも呼ばれるので `Send + Sync` 必須。
/// emit は失敗しない。出力できなければ捨ててよい。
pub trait EventSink: Send + Sync {
    fn emit(&self, event: SweepEvent);
}
