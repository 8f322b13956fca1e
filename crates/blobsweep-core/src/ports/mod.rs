//! Ports - 抽象化レイヤー
//!
//! engine が外部（filesystem の統計、ログ出力先）に依存する部分を trait で切り出す。
//! 実装は `impls` に置く。

pub mod event_sink;
pub mod usage_probe;

pub use self::event_sink::EventSink;
pub use self::usage_probe::UsageProbe;
