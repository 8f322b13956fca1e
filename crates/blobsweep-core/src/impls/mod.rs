//! Impls - ports の実装
//!
//! # 含まれる実装
//! - **StatvfsProbe**: 本番用の UsageProbe
//! - **FixedUsageProbe**: 固定値を返す UsageProbe（テスト用）
//! - **TracingEventSink**: 本番用の EventSink
//! - **RecordingEventSink**: イベントを貯める EventSink（テスト用）

pub mod fixed_probe;
pub mod recording_sink;
pub mod statvfs_probe;
pub mod tracing_sink;

pub use self::fixed_probe::FixedUsageProbe;
pub use self::recording_sink::RecordingEventSink;
pub use self::statvfs_probe::StatvfsProbe;
pub use self::tracing_sink::TracingEventSink;
