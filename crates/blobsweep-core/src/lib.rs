//! blobsweep-core
//!
//! Disk-pressure-triggered eviction for a flat, sharded blob store.
//!
//! # モジュール構成
//! - **domain**: ドメインモデル（usage, record, plan, state, events, errors）
//! - **ports**: 抽象化レイヤー（UsageProbe, EventSink）
//! - **impls**: ports の実装（StatvfsProbe, TracingEventSink, テスト用実装）
//! - **scan**: shard 単位の並列 walk（ScanPool, walk_shard, 進捗）
//! - **rank** / **select** / **delete**: 並べ替え・削除数の決定・削除
//! - **app**: 設定と run 本体（SweepConfig, Sweeper, SweepReport）

pub mod app;
pub mod delete;
pub mod domain;
pub mod impls;
pub mod ports;
pub mod rank;
pub mod scan;
pub mod select;
pub mod units;

pub use app::{SweepConfig, SweepReport, Sweeper};
pub use domain::{SweepError, SweepEvent};
