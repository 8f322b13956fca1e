//! App - アプリケーション層
//!
//! ports と engine の部品（scan / rank / select / delete）を組み合わせて 1 回の run を実行する。
//!
//! # 主要コンポーネント
//! - **SweepConfig**: 起動時設定（root + 環境変数）
//! - **Sweeper / SweeperBuilder**: run 本体と port の差し替え
//! - **SweepReport**: run の結果

pub mod config;
pub mod report;
pub mod runner;

pub use self::config::SweepConfig;
pub use self::report::SweepReport;
pub use self::runner::{Sweeper, SweeperBuilder};
