//! Errors - 失敗の分類
//!
//! | 種類          | 扱い                                         |
//! |---------------|----------------------------------------------|
//! | ConfigError   | 起動時エラー。何もせず終了                   |
//! | ProbeError    | run 全体が失敗。削除は一切しない             |
//! | per-file/shard| scan 内で回復（ログして skip）。型は持たない |
//! | ScanError     | root 自体が読めない / worker が落ちた        |
//! | DeleteError   | 最初の失敗で削除フェーズを中断。rollback なし|

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Startup errors: bad arguments, missing directory, unparsable values.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("blob root does not exist: {0}")]
    RootMissing(PathBuf),

    #[error("blob root is not a directory: {0}")]
    RootNotDirectory(PathBuf),

    #[error("cannot access blob root {path}: {source}")]
    RootInaccessible {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid value for {key}: {value:?} ({reason})")]
    InvalidValue {
        key: &'static str,
        value: String,
        reason: String,
    },
}

/// The filesystem hosting the blob root could not be statted.
#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("statvfs failed for {path}: {source}")]
    Stat {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("filesystem at {0} reports zero total bytes")]
    EmptyFilesystem(PathBuf),

    #[error("statvfs task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

#[derive(Debug, Error)]
pub enum ScanError {
    #[error("failed to list blob root {path}: {source}")]
    ListRoot {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("scan worker terminated abnormally: {0}")]
    Worker(#[from] tokio::task::JoinError),
}

/// First removal failure. Files before it in rank order are already gone.
#[derive(Debug, Error)]
#[error("failed to remove {path} after deleting {deleted} file(s): {source}")]
pub struct DeleteError {
    pub path: PathBuf,
    pub deleted: usize,
    #[source]
    pub source: io::Error,
}

/// Anything that ends a run early.
#[derive(Debug, Error)]
pub enum SweepError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Probe(#[from] ProbeError),

    #[error(transparent)]
    Scan(#[from] ScanError),

    #[error(transparent)]
    Delete(#[from] DeleteError),

    #[error("background task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}
