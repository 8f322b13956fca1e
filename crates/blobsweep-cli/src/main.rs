use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use blobsweep_core::{SweepConfig, Sweeper};

/// Evict the least recently accessed blobs when the disk holding them is too full.
///
/// The fill-ratio threshold comes from `DISK_THRESHOLD` (default 0.90).
#[derive(Parser, Debug)]
#[command(name = "blobsweep", version, about)]
struct Cli {
    /// Blob root directory; its immediate children are the shard directories.
    blobs_dir: PathBuf,
}

#[tokio::main]
async fn main() -> ExitCode {
    // (A) 引数: positional 1 つだけ。過不足は clap がエラーにして終了する
    let cli = Cli::parse();

    // (B) logging（RUST_LOG で上書き可）
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // (C) 設定: root の存在確認 + 環境変数。ここで失敗したら何もせず終了
    let config = match SweepConfig::from_env(&cli.blobs_dir) {
        Ok(config) => config,
        Err(err) => {
            error!(error = %err, "invalid configuration");
            return ExitCode::from(2);
        }
    };
    info!(
        root = %config.root.display(),
        threshold = config.threshold,
        workers = config.scan_workers,
        "starting sweep"
    );

    // (D) 1 回だけ run して終了
    let sweeper = Sweeper::builder(config).build();
    match sweeper.run().await {
        Ok(report) => {
            match serde_json::to_string(&report) {
                Ok(json) => info!(report = %json, "sweep finished"),
                Err(err) => error!(error = %err, "failed to encode report"),
            }
            ExitCode::SUCCESS
        }
        Err(err) => {
            error!(error = %err, "sweep failed");
            ExitCode::FAILURE
        }
    }
}
