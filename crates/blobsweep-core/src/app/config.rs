//! SweepConfig - 起動時設定
//!
//! 入力は 2 つだけ:
//! - positional 引数の blob root（binary 側で parse）
//! - 環境変数（`DISK_THRESHOLD` ほか）
//!
//! 環境変数は lookup 関数経由で読むので、テストでは process env を触らない。
//! 空文字は「未設定」と同じ扱い。

use std::io;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::delete::MissingFilePolicy;
use crate::domain::ConfigError;
use crate::scan::default_workers;
use crate::select::{FixedCountPolicy, PolicyConfig, ReclaimFractionPolicy};

pub const ENV_THRESHOLD: &str = "DISK_THRESHOLD";
pub const ENV_POLICY: &str = "EVICTION_POLICY";
pub const ENV_RECLAIM_FRACTION: &str = "EVICTION_RECLAIM_FRACTION";
pub const ENV_AVG_BLOB_MB: &str = "EVICTION_AVG_BLOB_MB";
pub const ENV_FIXED_COUNT: &str = "EVICTION_FIXED_COUNT";
pub const ENV_TOLERATE_MISSING: &str = "EVICTION_TOLERATE_MISSING";
pub const ENV_SCAN_WORKERS: &str = "SCAN_WORKERS";
pub const ENV_PROGRESS_EVERY: &str = "SCAN_PROGRESS_EVERY";

#[derive(Debug, Clone, PartialEq)]
pub struct SweepConfig {
    /// Absolute path of an existing directory.
    pub root: PathBuf,
    /// Fill ratio in `[0, 1]` above which a cleanup runs.
    pub threshold: f64,
    pub policy: PolicyConfig,
    pub scan_workers: usize,
    pub progress_every: u64,
    pub missing_files: MissingFilePolicy,
}

impl SweepConfig {
    pub const DEFAULT_THRESHOLD: f64 = 0.90;
    pub const DEFAULT_PROGRESS_EVERY: u64 = 100;

    /// Defaults for everything except the root, which is validated.
    pub fn new(root: impl AsRef<Path>) -> Result<Self, ConfigError> {
        Ok(Self {
            root: validate_root(root.as_ref())?,
            threshold: Self::DEFAULT_THRESHOLD,
            policy: PolicyConfig::default(),
            scan_workers: default_workers(),
            progress_every: Self::DEFAULT_PROGRESS_EVERY,
            missing_files: MissingFilePolicy::default(),
        })
    }

    /// Read overrides from the process environment.
    pub fn from_env(root: impl AsRef<Path>) -> Result<Self, ConfigError> {
        Self::from_lookup(root, |key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(root: impl AsRef<Path>, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::new(root)?;
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(raw) = get(ENV_THRESHOLD) {
            config.threshold = parse_ranged(
                ENV_THRESHOLD,
                &raw,
                |v: f64| (0.0..=1.0).contains(&v),
                "must be within [0, 1]",
            )?;
        }

        if let Some(raw) = get(ENV_SCAN_WORKERS) {
            config.scan_workers =
                parse_ranged(ENV_SCAN_WORKERS, &raw, |v: usize| v >= 1, "must be at least 1")?;
        }

        if let Some(raw) = get(ENV_PROGRESS_EVERY) {
            config.progress_every =
                parse_ranged(ENV_PROGRESS_EVERY, &raw, |v: u64| v >= 1, "must be at least 1")?;
        }

        if let Some(raw) = get(ENV_TOLERATE_MISSING) {
            config.missing_files = if parse_bool(ENV_TOLERATE_MISSING, &raw)? {
                MissingFilePolicy::Skip
            } else {
                MissingFilePolicy::Fail
            };
        }

        let policy = get(ENV_POLICY).unwrap_or_else(|| "reclaim".to_string());
        config.policy = match policy.trim().to_ascii_lowercase().as_str() {
            "reclaim" => {
                reject_unused(&get, &[ENV_FIXED_COUNT], "fixed")?;
                let mut p = ReclaimFractionPolicy::default();
                if let Some(raw) = get(ENV_RECLAIM_FRACTION) {
                    p.fraction = parse_ranged(
                        ENV_RECLAIM_FRACTION,
                        &raw,
                        |v: f64| v > 0.0 && v <= 1.0,
                        "must be within (0, 1]",
                    )?;
                }
                if let Some(raw) = get(ENV_AVG_BLOB_MB) {
                    p.avg_blob_mb = parse_ranged(
                        ENV_AVG_BLOB_MB,
                        &raw,
                        |v: f64| v.is_finite() && v > 0.0,
                        "must be positive",
                    )?;
                }
                PolicyConfig::Reclaim(p)
            }
            "fixed" => {
                reject_unused(&get, &[ENV_RECLAIM_FRACTION, ENV_AVG_BLOB_MB], "reclaim")?;
                let mut p = FixedCountPolicy::default();
                if let Some(raw) = get(ENV_FIXED_COUNT) {
                    p.max_blobs = parse_ranged(ENV_FIXED_COUNT, &raw, |_: usize| true, "")?;
                }
                PolicyConfig::Fixed(p)
            }
            _ => {
                return Err(ConfigError::InvalidValue {
                    key: ENV_POLICY,
                    value: policy,
                    reason: "expected `reclaim` or `fixed`".to_string(),
                });
            }
        };

        Ok(config)
    }
}

/// A setting for the other policy is a mistake, not something to ignore.
fn reject_unused(
    get: &impl Fn(&str) -> Option<String>,
    keys: &[&'static str],
    owner: &str,
) -> Result<(), ConfigError> {
    for &key in keys {
        if let Some(value) = get(key) {
            return Err(ConfigError::InvalidValue {
                key,
                value,
                reason: format!("only used with {ENV_POLICY}={owner}"),
            });
        }
    }
    Ok(())
}

/// Root must exist and be a directory; returned canonicalized (absolute).
fn validate_root(root: &Path) -> Result<PathBuf, ConfigError> {
    let meta = match std::fs::metadata(root) {
        Ok(meta) => meta,
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            return Err(ConfigError::RootMissing(root.to_path_buf()));
        }
        Err(source) => {
            return Err(ConfigError::RootInaccessible {
                path: root.to_path_buf(),
                source,
            });
        }
    };
    if !meta.is_dir() {
        return Err(ConfigError::RootNotDirectory(root.to_path_buf()));
    }
    std::fs::canonicalize(root).map_err(|source| ConfigError::RootInaccessible {
        path: root.to_path_buf(),
        source,
    })
}

fn parse_ranged<T>(
    key: &'static str,
    raw: &str,
    valid: impl Fn(T) -> bool,
    range_reason: &str,
) -> Result<T, ConfigError>
where
    T: FromStr + Copy,
    T::Err: std::fmt::Display,
{
    let value = raw.trim().parse::<T>().map_err(|e| ConfigError::InvalidValue {
        key,
        value: raw.to_string(),
        reason: e.to_string(),
    })?;
    if !valid(value) {
        return Err(ConfigError::InvalidValue {
            key,
            value: raw.to_string(),
            reason: range_reason.to_string(),
        });
    }
    Ok(value)
}

fn parse_bool(key: &'static str, raw: &str) -> Result<bool, ConfigError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" => Ok(true),
        "0" | "false" | "no" => Ok(false),
        _ => Err(ConfigError::InvalidValue {
            key,
            value: raw.to_string(),
            reason: "expected true or false".to_string(),
        }),
    }
}
