//! 実行時設定
//!
//! 環境変数から読み込み、未指定の項目は `dirs` による既定パスで補う

use crate::error::ConfigError;
use crate::walk::WalkOptions;
use log::LevelFilter;
use std::path::PathBuf;
use std::str::FromStr;

/// 状態保存ディレクトリ
pub const ENV_STATE_DIR: &str = "MDSYNC_STATE_DIR";
/// ログファイル
pub const ENV_LOG: &str = "MDSYNC_LOG";
pub const ENV_LOG_LEVEL: &str = "MDSYNC_LOG_LEVEL";
pub const ENV_MAX_DEPTH: &str = "MDSYNC_MAX_DEPTH";
pub const ENV_CONCURRENT_WALK: &str = "MDSYNC_CONCURRENT_WALK";
/// `development` で開発モード
pub const ENV_MODE: &str = "MDSYNC_ENV";
pub const ENV_NODE_MODE: &str = "NODE_ENV";

const APP_DIR_NAME: &str = "mdsync";

/// ディレクトリ同期の実行オプション
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncOptions {
    /// 状態保存先（未指定時は `<config_dir>/mdsync`）
    pub state_dir: Option<PathBuf>,
    /// ログ出力先（未指定時は `~/.mdsync-log/debug.log`）
    pub log_path: Option<PathBuf>,
    pub log_level: Option<LevelFilter>,
    pub development: bool,
    pub walk: WalkOptions,
}

impl SyncOptions {
    /// プロセスの環境変数から読み込み
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// 任意の参照関数から読み込み
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let log_level = non_empty(ENV_LOG_LEVEL)
            .map(|value| {
                LevelFilter::from_str(value.trim()).map_err(|_| invalid(ENV_LOG_LEVEL, &value))
            })
            .transpose()?;

        let max_depth = non_empty(ENV_MAX_DEPTH)
            .map(|value| {
                value
                    .trim()
                    .parse::<usize>()
                    .map_err(|_| invalid(ENV_MAX_DEPTH, &value))
            })
            .transpose()?;

        let concurrent = non_empty(ENV_CONCURRENT_WALK)
            .map(|value| parse_flag(ENV_CONCURRENT_WALK, &value))
            .transpose()?
            .unwrap_or(false);

        let development = non_empty(ENV_MODE)
            .or_else(|| non_empty(ENV_NODE_MODE))
            .map(|value| value.trim().eq_ignore_ascii_case("development"))
            .unwrap_or(false);

        Ok(Self {
            state_dir: non_empty(ENV_STATE_DIR).map(PathBuf::from),
            log_path: non_empty(ENV_LOG).map(PathBuf::from),
            log_level,
            development,
            walk: WalkOptions {
                max_depth,
                concurrent,
            },
        })
    }

    /// 状態保存先を解決
    pub fn resolve_state_dir(&self) -> Result<PathBuf, ConfigError> {
        match &self.state_dir {
            Some(dir) => Ok(dir.clone()),
            None => dirs::config_dir()
                .map(|dir| dir.join(APP_DIR_NAME))
                .ok_or_else(|| ConfigError::MissingDefault {
                    what: "state directory".to_string(),
                }),
        }
    }

    /// ログ出力先を解決（ホームが無ければ `None`）
    pub fn resolve_log_path(&self) -> Option<PathBuf> {
        match &self.log_path {
            Some(path) => Some(path.clone()),
            None => dirs::home_dir().map(|home| home.join(".mdsync-log").join("debug.log")),
        }
    }

    /// 実効ログレベル（開発モードは Debug）
    pub fn effective_log_level(&self) -> LevelFilter {
        self.log_level.unwrap_or(if self.development {
            LevelFilter::Debug
        } else {
            LevelFilter::Info
        })
    }

    /// `overrides` に指定のある項目で上書き
    pub fn merged_with(&self, overrides: &SyncOptions) -> SyncOptions {
        SyncOptions {
            state_dir: overrides
                .state_dir
                .clone()
                .or_else(|| self.state_dir.clone()),
            log_path: overrides.log_path.clone().or_else(|| self.log_path.clone()),
            log_level: overrides.log_level.or(self.log_level),
            development: overrides.development || self.development,
            walk: WalkOptions {
                max_depth: overrides.walk.max_depth.or(self.walk.max_depth),
                concurrent: overrides.walk.concurrent || self.walk.concurrent,
            },
        }
    }
}

fn invalid(key: &str, value: &str) -> ConfigError {
    ConfigError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
    }
}

fn parse_flag(key: &str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(invalid(key, value)),
    }
}
