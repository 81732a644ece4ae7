//! エラーハンドリングシステム
//!
//! ディレクトリ同期層全体で使用される統一されたエラー型と表示用ユーティリティ
//! いずれのエラーも致命的ではなく、UI 側で回復可能として扱う

use std::io::ErrorKind;
use thiserror::Error;

/// ディレクトリ同期層全体のエラー型
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SyncError {
    /// ブリッジ呼び出しの失敗（I/O・権限・ダイアログ）
    #[error("Bridge call failed: {0}")]
    Bridge(#[from] BridgeError),

    /// 永続化された状態の破損
    #[error("Persisted state is corrupt: {0}")]
    Parse(String),

    /// 永続化ストレージへのアクセス失敗
    #[error("Storage error: {0}")]
    Storage(String),

    /// 協調コンポーネントが存在しない等の論理ガード違反
    #[error("Guard failed: {0}")]
    Guard(String),

    /// 設定エラー
    #[error("Configuration error")]
    Config(#[from] ConfigError),

    /// ターミナル操作エラー
    #[error("Terminal error: {0}")]
    Terminal(String),
}

/// ブリッジ呼び出し固有のエラー
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BridgeError {
    #[error("Not found: {path}")]
    NotFound { path: String },

    #[error("Permission denied: {path}")]
    PermissionDenied { path: String },

    #[error("IO error at {path}: {message}")]
    Io { path: String, message: String },

    #[error("Dialog failed: {message}")]
    Dialog { message: String },
}

impl BridgeError {
    /// `std::io::Error` をパス情報付きで変換
    pub fn from_io(path: impl Into<String>, error: std::io::Error) -> Self {
        let path = path.into();
        match error.kind() {
            ErrorKind::NotFound => BridgeError::NotFound { path },
            ErrorKind::PermissionDenied => BridgeError::PermissionDenied { path },
            _ => BridgeError::Io {
                path,
                message: error.to_string(),
            },
        }
    }
}

/// 設定固有のエラー
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: String, value: String },

    #[error("Cannot resolve default directory for {what}")]
    MissingDefault { what: String },
}

/// エラーレベル分類
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorLevel {
    Info,
    Warning,
    Error,
}

/// ユーザー向けエラー表示情報
#[derive(Debug, Clone, PartialEq)]
pub struct ErrorDisplay {
    pub message: String,
    pub level: ErrorLevel,
}

impl ErrorDisplay {
    /// 操作名を前置したユーザー向け表示を生成
    pub fn new(operation: &str, error: &SyncError) -> Self {
        let (detail, level) = Self::format_error(error);
        Self {
            message: format!("{}: {}", operation, detail),
            level,
        }
    }

    fn format_error(error: &SyncError) -> (String, ErrorLevel) {
        match error {
            SyncError::Bridge(BridgeError::NotFound { path }) => {
                (format!("見つかりません: {}", path), ErrorLevel::Error)
            }
            SyncError::Bridge(BridgeError::PermissionDenied { path }) => {
                (format!("アクセス権限がありません: {}", path), ErrorLevel::Error)
            }
            SyncError::Parse(_) => (
                "保存済みの状態を読み込めないため初期化しました".to_string(),
                ErrorLevel::Warning,
            ),
            SyncError::Storage(message) => {
                (format!("状態を保存できません: {}", message), ErrorLevel::Warning)
            }
            _ => (format!("エラーが発生しました: {}", error), ErrorLevel::Error),
        }
    }
}

/// プロジェクト標準のResult型
pub type Result<T> = std::result::Result<T, SyncError>;

/// ブリッジ呼び出し用のResult型
pub mod bridge {
    pub type Result<T> = std::result::Result<T, super::BridgeError>;
}
