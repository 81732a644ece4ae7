//! ホスト（ファイルシステム・ダイアログ）との境界
//!
//! コアが必要とする4つの呼び出しだけを非同期トレイトとして定義する。
//! 再試行・キャッシュは行わず、失敗はそのまま呼び出し元へ伝える。

mod memory;
mod native;

pub use memory::MemoryBridge;
pub use native::{DirectoryDialog, NativeBridge, QueuedDialog};

use crate::error::bridge::Result;
use crate::model::LocalFile;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// ダイアログの選択モード
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DialogProperty {
    OpenDirectory,
    OpenFile,
    MultiSelections,
}

/// ダイアログ呼び出しのオプション
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpenDialogOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default)]
    pub properties: Vec<DialogProperty>,
}

impl OpenDialogOptions {
    /// ディレクトリ選択用のオプション
    pub fn open_directory() -> Self {
        Self {
            title: None,
            properties: vec![DialogProperty::OpenDirectory],
        }
    }

    /// 既定値に呼び出し側の指定を重ねる
    pub fn merged_over(&self, defaults: &OpenDialogOptions) -> OpenDialogOptions {
        OpenDialogOptions {
            title: self.title.clone().or_else(|| defaults.title.clone()),
            properties: if self.properties.is_empty() {
                defaults.properties.clone()
            } else {
                self.properties.clone()
            },
        }
    }

    pub fn selects_directory(&self) -> bool {
        self.properties.contains(&DialogProperty::OpenDirectory)
    }
}

/// ダイアログの結果
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpenDialogResult {
    pub canceled: bool,
    #[serde(rename = "filePaths")]
    pub paths: Vec<String>,
}

impl OpenDialogResult {
    pub fn selected(path: impl Into<String>) -> Self {
        Self {
            canceled: false,
            paths: vec![path.into()],
        }
    }

    pub fn canceled() -> Self {
        Self {
            canceled: true,
            paths: Vec::new(),
        }
    }

    /// キャンセルされておらず、空でない最初のパス
    pub fn first_path(&self) -> Option<&str> {
        if self.canceled {
            return None;
        }
        self.paths
            .first()
            .map(String::as_str)
            .filter(|path| !path.is_empty())
    }
}

/// コアが利用するホスト機能
#[async_trait]
pub trait Bridge: Send + Sync {
    /// ディレクトリ選択ダイアログを表示
    async fn prompt_for_directory(&self, options: &OpenDialogOptions) -> Result<OpenDialogResult>;

    /// 直下のエントリを列挙（順序は保証しない）
    async fn list_directory_entries(&self, path: &str) -> Result<Vec<LocalFile>>;

    /// ファイル全体を UTF-8 テキストとして読み込み
    async fn read_file(&self, path: &str) -> Result<String>;

    /// テキストをファイルに書き込み
    async fn write_file(&self, path: &str, content: &str) -> Result<()>;
}
