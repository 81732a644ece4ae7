//! ディレクトリ同期状態のデータモデル
//!
//! 永続化レイアウトは `camelCase` の JSON 一件で、状態全体を丸ごと書き換える

use crate::recent::RecentDirectories;
use serde::{Deserialize, Serialize};

/// 文書管理モード
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentMode {
    /// アプリ内メモリ上の文書コレクション
    #[default]
    Memory,
    /// ローカルファイルシステム上のディレクトリ
    Local,
}

impl DocumentMode {
    /// もう一方のモード
    pub fn toggled(self) -> Self {
        match self {
            DocumentMode::Memory => DocumentMode::Local,
            DocumentMode::Local => DocumentMode::Memory,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            DocumentMode::Memory => "memory",
            DocumentMode::Local => "local",
        }
    }
}

/// ストアが把握しているファイルシステム上のエントリ
///
/// 内容は保持しない（必要時にブリッジから読み込む）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocalFile {
    /// 絶対パス
    pub path: String,
    pub name: String,
    /// 最終更新時刻（UNIX エポックからのミリ秒）
    pub last_modified: u64,
    #[serde(default)]
    pub is_directory: bool,
}

impl LocalFile {
    pub fn file(path: impl Into<String>, name: impl Into<String>, last_modified: u64) -> Self {
        Self {
            path: path.into(),
            name: name.into(),
            last_modified,
            is_directory: false,
        }
    }

    pub fn directory(path: impl Into<String>, name: impl Into<String>, last_modified: u64) -> Self {
        Self {
            path: path.into(),
            name: name.into(),
            last_modified,
            is_directory: true,
        }
    }
}

/// 最近開いたディレクトリ
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocalDirectory {
    pub path: String,
    /// 最終アクセス時刻（ミリ秒）
    pub last_access: u64,
}

/// ディレクトリ同期ストアの永続化状態
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DirectorySyncState {
    pub current_mode: DocumentMode,
    /// MEMORY モードを離れた時点の文書インデックス
    pub last_memory_index: usize,
    /// LOCAL モードを離れた時点のディレクトリ
    pub last_local_path: Option<String>,
    pub recent_dirs: RecentDirectories,
    pub current_dir: Option<String>,
    pub local_files: Vec<LocalFile>,
}

impl Default for DirectorySyncState {
    fn default() -> Self {
        Self {
            current_mode: DocumentMode::Memory,
            last_memory_index: 0,
            last_local_path: None,
            recent_dirs: RecentDirectories::new(),
            current_dir: None,
            local_files: Vec::new(),
        }
    }
}

impl DirectorySyncState {
    /// 外部から読み込んだ状態の不変条件を回復する
    pub fn normalized(mut self) -> Self {
        self.recent_dirs.normalize();
        self
    }

    /// 表示用：ファイルのみ（ディレクトリを除く）
    pub fn markdown_files(&self) -> impl Iterator<Item = &LocalFile> {
        self.local_files.iter().filter(|file| !file.is_directory)
    }
}
