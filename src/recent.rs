//! 最近開いたディレクトリの管理
//!
//! 新しいものが先頭、パスで一意、最大 `MAX_RECENT_DIRS` 件

use crate::model::LocalDirectory;
use serde::{Deserialize, Serialize};

/// 保持する最近のディレクトリの最大数
pub const MAX_RECENT_DIRS: usize = 5;

/// 最近開いたディレクトリの一覧
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecentDirectories {
    /// エントリ（新しいものが先頭）
    entries: Vec<LocalDirectory>,
}

impl RecentDirectories {
    pub fn new() -> Self {
        Self::default()
    }

    /// ディレクトリへのアクセスを記録
    ///
    /// 時計が戻っても降順を保つため、時刻は現在の先頭以上に切り上げる
    pub fn record(&mut self, path: &str, last_access: u64) {
        let last_access = self
            .entries
            .first()
            .map_or(last_access, |head| last_access.max(head.last_access));

        // 同じパスの既存エントリは取り除いてから先頭に追加
        self.entries.retain(|entry| entry.path != path);
        self.entries.insert(
            0,
            LocalDirectory {
                path: path.to_string(),
                last_access,
            },
        );
        self.entries.truncate(MAX_RECENT_DIRS);
    }

    /// 永続化データなど外部由来の一覧を不変条件に合わせる
    pub fn normalize(&mut self) {
        // 安定ソートなので同時刻のエントリは元の順序を保つ
        self.entries
            .sort_by(|a, b| b.last_access.cmp(&a.last_access));
        let mut seen = std::collections::HashSet::new();
        self.entries.retain(|entry| seen.insert(entry.path.clone()));
        self.entries.truncate(MAX_RECENT_DIRS);
    }

    /// インデックス0が最新
    pub fn get(&self, index: usize) -> Option<&LocalDirectory> {
        self.entries.get(index)
    }

    pub fn contains(&self, path: &str) -> bool {
        self.entries.iter().any(|entry| entry.path == path)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &LocalDirectory> {
        self.entries.iter()
    }

    pub fn as_slice(&self) -> &[LocalDirectory] {
        &self.entries
    }
}

impl From<Vec<LocalDirectory>> for RecentDirectories {
    fn from(entries: Vec<LocalDirectory>) -> Self {
        let mut recent = Self { entries };
        recent.normalize();
        recent
    }
}
