//! 状態の永続化ポート
//!
//! 文字列キーで JSON を一件保存するだけの単純なストレージ。
//! 起動時に一度読み込み、状態が変わるたびに全体を書き直す。

use crate::error::{Result, SyncError};
use crate::file::io;
use crate::model::DirectorySyncState;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

/// ディレクトリ同期状態の保存キー
pub const STATE_KEY: &str = "local_directory_state";

/// キー付き文字列ストレージ
pub trait StateStorage: Send + Sync {
    fn get_item(&self, key: &str) -> Result<Option<String>>;
    fn set_item(&self, key: &str, value: &str) -> Result<()>;
}

/// メモリ上のストレージ（テスト用）
///
/// クローンは同じ中身を共有する
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    items: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// 既存の値で初期化
    pub fn with_item(key: &str, value: &str) -> Self {
        let storage = Self::new();
        if let Ok(mut items) = storage.items.lock() {
            items.insert(key.to_string(), value.to_string());
        }
        storage
    }
}

impl StateStorage for MemoryStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        let items = self
            .items
            .lock()
            .map_err(|_| SyncError::Storage("memory storage is poisoned".to_string()))?;
        Ok(items.get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<()> {
        let mut items = self
            .items
            .lock()
            .map_err(|_| SyncError::Storage("memory storage is poisoned".to_string()))?;
        items.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// ディレクトリ内に `<key>.json` として保存するストレージ
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }
}

impl StateStorage for FileStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        let path = self.path_for(key);
        io::read_optional(&path)
            .map_err(|err| SyncError::Storage(format!("{}: {}", path.display(), err)))
    }

    fn set_item(&self, key: &str, value: &str) -> Result<()> {
        let path = self.path_for(key);
        io::write_file(&path, value)
            .map_err(|err| SyncError::Storage(format!("{}: {}", path.display(), err)))
    }
}

/// 保存済みの状態を読み込み（無い・壊れている場合は既定値）
pub fn load_state(storage: &dyn StateStorage) -> DirectorySyncState {
    let raw = match storage.get_item(STATE_KEY) {
        Ok(Some(raw)) => raw,
        Ok(None) => return DirectorySyncState::default(),
        Err(err) => {
            log::warn!("Failed to read persisted state, using defaults: {err}");
            return DirectorySyncState::default();
        }
    };

    match parse_state(&raw) {
        Ok(state) => state,
        Err(err) => {
            log::warn!("{err}; using defaults");
            DirectorySyncState::default()
        }
    }
}

/// JSON から状態を復元
pub fn parse_state(raw: &str) -> Result<DirectorySyncState> {
    serde_json::from_str::<DirectorySyncState>(raw)
        .map(DirectorySyncState::normalized)
        .map_err(|err| SyncError::Parse(err.to_string()))
}

/// 状態全体を書き込み
pub fn save_state(storage: &dyn StateStorage, state: &DirectorySyncState) -> Result<()> {
    let raw = serde_json::to_string(state).map_err(|err| SyncError::Storage(err.to_string()))?;
    storage.set_item(STATE_KEY, &raw)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{DocumentMode, LocalFile};
    use tempfile::tempdir;

    #[test]
    fn absent_state_defaults() {
        let storage = MemoryStorage::new();
        assert_eq!(load_state(&storage), DirectorySyncState::default());
    }

    #[test]
    fn corrupt_state_defaults() {
        let storage = MemoryStorage::with_item(STATE_KEY, "{not json");
        assert_eq!(load_state(&storage), DirectorySyncState::default());
        assert!(matches!(parse_state("{not json"), Err(SyncError::Parse(_))));
    }

    #[test]
    fn state_round_trips_through_file_storage() {
        let temp_dir = tempdir().unwrap();
        let storage = FileStorage::new(temp_dir.path().join("state"));

        let mut state = DirectorySyncState::default();
        state.current_mode = DocumentMode::Local;
        state.current_dir = Some("/notes".to_string());
        state.last_local_path = Some("/notes".to_string());
        state.recent_dirs.record("/notes", 42);
        state.local_files.push(LocalFile::file("/notes/a.md", "a.md", 1));

        save_state(&storage, &state).unwrap();
        assert!(temp_dir.path().join("state").join("local_directory_state.json").exists());
        assert_eq!(load_state(&storage), state);
    }

    #[test]
    fn loading_repairs_recent_dirs() {
        let raw = r#"{
            "currentMode": "memory",
            "recentDirs": [
                {"path": "/a", "lastAccess": 1},
                {"path": "/b", "lastAccess": 2},
                {"path": "/c", "lastAccess": 3},
                {"path": "/d", "lastAccess": 4},
                {"path": "/e", "lastAccess": 5},
                {"path": "/f", "lastAccess": 6},
                {"path": "/f", "lastAccess": 0}
            ]
        }"#;
        let state = parse_state(raw).unwrap();
        let paths: Vec<_> = state.recent_dirs.iter().map(|d| d.path.as_str()).collect();
        assert_eq!(paths, vec!["/f", "/e", "/d", "/c", "/b"]);
    }

    #[test]
    fn memory_storage_clones_share_items() {
        let storage = MemoryStorage::new();
        let clone = storage.clone();
        storage.set_item("k", "v").unwrap();
        assert_eq!(clone.get_item("k").unwrap().as_deref(), Some("v"));
    }
}
