//! ローカルファイルシステムを使うブリッジ実装

use super::{Bridge, OpenDialogOptions, OpenDialogResult};
use crate::error::bridge::Result;
use crate::error::BridgeError;
use crate::file::io;
use crate::model::LocalFile;
use async_trait::async_trait;
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::{SystemTime, UNIX_EPOCH};

/// ディレクトリ選択 UI のポート
pub trait DirectoryDialog: Send + Sync {
    fn pick(&self, options: &OpenDialogOptions) -> Result<OpenDialogResult>;
}

/// フロントエンドが先に集めた選択結果を返すダイアログ
///
/// 選択が積まれていなければキャンセル扱い
#[derive(Debug, Default)]
pub struct QueuedDialog {
    pending: Mutex<Option<String>>,
}

impl QueuedDialog {
    pub fn new() -> Self {
        Self::default()
    }

    /// 次回のダイアログ呼び出しで返すパスを設定
    pub fn select(&self, path: impl Into<String>) {
        if let Ok(mut pending) = self.pending.lock() {
            *pending = Some(path.into());
        }
    }

    pub fn clear(&self) {
        if let Ok(mut pending) = self.pending.lock() {
            *pending = None;
        }
    }
}

impl DirectoryDialog for QueuedDialog {
    fn pick(&self, _options: &OpenDialogOptions) -> Result<OpenDialogResult> {
        let mut pending = self.pending.lock().map_err(|_| BridgeError::Dialog {
            message: "dialog state is poisoned".to_string(),
        })?;
        Ok(match pending.take() {
            Some(path) => OpenDialogResult::selected(path),
            None => OpenDialogResult::canceled(),
        })
    }
}

/// tokio のファイル操作を使うブリッジ
#[derive(Clone, Default)]
pub struct NativeBridge {
    dialog: Option<Arc<dyn DirectoryDialog>>,
}

impl NativeBridge {
    /// ダイアログなし（`prompt_for_directory` は失敗する）
    pub fn new() -> Self {
        Self { dialog: None }
    }

    pub fn with_dialog(dialog: Arc<dyn DirectoryDialog>) -> Self {
        Self {
            dialog: Some(dialog),
        }
    }

    /// ダイアログの既定オプション
    pub fn dialog_defaults() -> OpenDialogOptions {
        OpenDialogOptions {
            title: Some("Select directory".to_string()),
            ..OpenDialogOptions::open_directory()
        }
    }
}

#[async_trait]
impl Bridge for NativeBridge {
    async fn prompt_for_directory(&self, options: &OpenDialogOptions) -> Result<OpenDialogResult> {
        let dialog = self.dialog.as_ref().ok_or_else(|| BridgeError::Dialog {
            message: "Main window is not available".to_string(),
        })?;
        let options = options.merged_over(&Self::dialog_defaults());
        dialog.pick(&options).inspect_err(|err| {
            log::error!("Failed to show open dialog: {err}");
        })
    }

    async fn list_directory_entries(&self, path: &str) -> Result<Vec<LocalFile>> {
        let mut reader = tokio::fs::read_dir(path)
            .await
            .map_err(|err| BridgeError::from_io(path, err))?;

        let mut entries = Vec::new();
        while let Some(entry) = reader
            .next_entry()
            .await
            .map_err(|err| BridgeError::from_io(path, err))?
        {
            let name = entry.file_name().to_string_lossy().to_string();
            let entry_path = Path::new(path).join(&name);
            let entry_path_str = entry_path.to_string_lossy().to_string();
            // シンボリックリンクはリンク先の種別で扱う
            let metadata = tokio::fs::metadata(&entry_path)
                .await
                .map_err(|err| BridgeError::from_io(entry_path_str.as_str(), err))?;

            entries.push(LocalFile {
                path: entry_path_str,
                name,
                last_modified: metadata.modified().map(millis_since_epoch).unwrap_or(0),
                is_directory: metadata.is_dir(),
            });
        }

        Ok(entries)
    }

    async fn read_file(&self, path: &str) -> Result<String> {
        tokio::fs::read_to_string(path)
            .await
            .map_err(|err| BridgeError::from_io(path, err))
    }

    async fn write_file(&self, path: &str, content: &str) -> Result<()> {
        io::write_file_async(Path::new(path), content)
            .await
            .map_err(|err| BridgeError::from_io(path, err))
    }
}

fn millis_since_epoch(time: SystemTime) -> u64 {
    time.duration_since(UNIX_EPOCH)
        .map(|duration| duration.as_millis() as u64)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[tokio::test]
    async fn lists_entries_with_directory_flag() {
        let temp_dir = tempdir().unwrap();
        fs::write(temp_dir.path().join("a.md"), "# a").unwrap();
        fs::create_dir(temp_dir.path().join("sub")).unwrap();

        let bridge = NativeBridge::new();
        let root = temp_dir.path().to_string_lossy().to_string();
        let mut entries = bridge.list_directory_entries(&root).await.unwrap();
        entries.sort_by(|a, b| a.name.cmp(&b.name));

        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].name, "a.md");
        assert!(!entries[0].is_directory);
        assert!(entries[0].last_modified > 0);
        assert!(entries[0].path.ends_with("a.md"));
        assert_eq!(entries[1].name, "sub");
        assert!(entries[1].is_directory);
    }

    #[tokio::test]
    async fn missing_directory_is_not_found() {
        let temp_dir = tempdir().unwrap();
        let missing = temp_dir.path().join("missing").to_string_lossy().to_string();

        let err = NativeBridge::new()
            .list_directory_entries(&missing)
            .await
            .unwrap_err();
        assert_eq!(err, BridgeError::NotFound { path: missing });
    }

    #[tokio::test]
    async fn write_then_read_text() {
        let temp_dir = tempdir().unwrap();
        let file_path = temp_dir.path().join("note.md").to_string_lossy().to_string();
        let bridge = NativeBridge::new();

        bridge.write_file(&file_path, "# タイトル\n本文").await.unwrap();
        let content = bridge.read_file(&file_path).await.unwrap();
        assert_eq!(content, "# タイトル\n本文");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn write_through_symlinked_note() {
        let temp_dir = tempdir().unwrap();
        let real = temp_dir.path().join("real.md");
        let link = temp_dir.path().join("link.md");
        fs::write(&real, "old").unwrap();
        std::os::unix::fs::symlink(&real, &link).unwrap();

        let bridge = NativeBridge::new();
        bridge
            .write_file(&link.to_string_lossy(), "new")
            .await
            .unwrap();

        assert_eq!(fs::read_to_string(&real).unwrap(), "new");
        assert!(fs::symlink_metadata(&link).unwrap().file_type().is_symlink());
    }

    #[tokio::test]
    async fn failed_write_leaves_directory_clean() {
        let temp_dir = tempdir().unwrap();
        let target = temp_dir.path().join("note.md");
        fs::create_dir(&target).unwrap();

        let bridge = NativeBridge::new();
        let err = bridge
            .write_file(&target.to_string_lossy(), "text")
            .await
            .unwrap_err();
        assert!(matches!(err, BridgeError::Io { .. }));
        assert_eq!(fs::read_dir(temp_dir.path()).unwrap().count(), 1);
    }

    #[tokio::test]
    async fn prompt_without_dialog_is_guarded() {
        let err = NativeBridge::new()
            .prompt_for_directory(&OpenDialogOptions::open_directory())
            .await
            .unwrap_err();
        assert!(matches!(err, BridgeError::Dialog { .. }));
    }

    #[tokio::test]
    async fn queued_dialog_returns_selection_once() {
        let dialog = Arc::new(QueuedDialog::new());
        let bridge = NativeBridge::with_dialog(dialog.clone());
        dialog.select("/notes");

        let first = bridge
            .prompt_for_directory(&OpenDialogOptions::default())
            .await
            .unwrap();
        assert_eq!(first.first_path(), Some("/notes"));

        let second = bridge
            .prompt_for_directory(&OpenDialogOptions::default())
            .await
            .unwrap();
        assert!(second.canceled);
    }
}
