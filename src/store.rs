//! ローカルディレクトリ同期ストア
//!
//! 文書モード・現在のディレクトリ・ファイル一覧・最近のディレクトリを保持し、
//! ブリッジの結果を状態へ反映する。状態は常に丸ごと置き換え、そのたびに永続化する。
//!
//! 各操作は自身の境界で失敗をログ出力・通知したうえで `Result` としても返す。
//! 操作はすべて `&mut self` / `&self` を取るため、同じストア上で走査が並走することはない。

use crate::bridge::{Bridge, OpenDialogOptions};
use crate::clock::{Clock, SystemClock};
use crate::documents::{DocumentStore, Post};
use crate::error::{Result, SyncError};
use crate::model::{DirectorySyncState, DocumentMode, LocalFile};
use crate::notify::{LogNotifier, Notification, Notifier};
use crate::storage::{load_state, save_state, StateStorage};
use crate::walk::{self, WalkOptions};
use std::sync::Arc;

const OPEN_DIRECTORY_FAILED: &str = "ディレクトリを開けませんでした";
const SWITCH_DIRECTORY_FAILED: &str = "ディレクトリの切り替えに失敗しました";
const SWITCH_DIRECTORY_SUCCEEDED: &str = "ディレクトリを切り替えました";
const OPEN_FILE_FAILED: &str = "ファイルを開けませんでした";
const SAVE_FILE_FAILED: &str = "ファイルを保存できませんでした";

/// ディレクトリ同期ストア
pub struct LocalDirectoryStore {
    state: DirectorySyncState,
    bridge: Arc<dyn Bridge>,
    storage: Box<dyn StateStorage>,
    notifier: Box<dyn Notifier>,
    clock: Box<dyn Clock>,
    walk_options: WalkOptions,
    development: bool,
}

impl LocalDirectoryStore {
    /// 保存済みの状態を読み込んで作成（無ければ既定値）
    pub fn new(bridge: Arc<dyn Bridge>, storage: Box<dyn StateStorage>) -> Self {
        let state = load_state(storage.as_ref());
        Self {
            state,
            bridge,
            storage,
            notifier: Box::new(LogNotifier),
            clock: Box::new(SystemClock),
            walk_options: WalkOptions::default(),
            development: false,
        }
    }

    pub fn with_notifier(mut self, notifier: impl Notifier + 'static) -> Self {
        self.notifier = Box::new(notifier);
        self
    }

    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    pub fn with_walk_options(mut self, options: WalkOptions) -> Self {
        self.walk_options = options;
        self
    }

    /// 開発モードでは状態遷移を詳細に記録する
    pub fn with_development(mut self, development: bool) -> Self {
        self.development = development;
        if development {
            log::debug!("Initial state loaded: {:?}", self.state);
        }
        self
    }

    pub fn state(&self) -> &DirectorySyncState {
        &self.state
    }

    pub fn walk_options(&self) -> &WalkOptions {
        &self.walk_options
    }

    /// 現在のファイル一覧からパスで検索
    pub fn local_file(&self, path: &str) -> Option<&LocalFile> {
        self.state.local_files.iter().find(|file| file.path == path)
    }

    /// 文書モードを切り替える
    ///
    /// 同じモードへの切り替えも保存・復元の手順をそのまま実行する。
    /// MEMORY に入る際は文書ストアのアクティブインデックスを復元し、
    /// LOCAL に入る際は前回のディレクトリを開き直す。
    pub async fn switch_mode(
        &mut self,
        target: DocumentMode,
        documents: &mut dyn DocumentStore,
    ) -> Result<()> {
        log::debug!(
            "Switching mode from {:?} to {:?}",
            self.state.current_mode,
            target
        );

        let mut next = self.state.clone();
        match next.current_mode {
            DocumentMode::Memory => next.last_memory_index = documents.active_index(),
            DocumentMode::Local => next.last_local_path = next.current_dir.clone(),
        }
        next.current_mode = target;
        self.commit(next);

        if self.development {
            log::debug!("State after mode switch: {:?}", self.state);
        }

        match target {
            DocumentMode::Memory => documents.set_active_index(self.state.last_memory_index),
            DocumentMode::Local => {
                if let Some(path) = self.state.last_local_path.clone() {
                    self.switch_directory(&path).await?;
                }
            }
        }

        Ok(())
    }

    /// ディレクトリ選択ダイアログを開き、選ばれたディレクトリへ切り替える
    ///
    /// キャンセル時は状態を変えず `Ok(false)` を返す
    pub async fn open_directory(&mut self) -> Result<bool> {
        let selection = match self
            .bridge
            .prompt_for_directory(&OpenDialogOptions::open_directory())
            .await
        {
            Ok(selection) => selection,
            Err(err) => {
                let err = SyncError::from(err);
                self.report(OPEN_DIRECTORY_FAILED, &err);
                return Err(err);
            }
        };

        let Some(path) = selection.first_path().map(str::to_string) else {
            log::debug!("Directory selection canceled");
            return Ok(false);
        };

        self.switch_directory(&path).await?;
        Ok(true)
    }

    /// 指定ディレクトリを走査して現在のディレクトリにする
    ///
    /// 走査に失敗した場合は状態を一切変更しない
    pub async fn switch_directory(&mut self, path: &str) -> Result<()> {
        let files = match self.list_markdown_tree(path).await {
            Ok(files) => files,
            Err(err) => {
                self.report(SWITCH_DIRECTORY_FAILED, &err);
                return Err(err);
            }
        };

        log::info!("Switching to directory {} ({} entries)", path, files.len());

        let mut next = self.state.clone();
        next.current_dir = Some(path.to_string());
        next.local_files = files;
        next.recent_dirs.record(path, self.clock.now_ms());
        next.last_local_path = Some(path.to_string());
        self.commit(next);

        self.notifier
            .notify(Notification::success(SWITCH_DIRECTORY_SUCCEEDED));
        Ok(())
    }

    /// `path` 以下の Markdown ツリーを列挙（状態は変更しない）
    pub async fn list_markdown_tree(&self, path: &str) -> Result<Vec<LocalFile>> {
        walk::list_markdown_tree(self.bridge.as_ref(), path, &self.walk_options)
            .await
            .map_err(SyncError::from)
    }

    /// ローカルファイルを読み込み、文書コレクションへ反映する
    ///
    /// 同じパスの文書があればその位置で置き換え、無ければ末尾に追加する。
    /// 新しいアクティブインデックスを返す。
    pub async fn open_file(
        &self,
        file: &LocalFile,
        documents: &mut dyn DocumentStore,
    ) -> Result<usize> {
        if file.is_directory {
            let err = SyncError::Guard(format!("{} is a directory", file.path));
            self.report(OPEN_FILE_FAILED, &err);
            return Err(err);
        }

        let content = match self.bridge.read_file(&file.path).await {
            Ok(content) => content,
            Err(err) => {
                let err = SyncError::from(err);
                self.report(OPEN_FILE_FAILED, &err);
                return Err(err);
            }
        };

        let post = Post {
            title: file.name.clone(),
            content,
            path: Some(file.path.clone()),
            last_modified: Some(file.last_modified),
            desc: None,
        };

        let index = match documents.position_of_path(&file.path) {
            Some(index) => {
                documents.documents_mut()[index] = post;
                index
            }
            None => {
                documents.documents_mut().push(post);
                documents.documents().len() - 1
            }
        };
        documents.set_active_index(index);

        log::debug!("Opened {} as document {}", file.path, index);
        Ok(index)
    }

    /// テキストをファイルへ保存（再試行しない）
    pub async fn save_file(&self, path: &str, content: &str) -> Result<()> {
        match self.bridge.write_file(path, content).await {
            Ok(()) => {
                log::debug!("Saved {} ({} bytes)", path, content.len());
                Ok(())
            }
            Err(err) => {
                let err = SyncError::from(err);
                self.report(SAVE_FILE_FAILED, &err);
                Err(err)
            }
        }
    }

    /// 状態を丸ごと置き換えて永続化
    fn commit(&mut self, next: DirectorySyncState) {
        self.state = next;
        if let Err(err) = save_state(self.storage.as_ref(), &self.state) {
            // 保存に失敗してもメモリ上の状態は有効
            log::warn!("Failed to persist directory state: {err}");
        }
    }

    fn report(&self, operation: &str, err: &SyncError) {
        log::error!("{}: {}", operation, err);
        self.notifier.notify(Notification::failure(operation, err));
    }
}
