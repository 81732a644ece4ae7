use crate::logging::DebugLogger;
use crate::options::BackendOptions;
use crate::snapshot::{DirectorySnapshot, FileSnapshot};
use mdsync::bridge::{DirectoryDialog, QueuedDialog};
use mdsync::notify::QueueNotifier;
use mdsync::storage::{FileStorage, StateStorage};
use mdsync::{
    Bridge, DocumentMode, DocumentStore, LocalDirectoryStore, NativeBridge, OpenDialogOptions,
    OpenDialogResult, PostStore, SyncError,
};
use serde::{Serialize, Serializer};
use serde_json::json;
use std::sync::Arc;
use thiserror::Error;
use tokio::runtime::Runtime;

/// レンダラーへ返すコマンドのエラー（文字列として直列化）
#[derive(Debug, Error)]
pub enum CommandError {
    #[error(transparent)]
    Sync(#[from] SyncError),

    #[error("ファイルが一覧にありません: {0}")]
    UnknownFile(String),

    #[error("デバッグログ出力に失敗しました: {0}")]
    DebugLog(String),

    #[error("ランタイムの初期化に失敗しました: {0}")]
    Runtime(String),
}

impl Serialize for CommandError {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

pub type CommandResult<T> = std::result::Result<T, CommandError>;

/// GUI からディレクトリ同期層を操作するコントローラー
pub struct BackendController {
    runtime: Runtime,
    store: LocalDirectoryStore,
    documents: PostStore,
    bridge: Arc<dyn Bridge>,
    dialog: Option<Arc<QueuedDialog>>,
    notifier: QueueNotifier,
    logger: Option<DebugLogger>,
}

impl BackendController {
    /// ネイティブのファイルシステムと状態保存先で作成
    pub fn new(options: BackendOptions) -> CommandResult<Self> {
        let dialog = Arc::new(QueuedDialog::new());
        let picker: Arc<dyn DirectoryDialog> = dialog.clone();
        let bridge: Arc<dyn Bridge> = Arc::new(NativeBridge::with_dialog(picker));
        let state_dir = options.sync.resolve_state_dir().map_err(SyncError::from)?;
        let mut controller = Self::with_parts(options, bridge, Box::new(FileStorage::new(state_dir)))?;
        controller.dialog = Some(dialog);
        Ok(controller)
    }

    /// 任意のブリッジとストレージで作成
    pub fn with_parts(
        options: BackendOptions,
        bridge: Arc<dyn Bridge>,
        storage: Box<dyn StateStorage>,
    ) -> CommandResult<Self> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|err| CommandError::Runtime(err.to_string()))?;
        let logger = match options.resolve_log_path() {
            Some(path) => Some(DebugLogger::new(path).map_err(log_error)?),
            None => None,
        };
        let notifier = QueueNotifier::new();
        let store = LocalDirectoryStore::new(bridge.clone(), storage)
            .with_notifier(notifier.clone())
            .with_walk_options(options.sync.walk)
            .with_development(options.sync.development);

        Ok(Self {
            runtime,
            store,
            documents: PostStore::new(),
            bridge,
            dialog: None,
            notifier,
            logger,
        })
    }

    pub fn documents(&self) -> &PostStore {
        &self.documents
    }

    /// 現在の状態と未読の通知を返す
    pub fn snapshot(&mut self) -> CommandResult<DirectorySnapshot> {
        let notifications = self.notifier.drain();
        let snapshot = DirectorySnapshot::new(
            self.store.state(),
            self.documents.documents(),
            self.documents.active_index(),
            &notifications,
        );
        self.log_event("snapshot", &snapshot)?;
        Ok(snapshot)
    }

    /// ディレクトリを選択して開く
    ///
    /// `selection` はレンダラー側で選ばれたパス。キャンセル時もスナップショットを返す
    pub fn open_directory(&mut self, selection: Option<String>) -> CommandResult<DirectorySnapshot> {
        if let (Some(dialog), Some(path)) = (&self.dialog, selection.as_ref()) {
            dialog.select(path.clone());
        }
        let opened = self.runtime.block_on(self.store.open_directory())?;
        self.log_event("open_directory", &json!({ "selection": selection, "opened": opened }))?;
        self.snapshot()
    }

    pub fn switch_directory(&mut self, path: &str) -> CommandResult<DirectorySnapshot> {
        self.runtime.block_on(self.store.switch_directory(path))?;
        self.log_event("switch_directory", &json!({ "path": path }))?;
        self.snapshot()
    }

    pub fn switch_mode(&mut self, mode: DocumentMode) -> CommandResult<DirectorySnapshot> {
        self.runtime
            .block_on(self.store.switch_mode(mode, &mut self.documents))?;
        self.log_event("switch_mode", &json!({ "mode": mode }))?;
        self.snapshot()
    }

    /// 一覧中のファイルを文書として開く
    pub fn open_file(&mut self, path: &str) -> CommandResult<DirectorySnapshot> {
        let file = self
            .store
            .local_file(path)
            .cloned()
            .ok_or_else(|| CommandError::UnknownFile(path.to_string()))?;
        let index = self
            .runtime
            .block_on(self.store.open_file(&file, &mut self.documents))?;
        self.log_event("open_file", &json!({ "path": path, "index": index }))?;
        self.snapshot()
    }

    pub fn save_file(&mut self, path: &str, content: &str) -> CommandResult<()> {
        self.runtime.block_on(self.store.save_file(path, content))?;
        self.log_event("save_file", &json!({ "path": path, "bytes": content.len() }))
    }

    /// ホスト側ハンドラ：ディレクトリ選択ダイアログ
    pub fn show_open_dialog(&self, options: &OpenDialogOptions) -> CommandResult<OpenDialogResult> {
        let result = self
            .runtime
            .block_on(self.bridge.prompt_for_directory(options))
            .map_err(SyncError::from)?;
        self.log_event("show_open_dialog", &result)?;
        Ok(result)
    }

    /// ホスト側ハンドラ：直下のエントリ
    pub fn read_directory(&self, path: &str) -> CommandResult<Vec<FileSnapshot>> {
        let entries = self
            .runtime
            .block_on(self.bridge.list_directory_entries(path))
            .map_err(SyncError::from)?;
        self.log_event("read_directory", &json!({ "path": path, "count": entries.len() }))?;
        Ok(entries.iter().map(FileSnapshot::from).collect())
    }

    /// ホスト側ハンドラ：ファイル読み込み
    pub fn read_file(&self, path: &str) -> CommandResult<String> {
        let content = self
            .runtime
            .block_on(self.bridge.read_file(path))
            .map_err(SyncError::from)?;
        self.log_event("read_file", &json!({ "path": path }))?;
        Ok(content)
    }

    /// ホスト側ハンドラ：ファイル書き込み
    pub fn write_file(&self, path: &str, content: &str) -> CommandResult<()> {
        self.runtime
            .block_on(self.bridge.write_file(path, content))
            .map_err(SyncError::from)?;
        self.log_event("write_file", &json!({ "path": path }))
    }

    fn log_event<T: Serialize>(&self, tag: &str, payload: &T) -> CommandResult<()> {
        if let Some(logger) = &self.logger {
            logger
                .log_event(tag, payload)
                .map_err(|err| CommandError::DebugLog(err.to_string()))?;
        }
        Ok(())
    }
}

fn log_error(err: std::io::Error) -> CommandError {
    CommandError::DebugLog(format!("初期化に失敗しました: {err}"))
}
