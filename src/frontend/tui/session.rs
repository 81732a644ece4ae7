//! ターミナル UI の操作状態
//!
//! キー入力をストア操作へ変換する。描画やターミナル制御には依存しない。

use crate::bridge::QueuedDialog;
use crate::documents::{DocumentStore, PostStore};
use crate::error::{Result, SyncError};
use crate::file::completion::{expand, DirectoryCompletion};
use crate::model::{DocumentMode, LocalFile};
use crate::notify::{Notification, QueueNotifier};
use crate::store::LocalDirectoryStore;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::future::Future;
use std::sync::Arc;
use tokio::runtime::Runtime;

/// ディレクトリ入力プロンプト
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PromptState {
    pub input: String,
    pub candidates: Vec<String>,
}

/// 一覧の1行
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListRow {
    pub label: String,
    pub is_directory: bool,
}

pub struct Session {
    runtime: Runtime,
    store: LocalDirectoryStore,
    documents: PostStore,
    dialog: Arc<QueuedDialog>,
    notifier: QueueNotifier,
    completion: DirectoryCompletion,
    selected: usize,
    prompt: Option<PromptState>,
    message: Option<Notification>,
    running: bool,
}

impl Session {
    /// `notifier` はストアに渡したものと同じキューを共有していること
    pub fn new(
        store: LocalDirectoryStore,
        documents: PostStore,
        dialog: Arc<QueuedDialog>,
        notifier: QueueNotifier,
    ) -> Result<Self> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|err| SyncError::Terminal(format!("runtime: {err}")))?;

        Ok(Self {
            runtime,
            store,
            documents,
            dialog,
            notifier,
            completion: DirectoryCompletion::new(),
            selected: 0,
            prompt: None,
            message: None,
            running: true,
        })
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn store(&self) -> &LocalDirectoryStore {
        &self.store
    }

    pub fn documents(&self) -> &PostStore {
        &self.documents
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn prompt(&self) -> Option<&PromptState> {
        self.prompt.as_ref()
    }

    pub fn message(&self) -> Option<&Notification> {
        self.message.as_ref()
    }

    /// 現在のモードで左ペインに並べる行
    pub fn rows(&self) -> Vec<ListRow> {
        let state = self.store.state();
        match state.current_mode {
            DocumentMode::Memory => self
                .documents
                .documents()
                .iter()
                .map(|post| ListRow {
                    label: post.title.clone(),
                    is_directory: false,
                })
                .collect(),
            DocumentMode::Local => state
                .local_files
                .iter()
                .map(|file| ListRow {
                    label: relative_label(state.current_dir.as_deref(), file),
                    is_directory: file.is_directory,
                })
                .collect(),
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        if self.prompt.is_some() {
            self.handle_prompt_key(key);
        } else {
            self.handle_normal_key(key);
        }
        self.collect_notifications();
    }

    fn handle_normal_key(&mut self, key: KeyEvent) {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.running = false;
            return;
        }

        match key.code {
            KeyCode::Char('q') => self.running = false,
            KeyCode::Char('j') | KeyCode::Down => self.move_selection(1),
            KeyCode::Char('k') | KeyCode::Up => self.move_selection(-1),
            KeyCode::Enter => self.activate_selection(),
            KeyCode::Char('o') => {
                let input = self
                    .store
                    .state()
                    .current_dir
                    .as_deref()
                    .map(|dir| format!("{}/", dir.trim_end_matches('/')))
                    .unwrap_or_default();
                self.prompt = Some(PromptState {
                    input,
                    candidates: Vec::new(),
                });
            }
            KeyCode::Char('m') => {
                let target = self.store.state().current_mode.toggled();
                self.switch_mode(target);
            }
            KeyCode::Char('s') => self.save_active(),
            KeyCode::Char(ch @ '1'..='5') => {
                let index = ch as usize - '1' as usize;
                self.open_recent(index);
            }
            _ => {}
        }
    }

    fn handle_prompt_key(&mut self, key: KeyEvent) {
        let Some(prompt) = self.prompt.as_mut() else {
            return;
        };

        match key.code {
            KeyCode::Esc => {
                self.prompt = None;
                self.dialog.clear();
            }
            KeyCode::Enter => {
                let input = std::mem::take(&mut prompt.input);
                self.prompt = None;
                self.submit_directory(&input);
            }
            KeyCode::Tab => {
                let result = self.completion.complete(&prompt.input);
                prompt.input = result.completed_input;
                prompt.candidates = result.candidates;
            }
            KeyCode::Backspace => {
                prompt.input.pop();
                prompt.candidates.clear();
            }
            KeyCode::Char(ch) => {
                prompt.input.push(ch);
                prompt.candidates.clear();
            }
            _ => {}
        }
    }

    fn move_selection(&mut self, delta: isize) {
        let len = self.rows().len();
        if len == 0 {
            self.selected = 0;
            return;
        }
        let next = self.selected as isize + delta;
        self.selected = next.clamp(0, len as isize - 1) as usize;
    }

    fn activate_selection(&mut self) {
        match self.store.state().current_mode {
            DocumentMode::Memory => {
                if self.selected < self.documents.len() {
                    self.documents.set_active_index(self.selected);
                }
            }
            DocumentMode::Local => {
                let Some(file) = self.store.state().local_files.get(self.selected).cloned() else {
                    return;
                };
                if file.is_directory {
                    return;
                }
                let result = block_on(
                    &self.runtime,
                    self.store.open_file(&file, &mut self.documents),
                );
                log_failure("open file", result.map(|_| ()));
            }
        }
    }

    /// プロンプトで入力されたパスをダイアログの選択結果として開く
    fn submit_directory(&mut self, input: &str) {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return;
        }
        let expanded = expand(trimmed).to_string_lossy().to_string();
        let path = match expanded.trim_end_matches('/') {
            "" => "/".to_string(),
            path => path.to_string(),
        };

        self.dialog.select(path);
        let result = block_on(&self.runtime, self.store.open_directory());
        if let Ok(true) = result {
            self.selected = 0;
        }
        log_failure("open directory", result.map(|_| ()));
    }

    fn switch_mode(&mut self, target: DocumentMode) {
        let result = block_on(
            &self.runtime,
            self.store.switch_mode(target, &mut self.documents),
        );
        self.selected = 0;
        log_failure("switch mode", result);
    }

    fn open_recent(&mut self, index: usize) {
        let Some(path) = self
            .store
            .state()
            .recent_dirs
            .get(index)
            .map(|dir| dir.path.clone())
        else {
            return;
        };
        let result = block_on(&self.runtime, self.store.switch_directory(&path));
        if result.is_ok() {
            self.selected = 0;
        }
        log_failure("open recent directory", result);
    }

    fn save_active(&mut self) {
        let Some(post) = self.documents.active_post() else {
            return;
        };
        let Some(path) = post.path.clone() else {
            self.message = Some(Notification {
                level: crate::notify::NotificationLevel::Info,
                message: "メモリ上の文書は保存先がありません".to_string(),
            });
            return;
        };
        let content = post.content.clone();
        let result = block_on(&self.runtime, self.store.save_file(&path, &content));
        if result.is_ok() {
            self.message = Some(Notification::success(format!("保存しました: {}", path)));
        }
        log_failure("save file", result);
    }

    fn collect_notifications(&mut self) {
        if let Some(last) = self.notifier.drain().pop() {
            self.message = Some(last);
        }
    }
}

fn block_on<F: Future>(runtime: &Runtime, future: F) -> F::Output {
    runtime.block_on(future)
}

/// 失敗はストア側で通知済みなので記録のみ
fn log_failure(operation: &str, result: Result<()>) {
    if let Err(err) = result {
        log::debug!("{} failed: {}", operation, err);
    }
}

/// 現在のディレクトリからの相対表示（ディレクトリは末尾 `/`）
fn relative_label(root: Option<&str>, file: &LocalFile) -> String {
    let relative = root
        .and_then(|root| file.path.strip_prefix(root))
        .map(|rest| rest.trim_start_matches(['/', '\\']))
        .filter(|rest| !rest.is_empty())
        .unwrap_or(&file.name);
    if file.is_directory {
        format!("{}/", relative)
    } else {
        relative.to_string()
    }
}
