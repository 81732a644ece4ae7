//! メモリ上のツリーを使うブリッジ実装
//!
//! テストやデモ用。列挙順は登録順で、ソートはしない。

use super::{Bridge, OpenDialogOptions, OpenDialogResult};
use crate::error::bridge::Result;
use crate::error::BridgeError;
use crate::model::LocalFile;
use async_trait::async_trait;
use std::collections::{HashSet, VecDeque};
use std::sync::{Mutex, MutexGuard};

#[derive(Debug, Clone)]
struct Node {
    path: String,
    is_directory: bool,
    content: String,
    last_modified: u64,
}

#[derive(Debug, Default)]
struct Tree {
    nodes: Vec<Node>,
    failing: HashSet<String>,
    dialog_results: VecDeque<OpenDialogResult>,
    listed: Vec<String>,
    written: Vec<String>,
}

impl Tree {
    fn find(&self, path: &str) -> Option<&Node> {
        self.nodes.iter().find(|node| node.path == path)
    }

    fn ensure_directory(&mut self, path: &str) {
        if path.is_empty() || path == "/" || self.find(path).is_some() {
            return;
        }
        if let Some(parent) = parent_of(path) {
            self.ensure_directory(parent);
        }
        self.nodes.push(Node {
            path: path.to_string(),
            is_directory: true,
            content: String::new(),
            last_modified: 0,
        });
    }

    fn check_failure(&self, path: &str) -> Result<()> {
        if self.failing.contains(path) {
            return Err(BridgeError::PermissionDenied {
                path: path.to_string(),
            });
        }
        Ok(())
    }
}

fn parent_of(path: &str) -> Option<&str> {
    let trimmed = path.trim_end_matches('/');
    match trimmed.rsplit_once('/') {
        Some(("", _)) => Some("/"),
        Some((parent, _)) => Some(parent),
        None => None,
    }
}

fn name_of(path: &str) -> &str {
    path.trim_end_matches('/')
        .rsplit('/')
        .next()
        .unwrap_or(path)
}

/// メモリ上のファイルツリー
#[derive(Debug, Default)]
pub struct MemoryBridge {
    tree: Mutex<Tree>,
}

impl MemoryBridge {
    pub fn new() -> Self {
        Self::default()
    }

    fn tree(&self) -> MutexGuard<'_, Tree> {
        // 内部状態は単純なので毒化しても中身をそのまま使う
        self.tree.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// ディレクトリを登録（親も自動作成）
    pub fn add_dir(&self, path: &str) -> &Self {
        self.tree().ensure_directory(path);
        self
    }

    /// ファイルを登録（親ディレクトリも自動作成）
    pub fn add_file(&self, path: &str, content: &str) -> &Self {
        self.add_file_modified(path, content, 0)
    }

    pub fn add_file_modified(&self, path: &str, content: &str, last_modified: u64) -> &Self {
        let mut tree = self.tree();
        if let Some(parent) = parent_of(path) {
            tree.ensure_directory(parent);
        }
        tree.nodes.retain(|node| node.path != path);
        tree.nodes.push(Node {
            path: path.to_string(),
            is_directory: false,
            content: content.to_string(),
            last_modified,
        });
        self
    }

    /// 指定パスへの列挙・読み書きを権限エラーにする
    pub fn fail_on(&self, path: &str) -> &Self {
        self.tree().failing.insert(path.to_string());
        self
    }

    pub fn recover(&self, path: &str) -> &Self {
        self.tree().failing.remove(path);
        self
    }

    /// 次のダイアログ呼び出しの結果を積む（空ならキャンセル）
    pub fn queue_dialog(&self, result: OpenDialogResult) -> &Self {
        self.tree().dialog_results.push_back(result);
        self
    }

    /// 現在のファイル内容
    pub fn content(&self, path: &str) -> Option<String> {
        self.tree()
            .find(path)
            .filter(|node| !node.is_directory)
            .map(|node| node.content.clone())
    }

    /// 列挙されたディレクトリの履歴
    pub fn listed_paths(&self) -> Vec<String> {
        self.tree().listed.clone()
    }

    /// 書き込まれたファイルの履歴
    pub fn written_paths(&self) -> Vec<String> {
        self.tree().written.clone()
    }
}

#[async_trait]
impl Bridge for MemoryBridge {
    async fn prompt_for_directory(&self, _options: &OpenDialogOptions) -> Result<OpenDialogResult> {
        Ok(self
            .tree()
            .dialog_results
            .pop_front()
            .unwrap_or_else(OpenDialogResult::canceled))
    }

    async fn list_directory_entries(&self, path: &str) -> Result<Vec<LocalFile>> {
        let mut tree = self.tree();
        tree.listed.push(path.to_string());
        tree.check_failure(path)?;

        match tree.find(path) {
            Some(node) if node.is_directory => {}
            Some(_) => {
                return Err(BridgeError::Io {
                    path: path.to_string(),
                    message: "not a directory".to_string(),
                })
            }
            None => {
                return Err(BridgeError::NotFound {
                    path: path.to_string(),
                })
            }
        }

        Ok(tree
            .nodes
            .iter()
            .filter(|node| parent_of(&node.path) == Some(path))
            .map(|node| LocalFile {
                path: node.path.clone(),
                name: name_of(&node.path).to_string(),
                last_modified: node.last_modified,
                is_directory: node.is_directory,
            })
            .collect())
    }

    async fn read_file(&self, path: &str) -> Result<String> {
        let tree = self.tree();
        tree.check_failure(path)?;
        match tree.find(path) {
            Some(node) if !node.is_directory => Ok(node.content.clone()),
            Some(_) => Err(BridgeError::Io {
                path: path.to_string(),
                message: "is a directory".to_string(),
            }),
            None => Err(BridgeError::NotFound {
                path: path.to_string(),
            }),
        }
    }

    async fn write_file(&self, path: &str, content: &str) -> Result<()> {
        self.tree().check_failure(path)?;
        self.add_file(path, content);
        self.tree().written.push(path.to_string());
        Ok(())
    }
}
