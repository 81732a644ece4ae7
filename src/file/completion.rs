//! ディレクトリパス補完
//!
//! ターミナルのディレクトリ入力プロンプト向け。`~` と環境変数を展開して読み、
//! 入力された表記のまま補完結果を返す。

use std::fs;
use std::path::{Path, PathBuf};

/// 補完候補の最大数
const MAX_CANDIDATES: usize = 50;

/// 補完結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionResult {
    /// 候補（末尾に `/` を付けたディレクトリ名）
    pub candidates: Vec<String>,
    /// 共通プレフィックスまで補完した入力
    pub completed_input: String,
}

impl CompletionResult {
    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    pub fn is_single_match(&self) -> bool {
        self.candidates.len() == 1
    }
}

/// ディレクトリ補完エンジン
#[derive(Debug, Clone)]
pub struct DirectoryCompletion {
    show_hidden: bool,
    max_candidates: usize,
}

impl DirectoryCompletion {
    pub fn new() -> Self {
        Self {
            show_hidden: false,
            max_candidates: MAX_CANDIDATES,
        }
    }

    /// 隠しディレクトリ表示設定
    pub fn with_hidden(mut self, show: bool) -> Self {
        self.show_hidden = show;
        self
    }

    /// 入力に対する補完を実行
    pub fn complete(&self, input: &str) -> CompletionResult {
        let (typed_dir, partial) = match input.rfind('/') {
            Some(index) => input.split_at(index + 1),
            None => ("", input),
        };

        let mut candidates = self.scan(&expand(typed_dir), partial);
        candidates.truncate(self.max_candidates);

        let completed_input = match candidates.as_slice() {
            [] => input.to_string(),
            [single] => format!("{}{}", typed_dir, single),
            many => format!("{}{}", typed_dir, common_prefix(many)),
        };

        CompletionResult {
            candidates,
            completed_input,
        }
    }

    /// 部分一致するサブディレクトリを列挙
    fn scan(&self, dir: &Path, partial: &str) -> Vec<String> {
        let Ok(entries) = fs::read_dir(dir) else {
            return Vec::new();
        };

        let mut candidates: Vec<String> = entries
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.path().is_dir())
            .map(|entry| entry.file_name().to_string_lossy().to_string())
            .filter(|name| self.show_hidden || !name.starts_with('.') || partial.starts_with('.'))
            .filter(|name| name.starts_with(partial))
            .map(|name| format!("{}/", name))
            .collect();

        candidates.sort();
        candidates
    }
}

impl Default for DirectoryCompletion {
    fn default() -> Self {
        Self::new()
    }
}

/// `~` と環境変数を展開（失敗時は入力のまま）
pub fn expand(typed_dir: &str) -> PathBuf {
    if typed_dir.is_empty() {
        return PathBuf::from(".");
    }
    let expanded = shellexpand::full(typed_dir)
        .map(|expanded| expanded.to_string())
        .unwrap_or_else(|_| typed_dir.to_string());
    PathBuf::from(expanded)
}

/// 共通プレフィックスを検索
fn common_prefix(candidates: &[String]) -> String {
    let Some(first) = candidates.first() else {
        return String::new();
    };

    let mut common_len = first.len();
    for candidate in &candidates[1..] {
        common_len = first
            .char_indices()
            .zip(candidate.chars())
            .take_while(|((_, a), b)| a == b)
            .last()
            .map(|((index, ch), _)| index + ch.len_utf8())
            .unwrap_or(0)
            .min(common_len);
    }

    first[..common_len].to_string()
}
