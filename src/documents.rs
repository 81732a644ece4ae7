//! 文書コレクション（外部協調コンポーネント）のポート
//!
//! ディレクトリ同期ストアはアクティブインデックスとコレクションだけに触れる

use serde::{Deserialize, Serialize};

/// エディタで扱う文書
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub title: String,
    pub content: String,
    /// ローカルファイル由来の場合のパス
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_modified: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub desc: Option<String>,
}

impl Post {
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
            ..Self::default()
        }
    }
}

/// 文書コレクションとアクティブ文書を保持するコンポーネント
pub trait DocumentStore {
    fn active_index(&self) -> usize;
    fn set_active_index(&mut self, index: usize);
    fn documents(&self) -> &[Post];
    fn documents_mut(&mut self) -> &mut Vec<Post>;

    /// 指定パスに対応する文書の位置
    fn position_of_path(&self, path: &str) -> Option<usize> {
        self.documents()
            .iter()
            .position(|post| post.path.as_deref() == Some(path))
    }
}

/// メモリ上の文書コレクション
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostStore {
    posts: Vec<Post>,
    current_post_index: usize,
}

impl PostStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_posts(posts: Vec<Post>) -> Self {
        Self {
            posts,
            current_post_index: 0,
        }
    }

    /// アクティブな文書（範囲外なら `None`）
    pub fn active_post(&self) -> Option<&Post> {
        self.posts.get(self.current_post_index)
    }

    pub fn active_post_mut(&mut self) -> Option<&mut Post> {
        self.posts.get_mut(self.current_post_index)
    }

    pub fn len(&self) -> usize {
        self.posts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.posts.is_empty()
    }
}

impl DocumentStore for PostStore {
    fn active_index(&self) -> usize {
        self.current_post_index
    }

    fn set_active_index(&mut self, index: usize) {
        self.current_post_index = index;
    }

    fn documents(&self) -> &[Post] {
        &self.posts
    }

    fn documents_mut(&mut self) -> &mut Vec<Post> {
        &mut self.posts
    }
}
