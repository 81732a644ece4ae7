use mdsync::notify::{Notification, NotificationLevel};
use mdsync::{DirectorySyncState, LocalDirectory, LocalFile, Post};
use serde::{Deserialize, Serialize};

/// レンダラーへ渡す同期層の状態
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DirectorySnapshot {
    pub mode: String,
    pub current_dir: Option<String>,
    pub recent_dirs: Vec<RecentSnapshot>,
    pub files: Vec<FileSnapshot>,
    pub documents: Vec<DocumentSnapshot>,
    pub active_index: usize,
    pub notifications: Vec<NotificationSnapshot>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RecentSnapshot {
    pub path: String,
    pub last_access: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FileSnapshot {
    pub path: String,
    pub name: String,
    pub last_modified: u64,
    pub is_directory: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DocumentSnapshot {
    pub title: String,
    pub path: Option<String>,
    pub last_modified: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NotificationSnapshot {
    pub level: String,
    pub message: String,
}

impl DirectorySnapshot {
    pub fn new(
        state: &DirectorySyncState,
        posts: &[Post],
        active_index: usize,
        notifications: &[Notification],
    ) -> Self {
        Self {
            mode: state.current_mode.label().to_string(),
            current_dir: state.current_dir.clone(),
            recent_dirs: state.recent_dirs.iter().map(RecentSnapshot::from).collect(),
            files: state.local_files.iter().map(FileSnapshot::from).collect(),
            documents: posts.iter().map(DocumentSnapshot::from).collect(),
            active_index,
            notifications: notifications.iter().map(NotificationSnapshot::from).collect(),
        }
    }
}

impl From<&LocalDirectory> for RecentSnapshot {
    fn from(dir: &LocalDirectory) -> Self {
        Self {
            path: dir.path.clone(),
            last_access: dir.last_access,
        }
    }
}

impl From<&LocalFile> for FileSnapshot {
    fn from(file: &LocalFile) -> Self {
        Self {
            path: file.path.clone(),
            name: file.name.clone(),
            last_modified: file.last_modified,
            is_directory: file.is_directory,
        }
    }
}

impl From<&Post> for DocumentSnapshot {
    fn from(post: &Post) -> Self {
        Self {
            title: post.title.clone(),
            path: post.path.clone(),
            last_modified: post.last_modified,
        }
    }
}

impl From<&Notification> for NotificationSnapshot {
    fn from(notification: &Notification) -> Self {
        let level = match notification.level {
            NotificationLevel::Success => "success",
            NotificationLevel::Info => "info",
            NotificationLevel::Warning => "warning",
            NotificationLevel::Error => "error",
        };
        Self {
            level: level.to_string(),
            message: notification.message.clone(),
        }
    }
}
