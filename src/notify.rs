//! ユーザー向け通知のポート

use crate::error::{ErrorDisplay, ErrorLevel, SyncError};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Success,
    Info,
    Warning,
    Error,
}

impl From<ErrorLevel> for NotificationLevel {
    fn from(level: ErrorLevel) -> Self {
        match level {
            ErrorLevel::Info => NotificationLevel::Info,
            ErrorLevel::Warning => NotificationLevel::Warning,
            ErrorLevel::Error => NotificationLevel::Error,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub level: NotificationLevel,
    pub message: String,
}

impl Notification {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Success,
            message: message.into(),
        }
    }

    /// 失敗した操作名とエラーから生成
    pub fn failure(operation: &str, error: &SyncError) -> Self {
        let display = ErrorDisplay::new(operation, error);
        Self {
            level: display.level.into(),
            message: display.message,
        }
    }
}

/// 通知の受け口（トースト等）
pub trait Notifier: Send + Sync {
    fn notify(&self, notification: Notification);
}

/// ログに出すだけの通知
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, notification: Notification) {
        match notification.level {
            NotificationLevel::Success | NotificationLevel::Info => {
                log::info!("{}", notification.message)
            }
            NotificationLevel::Warning => log::warn!("{}", notification.message),
            NotificationLevel::Error => log::error!("{}", notification.message),
        }
    }
}

/// 通知を溜めておき、UI が後から取り出す
///
/// クローンは同じキューを共有する
#[derive(Debug, Clone, Default)]
pub struct QueueNotifier {
    queue: Arc<Mutex<VecDeque<Notification>>>,
}

impl QueueNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// 溜まった通知をすべて取り出す
    pub fn drain(&self) -> Vec<Notification> {
        self.queue
            .lock()
            .map(|mut queue| queue.drain(..).collect())
            .unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.queue.lock().map(|queue| queue.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Notifier for QueueNotifier {
    fn notify(&self, notification: Notification) {
        if let Ok(mut queue) = self.queue.lock() {
            queue.push_back(notification);
        }
    }
}
