use mdsync::SyncOptions;
use std::path::{Path, PathBuf};

/// GUI バックエンド制御のオプション
#[derive(Debug, Clone, Default)]
pub struct BackendOptions {
    /// デバッグログ出力先（未指定時は `~/.mdsync-log/gui-debug.log`）
    pub debug_log_path: Option<PathBuf>,
    /// デバッグログを無効化
    pub disable_debug_log: bool,
    /// 同期層の設定
    pub sync: SyncOptions,
}

impl BackendOptions {
    pub fn resolve_log_path(&self) -> Option<PathBuf> {
        if self.disable_debug_log {
            return None;
        }
        match &self.debug_log_path {
            Some(path) => Some(path.clone()),
            None => default_log_path(),
        }
    }

    pub fn merged_with(&self, overrides: &BackendOptions) -> BackendOptions {
        BackendOptions {
            debug_log_path: overrides
                .debug_log_path
                .clone()
                .or_else(|| self.debug_log_path.clone()),
            disable_debug_log: overrides.disable_debug_log || self.disable_debug_log,
            sync: self.sync.merged_with(&overrides.sync),
        }
    }
}

fn default_log_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".mdsync-log").join("gui-debug.log"))
}

/// ヘルパー：親ディレクトリを作成
pub(crate) fn ensure_parent_dir(path: &Path) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    Ok(())
}
