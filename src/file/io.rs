//! ファイルI/O操作
//!
//! UTF-8テキストの書き込み。一時ファイルに書いてからアトミックに置き換える

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// 置き換え用の一時ファイルパス（`name.ext` → `name.ext.tmp`）
fn temp_path_for(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|name| name.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

/// テキストをファイルに書き込み（同期版、親ディレクトリも作成）
pub fn write_file(path: &Path, content: &str) -> io::Result<()> {
    // 親ディレクトリが存在しない場合は作成
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent)?;
        }
    }

    let temp_path = temp_path_for(path);
    let result = fs::write(&temp_path, content).and_then(|()| fs::rename(&temp_path, path));
    if result.is_err() {
        let _ = fs::remove_file(&temp_path);
    }
    result
}

/// テキストをファイルに書き込み（非同期版）
///
/// 親ディレクトリは作成しない。シンボリックリンクはリンク先を置き換える
pub async fn write_file_async(path: &Path, content: &str) -> io::Result<()> {
    let target = resolve_link_target(path).await?;

    let temp_path = temp_path_for(&target);
    let result = match tokio::fs::write(&temp_path, content).await {
        Ok(()) => tokio::fs::rename(&temp_path, &target).await,
        Err(err) => Err(err),
    };
    if result.is_err() {
        let _ = tokio::fs::remove_file(&temp_path).await;
    }
    result
}

/// 既存のリンクなら実体のパス、それ以外はそのまま
async fn resolve_link_target(path: &Path) -> io::Result<PathBuf> {
    match tokio::fs::symlink_metadata(path).await {
        Ok(metadata) if metadata.file_type().is_symlink() => {
            match tokio::fs::canonicalize(path).await {
                Ok(target) => Ok(target),
                // リンク切れはリンク自体を置き換える
                Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(path.to_path_buf()),
                Err(err) => Err(err),
            }
        }
        Ok(_) => Ok(path.to_path_buf()),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(path.to_path_buf()),
        Err(err) => Err(err),
    }
}

/// ファイルを読み込み、存在しなければ `None`
pub fn read_optional(path: &Path) -> io::Result<Option<String>> {
    match fs::read_to_string(path) {
        Ok(content) => Ok(Some(content)),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(err) => Err(err),
    }
}
