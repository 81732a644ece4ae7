//! 走査から除外するパスの判定
//!
//! 区切り文字を `/` に正規化してから、セグメント単位で判定する純粋関数

use regex::Regex;
use std::sync::OnceLock;

/// どの階層に現れても除外するセグメント
pub const IGNORED_SEGMENTS: &[&str] = &[
    // バージョン管理
    ".git",
    ".svn",
    ".hg",
    // 依存関係・ビルド成果物
    "node_modules",
    "dist",
    "build",
    // エディタ・IDE
    ".idea",
    ".vscode",
    ".vs",
    // OS メタデータ
    ".DS_Store",
    "Thumbs.db",
    // 一時ファイル・キャッシュ
    "tmp",
    "temp",
    "log",
    "logs",
    "cache",
    ".cache",
];

/// 末尾セグメントが完全一致した場合に除外するシステムディレクトリ
const SYSTEM_DIRECTORIES: &[&str] = &["$RECYCLE.BIN", "System Volume Information"];

fn reserved_device_name() -> &'static Regex {
    static RESERVED: OnceLock<Regex> = OnceLock::new();
    RESERVED.get_or_init(|| {
        Regex::new(r"(?i)^(con|prn|aux|nul|com[0-9]|lpt[0-9])$")
            .unwrap_or_else(|err| panic!("invalid reserved name pattern: {err}"))
    })
}

/// 区切り文字を `/` に揃え、連続・末尾の区切りを取り除く
pub fn normalize_separators(path: &str) -> String {
    let unified = path.replace('\\', "/");
    let mut normalized = String::with_capacity(unified.len());
    let mut previous_slash = false;
    for ch in unified.chars() {
        if ch == '/' {
            if !previous_slash {
                normalized.push(ch);
            }
            previous_slash = true;
        } else {
            normalized.push(ch);
            previous_slash = false;
        }
    }
    if normalized.len() > 1 && normalized.ends_with('/') {
        normalized.pop();
    }
    normalized
}

/// パスを走査対象から除外すべきか判定
pub fn is_ignored(path: &str) -> bool {
    let normalized = normalize_separators(path);
    let mut segments = normalized.split('/').filter(|segment| !segment.is_empty());

    if segments.clone().any(|segment| IGNORED_SEGMENTS.contains(&segment)) {
        return true;
    }

    let Some(name) = segments.next_back() else {
        return false;
    };

    // 隠しファイル
    if name.starts_with('.') {
        return true;
    }

    // Windows の予約デバイス名
    if reserved_device_name().is_match(name) {
        return true;
    }

    SYSTEM_DIRECTORIES.contains(&name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_denylisted_segments_anywhere() {
        assert!(is_ignored("/project/node_modules/pkg/readme.md"));
        assert!(is_ignored("/project/.git/config"));
        assert!(is_ignored("/project/dist"));
        assert!(is_ignored("/project/docs/cache/page.md"));
        assert!(is_ignored("/home/me/.DS_Store"));
        assert!(is_ignored("/home/me/Thumbs.db"));
    }

    #[test]
    fn test_regular_markdown_is_included() {
        assert!(!is_ignored("/project/notes.md"));
        assert!(!is_ignored("/project/docs/guide"));
        assert!(!is_ignored("/project/building/plan.md"));
        assert!(!is_ignored("/"));
        assert!(!is_ignored(""));
    }

    #[test]
    fn test_hidden_final_segment() {
        assert!(is_ignored("/project/.env"));
        assert!(is_ignored("/project/.drafts"));
        // 隠しディレクトリの子は末尾セグメントでは判定されない
        assert!(!is_ignored("/project/.drafts/note.md"));
    }

    #[test]
    fn test_windows_separators() {
        assert!(is_ignored(r"C:\project\node_modules"));
        assert!(is_ignored(r"C:\project\.vscode\settings.json"));
        assert!(!is_ignored(r"C:\project\notes.md"));
        assert!(is_ignored(r"D:\$RECYCLE.BIN"));
        assert!(is_ignored(r"D:\System Volume Information\"));
    }

    #[test]
    fn test_reserved_device_names() {
        assert!(is_ignored("/share/CON"));
        assert!(is_ignored("/share/nul"));
        assert!(is_ignored("/share/Com1"));
        assert!(is_ignored("/share/lpt9"));
        assert!(!is_ignored("/share/console.md"));
        assert!(!is_ignored("/share/com10"));
        assert!(!is_ignored("/share/con.md"));
    }

    #[test]
    fn test_normalize_separators() {
        assert_eq!(normalize_separators(r"a\\b//c/"), "a/b/c");
        assert_eq!(normalize_separators("/"), "/");
        assert_eq!(normalize_separators(r"C:\x"), "C:/x");
    }

    proptest! {
        #[test]
        fn separator_style_does_not_change_result(
            segments in proptest::collection::vec("[a-zA-Z0-9._$ ]{1,12}", 1..6)
        ) {
            let unix = format!("/{}", segments.join("/"));
            let windows = format!("\\{}", segments.join("\\"));
            prop_assert_eq!(is_ignored(&unix), is_ignored(&windows));
        }
    }
}
