//! Markdown ツリーの再帰走査
//!
//! 明示的なワークリストで走査し、最後に「ディレクトリ優先・名前順」で並べる。
//! 走査中のどの失敗も全体を中断し、部分結果は返さない。
//!
//! 深さ制限なしの既定ではシンボリックリンクの循環で停止しない。
//! `WalkOptions::max_depth` で打ち切れる。

use crate::bridge::Bridge;
use crate::error::bridge::Result;
use crate::ignore::is_ignored;
use crate::model::LocalFile;
use futures::future::try_join_all;
use std::cmp::Ordering;
use unicase::UniCase;

/// 対象とするファイルの接尾辞（大文字小文字を区別）
pub const MARKDOWN_SUFFIX: &str = ".md";

/// 走査オプション
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WalkOptions {
    /// ルート直下を深さ1として、この深さのディレクトリより下には降りない
    pub max_depth: Option<usize>,
    /// 同じ階層の兄弟ディレクトリを並行して列挙する
    pub concurrent: bool,
}

impl WalkOptions {
    fn descends_into(&self, depth: usize) -> bool {
        self.max_depth.map_or(true, |max| depth < max)
    }
}

/// `path` 以下の Markdown ファイルとディレクトリを列挙
pub async fn list_markdown_tree(
    bridge: &dyn Bridge,
    path: &str,
    options: &WalkOptions,
) -> Result<Vec<LocalFile>> {
    if is_ignored(path) {
        log::debug!("walk root is ignored: {}", path);
        return Ok(Vec::new());
    }

    let mut results = Vec::new();

    if options.concurrent {
        let mut level = vec![path.to_string()];
        let mut depth = 0;
        while !level.is_empty() {
            let listings =
                try_join_all(level.iter().map(|dir| bridge.list_directory_entries(dir))).await?;
            depth += 1;
            let mut next = Vec::new();
            for entries in listings {
                next.extend(collect_entries(entries, depth, options, &mut results));
            }
            level = next;
        }
    } else {
        let mut pending = vec![(path.to_string(), 0usize)];
        while let Some((dir, depth)) = pending.pop() {
            let entries = bridge.list_directory_entries(&dir).await?;
            let children = collect_entries(entries, depth + 1, options, &mut results);
            // ブリッジの返した順に処理するため逆順で積む
            pending.extend(children.into_iter().rev().map(|child| (child, depth + 1)));
        }
    }

    sort_entries(&mut results);
    Ok(results)
}

/// 1ディレクトリ分のエントリを結果に加え、降りるべきサブディレクトリを返す
fn collect_entries(
    entries: Vec<LocalFile>,
    depth: usize,
    options: &WalkOptions,
    results: &mut Vec<LocalFile>,
) -> Vec<String> {
    let (directories, files): (Vec<_>, Vec<_>) =
        entries.into_iter().partition(|entry| entry.is_directory);

    let mut descend = Vec::new();
    for directory in directories.into_iter().filter(|dir| !is_ignored(&dir.path)) {
        if options.descends_into(depth) {
            descend.push(directory.path.clone());
        }
        results.push(directory);
    }

    results.extend(
        files
            .into_iter()
            .filter(|file| !is_ignored(&file.path) && file.name.ends_with(MARKDOWN_SUFFIX)),
    );

    descend
}

/// ディレクトリ優先、各グループ内は名前の大文字小文字を無視した順
pub fn sort_entries(entries: &mut [LocalFile]) {
    entries.sort_by(|a, b| {
        b.is_directory
            .cmp(&a.is_directory)
            .then_with(|| compare_names(&a.name, &b.name))
            .then_with(|| a.path.cmp(&b.path))
    });
}

/// 名前の比較（大文字小文字を無視し、同じなら大文字を先に）
pub fn compare_names(a: &str, b: &str) -> Ordering {
    UniCase::new(a)
        .cmp(&UniCase::new(b))
        .then_with(|| a.cmp(b))
}
