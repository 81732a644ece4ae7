use mdsync::clock::ManualClock;
use mdsync::notify::{NotificationLevel, QueueNotifier};
use mdsync::recent::MAX_RECENT_DIRS;
use mdsync::storage::{self, MemoryStorage, StateStorage, STATE_KEY};
use mdsync::{
    DirectorySyncState, DocumentMode, DocumentStore, LocalDirectoryStore, LocalFile, MemoryBridge,
    OpenDialogResult, Post, PostStore, Result, SyncError,
};
use std::sync::Arc;

struct Fixture {
    bridge: Arc<MemoryBridge>,
    storage: MemoryStorage,
    notifier: QueueNotifier,
}

impl Fixture {
    fn new() -> Self {
        Self {
            bridge: Arc::new(MemoryBridge::new()),
            storage: MemoryStorage::new(),
            notifier: QueueNotifier::new(),
        }
    }

    fn store(&self, clock: ManualClock) -> LocalDirectoryStore {
        LocalDirectoryStore::new(self.bridge.clone(), Box::new(self.storage.clone()))
            .with_notifier(self.notifier.clone())
            .with_clock(clock)
    }
}

fn paths(files: &[LocalFile]) -> Vec<&str> {
    files.iter().map(|file| file.path.as_str()).collect()
}

#[tokio::test]
async fn switching_twice_is_idempotent() -> Result<()> {
    let fixture = Fixture::new();
    fixture.bridge.add_file("/notes/a.md", "# a");
    let mut store = fixture.store(ManualClock::new(1_000, 0));

    store.switch_directory("/notes").await?;
    let first = store.state().clone();
    store.switch_directory("/notes").await?;

    assert_eq!(store.state(), &first);
    assert_eq!(store.state().recent_dirs.len(), 1);
    Ok(())
}

async fn mode_twice_matches_mode_once(target: DocumentMode) -> Result<()> {
    let once = Fixture::new();
    let twice = Fixture::new();
    for fixture in [&once, &twice] {
        fixture.bridge.add_file("/notes/a.md", "# a");
    }

    let mut results = Vec::new();
    for (fixture, repeats) in [(&once, 1), (&twice, 2)] {
        let mut store = fixture.store(ManualClock::new(1_000, 0));
        let mut documents =
            PostStore::with_posts(vec![Post::new("one", "1"), Post::new("two", "2")]);
        documents.set_active_index(1);
        store.switch_directory("/notes").await?;

        for _ in 0..repeats {
            store.switch_mode(target, &mut documents).await?;
        }
        results.push((store.state().clone(), documents.active_index()));
    }

    assert_eq!(results[0], results[1]);
    Ok(())
}

#[tokio::test]
async fn switching_to_memory_twice_is_idempotent() -> Result<()> {
    mode_twice_matches_mode_once(DocumentMode::Memory).await
}

#[tokio::test]
async fn switching_to_local_twice_is_idempotent() -> Result<()> {
    mode_twice_matches_mode_once(DocumentMode::Local).await
}

#[tokio::test]
async fn recency_list_is_bounded_and_unique() -> Result<()> {
    let fixture = Fixture::new();
    for index in 0..7 {
        fixture.bridge.add_dir(&format!("/dir{index}"));
    }
    let mut store = fixture.store(ManualClock::new(1, 1));

    for index in 0..7 {
        store.switch_directory(&format!("/dir{index}")).await?;
    }
    store.switch_directory("/dir3").await?;

    let recent: Vec<&str> = store
        .state()
        .recent_dirs
        .iter()
        .map(|dir| dir.path.as_str())
        .collect();
    assert_eq!(recent.len(), MAX_RECENT_DIRS);
    assert_eq!(recent, vec!["/dir3", "/dir6", "/dir5", "/dir4", "/dir2"]);

    let accesses: Vec<u64> = store.state().recent_dirs.iter().map(|dir| dir.last_access).collect();
    assert!(accesses.windows(2).all(|pair| pair[0] >= pair[1]));
    Ok(())
}

#[tokio::test]
async fn tree_is_sorted_directories_first_then_by_name() -> Result<()> {
    let fixture = Fixture::new();
    fixture
        .bridge
        .add_file("/notes/b.md", "")
        .add_file("/notes/A.md", "")
        .add_file("/notes/zeta/c.md", "")
        .add_file("/notes/Alpha/d.md", "")
        .add_file("/notes/a.md", "");
    let store = fixture.store(ManualClock::new(0, 1));

    let files = store.list_markdown_tree("/notes").await?;
    assert_eq!(
        paths(&files),
        vec![
            "/notes/Alpha",
            "/notes/zeta",
            "/notes/A.md",
            "/notes/a.md",
            "/notes/b.md",
            "/notes/zeta/c.md",
            "/notes/Alpha/d.md",
        ]
    );
    Ok(())
}

#[tokio::test]
async fn ignored_and_non_markdown_entries_are_filtered() -> Result<()> {
    let fixture = Fixture::new();
    fixture
        .bridge
        .add_file("/notes/readme.md", "")
        .add_file("/notes/todo.txt", "")
        .add_file("/notes/upper.MD", "")
        .add_file("/notes/.hidden.md", "")
        .add_file("/notes/node_modules/pkg/readme.md", "")
        .add_file("/notes/.git/description.md", "")
        .add_file("/notes/build/out.md", "")
        .add_file("/notes/con", "")
        .add_file("/notes/docs/guide.md", "");
    let store = fixture.store(ManualClock::new(0, 1));

    let files = store.list_markdown_tree("/notes").await?;
    assert_eq!(
        paths(&files),
        vec!["/notes/docs", "/notes/docs/guide.md", "/notes/readme.md"]
    );
    assert!(files
        .iter()
        .filter(|file| !file.is_directory)
        .all(|file| file.name.ends_with(".md")));
    Ok(())
}

#[tokio::test]
async fn ignored_root_yields_empty_list() -> Result<()> {
    let fixture = Fixture::new();
    fixture.bridge.add_file("/work/node_modules/a.md", "");
    let store = fixture.store(ManualClock::new(0, 1));

    assert!(store.list_markdown_tree("/work/node_modules").await?.is_empty());
    assert!(!fixture.bridge.listed_paths().contains(&"/work/node_modules".to_string()));
    Ok(())
}

#[tokio::test]
async fn failed_walk_leaves_state_untouched() -> Result<()> {
    let fixture = Fixture::new();
    fixture
        .bridge
        .add_file("/good/a.md", "")
        .add_file("/bad/ok.md", "")
        .add_file("/bad/locked/secret.md", "")
        .fail_on("/bad/locked");
    let mut store = fixture.store(ManualClock::new(0, 1));

    store.switch_directory("/good").await?;
    fixture.notifier.drain();
    let before = store.state().clone();

    let err = store.switch_directory("/bad").await.unwrap_err();
    assert!(matches!(err, SyncError::Bridge(_)));
    assert_eq!(store.state(), &before);
    assert_eq!(store.state().current_dir.as_deref(), Some("/good"));

    let notes = fixture.notifier.drain();
    assert_eq!(notes.len(), 1);
    assert_eq!(notes[0].level, NotificationLevel::Error);
    Ok(())
}

#[tokio::test]
async fn mode_switch_restores_memory_index_and_local_directory() -> Result<()> {
    let fixture = Fixture::new();
    fixture.bridge.add_file("/notes/a.md", "# a");
    let mut store = fixture.store(ManualClock::new(0, 1));
    let mut documents = PostStore::with_posts(vec![
        Post::new("one", "1"),
        Post::new("two", "2"),
        Post::new("three", "3"),
    ]);
    documents.set_active_index(2);

    store.switch_directory("/notes").await?;
    store.switch_mode(DocumentMode::Local, &mut documents).await?;
    assert_eq!(store.state().last_memory_index, 2);
    assert_eq!(store.state().current_mode, DocumentMode::Local);
    assert_eq!(store.state().current_dir.as_deref(), Some("/notes"));

    documents.set_active_index(0);
    store.switch_mode(DocumentMode::Memory, &mut documents).await?;
    assert_eq!(documents.active_index(), 2);
    assert_eq!(store.state().last_local_path.as_deref(), Some("/notes"));

    fixture.bridge.add_file("/notes/b.md", "# b");
    store.switch_mode(DocumentMode::Local, &mut documents).await?;
    assert_eq!(store.state().local_files.len(), 2);
    Ok(())
}

#[tokio::test]
async fn switching_to_local_without_history_only_changes_mode() -> Result<()> {
    let fixture = Fixture::new();
    let mut store = fixture.store(ManualClock::new(0, 1));
    let mut documents = PostStore::new();

    store.switch_mode(DocumentMode::Local, &mut documents).await?;

    assert_eq!(store.state().current_mode, DocumentMode::Local);
    assert!(store.state().current_dir.is_none());
    assert!(fixture.bridge.listed_paths().is_empty());
    Ok(())
}

#[tokio::test]
async fn open_file_replaces_existing_document_or_appends() -> Result<()> {
    let fixture = Fixture::new();
    fixture
        .bridge
        .add_file_modified("/notes/a.md", "first", 10)
        .add_file("/notes/b.md", "bee");
    let mut store = fixture.store(ManualClock::new(0, 1));
    store.switch_directory("/notes").await?;

    let mut documents = PostStore::with_posts(vec![Post::new("memo", "keep")]);
    let a = store.local_file("/notes/a.md").cloned().unwrap();
    let b = store.local_file("/notes/b.md").cloned().unwrap();

    assert_eq!(store.open_file(&a, &mut documents).await?, 1);
    assert_eq!(store.open_file(&b, &mut documents).await?, 2);
    assert_eq!(documents.active_index(), 2);

    fixture.bridge.add_file_modified("/notes/a.md", "second", 20);
    assert_eq!(store.open_file(&a, &mut documents).await?, 1);
    assert_eq!(documents.len(), 3);
    assert_eq!(documents.documents()[1].content, "second");
    assert_eq!(documents.documents()[1].last_modified, Some(10));
    assert_eq!(documents.documents()[0].content, "keep");
    Ok(())
}

#[tokio::test]
async fn read_failure_keeps_documents() -> Result<()> {
    let fixture = Fixture::new();
    fixture.bridge.add_file("/notes/a.md", "x").fail_on("/notes/a.md");
    let store = fixture.store(ManualClock::new(0, 1));
    let mut documents = PostStore::new();

    let file = LocalFile::file("/notes/a.md", "a.md", 0);
    assert!(store.open_file(&file, &mut documents).await.is_err());
    assert!(documents.is_empty());
    Ok(())
}

#[tokio::test]
async fn state_is_persisted_and_reloaded() -> Result<()> {
    let fixture = Fixture::new();
    fixture.bridge.add_file("/notes/a.md", "");
    fixture.bridge.queue_dialog(OpenDialogResult::selected("/notes"));

    let mut store = fixture.store(ManualClock::new(500, 1));
    assert!(store.open_directory().await?);
    let saved = store.state().clone();

    let raw = fixture.storage.get_item(STATE_KEY)?.unwrap();
    assert!(raw.contains("\"recentDirs\""));
    assert!(raw.contains("\"localFiles\""));

    let reloaded = fixture.store(ManualClock::new(0, 1));
    assert_eq!(reloaded.state(), &saved);
    assert_eq!(reloaded.state().recent_dirs.get(0).map(|dir| dir.last_access), Some(500));
    Ok(())
}

#[tokio::test]
async fn corrupt_state_falls_back_to_defaults() {
    let storage = MemoryStorage::with_item(STATE_KEY, "{ not json");
    let store = LocalDirectoryStore::new(Arc::new(MemoryBridge::new()), Box::new(storage.clone()));

    assert_eq!(store.state(), &DirectorySyncState::default());
    assert!(matches!(
        storage::parse_state("{ not json"),
        Err(SyncError::Parse(_))
    ));
}

#[tokio::test]
async fn oversized_recent_list_is_normalized_on_load() {
    let mut raw = String::from("{\"recentDirs\":[");
    for index in 0..8 {
        if index > 0 {
            raw.push(',');
        }
        raw.push_str(&format!("{{\"path\":\"/d{}\",\"lastAccess\":{}}}", index % 6, index));
    }
    raw.push_str("]}");

    let state = storage::load_state(&MemoryStorage::with_item(STATE_KEY, &raw));
    let recent: Vec<&str> = state.recent_dirs.iter().map(|dir| dir.path.as_str()).collect();
    assert_eq!(recent, vec!["/d1", "/d0", "/d5", "/d4", "/d3"]);
}
