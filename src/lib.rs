//! mdsync - Markdown エディタのローカルディレクトリ同期層
//!
//! ホストのファイルシステムの一部をアプリ内の文書モデルへ写し、
//! メモリモードとローカルモードを切り替える

// コアモジュール
pub mod clock;
pub mod config;
pub mod error;
pub mod logging;

// データ層
pub mod documents;
pub mod model;
pub mod recent;
pub mod storage;

// 境界
pub mod bridge;
pub mod file;
pub mod notify;

// ロジック層
pub mod ignore;
pub mod store;
pub mod walk;

// 表示層
pub mod frontend;

// 公開API
pub use bridge::{Bridge, MemoryBridge, NativeBridge, OpenDialogOptions, OpenDialogResult};
pub use config::SyncOptions;
pub use documents::{DocumentStore, Post, PostStore};
pub use error::{BridgeError, Result, SyncError};
pub use frontend::TuiApplication;
pub use model::{DirectorySyncState, DocumentMode, LocalDirectory, LocalFile};
pub use store::LocalDirectoryStore;
pub use walk::WalkOptions;
