//! ファイル操作モジュール
//!
//! - 書き込みは一時ファイル経由で置き換え
//! - ディレクトリ入力の補完

pub mod completion;
pub mod io;

pub use completion::{CompletionResult, DirectoryCompletion};
pub use io::{read_optional, write_file, write_file_async};
