//! ロギングシステム
//!
//! `log` ファサードの実装。stderr と追記専用ファイルへ出力する

use crate::config::SyncOptions;
use log::{LevelFilter, Log, Metadata, Record, SetLoggerError};
use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;

/// ロガー
#[derive(Debug, Clone)]
pub struct Logger {
    level: LevelFilter,
    output_stderr: bool,
    output_file: Option<PathBuf>,
}

impl Logger {
    pub fn new(level: LevelFilter) -> Self {
        Self {
            level,
            output_stderr: true,
            output_file: None,
        }
    }

    /// 開発者向けロガー
    pub fn for_development() -> Self {
        Self::new(LevelFilter::Debug)
    }

    pub fn level(&self) -> LevelFilter {
        self.level
    }

    pub fn with_level(mut self, level: LevelFilter) -> Self {
        self.level = level;
        self
    }

    pub fn with_file_output<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.output_file = Some(path.into());
        self
    }

    /// 標準エラー出力を無効化（全画面 UI 向け）
    pub fn without_stderr(mut self) -> Self {
        self.output_stderr = false;
        self
    }

    fn should_log(&self, level: log::Level) -> bool {
        level <= self.level
    }

    fn format(record: &Record<'_>) -> String {
        format!("{}: {} in {}", record.level(), record.args(), record.target())
    }

    fn write_line(&self, line: &str) {
        if self.output_stderr {
            eprintln!("{}", line);
        }

        if let Some(path) = &self.output_file {
            if let Ok(mut file) = OpenOptions::new().create(true).append(true).open(path) {
                let _ = writeln!(file, "{}", line);
            }
        }
    }
}

impl Log for Logger {
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        self.should_log(metadata.level())
    }

    fn log(&self, record: &Record<'_>) {
        if self.enabled(record.metadata()) {
            self.write_line(&Self::format(record));
        }
    }

    fn flush(&self) {}
}

/// 設定に従ってグローバルロガーを組み立てる
pub fn build(options: &SyncOptions, stderr: bool) -> Logger {
    let mut logger = Logger::new(options.effective_log_level());
    if !stderr {
        logger = logger.without_stderr();
    }
    if let Some(path) = options.resolve_log_path() {
        if let Some(parent) = path.parent() {
            let _ = std::fs::create_dir_all(parent);
        }
        logger = logger.with_file_output(path);
    }
    logger
}

/// グローバルロガーを設定（二度目以降はエラー）
pub fn init(options: &SyncOptions, stderr: bool) -> Result<(), SetLoggerError> {
    let logger = build(options, stderr);
    let level = logger.level();
    log::set_boxed_logger(Box::new(logger))?;
    log::set_max_level(level);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn logger_respects_log_level() {
        let logger = Logger::for_development().without_stderr();
        assert!(logger.should_log(log::Level::Debug));
        assert!(logger.should_log(log::Level::Error));

        let info_logger = Logger::for_development()
            .with_level(LevelFilter::Info)
            .without_stderr();
        assert!(!info_logger.should_log(log::Level::Debug));
        assert!(info_logger.should_log(log::Level::Warn));
    }

    #[test]
    fn logger_appends_to_file() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("debug.log");
        let logger = Logger::new(LevelFilter::Info)
            .without_stderr()
            .with_file_output(&path);

        logger.log(
            &Record::builder()
                .level(log::Level::Info)
                .target("mdsync::store")
                .args(format_args!("switched"))
                .build(),
        );
        logger.log(
            &Record::builder()
                .level(log::Level::Debug)
                .target("mdsync::store")
                .args(format_args!("hidden"))
                .build(),
        );

        let written = std::fs::read_to_string(&path).unwrap();
        assert_eq!(written, "INFO: switched in mdsync::store\n");
    }

    #[test]
    fn init_installs_global_logger() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("global.log");
        let options = SyncOptions {
            log_path: Some(path.clone()),
            log_level: Some(LevelFilter::Info),
            ..SyncOptions::default()
        };

        init(&options, false).unwrap();
        log::info!(target: "mdsync::logging", "installed");
        assert!(init(&options, false).is_err());

        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.contains("INFO: installed in mdsync::logging"));
    }

    #[test]
    fn build_uses_configured_log_path() {
        let temp_dir = tempdir().unwrap();
        let options = SyncOptions {
            log_path: Some(temp_dir.path().join("nested").join("mdsync.log")),
            development: true,
            ..SyncOptions::default()
        };

        let logger = build(&options, false);
        assert_eq!(logger.level(), LevelFilter::Debug);
        assert!(temp_dir.path().join("nested").exists());
    }
}
