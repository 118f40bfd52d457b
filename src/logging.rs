//! ロギングシステム
//!
//! `log` ファサードのバックエンド。標準エラー出力と任意のファイル出力に対応する。
//! ホストが独自のロガーを持つ場合は `init` を呼ばずにそちらを使えばよい。

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use log::{LevelFilter, Log, Metadata, Record};

/// ログレベルを指定する環境変数
pub const LOG_LEVEL_ENV: &str = "ALTRE_SNIPPET_LOG";

/// ロガー
#[derive(Debug, Clone)]
pub struct Logger {
    level: LevelFilter,
    output_stderr: bool,
    output_file: Option<PathBuf>,
}

impl Logger {
    /// デフォルト構築
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

    /// ファイル出力を設定
    pub fn with_file_output<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.output_file = Some(path.into());
        self
    }

    /// 標準エラー出力を無効化（テスト向け）
    pub fn without_stderr(mut self) -> Self {
        self.output_stderr = false;
        self
    }

    fn format_record(record: &Record<'_>) -> String {
        format!(
            "{}: {} [{}]",
            record.level(),
            record.args(),
            record.target()
        )
    }

    fn write_line(&self, message: &str) {
        if self.output_stderr {
            eprintln!("{}", message);
        }

        if let Some(path) = &self.output_file {
            if let Ok(mut file) = OpenOptions::new().create(true).append(true).open(path) {
                let _ = writeln!(file, "{}", message);
            }
        }
    }
}

impl Log for Logger {
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record<'_>) {
        if self.enabled(record.metadata()) {
            self.write_line(&Self::format_record(record));
        }
    }

    fn flush(&self) {}
}

/// ロガーをグローバルに登録する
pub fn init(logger: Logger) -> Result<(), log::SetLoggerError> {
    let level = logger.level();
    log::set_boxed_logger(Box::new(logger))?;
    log::set_max_level(level);
    Ok(())
}

/// 環境変数からレベルを読み取ってロガーを登録する
///
/// `ALTRE_SNIPPET_LOG` が未設定なら `warn`。`log_file` を指定すると追記出力する。
pub fn init_from_env(log_file: Option<&Path>) -> anyhow::Result<()> {
    let level = match std::env::var(LOG_LEVEL_ENV) {
        Ok(value) => parse_level(&value)
            .ok_or_else(|| anyhow::anyhow!("unknown log level: {}", value))?,
        Err(_) => LevelFilter::Warn,
    };

    let mut logger = Logger::new(level);
    if let Some(path) = log_file {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        logger = logger.with_file_output(path);
    }

    init(logger).map_err(|err| anyhow::anyhow!("logger already installed: {}", err))
}

fn parse_level(value: &str) -> Option<LevelFilter> {
    match value.trim().to_ascii_lowercase().as_str() {
        "off" => Some(LevelFilter::Off),
        "error" => Some(LevelFilter::Error),
        "warn" | "warning" => Some(LevelFilter::Warn),
        "info" => Some(LevelFilter::Info),
        "debug" => Some(LevelFilter::Debug),
        "trace" => Some(LevelFilter::Trace),
        _ => None,
    }
}
