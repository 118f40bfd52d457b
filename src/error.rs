//! エラーハンドリング
//!
//! スニペット展開で使用されるエラー型を定義する。
//! 展開処理そのものはエラーをホストへ伝播させず、`expander` 側で
//! 「何もしない」結果に縮退させる。

use thiserror::Error;

/// クレート全体のエラー型
#[derive(Error, Debug, Clone)]
pub enum SnippetError {
    /// 設定エラー
    #[error("Configuration error")]
    Config(#[from] ConfigError),

    /// ドキュメント操作エラー
    #[error("Document operation failed")]
    Document(#[from] DocumentError),

    /// I/Oエラー
    #[error("IO error: {message}")]
    Io { message: String },
}

/// 設定固有のエラー
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("Configuration file not found: {path}")]
    NotFound { path: String },

    #[error("Invalid configuration file: {path}")]
    InvalidFile { path: String },

    #[error("Failed to parse configuration: {message}")]
    Parse { message: String },

    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: String, value: String },

    #[error("Configuration directory is unavailable")]
    NoConfigDir,
}

/// ドキュメント操作固有のエラー
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DocumentError {
    #[error("Line {line} is out of range")]
    LineOutOfRange { line: usize },

    #[error("Column {column} is out of range on line {line}")]
    ColumnOutOfRange { line: usize, column: usize },

    #[error("Range end precedes start")]
    InvertedRange,

    #[error("Document is read-only")]
    ReadOnly,
}

/// プロジェクト標準のResult型
pub type Result<T> = std::result::Result<T, SnippetError>;

impl From<std::io::Error> for SnippetError {
    fn from(error: std::io::Error) -> Self {
        SnippetError::Io {
            message: error.to_string(),
        }
    }
}

impl From<serde_json::Error> for SnippetError {
    fn from(error: serde_json::Error) -> Self {
        SnippetError::Config(ConfigError::Parse {
            message: error.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn io_error_conversion_keeps_message() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing.json");
        let error: SnippetError = io.into();
        match error {
            SnippetError::Io { message } => assert!(message.contains("missing.json")),
            _ => panic!("Expected Io error"),
        }
    }

    #[test]
    fn json_error_becomes_parse_error() {
        let json_err = serde_json::from_str::<serde_json::Value>("{ not json").unwrap_err();
        let error: SnippetError = json_err.into();
        assert!(matches!(
            error,
            SnippetError::Config(ConfigError::Parse { .. })
        ));
    }

    #[test]
    fn document_error_display() {
        let error = DocumentError::ColumnOutOfRange { line: 2, column: 40 };
        assert_eq!(error.to_string(), "Column 40 is out of range on line 2");
    }
}
