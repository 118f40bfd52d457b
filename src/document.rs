//! ドキュメント抽象
//!
//! 展開処理がホストエディタに要求する最小限の操作と、
//! 行ベースのインメモリ実装。

use std::path::{Path, PathBuf};

use crate::error::{DocumentError, Result};
use crate::event::{DocumentId, EditEvent, Position, TextRange};
use crate::matcher::char_to_byte_index;

/// ホストが提供する編集可能ドキュメント
pub trait TextDocument {
    fn id(&self) -> DocumentId;

    /// ファイルパス（拡張子判定に使用）
    fn path(&self) -> &Path;

    /// 改行を含まない行テキスト
    fn line_text(&self, line: usize) -> Option<String>;

    /// 範囲を置換する。テキストは改行を含んでもよい
    fn replace(&mut self, range: TextRange, text: &str) -> Result<()>;

    /// 行全体を表す範囲
    fn line_range(&self, line: usize) -> Option<TextRange> {
        let len = self.line_text(line)?.chars().count();
        Some(TextRange::new(
            Position::new(line, 0),
            Position::new(line, len),
        ))
    }
}

/// 行単位で保持するインメモリドキュメント
#[derive(Debug, Clone)]
pub struct LineDocument {
    id: DocumentId,
    path: PathBuf,
    lines: Vec<String>,
    read_only: bool,
}

impl LineDocument {
    pub fn new(path: impl Into<PathBuf>, text: &str) -> Self {
        Self {
            id: DocumentId::next(),
            path: path.into(),
            lines: text.split('\n').map(str::to_string).collect(),
            read_only: false,
        }
    }

    pub fn read_only(mut self) -> Self {
        self.read_only = true;
        self
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// テキストを挿入し、対応する変更イベントを返す（入力のシミュレーション）
    pub fn insert(&mut self, at: Position, text: &str) -> Result<EditEvent> {
        self.replace(TextRange::empty(at), text)?;
        Ok(EditEvent::insertion(self.id, at, text))
    }

    /// 行末に1文字入力する
    pub fn type_at_line_end(&mut self, line: usize, ch: char) -> Result<EditEvent> {
        let column = self
            .lines
            .get(line)
            .ok_or(DocumentError::LineOutOfRange { line })?
            .chars()
            .count();
        self.insert(Position::new(line, column), &ch.to_string())
    }

    fn byte_offset(&self, position: Position) -> Result<usize> {
        let line = self
            .lines
            .get(position.line)
            .ok_or(DocumentError::LineOutOfRange { line: position.line })?;
        char_to_byte_index(line, position.character).ok_or_else(|| {
            DocumentError::ColumnOutOfRange {
                line: position.line,
                column: position.character,
            }
            .into()
        })
    }
}

impl TextDocument for LineDocument {
    fn id(&self) -> DocumentId {
        self.id
    }

    fn path(&self) -> &Path {
        &self.path
    }

    fn line_text(&self, line: usize) -> Option<String> {
        self.lines.get(line).cloned()
    }

    fn replace(&mut self, range: TextRange, text: &str) -> Result<()> {
        if self.read_only {
            return Err(DocumentError::ReadOnly.into());
        }
        if range.end < range.start {
            return Err(DocumentError::InvertedRange.into());
        }

        let start = self.byte_offset(range.start)?;
        let end = self.byte_offset(range.end)?;

        let head = &self.lines[range.start.line][..start];
        let tail = &self.lines[range.end.line][end..];
        let merged = format!("{}{}{}", head, text, tail);
        let replacement: Vec<String> = merged.split('\n').map(str::to_string).collect();

        self.lines
            .splice(range.start.line..=range.end.line, replacement);
        Ok(())
    }
}

impl std::fmt::Display for LineDocument {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.lines.join("\n"))
    }
}
