//! 変更イベント
//!
//! ホストのテキスト変更通知を表す型。位置はすべて文字単位。

use std::sync::atomic::{AtomicU64, Ordering};

/// ドキュメントの一意識別子
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DocumentId(pub u64);

impl DocumentId {
    /// 新しい識別子を払い出す
    pub fn next() -> Self {
        static NEXT_ID: AtomicU64 = AtomicU64::new(1);
        DocumentId(NEXT_ID.fetch_add(1, Ordering::Relaxed))
    }
}

/// 行・文字位置
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Position {
    pub line: usize,
    pub character: usize,
}

impl Position {
    pub fn new(line: usize, character: usize) -> Self {
        Self { line, character }
    }
}

/// 半開区間 `[start, end)`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextRange {
    pub start: Position,
    pub end: Position,
}

impl TextRange {
    pub fn new(start: Position, end: Position) -> Self {
        Self { start, end }
    }

    /// 挿入位置を表す空の範囲
    pub fn empty(at: Position) -> Self {
        Self { start: at, end: at }
    }
}

/// 1件の変更（置換された範囲と挿入テキスト）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentChange {
    pub range: TextRange,
    pub text: String,
}

/// ドキュメント変更通知
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditEvent {
    pub document: DocumentId,
    pub changes: Vec<ContentChange>,
}

impl EditEvent {
    /// 単一挿入イベント
    pub fn insertion(document: DocumentId, at: Position, text: impl Into<String>) -> Self {
        Self {
            document,
            changes: vec![ContentChange {
                range: TextRange::empty(at),
                text: text.into(),
            }],
        }
    }

    /// 変更がちょうど1件ならそれを返す
    pub fn single_change(&self) -> Option<&ContentChange> {
        match self.changes.as_slice() {
            [change] => Some(change),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_ids_are_unique() {
        let a = DocumentId::next();
        let b = DocumentId::next();
        assert_ne!(a, b);
    }

    #[test]
    fn single_change_requires_exactly_one() {
        let id = DocumentId(7);
        let event = EditEvent::insertion(id, Position::new(0, 3), " ");
        assert_eq!(event.single_change().map(|c| c.text.as_str()), Some(" "));

        let empty = EditEvent {
            document: id,
            changes: Vec::new(),
        };
        assert!(empty.single_change().is_none());

        let mut double = event.clone();
        double.changes.push(event.changes[0].clone());
        assert!(double.single_change().is_none());
    }
}
