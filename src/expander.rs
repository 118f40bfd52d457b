//! スニペット展開
//!
//! 変更通知を受けて適用条件を判定し、`matcher::decide` の結果を
//! ドキュメントへ1回だけ書き込む。失敗はすべて「何もしない」に縮退する。

use log::{debug, info, warn};

use crate::config::{RuleSource, StaticRuleSource};
use crate::document::TextDocument;
use crate::event::{EditEvent, Position, TextRange};
use crate::matcher::{decide, LineSpan, ReplacementAction};
use crate::template::{Clock, SystemClock, TokenValues};

/// 展開を行わなかった理由
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    NoActiveEditor,
    DocumentMismatch,
    UnsupportedExtension,
    NotSingleChange,
    NotSpaceInsertion,
    ConfigUnavailable,
    LineUnavailable,
    EditRejected,
}

/// 1イベントの処理結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExpansionOutcome {
    /// 適用条件を満たさない、または処理中の失敗
    Skipped(SkipReason),
    /// 条件は満たしたが発火したルールが無い
    NoMatch,
    /// 置換を行った
    Expanded { key: String, range: TextRange },
}

impl ExpansionOutcome {
    pub fn is_expanded(&self) -> bool {
        matches!(self, ExpansionOutcome::Expanded { .. })
    }
}

/// 変更通知の購読者
pub trait ChangeListener {
    /// 変更イベントを処理する。`active` はアクティブなエディタのドキュメント
    fn on_change(
        &mut self,
        event: &EditEvent,
        active: Option<&mut dyn TextDocument>,
    ) -> ExpansionOutcome;
}

/// トリガー判定と書き換えを行う展開器
#[derive(Debug, Clone)]
pub struct SnippetExpander<S = StaticRuleSource, C = SystemClock> {
    source: S,
    clock: C,
}

impl<S: RuleSource> SnippetExpander<S, SystemClock> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            clock: SystemClock,
        }
    }
}

impl<S: RuleSource, C: Clock> SnippetExpander<S, C> {
    pub fn with_clock(source: S, clock: C) -> Self {
        Self { source, clock }
    }

    /// 変更通知を処理する
    pub fn on_document_change(
        &self,
        event: &EditEvent,
        active: Option<&mut dyn TextDocument>,
    ) -> ExpansionOutcome {
        let Some(document) = active else {
            return skip(SkipReason::NoActiveEditor);
        };
        if document.id() != event.document {
            return skip(SkipReason::DocumentMismatch);
        }

        let Some(change) = event.single_change() else {
            return skip(SkipReason::NotSingleChange);
        };
        if change.text != " " {
            return skip(SkipReason::NotSpaceInsertion);
        }

        // 拡張子の許可リストも設定に含まれる
        let config = match self.source.load() {
            Ok(config) => config,
            Err(err) => {
                warn!("snippet configuration unavailable: {}", err);
                return skip(SkipReason::ConfigUnavailable);
            }
        };
        if !config.accepts_path(document.path()) {
            return skip(SkipReason::UnsupportedExtension);
        }

        let position = change.range.start;
        let Some(line_text) = document.line_text(position.line) else {
            return skip(SkipReason::LineUnavailable);
        };

        let tokens = TokenValues::capture(&self.clock);
        let Some(action) = decide(&line_text, position.character, &config.rules, &tokens) else {
            return ExpansionOutcome::NoMatch;
        };

        apply(document, position, &line_text, action)
    }
}

impl<S: RuleSource, C: Clock> ChangeListener for SnippetExpander<S, C> {
    fn on_change(
        &mut self,
        event: &EditEvent,
        active: Option<&mut dyn TextDocument>,
    ) -> ExpansionOutcome {
        self.on_document_change(event, active)
    }
}

fn apply(
    document: &mut dyn TextDocument,
    position: Position,
    line_text: &str,
    action: ReplacementAction,
) -> ExpansionOutcome {
    let range = match action.span {
        LineSpan::WholeLine => TextRange::new(
            Position::new(position.line, 0),
            Position::new(position.line, line_text.chars().count()),
        ),
        LineSpan::Columns { start, end } => TextRange::new(
            Position::new(position.line, start),
            Position::new(position.line, end),
        ),
    };

    match document.replace(range, &action.text) {
        Ok(()) => {
            info!(
                "expanded {:?} on line {} of {}",
                action.key,
                position.line,
                document.path().display()
            );
            ExpansionOutcome::Expanded {
                key: action.key,
                range,
            }
        }
        Err(err) => {
            warn!("failed to expand {:?}: {}", action.key, err);
            skip(SkipReason::EditRejected)
        }
    }
}

fn skip(reason: SkipReason) -> ExpansionOutcome {
    debug!("snippet expansion skipped: {:?}", reason);
    ExpansionOutcome::Skipped(reason)
}
