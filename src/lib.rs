//! altre-snippet - トリガー型スニペット展開
//!
//! 行末のトリガーキーの直後にスペースが入力されると、
//! 設定されたテンプレートでキー（または行全体）を置き換える。
//!
//! 判定は `matcher::decide` が純粋関数として行い、
//! ドキュメントへの書き込みは `expander::SnippetExpander` が担う。

// コアモジュール
pub mod error;
pub mod logging;

// データ層
pub mod config;
pub mod event;
pub mod rule;

// ロジック層
pub mod indent;
pub mod matcher;
pub mod template;

// 編集層
pub mod document;
pub mod expander;

// 公開API
pub use config::{ExpanderConfig, FileRuleSource, RuleSource, StaticRuleSource};
pub use document::{LineDocument, TextDocument};
pub use error::{ConfigError, DocumentError, Result, SnippetError};
pub use event::{ContentChange, DocumentId, EditEvent, Position, TextRange};
pub use expander::{ChangeListener, ExpansionOutcome, SkipReason, SnippetExpander};
pub use matcher::{decide, LineSpan, ReplacementAction};
pub use rule::{MatchPolicy, Rule, RuleKind, RuleSet};
pub use template::{Clock, FixedClock, SystemClock, TokenValues};
