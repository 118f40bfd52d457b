//! トリガー判定
//!
//! 1回のスペース入力に対して、どのルールが発火し、行内のどの範囲を
//! 何で置き換えるかを決める純粋関数群。ドキュメントへの書き込みは行わない。

use crate::indent::{indent_block, leading_indent, strip_leading_whitespace};
use crate::rule::{MatchPolicy, Rule, RuleKind, RuleSet};
use crate::template::{substitute_all, substitute_first, TokenValues};

/// 置換対象となる行内の範囲
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineSpan {
    /// 行全体（改行は含まない）
    WholeLine,
    /// 文字単位の半開区間 `[start, end)`
    Columns { start: usize, end: usize },
}

/// 発火したルールに対する置換内容
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplacementAction {
    pub key: String,
    pub kind: RuleKind,
    pub span: LineSpan,
    pub text: String,
}

/// 行スナップショットと挿入位置から置換内容を決定する
///
/// `line_text` は挿入済みのスペースを含む行テキスト、`insertion_column` は
/// スペースが挿入された文字位置。どのルールも発火しなければ `None`。
pub fn decide(
    line_text: &str,
    insertion_column: usize,
    rules: &RuleSet,
    tokens: &TokenValues,
) -> Option<ReplacementAction> {
    let space_at = char_to_byte_index(line_text, insertion_column)?;
    if !line_text[space_at..].starts_with(' ') {
        return None;
    }

    let context = LineContext {
        line_text,
        text_before_space: &line_text[..space_at],
        insertion_column,
        indent: leading_indent(line_text),
    };

    let mut fired = rules
        .iter()
        .filter_map(|rule| evaluate(rule, &context, tokens));

    match rules.policy() {
        MatchPolicy::FirstDeclared => fired.next(),
        MatchPolicy::LongestKey => fired.fold(None, |best: Option<ReplacementAction>, action| {
            match best {
                Some(current) if current.key.chars().count() >= action.key.chars().count() => {
                    Some(current)
                }
                _ => Some(action),
            }
        }),
    }
}

struct LineContext<'a> {
    line_text: &'a str,
    text_before_space: &'a str,
    insertion_column: usize,
    indent: &'a str,
}

fn evaluate(rule: &Rule, context: &LineContext<'_>, tokens: &TokenValues) -> Option<ReplacementAction> {
    match rule.kind {
        RuleKind::Prefix => evaluate_prefix(rule, context, tokens),
        RuleKind::CommentLine => evaluate_comment_line(rule, context, tokens),
    }
}

fn evaluate_prefix(
    rule: &Rule,
    context: &LineContext<'_>,
    tokens: &TokenValues,
) -> Option<ReplacementAction> {
    if !context.text_before_space.ends_with(rule.key.as_str()) {
        return None;
    }

    let key_start_byte = context.text_before_space.len() - rule.key.len();
    let before_key = &context.text_before_space[..key_start_byte];
    if rule.only_on_empty_line && !before_key.trim().is_empty() {
        return None;
    }

    let text = substitute_all(&rule.template, tokens);

    if rule.insert_at_current_position {
        // キー + 挿入されたスペースを置換する
        let start = context.insertion_column - rule.key_len();
        let text = if before_key.starts_with(context.indent) {
            text
        } else {
            format!("{}{}", context.indent, strip_leading_whitespace(&text))
        };
        Some(ReplacementAction {
            key: rule.key.clone(),
            kind: rule.kind,
            span: LineSpan::Columns {
                start,
                end: context.insertion_column + 1,
            },
            text,
        })
    } else {
        Some(ReplacementAction {
            key: rule.key.clone(),
            kind: rule.kind,
            span: LineSpan::WholeLine,
            text: indent_block(&text, context.indent),
        })
    }
}

fn evaluate_comment_line(
    rule: &Rule,
    context: &LineContext<'_>,
    tokens: &TokenValues,
) -> Option<ReplacementAction> {
    if context.line_text.trim() != rule.key {
        return None;
    }
    // キーの直後にスペースが入力された場合に限る
    if !context.text_before_space.ends_with(rule.key.as_str()) {
        return None;
    }

    if rule.only_on_empty_line && !is_key_only_line(context.line_text, &rule.key) {
        return None;
    }

    Some(ReplacementAction {
        key: rule.key.clone(),
        kind: rule.kind,
        span: LineSpan::WholeLine,
        text: substitute_first(&rule.template, tokens),
    })
}

fn is_key_only_line(line_text: &str, key: &str) -> bool {
    let stripped: String = line_text
        .chars()
        .filter(|ch| *ch != ' ' && *ch != '\t')
        .collect();
    stripped == key
}

/// 文字位置をバイト位置へ変換する。行末は `len`、範囲外は `None`
pub(crate) fn char_to_byte_index(text: &str, char_pos: usize) -> Option<usize> {
    if char_pos == 0 {
        return Some(0);
    }
    match text.char_indices().nth(char_pos) {
        Some((idx, _)) => Some(idx),
        None if text.chars().count() == char_pos => Some(text.len()),
        None => None,
    }
}
