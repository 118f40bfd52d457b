//! 置換ルール
//!
//! トリガーキーと展開テンプレートの組。キーの先頭マーカーで種別が決まる。

use serde::Deserialize;

/// デフォルトのマーカー文字
pub const DEFAULT_MARKER: char = '/';

/// ルール種別
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleKind {
    /// 単一マーカー（例: `/d`）。行末サフィックス一致で部分/行全体を置換
    Prefix,
    /// 二重マーカー（例: `//todo`）。トリム後の行全体が完全一致した場合のみ置換
    CommentLine,
}

impl RuleKind {
    /// キーの先頭からルール種別を判定する。どちらにも該当しなければ `None`
    pub fn classify(key: &str, marker: char) -> Option<Self> {
        let mut chars = key.chars();
        match (chars.next(), chars.next()) {
            (Some(first), Some(second)) if first == marker && second == marker => {
                Some(RuleKind::CommentLine)
            }
            (Some(first), _) if first == marker => Some(RuleKind::Prefix),
            _ => None,
        }
    }
}

/// 複数ルールが同時に成立した場合の選択方針
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MatchPolicy {
    /// 宣言順で最初に成立したルール
    #[default]
    FirstDeclared,
    /// 最も長いキー（同長なら宣言順）
    LongestKey,
}

/// 置換ルール
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rule {
    pub key: String,
    pub template: String,
    pub only_on_empty_line: bool,
    /// `Prefix` ルールでのみ参照される
    pub insert_at_current_position: bool,
    pub kind: RuleKind,
}

impl Rule {
    /// デフォルトマーカーで種別を判定してルールを作成
    pub fn new(key: impl Into<String>, template: impl Into<String>) -> Option<Self> {
        Self::with_marker(key, template, DEFAULT_MARKER)
    }

    pub fn with_marker(
        key: impl Into<String>,
        template: impl Into<String>,
        marker: char,
    ) -> Option<Self> {
        let key = key.into();
        let kind = RuleKind::classify(&key, marker)?;
        Some(Self {
            key,
            template: template.into(),
            only_on_empty_line: false,
            insert_at_current_position: false,
            kind,
        })
    }

    pub fn only_on_empty_line(mut self, value: bool) -> Self {
        self.only_on_empty_line = value;
        self
    }

    pub fn insert_at_current_position(mut self, value: bool) -> Self {
        self.insert_at_current_position = value;
        self
    }

    /// キーの文字数
    pub fn key_len(&self) -> usize {
        self.key.chars().count()
    }
}

/// 宣言順を保持したルール集合
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuleSet {
    rules: Vec<Rule>,
    policy: MatchPolicy,
}

impl RuleSet {
    pub fn new(rules: Vec<Rule>) -> Self {
        Self {
            rules,
            policy: MatchPolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: MatchPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn push(&mut self, rule: Rule) {
        self.rules.push(rule);
    }

    pub fn policy(&self) -> MatchPolicy {
        self.policy
    }

    pub fn iter(&self) -> impl Iterator<Item = &Rule> {
        self.rules.iter()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&Rule> {
        self.rules.iter().find(|rule| rule.key == key)
    }
}

impl FromIterator<Rule> for RuleSet {
    fn from_iter<I: IntoIterator<Item = Rule>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
