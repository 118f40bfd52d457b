//! 設定の読み込み
//!
//! ルール定義は JSON で与えられ、イベントごとに読み直される。
//! 型の合わないフィールドはエラーにせずデフォルト値へフォールバックする。
//!
//! ```json
//! {
//!   "replacements": {
//!     "/d":     { "replace": "${date}", "onlyOnEmptyLine": true },
//!     "/t":     { "replace": "${time}", "insertAtCurrentPosition": true },
//!     "//todo": { "replace": "// TODO(${date}): " }
//!   },
//!   "extensions": [".cpp", ".h"],
//!   "matchPolicy": "firstDeclared"
//! }
//! ```

use std::path::{Path, PathBuf};

use log::{debug, warn};
use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};

use crate::error::{ConfigError, Result};
use crate::rule::{MatchPolicy, Rule, RuleSet, DEFAULT_MARKER};

/// デフォルトで対象とするファイル拡張子
pub const DEFAULT_EXTENSIONS: [&str; 2] = [".cpp", ".h"];

/// 設定ファイル名
pub const CONFIG_FILE_NAME: &str = "snippets.json";

/// 展開設定
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpanderConfig {
    pub rules: RuleSet,
    pub extensions: Vec<String>,
}

impl Default for ExpanderConfig {
    fn default() -> Self {
        Self {
            rules: RuleSet::default(),
            extensions: DEFAULT_EXTENSIONS.iter().map(|ext| ext.to_string()).collect(),
        }
    }
}

impl ExpanderConfig {
    pub fn new(rules: RuleSet) -> Self {
        Self {
            rules,
            ..Self::default()
        }
    }

    pub fn with_extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.extensions = extensions.into_iter().map(Into::into).collect();
        self
    }

    /// パスが対象拡張子で終わるか
    pub fn accepts_path(&self, path: &Path) -> bool {
        let path = path.to_string_lossy();
        self.extensions.iter().any(|ext| path.ends_with(ext.as_str()))
    }

    /// JSON 文字列から設定を読み込む
    pub fn from_json_str(source: &str) -> Result<Self> {
        let raw: RawConfig = serde_json::from_str(source)?;
        Ok(raw.into_config())
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawConfig {
    #[serde(default, deserialize_with = "lenient_map")]
    replacements: Map<String, Value>,
    /// エディタ設定形式のキー。`replacements` と併記された場合は後ろに連結する
    #[serde(
        default,
        rename = "cppSnippetReplacer.replacements",
        deserialize_with = "lenient_map"
    )]
    editor_replacements: Map<String, Value>,
    #[serde(default)]
    extensions: Option<Vec<String>>,
    #[serde(default)]
    marker: Option<char>,
    #[serde(default)]
    match_policy: MatchPolicy,
}

impl RawConfig {
    fn into_config(self) -> ExpanderConfig {
        let marker = self.marker.unwrap_or(DEFAULT_MARKER);
        let mut rules = RuleSet::default().with_policy(self.match_policy);

        let editor_only = self
            .editor_replacements
            .iter()
            .filter(|(key, _)| !self.replacements.contains_key(key.as_str()));

        for (key, value) in self.replacements.iter().chain(editor_only) {
            if let Some(rule) = parse_rule(key, value, marker) {
                rules.push(rule);
            }
        }

        ExpanderConfig {
            rules,
            extensions: self.extensions.unwrap_or_else(|| {
                DEFAULT_EXTENSIONS.iter().map(|ext| ext.to_string()).collect()
            }),
        }
    }
}

/// オブジェクト以外（`null` を含む）は空のルール表として扱う
fn lenient_map<'de, D>(deserializer: D) -> std::result::Result<Map<String, Value>, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Object(map) => Ok(map),
        Value::Null => Ok(Map::new()),
        other => {
            warn!("replacements must be an object, got {}; ignored", other);
            Ok(Map::new())
        }
    }
}

fn parse_rule(key: &str, value: &Value, marker: char) -> Option<Rule> {
    let Some(template) = value.get("replace").and_then(Value::as_str) else {
        warn!("rule {:?} has no string `replace`; skipped", key);
        return None;
    };

    let Some(rule) = Rule::with_marker(key, template, marker) else {
        debug!("key {:?} does not start with marker {:?}; skipped", key, marker);
        return None;
    };

    Some(
        rule.only_on_empty_line(flag(value, "onlyOnEmptyLine"))
            .insert_at_current_position(flag(value, "insertAtCurrentPosition")),
    )
}

fn flag(value: &Value, name: &str) -> bool {
    value.get(name).and_then(Value::as_bool).unwrap_or(false)
}

/// 設定の取得元
///
/// `load` はイベントごとに呼ばれる。キャッシュはしない。
pub trait RuleSource {
    fn load(&self) -> Result<ExpanderConfig>;
}

/// メモリ上の固定設定
#[derive(Debug, Clone, Default)]
pub struct StaticRuleSource {
    config: ExpanderConfig,
}

impl StaticRuleSource {
    pub fn new(config: ExpanderConfig) -> Self {
        Self { config }
    }
}

impl RuleSource for StaticRuleSource {
    fn load(&self) -> Result<ExpanderConfig> {
        Ok(self.config.clone())
    }
}

/// JSON ファイルから毎回読み込む
#[derive(Debug, Clone)]
pub struct FileRuleSource {
    path: PathBuf,
}

impl FileRuleSource {
    /// `~` や環境変数を展開してパスを設定する
    pub fn new(path: impl AsRef<str>) -> Result<Self> {
        let expanded = shellexpand::full(path.as_ref()).map_err(|err| {
            ConfigError::InvalidValue {
                key: "path".to_string(),
                value: err.to_string(),
            }
        })?;
        Ok(Self {
            path: PathBuf::from(expanded.as_ref()),
        })
    }

    /// `<config_dir>/altre/snippets.json`
    pub fn default_location() -> Result<Self> {
        let dir = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
        Ok(Self {
            path: dir.join("altre").join(CONFIG_FILE_NAME),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl RuleSource for FileRuleSource {
    fn load(&self) -> Result<ExpanderConfig> {
        if !self.path.exists() {
            return Err(ConfigError::NotFound {
                path: self.path.display().to_string(),
            }
            .into());
        }
        let source = std::fs::read_to_string(&self.path)?;
        ExpanderConfig::from_json_str(&source).map_err(|err| {
            warn!("failed to parse {}: {}", self.path.display(), err);
            ConfigError::InvalidFile {
                path: self.path.display().to_string(),
            }
            .into()
        })
    }
}
