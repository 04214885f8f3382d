use std::collections::HashSet;

use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;
use tracing::warn;

use crate::normalize::is_normalized;
use crate::rule::DESCRIPTIVE_LINK_TEXT;

pub const DEFAULT_LINK_TEXTS: &[&str] = &[
    "click here",
    "here",
    "learn more",
    "link",
    "more",
    "read more",
];

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid configuration json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("configuration must be an object, found {found}")]
    NotAnObject { found: &'static str },
    #[error("options for `{rule}` must be a boolean or an object, found {found}")]
    InvalidOptions { rule: String, found: &'static str },
    #[error("`link_texts` must be an array of strings, found {found}")]
    InvalidLinkTexts { found: &'static str },
    #[error("`link_texts[{index}]` must be a string, found {found}")]
    InvalidLinkText { index: usize, found: &'static str },
    #[error("`{first}` and `{second}` both configure the same rule")]
    DuplicateRule { first: String, second: String },
}

/// Options of the descriptive-link-text rule.
#[derive(Clone, Debug, Eq, PartialEq, Deserialize)]
#[serde(try_from = "Value")]
pub struct RuleConfig {
    pub enabled: bool,
    /// Replacement for the built-in phrase list. `None` keeps the defaults.
    pub link_texts: Option<Vec<String>>,
}

impl Default for RuleConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            link_texts: None,
        }
    }
}

impl RuleConfig {
    /// Reads the rule's own options value: `true`/`null` enable the rule with
    /// defaults, `false` disables it, an object carries `link_texts`.
    ///
    /// Configured phrases that are not in normalized form can never match and
    /// are reported with a warning here, once per configuration.
    pub fn from_value(value: &Value) -> Result<Self, ConfigError> {
        Self::from_named_value(DESCRIPTIVE_LINK_TEXT.names[0], value)
    }

    fn from_named_value(rule: &str, value: &Value) -> Result<Self, ConfigError> {
        match value {
            Value::Null => Ok(Self::default()),
            Value::Bool(enabled) => Ok(Self {
                enabled: *enabled,
                link_texts: None,
            }),
            Value::Object(options) => {
                let link_texts = options.get("link_texts").map(link_texts).transpose()?.flatten();
                for phrase in link_texts.iter().flatten() {
                    if !is_normalized(phrase) {
                        warn!(
                            rule,
                            phrase = phrase.as_str(),
                            "configured link text is not normalized and will never match"
                        );
                    }
                }
                Ok(Self {
                    enabled: true,
                    link_texts,
                })
            }
            other => Err(ConfigError::InvalidOptions {
                rule: rule.to_string(),
                found: value_kind(other),
            }),
        }
    }

    /// Resolves the phrase set for one run.
    pub fn banned_phrases(&self) -> BannedPhrases {
        BannedPhrases::resolve(self.link_texts.as_deref())
    }
}

impl TryFrom<Value> for RuleConfig {
    type Error = ConfigError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        Self::from_value(&value)
    }
}

// Falsy values fall back to the defaults; anything else must be strings.
fn link_texts(value: &Value) -> Result<Option<Vec<String>>, ConfigError> {
    match value {
        Value::Null | Value::Bool(false) => Ok(None),
        Value::String(text) if text.is_empty() => Ok(None),
        Value::Array(items) => items
            .iter()
            .enumerate()
            .map(|(index, item)| match item {
                Value::String(text) => Ok(text.clone()),
                other => Err(ConfigError::InvalidLinkText {
                    index,
                    found: value_kind(other),
                }),
            })
            .collect::<Result<Vec<_>, _>>()
            .map(Some),
        other => Err(ConfigError::InvalidLinkTexts {
            found: value_kind(other),
        }),
    }
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// A whole linter configuration file, keyed by rule name, alias or tag.
///
/// Only the entries that concern this rule are kept. `default` toggles every
/// rule, a boolean under one of the rule's tags (`links`, `accessibility`)
/// toggles every rule carrying it, and the rule's own entry may use either of
/// its names in any case. The rule's own entry takes precedence over tags,
/// and tags over `default`. When tags disagree, disabling wins.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LintConfig {
    default_enabled: Option<bool>,
    tag_enabled: Option<bool>,
    rule: Option<(String, Value)>,
}

impl LintConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let entries = match serde_json::from_str::<Value>(json)? {
            Value::Object(entries) => entries,
            other => {
                return Err(ConfigError::NotAnObject {
                    found: value_kind(&other),
                });
            }
        };

        let mut config = Self::default();
        for (key, value) in entries {
            if key == "default" {
                config.default_enabled = value.as_bool();
            } else if DESCRIPTIVE_LINK_TEXT.is_named(&key) {
                if let Some((first, _)) = config.rule.take() {
                    return Err(ConfigError::DuplicateRule { first, second: key });
                }
                config.rule = Some((key, value));
            } else if DESCRIPTIVE_LINK_TEXT.has_tag(&key) {
                if let Some(enabled) = value.as_bool() {
                    config.tag_enabled = Some(config.tag_enabled.unwrap_or(true) && enabled);
                }
            }
        }
        Ok(config)
    }

    pub fn rule_config(&self) -> Result<RuleConfig, ConfigError> {
        match &self.rule {
            Some((key, value)) => RuleConfig::from_named_value(key, value),
            None => Ok(RuleConfig {
                enabled: self.tag_enabled.or(self.default_enabled).unwrap_or(true),
                link_texts: None,
            }),
        }
    }
}

/// Phrases that make a link non-descriptive, compared against normalized
/// label text.
///
/// Configured entries are used as written, so they have to be given in
/// normalized form (lowercase, single spaces, no punctuation) to ever match.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct BannedPhrases {
    phrases: HashSet<String>,
}

impl BannedPhrases {
    pub fn defaults() -> Self {
        Self {
            phrases: DEFAULT_LINK_TEXTS
                .iter()
                .map(|phrase| phrase.to_string())
                .collect(),
        }
    }

    /// Uses `configured` unless it is absent or empty.
    pub fn resolve(configured: Option<&[String]>) -> Self {
        match configured {
            Some(phrases) if !phrases.is_empty() => Self {
                phrases: phrases.iter().cloned().collect(),
            },
            _ => Self::defaults(),
        }
    }

    pub fn contains(&self, normalized: &str) -> bool {
        self.phrases.contains(normalized)
    }

    pub fn len(&self) -> usize {
        self.phrases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.phrases.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.phrases.iter().map(String::as_str)
    }
}

impl Default for BannedPhrases {
    fn default() -> Self {
        Self::defaults()
    }
}
