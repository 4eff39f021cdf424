//! Core types used throughout the project.

use chrono::{
    SecondsFormat,
    Utc,
};
use indexmap::IndexMap;
use serde::{
    Deserialize,
    Serialize,
};
use serde_json::Value;

/// Locale identifier such as `en-US` or `zh-CN`.
///
/// Membership in the supported set is checked by [`crate::locale::language_name`].
pub type Locale = String;

/// Flattened key → leaf value, in source order.
pub type FlatMessages = IndexMap<String, MessageValue>;

/// Transient per-run map of key → entry produced by diffing the source against the cache.
pub type WorkingSet = IndexMap<String, Entry>;

/// A translatable leaf.
///
/// Arrays are opaque: they are never flattened further even if they contain objects.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum MessageValue {
    Text(String),
    List(Vec<Value>),
}

impl MessageValue {
    /// `true` for the empty string. Arrays are never blank, even when empty.
    #[must_use]
    pub const fn is_blank(&self) -> bool {
        match self {
            Self::Text(text) => text.is_empty(),
            Self::List(_) => false,
        }
    }

    /// Canonical text form: the string itself, or the compact JSON of an array.
    #[must_use]
    pub fn to_canonical_string(&self) -> String {
        match self {
            Self::Text(text) => text.clone(),
            Self::List(items) => serde_json::to_string(items).unwrap_or_default(),
        }
    }

    /// Converts a JSON value into a leaf, if it is one.
    #[must_use]
    pub fn from_json(value: &Value) -> Option<Self> {
        match value {
            Value::String(text) => Some(Self::Text(text.clone())),
            Value::Array(items) => Some(Self::List(items.clone())),
            _ => None,
        }
    }

    #[must_use]
    pub fn into_json(self) -> Value {
        match self {
            Self::Text(text) => Value::String(text),
            Self::List(items) => Value::Array(items),
        }
    }
}

impl From<&str> for MessageValue {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl From<String> for MessageValue {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

/// Per-key record: locale → value plus the time any locale last changed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Entry {
    #[serde(flatten)]
    pub values: IndexMap<Locale, MessageValue>,

    /// ISO-8601 timestamp.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_update: Option<String>,
}

impl Entry {
    /// Entry holding a single locale value and no timestamp.
    #[must_use]
    pub fn with_value(locale: &str, value: MessageValue) -> Self {
        let mut values = IndexMap::new();
        values.insert(locale.to_string(), value);
        Self { values, last_update: None }
    }

    #[must_use]
    pub fn get(&self, locale: &str) -> Option<&MessageValue> {
        self.values.get(locale)
    }

    /// Value for `locale` unless it is absent or blank.
    #[must_use]
    pub fn filled(&self, locale: &str) -> Option<&MessageValue> {
        self.values.get(locale).filter(|value| !value.is_blank())
    }

    pub fn set(&mut self, locale: &str, value: MessageValue) {
        self.values.insert(locale.to_string(), value);
    }
}

/// The persisted translation cache.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Database {
    pub source_lang: Locale,

    #[serde(default)]
    pub non_translatable: Vec<String>,

    #[serde(default)]
    pub glossary: Glossary,

    #[serde(default)]
    pub entries: IndexMap<String, Entry>,
}

impl Database {
    /// Empty database for `source_lang`.
    #[must_use]
    pub fn new(source_lang: impl Into<Locale>) -> Self {
        Self {
            source_lang: source_lang.into(),
            non_translatable: Vec::new(),
            glossary: Glossary::new(),
            entries: IndexMap::new(),
        }
    }
}

/// Locale → list of `{ source term: translation }` maps.
pub type Glossary = IndexMap<Locale, Vec<IndexMap<String, String>>>;

/// Current time in the same format JavaScript's `toISOString` produces.
#[must_use]
pub fn now_timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}
