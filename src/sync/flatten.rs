//! Flattening of nested message trees and diffing against the cache.

use indexmap::IndexMap;
use serde_json::{
    Map,
    Value,
};
use thiserror::Error;

use crate::types::{
    Entry,
    FlatMessages,
    MessageValue,
    WorkingSet,
};

/// Separator between path segments of a flattened key.
pub const KEY_SEPARATOR: char = '.';

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UnflattenError {
    /// One key is a leaf while another key needs it to be an object.
    #[error("Key '{key}' conflicts with key '{conflicting}': a value cannot also be a parent")]
    KeyConflict { key: String, conflicting: String },
}

/// Flatten nested JSON object into dot-separated key map.
///
/// Strings and arrays are leaves; objects are recursed into. Arrays are kept
/// whole even when they contain objects. Numbers and booleans become text
/// leaves, `null` is skipped.
///
/// # Examples
/// ```
/// use serde_json::json;
/// use i18n_sync::sync::flatten::flatten;
/// use i18n_sync::types::MessageValue;
///
/// let json = json!({
///     "menu": {
///         "login": "Log in",
///         "items": ["a", "b"]
///     }
/// });
///
/// let flattened = flatten(&json);
/// assert_eq!(flattened.get("menu.login"), Some(&MessageValue::from("Log in")));
/// assert_eq!(flattened.len(), 2);
/// ```
#[must_use]
pub fn flatten(json: &Value) -> FlatMessages {
    let mut result = FlatMessages::new();
    flatten_value(json, None, &mut result);
    result
}

fn flatten_value(json: &Value, prefix: Option<&str>, result: &mut FlatMessages) {
    match json {
        Value::Object(map) => {
            for (key, value) in map {
                let full_key = prefix
                    .map_or_else(|| key.clone(), |p| format!("{p}{KEY_SEPARATOR}{key}"));
                flatten_value(value, Some(&full_key), result);
            }
        }
        Value::Null => {
            if let Some(key) = prefix {
                tracing::debug!(key, "Skipping null value");
            }
        }
        _ => {
            let Some(key) = prefix else {
                return;
            };
            let leaf = MessageValue::from_json(json)
                .unwrap_or_else(|| MessageValue::Text(json.to_string()));
            if result.insert(key.to_string(), leaf).is_some() {
                tracing::warn!(key, "Duplicate flattened key, the later value wins");
            }
        }
    }
}

/// Builds the working set for one run.
///
/// Each source leaf is compared with the cached entry for its key:
/// - absent from the cache → only the source value
/// - cached source value deep-equal → the whole cached entry, translations included
/// - cached source value differs → only the new source value
#[must_use]
pub fn prepare(source: &Value, source_lang: &str, cache: &IndexMap<String, Entry>) -> WorkingSet {
    let mut working_set = WorkingSet::new();
    let (mut added, mut unchanged, mut changed) = (0_usize, 0_usize, 0_usize);

    for (key, value) in flatten(source) {
        let entry = match cache.get(&key) {
            None => {
                added += 1;
                Entry::with_value(source_lang, value)
            }
            Some(cached) if cached.get(source_lang) == Some(&value) => {
                unchanged += 1;
                cached.clone()
            }
            Some(_) => {
                tracing::debug!(key = %key, "Source text changed, dropping cached translations");
                changed += 1;
                Entry::with_value(source_lang, value)
            }
        };
        working_set.insert(key, entry);
    }

    tracing::info!(added, unchanged, changed, "Prepared working set");
    working_set
}

/// Rebuilds a nested tree from flattened keys.
///
/// # Errors
/// Returns [`UnflattenError::KeyConflict`] when a key is both a leaf and the
/// parent of another key, e.g. `"a"` and `"a.b"`.
pub fn unflatten(data: &FlatMessages) -> Result<Value, UnflattenError> {
    let mut root = Map::new();

    for (key, value) in data {
        let segments: Vec<&str> = key.split(KEY_SEPARATOR).collect();
        let Some((last, parents)) = segments.split_last() else {
            continue;
        };

        let mut current = &mut root;
        for (depth, segment) in parents.iter().enumerate() {
            current = match current
                .entry((*segment).to_string())
                .or_insert_with(|| Value::Object(Map::new()))
            {
                Value::Object(map) => map,
                _ => {
                    let conflicting = parents
                        .iter()
                        .take(depth + 1)
                        .copied()
                        .collect::<Vec<_>>()
                        .join(&KEY_SEPARATOR.to_string());
                    return Err(UnflattenError::KeyConflict { key: key.clone(), conflicting });
                }
            };
        }

        if let Some(Value::Object(_)) = current.get(*last) {
            let child_prefix = format!("{key}{KEY_SEPARATOR}");
            let conflicting = data
                .keys()
                .find(|other| other.starts_with(&child_prefix))
                .cloned()
                .unwrap_or(child_prefix);
            return Err(UnflattenError::KeyConflict { key: key.clone(), conflicting });
        }

        current.insert((*last).to_string(), value.clone().into_json());
    }

    Ok(Value::Object(root))
}
