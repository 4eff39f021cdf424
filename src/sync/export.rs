//! Rendering per-locale output bundles from the database.

use std::path::{
    Path,
    PathBuf,
};

use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use serde_json::{
    Map,
    Value,
};

use crate::config::OutputFormat;
use crate::sync::flatten::{
    UnflattenError,
    unflatten,
};
use crate::types::{
    Database,
    FlatMessages,
    MessageValue,
};

/// Tree of `locale` values for every database entry.
///
/// Missing or blank values are exported as `""` so every source key is present.
///
/// # Errors
/// Returns [`UnflattenError`] when `format` is nested and two keys collide.
pub fn export_locale(db: &Database, locale: &str, format: OutputFormat) -> Result<Value, UnflattenError> {
    let messages: FlatMessages = db
        .entries
        .iter()
        .map(|(key, entry)| {
            let value = entry.filled(locale).cloned().unwrap_or_else(|| MessageValue::from(""));
            (key.clone(), value)
        })
        .collect();

    match format {
        OutputFormat::Flat => Ok(Value::Object(
            messages.into_iter().map(|(key, value)| (key, value.into_json())).collect::<Map<_, _>>(),
        )),
        OutputFormat::Nested => unflatten(&messages),
    }
}

/// `<dir of source_file>/<locale>.json`.
#[must_use]
pub fn output_path(source_file: &Path, locale: &str) -> PathBuf {
    source_file.parent().unwrap_or_else(|| Path::new("")).join(format!("{locale}.json"))
}

/// Serializes `value` with `indent` spaces per level, or compactly when `indent` is 0.
///
/// # Errors
/// Propagates serialization errors.
pub fn to_json_string(value: &Value, indent: usize) -> serde_json::Result<String> {
    if indent == 0 {
        return serde_json::to_string(value);
    }

    let indent = " ".repeat(indent);
    let mut buffer = Vec::new();
    let mut serializer =
        serde_json::Serializer::with_formatter(&mut buffer, PrettyFormatter::with_indent(indent.as_bytes()));
    value.serialize(&mut serializer)?;
    Ok(String::from_utf8_lossy(&buffer).into_owned())
}
