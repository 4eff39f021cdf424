//! Consistency check of exported bundles against the source bundle.

use std::fmt;
use std::path::Path;

use serde_json::Value;

use crate::sync::export::output_path;
use crate::sync::flatten::flatten;
use crate::types::{
    FlatMessages,
    MessageValue,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IssueKind {
    /// The locale file does not exist or is not valid JSON.
    FileMissing,
    Missing,
    Empty,
    /// Text in one bundle, array in the other.
    TypeMismatch,
    /// Only present in the locale file.
    Extra,
}

impl fmt::Display for IssueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::FileMissing => "translation file missing or unreadable",
            Self::Missing => "missing",
            Self::Empty => "empty translation",
            Self::TypeMismatch => "type differs from source",
            Self::Extra => "not in source",
        };
        f.write_str(text)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckIssue {
    pub locale: String,
    /// Flattened key, or the file path for [`IssueKind::FileMissing`].
    pub key: String,
    pub kind: IssueKind,
}

impl fmt::Display for CheckIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.locale, self.key, self.kind)
    }
}

/// Compares flattened `source` and `target` messages of `locale`.
#[must_use]
pub fn compare(locale: &str, source: &FlatMessages, target: &FlatMessages) -> Vec<CheckIssue> {
    let issue = |key: &str, kind| CheckIssue { locale: locale.to_string(), key: key.to_string(), kind };
    let mut issues = Vec::new();

    for (key, source_value) in source {
        let kind = match (source_value, target.get(key)) {
            (_, None) => IssueKind::Missing,
            (MessageValue::Text(_), Some(MessageValue::List(_)))
            | (MessageValue::List(_), Some(MessageValue::Text(_))) => IssueKind::TypeMismatch,
            (_, Some(MessageValue::Text(text))) if text.trim().is_empty() => IssueKind::Empty,
            _ => continue,
        };
        issues.push(issue(key.as_str(), kind));
    }

    issues.extend(
        target
            .keys()
            .filter(|key| !source.contains_key(*key))
            .map(|key| issue(key.as_str(), IssueKind::Extra)),
    );

    issues
}

/// Checks the bundle of every locale written next to `source_file`.
///
/// Output files may be nested or flat; both are flattened before comparing.
#[must_use]
pub fn check_locales(source: &Value, source_file: &Path, locales: &[String]) -> Vec<CheckIssue> {
    let source_messages = flatten(source);
    let mut issues = Vec::new();

    for locale in locales {
        let path = output_path(source_file, locale);
        let target = std::fs::read_to_string(&path)
            .map_err(|e| e.to_string())
            .and_then(|raw| serde_json::from_str::<Value>(&raw).map_err(|e| e.to_string()));

        match target {
            Ok(target) => issues.extend(compare(locale, &source_messages, &flatten(&target))),
            Err(error) => {
                tracing::warn!(locale = %locale, path = %path.display(), %error, "Translation file not readable");
                issues.push(CheckIssue {
                    locale: locale.clone(),
                    key: path.display().to_string(),
                    kind: IssueKind::FileMissing,
                });
            }
        }
    }

    if issues.is_empty() {
        tracing::info!(locales = locales.len(), "All translations exist");
    } else {
        tracing::error!(count = issues.len(), "Missing or inconsistent translations");
        for issue in &issues {
            tracing::error!("{issue}");
        }
    }

    issues
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use googletest::prelude::*;
    use serde_json::json;
    use tempfile::TempDir;

    use super::*;

    fn issue(locale: &str, key: &str, kind: IssueKind) -> CheckIssue {
        CheckIssue { locale: locale.to_string(), key: key.to_string(), kind }
    }

    #[googletest::test]
    fn test_compare_reports_every_kind() {
        let source = flatten(&json!({
            "ok": "Fine",
            "missing": "Gone",
            "empty": "Empty",
            "shape": ["a"],
        }));
        let target = flatten(&json!({
            "ok": "Bien",
            "empty": "  ",
            "shape": "a",
            "extra": "Surplus",
        }));

        let issues = compare("fr", &source, &target);

        expect_that!(
            issues,
            elements_are![
                eq(&issue("fr", "missing", IssueKind::Missing)),
                eq(&issue("fr", "empty", IssueKind::Empty)),
                eq(&issue("fr", "shape", IssueKind::TypeMismatch)),
                eq(&issue("fr", "extra", IssueKind::Extra))
            ]
        );
    }

    #[googletest::test]
    fn test_compare_identical_shapes_pass() {
        let tree = json!({ "a": { "b": "x" }, "list": [] });

        expect_that!(compare("de", &flatten(&tree), &flatten(&tree)), is_empty());
    }

    #[googletest::test]
    fn test_check_locales_reads_nested_and_flat_files() {
        let temp_dir = TempDir::new().unwrap();
        let source_file = temp_dir.path().join("en-US.json");
        let source = json!({ "a": { "b": "Hello" } });
        std::fs::write(temp_dir.path().join("fr.json"), r#"{"a":{"b":"Bonjour"}}"#).unwrap();
        std::fs::write(temp_dir.path().join("de.json"), r#"{"a.b":"Hallo"}"#).unwrap();

        let issues = check_locales(&source, &source_file, &["fr".to_string(), "de".to_string()]);

        expect_that!(issues, is_empty());
    }

    #[googletest::test]
    fn test_check_locales_missing_and_broken_files() {
        let temp_dir = TempDir::new().unwrap();
        let source_file = temp_dir.path().join("en-US.json");
        std::fs::write(temp_dir.path().join("ja.json"), "{ not json").unwrap();

        let issues =
            check_locales(&json!({ "k": "v" }), &source_file, &["fr".to_string(), "ja".to_string()]);

        expect_that!(
            issues,
            elements_are![
                all![
                    field!(CheckIssue.locale, eq("fr")),
                    field!(CheckIssue.kind, eq(&IssueKind::FileMissing))
                ],
                all![
                    field!(CheckIssue.locale, eq("ja")),
                    field!(CheckIssue.kind, eq(&IssueKind::FileMissing))
                ]
            ]
        );
    }

    #[googletest::test]
    fn test_issue_display() {
        expect_that!(
            issue("fr", "a.b", IssueKind::Empty).to_string(),
            eq("[fr] a.b: empty translation")
        );
    }
}
