//! CSV round trip of the database for human proofreading.
//!
//! Layout: `key, <source>, <target…>, glossary:<target>…, last_update`.
//! Array values travel as JSON text.

use std::collections::HashMap;
use std::fs;
use std::io::{
    Read,
    Write,
};
use std::path::Path;

use serde_json::Value;
use thiserror::Error;

use crate::types::{
    Database,
    Locale,
    MessageValue,
    now_timestamp,
};

const KEY_COLUMN: &str = "key";
const LAST_UPDATE_COLUMN: &str = "last_update";
const GLOSSARY_PREFIX: &str = "glossary:";

#[derive(Error, Debug)]
pub enum SheetError {
    #[error("Sheet has no 'key' column")]
    MissingKeyColumn,

    #[error("Value of '{key}' for {locale} must be a JSON array: {source}")]
    InvalidList { key: String, locale: Locale, source: serde_json::Error },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Source locale first, then every other locale in order of first appearance.
fn sheet_locales(db: &Database) -> Vec<Locale> {
    let mut locales = vec![db.source_lang.clone()];
    for entry in db.entries.values() {
        for locale in entry.values.keys() {
            if !locales.contains(locale) {
                locales.push(locale.clone());
            }
        }
    }
    locales
}

fn glossary_term(db: &Database, locale: &str, source_text: &str) -> Option<String> {
    db.glossary
        .get(locale)?
        .iter()
        .find_map(|terms| terms.get(source_text))
        .cloned()
}

/// Writes `db` as CSV.
///
/// # Errors
/// Returns [`SheetError`] if writing fails.
pub fn write_sheet<W: Write>(writer: W, db: &Database) -> Result<(), SheetError> {
    let mut wtr = csv::Writer::from_writer(writer);
    let locales = sheet_locales(db);
    let targets = locales.get(1..).unwrap_or_default();

    let mut header = vec![KEY_COLUMN.to_string()];
    header.extend(locales.iter().cloned());
    header.extend(targets.iter().map(|locale| format!("{GLOSSARY_PREFIX}{locale}")));
    header.push(LAST_UPDATE_COLUMN.to_string());
    wtr.write_record(&header)?;

    for (key, entry) in &db.entries {
        let mut row = vec![key.clone()];
        row.extend(
            locales
                .iter()
                .map(|locale| entry.get(locale).map(MessageValue::to_canonical_string).unwrap_or_default()),
        );

        let source_text = match entry.get(&db.source_lang) {
            Some(MessageValue::Text(text)) => Some(text.as_str()),
            _ => None,
        };
        row.extend(targets.iter().map(|locale| {
            source_text.and_then(|text| glossary_term(db, locale, text)).unwrap_or_default()
        }));

        row.push(entry.last_update.clone().unwrap_or_default());
        wtr.write_record(&row)?;
    }

    wtr.flush()?;
    Ok(())
}

/// Writes `db` as CSV to `path`, creating parent directories.
///
/// # Errors
/// Returns [`SheetError`] if the file cannot be written.
pub fn export_sheet(db: &Database, path: &Path) -> Result<(), SheetError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    write_sheet(fs::File::create(path)?, db)?;
    tracing::info!(path = %path.display(), entries = db.entries.len(), "Exported sheet");
    Ok(())
}

/// Applies a proofread sheet to a copy of `db`.
///
/// Only locales already present in an entry are updated, and only from
/// non-empty cells. Entry and locale order is kept. `last_update` is
/// refreshed for entries whose values changed. Rows with unknown keys are
/// ignored.
///
/// # Errors
/// Returns [`SheetError::MissingKeyColumn`] for a sheet without a `key`
/// header and [`SheetError::InvalidList`] when an array cell is not JSON.
pub fn read_sheet<R: Read>(reader: R, db: &Database) -> Result<Database, SheetError> {
    let mut rdr = csv::ReaderBuilder::new().flexible(true).from_reader(reader);
    let headers = rdr.headers()?.clone();

    let key_index = headers.iter().position(|h| h == KEY_COLUMN).ok_or(SheetError::MissingKeyColumn)?;
    let locale_columns: HashMap<&str, usize> = headers
        .iter()
        .enumerate()
        .filter(|(_, h)| *h != KEY_COLUMN && *h != LAST_UPDATE_COLUMN && !h.starts_with(GLOSSARY_PREFIX))
        .map(|(i, h)| (h, i))
        .collect();

    let mut rows = HashMap::new();
    for record in rdr.records() {
        let record = record?;
        if let Some(key) = record.get(key_index).filter(|key| !key.is_empty()) {
            rows.insert(key.to_string(), record.clone());
        }
    }

    let now = now_timestamp();
    let mut updated = db.clone();
    let mut changed_entries = 0_usize;

    for (key, entry) in &mut updated.entries {
        let Some(row) = rows.get(key) else {
            continue;
        };

        let mut changed = false;
        for (locale, value) in &mut entry.values {
            let Some(cell) = locale_columns.get(locale.as_str()).and_then(|i| row.get(*i)) else {
                continue;
            };
            if cell.is_empty() {
                continue;
            }

            let new_value = match value {
                MessageValue::Text(_) => MessageValue::Text(cell.to_string()),
                MessageValue::List(_) => {
                    let items: Vec<Value> = serde_json::from_str(cell).map_err(|source| {
                        SheetError::InvalidList { key: key.clone(), locale: locale.clone(), source }
                    })?;
                    MessageValue::List(items)
                }
            };

            if *value != new_value {
                *value = new_value;
                changed = true;
            }
        }

        if changed {
            entry.last_update = Some(now.clone());
            changed_entries += 1;
        }
    }

    let unknown = rows.keys().filter(|key| !db.entries.contains_key(*key)).count();
    if unknown > 0 {
        tracing::warn!(unknown, "Ignoring sheet rows whose key is not in the database");
    }
    tracing::info!(changed_entries, "Applied sheet");

    Ok(updated)
}

/// Reads the sheet at `path` and applies it to a copy of `db`.
///
/// # Errors
/// See [`read_sheet`].
pub fn import_sheet(path: &Path, db: &Database) -> Result<Database, SheetError> {
    read_sheet(fs::File::open(path)?, db)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use googletest::prelude::*;
    use indexmap::IndexMap;
    use serde_json::json;
    use tempfile::TempDir;

    use super::*;
    use crate::types::Entry;

    const OLD: &str = "2024-01-01T00:00:00.000Z";

    fn db() -> Database {
        let mut db = Database::new("en-US");
        db.glossary.insert(
            "fr".to_string(),
            vec![IndexMap::from([("Wallet".to_string(), "Portefeuille".to_string())])],
        );

        let mut wallet = Entry::with_value("en-US", MessageValue::from("Wallet"));
        wallet.set("fr", MessageValue::from("Porte-monnaie"));
        wallet.last_update = Some(OLD.to_string());

        let mut items = Entry::with_value("en-US", MessageValue::List(vec![json!("a")]));
        items.set("fr", MessageValue::List(vec![json!("à")]));
        items.last_update = Some(OLD.to_string());

        db.entries.insert("wallet".to_string(), wallet);
        db.entries.insert("items".to_string(), items);
        db
    }

    fn to_csv(db: &Database) -> String {
        let mut buffer = Vec::new();
        write_sheet(&mut buffer, db).unwrap();
        String::from_utf8(buffer).unwrap()
    }

    #[googletest::test]
    fn test_write_sheet_layout() {
        let csv = to_csv(&db());

        expect_that!(
            csv.lines().collect::<Vec<_>>(),
            elements_are![
                eq(&"key,en-US,fr,glossary:fr,last_update"),
                eq(&format!("wallet,Wallet,Porte-monnaie,Portefeuille,{OLD}").as_str()),
                eq(&format!("items,\"[\"\"a\"\"]\",\"[\"\"à\"\"]\",,{OLD}").as_str())
            ]
        );
    }

    #[googletest::test]
    fn test_read_unmodified_sheet_changes_nothing() {
        let db = db();

        let updated = read_sheet(to_csv(&db).as_bytes(), &db).unwrap();

        expect_that!(updated, eq(&db));
    }

    #[googletest::test]
    fn test_read_sheet_applies_edits() {
        let db = db();
        let csv = "key,fr,en-US\nwallet,Portefeuille,\nitems,\"[\"\"b\"\"]\",\nunknown,x,y\n";

        let updated = read_sheet(csv.as_bytes(), &db).unwrap();

        let wallet = &updated.entries["wallet"];
        expect_that!(wallet.get("fr"), some(eq(&MessageValue::from("Portefeuille"))));
        expect_that!(wallet.get("en-US"), some(eq(&MessageValue::from("Wallet"))));
        expect_that!(wallet.last_update.as_deref(), some(not(eq(OLD))));
        expect_that!(updated.entries["items"].get("fr"), some(eq(&MessageValue::List(vec![json!("b")]))));
        expect_that!(updated.entries.len(), eq(2));
    }

    #[googletest::test]
    fn test_read_sheet_does_not_add_locales() {
        let db = db();
        let csv = "key,de\nwallet,Geldbörse\n";

        let updated = read_sheet(csv.as_bytes(), &db).unwrap();

        expect_that!(updated, eq(&db));
    }

    #[googletest::test]
    fn test_read_sheet_requires_key_column() {
        let result = read_sheet("id,fr\nwallet,x\n".as_bytes(), &db());

        expect_that!(result, err(displays_as(contains_substring("'key'"))));
    }

    #[googletest::test]
    fn test_read_sheet_rejects_bad_array() {
        let result = read_sheet("key,fr\nitems,not json\n".as_bytes(), &db());

        expect_that!(result, err(displays_as(contains_substring("'items' for fr"))));
    }

    #[googletest::test]
    fn test_export_then_import_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join(".i18n").join("i18n.csv");
        let db = db();

        export_sheet(&db, &path).unwrap();
        let imported = import_sheet(&path, &db).unwrap();

        expect_that!(imported, eq(&db));
    }
}
