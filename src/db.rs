//! Loading and saving of the translation database file.

use std::fs;
use std::path::Path;

use crate::config::I18nConfig;
use crate::error::SyncError;
use crate::types::Database;

/// Reads the database at `path`.
///
/// # Errors
/// [`SyncError::DatabaseNotFound`] if the file does not exist, otherwise IO
/// or JSON errors.
pub fn load(path: &Path) -> Result<Database, SyncError> {
    if !path.exists() {
        return Err(SyncError::DatabaseNotFound(path.to_path_buf()));
    }

    let raw = fs::read_to_string(path).map_err(SyncError::io(path))?;
    let db: Database = serde_json::from_str(&raw).map_err(SyncError::json(path))?;
    tracing::info!(path = %path.display(), entries = db.entries.len(), "Loaded cache");
    Ok(db)
}

/// Reads the database at `path`, or creates and writes an empty one seeded
/// from `config`.
///
/// # Errors
/// Returns IO or JSON errors.
pub fn load_or_init(path: &Path, config: &I18nConfig) -> Result<Database, SyncError> {
    if path.exists() {
        return load(path);
    }

    let db = Database {
        non_translatable: config.non_translatable.clone(),
        glossary: config.glossary.clone(),
        ..Database::new(config.source_lang.clone())
    };
    save(path, &db)?;
    tracing::info!(path = %path.display(), "Initialized new cache");
    Ok(db)
}

/// Writes `db` to `path` as pretty-printed JSON, creating parent directories.
///
/// # Errors
/// Returns IO or serialization errors.
pub fn save(path: &Path, db: &Database) -> Result<(), SyncError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(SyncError::io(parent))?;
    }
    let output = serde_json::to_string_pretty(db)?;
    fs::write(path, output).map_err(SyncError::io(path))?;
    tracing::debug!(path = %path.display(), entries = db.entries.len(), "Saved cache");
    Ok(())
}
