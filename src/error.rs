use std::path::PathBuf;

use thiserror::Error;

use crate::config::ConfigError;
use crate::sheet::SheetError;
use crate::sync::flatten::UnflattenError;
use crate::sync::prompt::PromptError;

/// Defines errors that may occur while synchronizing translations
#[derive(Error, Debug)]
pub enum SyncError {
    /// Invalid or missing configuration; nothing has been modified yet
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// The source bundle does not exist
    #[error("Source language file not found: {}", .0.display())]
    SourceNotFound(PathBuf),
    /// The database file does not exist
    #[error("Database file not found: {}", .0.display())]
    DatabaseNotFound(PathBuf),
    /// Error when reading or writing a file
    #[error("Failed to access {}: {source}", path.display())]
    Io { path: PathBuf, source: std::io::Error },
    /// Error when a file does not hold the expected JSON
    #[error("Invalid JSON in {}: {source}", path.display())]
    Json { path: PathBuf, source: serde_json::Error },
    #[error("Failed to serialize output: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error(transparent)]
    Prompt(#[from] PromptError),
    #[error(transparent)]
    Unflatten(#[from] UnflattenError),
    #[error(transparent)]
    Sheet(#[from] SheetError),
}

impl SyncError {
    pub(crate) fn io(path: impl Into<PathBuf>) -> impl FnOnce(std::io::Error) -> Self {
        let path = path.into();
        move |source| Self::Io { path, source }
    }

    pub(crate) fn json(path: impl Into<PathBuf>) -> impl FnOnce(serde_json::Error) -> Self {
        let path = path.into();
        move |source| Self::Json { path, source }
    }
}
