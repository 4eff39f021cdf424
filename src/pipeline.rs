//! The `run` and `check` drivers.
//!
//! Target locales are processed strictly one after another. A locale's
//! pipeline is translate → merge → render → persist → write; any error in it
//! is logged and the database falls back to what it was before that locale.

use std::fs;
use std::path::PathBuf;

use serde_json::Value;

use crate::config::I18nConfig;
use crate::db;
use crate::error::SyncError;
use crate::provider::TranslationProvider;
use crate::sync::check::{
    CheckIssue,
    check_locales,
};
use crate::sync::export::{
    export_locale,
    output_path,
    to_json_string,
};
use crate::sync::flatten::prepare;
use crate::sync::merge::merge;
use crate::sync::translate::{
    BatchFailure,
    translate_working_set,
};
use crate::types::{
    Database,
    Locale,
    WorkingSet,
};

/// A project: its configuration plus the directory its relative paths start from.
#[derive(Debug, Clone)]
pub struct Project {
    pub root: PathBuf,
    pub config: I18nConfig,
}

impl Project {
    #[must_use]
    pub fn new(root: impl Into<PathBuf>, config: I18nConfig) -> Self {
        Self { root: root.into(), config }
    }

    #[must_use]
    pub fn source_path(&self) -> PathBuf {
        self.root.join(&self.config.source_file)
    }

    #[must_use]
    pub fn db_path(&self) -> PathBuf {
        self.root.join(&self.config.db_file)
    }

    #[must_use]
    pub fn output_path(&self, locale: &str) -> PathBuf {
        output_path(&self.source_path(), locale)
    }

    /// Reads and parses the source bundle.
    ///
    /// # Errors
    /// [`SyncError::SourceNotFound`] if it does not exist, otherwise IO or JSON errors.
    pub fn read_source(&self) -> Result<Value, SyncError> {
        let path = self.source_path();
        if !path.exists() {
            return Err(SyncError::SourceNotFound(path));
        }
        let raw = fs::read_to_string(&path).map_err(SyncError::io(&path))?;
        serde_json::from_str(&raw).map_err(SyncError::json(path))
    }
}

/// Result of one target locale.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocaleReport {
    pub locale: Locale,
    pub pending: usize,
    pub translated: usize,
    pub failed_batches: Vec<BatchFailure>,
    pub pruned: Vec<String>,
    pub output: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LocaleOutcome {
    Done(LocaleReport),
    /// The locale was rolled back; the message is the logged error.
    Failed { locale: Locale, error: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub locales: Vec<LocaleOutcome>,
    /// Result of the check that closes every run.
    pub issues: Vec<CheckIssue>,
}

impl RunSummary {
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.issues.is_empty() && self.locales.iter().all(|outcome| matches!(outcome, LocaleOutcome::Done(_)))
    }
}

/// Runs the whole synchronization and then [`check`].
///
/// # Errors
/// Only failures before the first locale starts are returned: unreadable
/// source bundle or database. Per-locale failures end up in the summary.
pub async fn run<P>(project: &Project, provider: &P) -> Result<RunSummary, SyncError>
where
    P: TranslationProvider + ?Sized,
{
    let config = &project.config;
    tracing::info!(root = %project.root.display(), "Starting i18n run");

    let source = project.read_source()?;
    let db_path = project.db_path();
    let mut db = db::load_or_init(&db_path, config)?;

    let working_set = prepare(&source, &config.source_lang, &db.entries);
    tracing::info!(entries = working_set.len(), "Total entries");

    let mut locales = Vec::with_capacity(config.target_langs.len());
    for locale in &config.target_langs {
        tracing::info!(locale = %locale, "Processing locale");

        match process_locale(project, &db, &working_set, locale, provider).await {
            Ok((merged, report)) => {
                tracing::info!(
                    locale = %locale,
                    translated = report.translated,
                    pending = report.pending,
                    failed_batches = report.failed_batches.len(),
                    output = %report.output.display(),
                    "Locale done"
                );
                db = merged;
                locales.push(LocaleOutcome::Done(report));
            }
            Err(e) => {
                tracing::error!(locale = %locale, error = %e, "Locale failed, keeping previous database state");
                locales.push(LocaleOutcome::Failed { locale: locale.clone(), error: e.to_string() });
            }
        }
    }

    tracing::info!("i18n run completed, running translation check");
    let issues = check_sources(project, &source);

    Ok(RunSummary { locales, issues })
}

async fn process_locale<P>(
    project: &Project,
    db: &Database,
    working_set: &WorkingSet,
    locale: &Locale,
    provider: &P,
) -> Result<(Database, LocaleReport), SyncError>
where
    P: TranslationProvider + ?Sized,
{
    let config = &project.config;

    let mut working_set = working_set.clone();
    let translation = translate_working_set(&mut working_set, locale, config, provider).await?;

    let (merged, merge_report) = merge(db, &working_set, std::slice::from_ref(locale));
    let tree = export_locale(&merged, locale, config.output.format)?;
    let rendered = to_json_string(&tree, config.output.indent)?;

    db::save(&project.db_path(), &merged)?;

    let output = project.output_path(locale);
    fs::write(&output, rendered).map_err(SyncError::io(&output))?;
    tracing::info!(locale = %locale, path = %output.display(), "Exported");

    let report = LocaleReport {
        locale: locale.clone(),
        pending: translation.pending,
        translated: translation.translated,
        failed_batches: translation.failures,
        pruned: merge_report.pruned,
        output,
    };
    Ok((merged, report))
}

/// Compares every exported bundle with the source bundle.
///
/// # Errors
/// Returns an error if the source bundle cannot be read.
pub fn check(project: &Project) -> Result<Vec<CheckIssue>, SyncError> {
    let source = project.read_source()?;
    Ok(check_sources(project, &source))
}

fn check_sources(project: &Project, source: &Value) -> Vec<CheckIssue> {
    check_locales(source, &project.source_path(), &project.config.target_langs)
}
