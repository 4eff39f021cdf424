//! Folding a translated working set back into the persisted database.

use std::collections::HashSet;

use crate::types::{
    Database,
    Entry,
    Locale,
    WorkingSet,
    now_timestamp,
};

/// What [`merge`] did besides updating entries.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergeReport {
    /// Keys deleted because their source value disappeared, in database order.
    pub pruned: Vec<String>,
    /// Working-set keys without a source value; their cached source is left as is.
    pub missing_source: Vec<String>,
}

/// Merges `working_set` into a copy of `db` for `target_locales`.
///
/// For each working-set key:
/// - the source value always wins over the cached one
/// - a changed source value starts the entry over, so stale translations go away
/// - a target value that is present and differs from the cached one replaces it
/// - `last_update` is set to now when anything changed or it was never set
///
/// Keys that had a non-blank source in `db` and have none in `working_set` are
/// pruned.
#[must_use]
pub fn merge(db: &Database, working_set: &WorkingSet, target_locales: &[Locale]) -> (Database, MergeReport) {
    merge_at(db, working_set, target_locales, &now_timestamp())
}

fn merge_at(
    db: &Database,
    working_set: &WorkingSet,
    target_locales: &[Locale],
    now: &str,
) -> (Database, MergeReport) {
    let source_lang = db.source_lang.as_str();
    let mut merged = db.clone();
    let mut report = MergeReport::default();

    for (key, new_entry) in working_set {
        let old_entry = db.entries.get(key);
        let new_source = new_entry.get(source_lang);
        let old_source = old_entry.and_then(|entry| entry.get(source_lang));

        let source_changed = old_entry.is_some() && new_source.is_some() && new_source != old_source;
        let mut entry = if source_changed {
            tracing::debug!(key = %key, "Source changed, discarding cached values");
            Entry::default()
        } else {
            old_entry.cloned().unwrap_or_default()
        };
        let mut changed = source_changed;

        for locale in target_locales {
            let Some(new_value) = new_entry.get(locale) else {
                continue;
            };
            if entry.get(locale) != Some(new_value) {
                entry.set(locale, new_value.clone());
                changed = true;
            }
        }

        match new_source {
            Some(value) => entry.set(source_lang, value.clone()),
            None => report.missing_source.push(key.clone()),
        }

        if changed || entry.last_update.is_none() {
            entry.last_update = Some(now.to_string());
        }

        merged.entries.insert(key.clone(), entry);
    }

    let live: HashSet<&str> = working_set
        .iter()
        .filter(|(_, entry)| entry.filled(source_lang).is_some())
        .map(|(key, _)| key.as_str())
        .collect();

    for (key, entry) in &db.entries {
        if entry.filled(source_lang).is_some() && !live.contains(key.as_str()) {
            merged.entries.shift_remove(key);
            report.pruned.push(key.clone());
        }
    }

    if !report.pruned.is_empty() {
        tracing::warn!(
            count = report.pruned.len(),
            source = source_lang,
            keys = %report.pruned.join(", "),
            "Removed entries not present in source"
        );
    }
    if !report.missing_source.is_empty() {
        tracing::warn!(
            count = report.missing_source.len(),
            source = source_lang,
            keys = %report.missing_source.join(", "),
            "Entries without a source value, cached source left untouched"
        );
    }

    (merged, report)
}
