//! Fills in missing target-locale values of a working set, one batch at a time.

use serde_json::{
    Map,
    Value,
};

use crate::config::I18nConfig;
use crate::provider::{
    TranslationProvider,
    TranslationRequest,
};
use crate::sync::batch::partition;
use crate::sync::compress::{
    KeyMap,
    compress,
    restore,
};
use crate::sync::prompt::{
    PromptError,
    build_prompt,
};
use crate::types::{
    FlatMessages,
    MessageValue,
    WorkingSet,
};

/// A batch whose keys stay untranslated for this run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchFailure {
    /// 1-based batch number.
    pub batch: usize,
    /// Original (uncompressed) keys of the batch.
    pub keys: Vec<String>,
    pub reason: String,
}

/// Outcome of [`translate_working_set`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TranslateReport {
    /// Keys that needed a translation.
    pub pending: usize,
    /// Number of requests made.
    pub batches: usize,
    /// Values written into the working set.
    pub translated: usize,
    pub failures: Vec<BatchFailure>,
}

/// Source texts of the entries that lack a `target` value.
///
/// An entry is pending when its target value is absent or blank and it has a
/// non-blank source value.
#[must_use]
pub fn pending_messages(working_set: &WorkingSet, source_lang: &str, target: &str) -> FlatMessages {
    working_set
        .iter()
        .filter(|(_, entry)| entry.filled(target).is_none())
        .filter_map(|(key, entry)| entry.filled(source_lang).map(|value| (key.clone(), value.clone())))
        .collect()
}

/// Translates every pending entry of `working_set` into `target`.
///
/// Batches are sent strictly one after another. A batch whose request fails or
/// whose reply is not a JSON object is logged and skipped; its keys remain
/// pending for the next run. Only the in-memory working set is modified.
///
/// # Errors
/// Returns [`PromptError`] when the prompt cannot be rendered for `target`.
pub async fn translate_working_set<P>(
    working_set: &mut WorkingSet,
    target: &str,
    config: &I18nConfig,
    provider: &P,
) -> Result<TranslateReport, PromptError>
where
    P: TranslationProvider + ?Sized,
{
    let source_lang = config.source_lang.as_str();
    tracing::info!(source = source_lang, locale = target, "Translating");

    let messages = pending_messages(working_set, source_lang, target);
    let mut report = TranslateReport { pending: messages.len(), ..TranslateReport::default() };
    if messages.is_empty() {
        tracing::info!(locale = target, "Nothing to translate");
        return Ok(report);
    }

    let system_prompt = build_prompt(
        &config.prompt_template,
        target,
        &config.glossary,
        &config.non_translatable,
    )?;

    let (messages, key_map) = if config.service.compress_keys {
        let (compressed, key_map) = compress(&messages);
        (compressed, Some(key_map))
    } else {
        (messages, None)
    };

    let batches = partition(&messages, config.service.batch_tokens);
    let total = batches.len();
    report.batches = total;

    for (index, batch) in batches.into_iter().enumerate() {
        let number = index + 1;
        tracing::info!(locale = target, batch = number, total, size = batch.len(), "Translating batch");

        let translated = match request_batch(provider, target, &system_prompt, &batch).await {
            Ok(translated) => translated,
            Err(reason) => {
                tracing::error!(locale = target, batch = number, total, %reason, "Batch failed, keys stay untranslated");
                report.failures.push(BatchFailure {
                    batch: number,
                    keys: original_keys(&batch, key_map.as_ref()),
                    reason,
                });
                continue;
            }
        };

        let restored = match &key_map {
            Some(key_map) => restore(translated, key_map),
            None => translated,
        };

        for (key, value) in restored {
            match working_set.get_mut(&key) {
                Some(entry) => {
                    entry.set(target, value);
                    report.translated += 1;
                }
                None => tracing::warn!(locale = target, key = %key, "Provider returned an unknown key, ignored"),
            }
        }

        tracing::info!(locale = target, batch = number, total, "Batch done");
    }

    Ok(report)
}

/// Sends one batch and parses the reply. Errors are rendered to text for the report.
async fn request_batch<P>(
    provider: &P,
    target: &str,
    system_prompt: &str,
    batch: &FlatMessages,
) -> Result<FlatMessages, String>
where
    P: TranslationProvider + ?Sized,
{
    let payload = serde_json::to_string(batch).map_err(|e| e.to_string())?;
    tracing::debug!(locale = target, payload = %payload, "Batch payload");

    let request = TranslationRequest {
        locale: target.to_string(),
        system_prompt: system_prompt.to_string(),
        payload,
    };
    let content = provider.translate(&request).await.map_err(|e| e.to_string())?;
    tracing::debug!(locale = target, content = %content, "Provider reply");

    parse_translations(&content)
        .map_err(|e| format!("Provider reply is not a JSON object: {e}"))
}

/// Parses a provider reply into key → translation.
///
/// Tolerates a surrounding Markdown code fence. Members that are neither
/// strings nor arrays are dropped.
///
/// # Errors
/// Returns the JSON error when the reply is not a JSON object.
pub fn parse_translations(content: &str) -> Result<FlatMessages, serde_json::Error> {
    let object: Map<String, Value> = serde_json::from_str(strip_code_fence(content))?;

    Ok(object
        .into_iter()
        .filter_map(|(key, value)| match MessageValue::from_json(&value) {
            Some(message) => Some((key, message)),
            None => {
                tracing::warn!(key = %key, value = %value, "Ignoring non-text translation");
                None
            }
        })
        .collect())
}

fn strip_code_fence(content: &str) -> &str {
    let trimmed = content.trim();
    let Some(inner) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let inner = inner.strip_prefix("json").unwrap_or(inner);
    inner.strip_suffix("```").unwrap_or(inner).trim()
}

fn original_keys(batch: &FlatMessages, key_map: Option<&KeyMap>) -> Vec<String> {
    batch
        .keys()
        .map(|key| key_map.and_then(|map| map.get(key)).unwrap_or(key).clone())
        .collect()
}
