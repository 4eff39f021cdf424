//! Greedy, order-preserving partitioning of pending messages into request batches.

use crate::sync::tokens;
use crate::types::FlatMessages;

/// Splits `entries` into batches whose estimated token sum stays within `token_limit`.
///
/// A batch is closed when the next entry would push it over the limit and it
/// already holds at least one entry. An entry that is larger than the limit on
/// its own therefore ends up alone in its batch; nothing is dropped or split.
#[must_use]
pub fn partition(entries: &FlatMessages, token_limit: usize) -> Vec<FlatMessages> {
    let mut batches = Vec::new();
    let mut current = FlatMessages::new();
    let mut current_tokens = 0_usize;

    for (key, value) in entries {
        let token_count = tokens::estimate(value);

        if current_tokens + token_count > token_limit && !current.is_empty() {
            batches.push(std::mem::take(&mut current));
            current_tokens = 0;
        }

        if token_count > token_limit {
            tracing::debug!(key = %key, token_count, token_limit, "Message exceeds the batch budget");
        }

        current.insert(key.clone(), value.clone());
        current_tokens += token_count;
    }

    if !current.is_empty() {
        batches.push(current);
    }

    batches
}
