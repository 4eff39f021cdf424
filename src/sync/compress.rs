//! Reversible replacement of message keys by short numeric strings.

use indexmap::IndexMap;

use crate::types::FlatMessages;

/// Compressed key (`"1"`, `"2"`, ...) → original key.
pub type KeyMap = IndexMap<String, String>;

/// Renames every key to its 1-based position, in iteration order.
#[must_use]
pub fn compress(messages: &FlatMessages) -> (FlatMessages, KeyMap) {
    let mut compressed = FlatMessages::with_capacity(messages.len());
    let mut key_map = KeyMap::with_capacity(messages.len());

    for (index, (key, value)) in messages.iter().enumerate() {
        let short_key = (index + 1).to_string();
        compressed.insert(short_key.clone(), value.clone());
        key_map.insert(short_key, key.clone());
    }

    (compressed, key_map)
}

/// Maps compressed keys back to the originals.
///
/// Keys missing from `key_map` are kept as they are, so a provider that
/// invents or mangles a key loses nothing.
#[must_use]
pub fn restore(result: FlatMessages, key_map: &KeyMap) -> FlatMessages {
    result
        .into_iter()
        .map(|(key, value)| match key_map.get(&key) {
            Some(original) => (original.clone(), value),
            None => {
                tracing::debug!(key = %key, "Unknown compressed key kept verbatim");
                (key, value)
            }
        })
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use googletest::prelude::*;

    use super::*;
    use crate::types::MessageValue;

    fn sample() -> FlatMessages {
        FlatMessages::from([
            ("title.buy".to_string(), MessageValue::from("Buy")),
            ("title.sell".to_string(), MessageValue::from("Sell")),
            ("menu.home".to_string(), MessageValue::from("Home")),
        ])
    }

    #[googletest::test]
    fn test_compress_assigns_sequential_keys() {
        let (compressed, key_map) = compress(&sample());

        expect_that!(
            compressed.keys().cloned().collect::<Vec<_>>(),
            elements_are![eq("1"), eq("2"), eq("3")]
        );
        expect_that!(compressed.get("2"), some(eq(&MessageValue::from("Sell"))));
        expect_that!(key_map.get("3").map(String::as_str), some(eq("menu.home")));
    }

    #[googletest::test]
    fn test_restore_translated_result() {
        let (compressed, key_map) = compress(&sample());
        let translated: FlatMessages = compressed
            .into_iter()
            .map(|(key, value)| (key, MessageValue::Text(format!("<{}>", value.to_canonical_string()))))
            .collect();

        let restored = restore(translated, &key_map);

        expect_that!(
            restored.keys().cloned().collect::<Vec<_>>(),
            elements_are![eq("title.buy"), eq("title.sell"), eq("menu.home")]
        );
        expect_that!(restored.get("title.buy"), some(eq(&MessageValue::from("<Buy>"))));
    }

    #[googletest::test]
    fn test_restore_keeps_unknown_keys() {
        let (_, key_map) = compress(&sample());
        let result = FlatMessages::from([
            ("1".to_string(), MessageValue::from("Acheter")),
            ("99".to_string(), MessageValue::from("???")),
        ]);

        let restored = restore(result, &key_map);

        expect_that!(restored.get("title.buy"), some(eq(&MessageValue::from("Acheter"))));
        expect_that!(restored.get("99"), some(eq(&MessageValue::from("???"))));
        expect_that!(restored.len(), eq(2));
    }

    #[googletest::test]
    fn test_compress_empty() {
        let (compressed, key_map) = compress(&FlatMessages::new());

        expect_that!(compressed.is_empty(), eq(true));
        expect_that!(key_map.is_empty(), eq(true));
    }
}
