//! Rough token estimate used for batch sizing.
//!
//! Weights are in tenths of a token: CJK ideographs cost 0.6, everything
//! else 0.3, rounded up. This is a relative signal only and does not match
//! any provider's tokenizer.

use crate::types::MessageValue;

/// Cost of a CJK unified ideograph, in tenths of a token.
const CJK_WEIGHT: usize = 6;
/// Cost of any other character, in tenths of a token.
const OTHER_WEIGHT: usize = 3;

const fn is_cjk(c: char) -> bool {
    matches!(c, '\u{4e00}'..='\u{9fff}')
}

/// Estimated token count of a message value.
///
/// Arrays are measured on their compact JSON form.
#[must_use]
pub fn estimate(value: &MessageValue) -> usize {
    match value {
        MessageValue::Text(text) => estimate_text(text),
        MessageValue::List(_) => estimate_text(&value.to_canonical_string()),
    }
}

#[must_use]
pub fn estimate_text(text: &str) -> usize {
    let tenths: usize =
        text.chars().map(|c| if is_cjk(c) { CJK_WEIGHT } else { OTHER_WEIGHT }).sum();
    tenths.div_ceil(10)
}
