//! Supported locales and their display names.

use std::collections::HashMap;
use std::sync::LazyLock;

/// Locale code → English language name used in prompts.
static LANGUAGES: LazyLock<HashMap<&'static str, &'static str>> = LazyLock::new(|| {
    [
        ("ar", "Arabic"),
        ("bg", "Bulgarian"),
        ("bn", "Bengali"),
        ("ca", "Catalan"),
        ("cs", "Czech"),
        ("da", "Danish"),
        ("de", "German"),
        ("de-AT", "German (Austria)"),
        ("de-CH", "German (Switzerland)"),
        ("el", "Greek"),
        ("en", "English"),
        ("en-AU", "English (Australia)"),
        ("en-CA", "English (Canada)"),
        ("en-GB", "English (United Kingdom)"),
        ("en-US", "English (United States)"),
        ("es", "Spanish"),
        ("es-ES", "Spanish (Spain)"),
        ("es-MX", "Spanish (Mexico)"),
        ("et", "Estonian"),
        ("fa", "Persian"),
        ("fi", "Finnish"),
        ("fil", "Filipino"),
        ("fr", "French"),
        ("fr-CA", "French (Canada)"),
        ("fr-FR", "French (France)"),
        ("he", "Hebrew"),
        ("hi", "Hindi"),
        ("hr", "Croatian"),
        ("hu", "Hungarian"),
        ("id", "Indonesian"),
        ("it", "Italian"),
        ("ja", "Japanese"),
        ("ja-JP", "Japanese"),
        ("kk", "Kazakh"),
        ("ko", "Korean"),
        ("ko-KR", "Korean"),
        ("lt", "Lithuanian"),
        ("lv", "Latvian"),
        ("ms", "Malay"),
        ("nb", "Norwegian Bokmål"),
        ("nl", "Dutch"),
        ("pl", "Polish"),
        ("pt", "Portuguese"),
        ("pt-BR", "Portuguese (Brazil)"),
        ("pt-PT", "Portuguese (Portugal)"),
        ("ro", "Romanian"),
        ("ru", "Russian"),
        ("sk", "Slovak"),
        ("sl", "Slovenian"),
        ("sr", "Serbian"),
        ("sv", "Swedish"),
        ("sw", "Swahili"),
        ("ta", "Tamil"),
        ("th", "Thai"),
        ("tr", "Turkish"),
        ("uk", "Ukrainian"),
        ("ur", "Urdu"),
        ("vi", "Vietnamese"),
        ("zh-CN", "Simplified Chinese"),
        ("zh-HK", "Traditional Chinese (Hong Kong)"),
        ("zh-TW", "Traditional Chinese (Taiwan)"),
    ]
    .into_iter()
    .collect()
});

/// Display name for a supported locale, `None` for anything else.
///
/// Matching is exact: `zh-cn` is not `zh-CN`, because locale codes double as
/// file names and database columns.
#[must_use]
pub fn language_name(locale: &str) -> Option<&'static str> {
    LANGUAGES.get(locale).copied()
}

#[must_use]
pub fn is_supported(locale: &str) -> bool {
    LANGUAGES.contains_key(locale)
}
