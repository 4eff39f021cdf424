//! System prompt rendering from the configured template.

use thiserror::Error;

use crate::locale;
use crate::types::Glossary;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PromptError {
    #[error("Unsupported target locale: {0}")]
    UnsupportedLocale(String),
}

/// Substitutes `{{language}}`, `{{glossary}}` and `{{nonTranslatable}}` in `template`.
///
/// The glossary and non-translatable sections render as an empty string when
/// there is nothing to show for `locale`.
///
/// # Errors
/// Returns [`PromptError::UnsupportedLocale`] if `locale` has no display name.
pub fn build_prompt(
    template: &str,
    locale: &str,
    glossary: &Glossary,
    non_translatable: &[String],
) -> Result<String, PromptError> {
    let language =
        locale::language_name(locale).ok_or_else(|| PromptError::UnsupportedLocale(locale.to_string()))?;

    let glossary_text = match glossary.get(locale) {
        Some(terms) if !terms.is_empty() => format!(
            "- Use the glossary to keep terminology consistent\n  - glossary: {}",
            serde_json::to_string(terms).unwrap_or_default()
        ),
        _ => String::new(),
    };

    let non_translatable_text = if non_translatable.is_empty() {
        String::new()
    } else {
        format!(
            "- Keep the terms in the non_translatable list unchanged\n  - non_translatable: {}",
            serde_json::to_string(non_translatable).unwrap_or_default()
        )
    };

    tracing::debug!(locale, language, "Rendering prompt");

    Ok(template
        .replace("{{language}}", language)
        .replace("{{glossary}}", &glossary_text)
        .replace("{{nonTranslatable}}", &non_translatable_text))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use googletest::prelude::*;
    use indexmap::IndexMap;

    use super::*;

    const TEMPLATE: &str = "To {{language}} ({{language}}).\n{{glossary}}\n{{nonTranslatable}}";

    fn glossary() -> Glossary {
        Glossary::from([(
            "zh-CN".to_string(),
            vec![IndexMap::from([("Crypto".to_string(), "加密货币".to_string())])],
        )])
    }

    #[googletest::test]
    fn test_build_prompt_replaces_every_language_token() {
        let prompt = build_prompt(TEMPLATE, "ja", &Glossary::new(), &[]).unwrap();

        expect_that!(prompt, eq("To Japanese (Japanese).\n\n"));
    }

    #[googletest::test]
    fn test_build_prompt_with_glossary_for_locale() {
        let prompt = build_prompt(TEMPLATE, "zh-CN", &glossary(), &[]).unwrap();

        expect_that!(prompt, contains_substring(r#"glossary: [{"Crypto":"加密货币"}]"#));
        expect_that!(prompt, not(contains_substring("non_translatable")));
    }

    #[googletest::test]
    fn test_build_prompt_ignores_other_locales_glossary() {
        let prompt = build_prompt(TEMPLATE, "fr", &glossary(), &[]).unwrap();

        expect_that!(prompt, not(contains_substring("glossary")));
    }

    #[googletest::test]
    fn test_build_prompt_with_non_translatable() {
        let terms = vec!["GitHub".to_string(), "OAuth".to_string()];

        let prompt = build_prompt(TEMPLATE, "fr", &Glossary::new(), &terms).unwrap();

        expect_that!(prompt, contains_substring(r#"non_translatable: ["GitHub","OAuth"]"#));
    }

    #[googletest::test]
    fn test_build_prompt_unsupported_locale() {
        let result = build_prompt(TEMPLATE, "xx", &Glossary::new(), &[]);

        expect_that!(result, err(eq(&PromptError::UnsupportedLocale("xx".to_string()))));
    }
}
