use serde::{
    Deserialize,
    Serialize,
};
use thiserror::Error;

use crate::locale;
use crate::types::{
    Glossary,
    Locale,
};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Configuration error in '{field_path}': {message}")]
pub struct ValidationError {
    /// JSON path to the field (e.g., "target_langs[0]")
    pub field_path: String,
    pub message: String,
}

impl ValidationError {
    #[must_use]
    pub fn new(field_path: impl Into<String>, message: impl Into<String>) -> Self {
        Self { field_path: field_path.into(), message: message.into() }
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Config file not found: {0}")]
    NotFound(String),

    #[error("Configuration validation failed:\n{}", format_validation_errors(.0))]
    ValidationErrors(Vec<ValidationError>),

    #[error("Environment variable '{name}' referenced by '{field_path}' is not set or empty")]
    UnresolvedPlaceholder { field_path: String, name: String },

    #[error("Failed to load configuration file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to parse configuration: {0}")]
    ParseError(#[from] serde_json::Error),
}

fn format_validation_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .enumerate()
        .map(|(i, err)| format!("  {}. {} - {}", i + 1, err.field_path, err.message))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Contents of `i18n.config.json`.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct I18nConfig {
    /// Source bundle; target bundles are written next to it.
    pub source_file: String,
    pub source_lang: Locale,
    pub target_langs: Vec<Locale>,
    pub db_file: String,
    pub service: ServiceConfig,
    pub glossary: Glossary,
    pub non_translatable: Vec<String>,
    pub output: OutputConfig,
    pub prompt_template: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ServiceConfig {
    /// Informational label only; every provider is spoken to over the
    /// OpenAI-compatible chat completions API.
    pub provider: String,
    pub model: String,
    pub base_url: String,
    /// May contain `{{ENV_VAR}}` placeholders, resolved at load time.
    pub api_key: String,
    pub temperature: f32,
    pub max_tokens: u32,
    /// Replace keys by `"1"`, `"2"`, ... before sending a batch.
    pub compress_keys: bool,
    /// Estimated-token budget per request batch.
    pub batch_tokens: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct OutputConfig {
    pub format: OutputFormat,
    /// Spaces per level; `0` writes compact JSON.
    pub indent: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Nested,
    Flat,
}

pub(crate) const DEFAULT_PROMPT_TEMPLATE: &str = r#"You are a professional front-end localization (i18n) translator specialised in web UI copy.

# Task
Translate the UI strings in the following JSON object into {{language}} for display on a web page.

# Rules
- Keep every key exactly as it is
- Translate only the values, into {{language}}
- Preserve every dynamic placeholder in its original form, e.g. {xxx}
- Leave empty strings, pure numbers, URLs, HTML tags and CSS class names unchanged
- Prefer short, clear wording for buttons, menu items, labels and hints
- Keep translations short enough to fit the original layout
{{glossary}}
{{nonTranslatable}}

# Output
- Output one complete, valid JSON object and nothing else
- No extra text, comments or explanations
- Keep exactly the same JSON structure as the input

# Example input
{
  "button.submit": "Submit",
  "title.welcome": "Welcome, {username}!",
  "error.required": "This field is required"
}

# Example output (target language: Simplified Chinese)
{
  "button.submit": "提交",
  "title.welcome": "欢迎，{username}！",
  "error.required": "此字段为必填项"
}

Translate the following JSON now:
"#;

impl Default for I18nConfig {
    fn default() -> Self {
        Self {
            source_file: "en-US.json".to_string(),
            source_lang: "en-US".to_string(),
            target_langs: vec!["zh-CN".to_string()],
            db_file: "i18n.db.json".to_string(),
            service: ServiceConfig::default(),
            glossary: Glossary::new(),
            non_translatable: Vec::new(),
            output: OutputConfig::default(),
            prompt_template: DEFAULT_PROMPT_TEMPLATE.to_string(),
        }
    }
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            provider: "deepseek".to_string(),
            model: "deepseek-chat".to_string(),
            base_url: "https://api.deepseek.com".to_string(),
            api_key: "{{DEEPSEEK_API_KEY}}".to_string(),
            temperature: 0.3,
            max_tokens: 4000,
            compress_keys: false,
            batch_tokens: 1000,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self { format: OutputFormat::Nested, indent: 2 }
    }
}

impl I18nConfig {
    /// # Errors
    /// - Required field is empty
    /// - Unsupported or duplicated locale
    /// - Invalid service settings
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        if self.source_file.trim().is_empty() {
            errors.push(ValidationError::new("source_file", "The source file path cannot be empty"));
        }

        if self.db_file.trim().is_empty() {
            errors.push(ValidationError::new(
                "db_file",
                "The database path cannot be empty. Example: \"i18n.db.json\"",
            ));
        }

        if !locale::is_supported(&self.source_lang) {
            errors.push(ValidationError::new(
                "source_lang",
                format!("Unsupported locale '{}'", self.source_lang),
            ));
        }

        if self.target_langs.is_empty() {
            errors.push(ValidationError::new(
                "target_langs",
                "At least one target locale is required. Example: [\"zh-CN\"]",
            ));
        }

        for (index, lang) in self.target_langs.iter().enumerate() {
            let field_path = format!("target_langs[{index}]");
            if !locale::is_supported(lang) {
                errors.push(ValidationError::new(&field_path, format!("Unsupported locale '{lang}'")));
            } else if *lang == self.source_lang {
                errors.push(ValidationError::new(
                    &field_path,
                    format!("'{lang}' is the source locale and cannot also be a target"),
                ));
            } else if self.target_langs.iter().take(index).any(|other| other == lang) {
                errors.push(ValidationError::new(&field_path, format!("Duplicate locale '{lang}'")));
            }
        }

        if self.service.model.trim().is_empty() {
            errors.push(ValidationError::new("service.model", "The model name cannot be empty"));
        }

        if self.service.base_url.trim().is_empty() {
            errors.push(ValidationError::new(
                "service.base_url",
                "The base URL cannot be empty. Example: \"https://api.deepseek.com\"",
            ));
        }

        if self.service.batch_tokens == 0 {
            errors.push(ValidationError::new(
                "service.batch_tokens",
                "The batch token budget must be greater than zero",
            ));
        }

        if !self.prompt_template.contains("{{language}}") {
            errors.push(ValidationError::new(
                "prompt_template",
                "The template must contain the {{language}} placeholder",
            ));
        }

        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing, clippy::expect_used, clippy::panic)]
mod tests {
    use googletest::prelude::*;
    use rstest::*;

    use super::*;

    #[rstest]
    fn validate_default_config() {
        let config = I18nConfig::default();

        assert_that!(config.validate(), ok(anything()));
    }

    #[rstest]
    fn deserialize_partial_config() {
        let json = r#"{"target_langs": ["ja", "fr"], "service": {"compress_keys": true}}"#;

        let config: I18nConfig = serde_json::from_str(json).unwrap();

        assert_that!(config.source_lang, eq("en-US"));
        assert_that!(config.target_langs, elements_are![eq("ja"), eq("fr")]);
        assert_that!(config.service.compress_keys, eq(true));
        assert_that!(config.service.model, eq("deepseek-chat"));
        assert_that!(config.service.batch_tokens, eq(1000));
        assert_that!(config.output.format, eq(OutputFormat::Nested));
    }

    #[rstest]
    fn deserialize_flat_output_and_glossary() {
        let json = r#"{
            "output": {"format": "flat", "indent": 4},
            "glossary": {"zh-CN": [{"Crypto": "加密货币"}]}
        }"#;

        let config: I18nConfig = serde_json::from_str(json).unwrap();

        assert_that!(config.output, eq(OutputConfig { format: OutputFormat::Flat, indent: 4 }));
        assert_that!(config.glossary["zh-CN"][0]["Crypto"], eq("加密货币"));
    }

    #[rstest]
    fn validate_empty_target_langs() {
        let config = I18nConfig { target_langs: vec![], ..I18nConfig::default() };

        assert_that!(
            config.validate(),
            err(elements_are![all![
                field!(ValidationError.field_path, eq("target_langs")),
                field!(ValidationError.message, contains_substring("At least one"))
            ]])
        );
    }

    #[rstest]
    #[case::unsupported(vec!["xx"], "Unsupported locale 'xx'")]
    #[case::same_as_source(vec!["en-US"], "is the source locale")]
    #[case::duplicate(vec!["fr", "fr"], "Duplicate locale 'fr'")]
    fn validate_invalid_target_langs(#[case] langs: Vec<&str>, #[case] message: &str) {
        let config = I18nConfig {
            target_langs: langs.into_iter().map(String::from).collect(),
            ..I18nConfig::default()
        };

        assert_that!(
            config.validate(),
            err(elements_are![field!(ValidationError.message, contains_substring(message))])
        );
    }

    #[rstest]
    fn validate_unsupported_source_lang() {
        let config = I18nConfig { source_lang: "english".to_string(), ..I18nConfig::default() };

        assert_that!(
            config.validate(),
            err(contains(field!(ValidationError.field_path, eq("source_lang"))))
        );
    }

    #[rstest]
    fn validate_template_without_language_placeholder() {
        let config =
            I18nConfig { prompt_template: "Translate this".to_string(), ..I18nConfig::default() };

        assert_that!(
            config.validate(),
            err(elements_are![field!(ValidationError.field_path, eq("prompt_template"))])
        );
    }

    #[rstest]
    fn config_error_validation_errors_format() {
        let config = I18nConfig {
            source_file: String::new(),
            service: ServiceConfig { batch_tokens: 0, ..ServiceConfig::default() },
            ..I18nConfig::default()
        };

        let errors = config.validate().unwrap_err();
        let config_error = ConfigError::ValidationErrors(errors);

        let error_message = format!("{config_error}");
        assert_that!(error_message, contains_substring("Configuration validation failed"));
        assert_that!(error_message, contains_substring("1. source_file"));
        assert_that!(error_message, contains_substring("2. service.batch_tokens"));
    }
}
