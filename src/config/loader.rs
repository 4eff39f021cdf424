//! 設定ファイルの読み込み関数

use std::path::Path;

use super::{
    ConfigError,
    I18nConfig,
};

/// 設定ファイルを読み込み、環境変数プレースホルダーを解決してバリデーションする
///
/// # Arguments
/// * `config_path` - `i18n.config.json` のパス
///
/// # Errors
/// - ファイルが存在しない
/// - ファイル読み込みエラー
/// - JSON パースエラー
/// - 未解決の `{{ENV_VAR}}` プレースホルダー
/// - バリデーションエラー
pub fn load_config(config_path: &Path) -> Result<I18nConfig, ConfigError> {
    load_config_with_env(config_path, |name| std::env::var(name).ok())
}

/// `load_config` の環境変数ルックアップ差し替え版
pub(super) fn load_config_with_env<F>(
    config_path: &Path,
    lookup: F,
) -> Result<I18nConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    if !config_path.exists() {
        return Err(ConfigError::NotFound(config_path.display().to_string()));
    }

    tracing::debug!("Loading configuration from: {:?}", config_path);

    let content = std::fs::read_to_string(config_path)?;
    let mut config: I18nConfig = serde_json::from_str(&content)?;

    config.service.api_key =
        resolve_placeholders(&config.service.api_key, "service.api_key", &lookup)?;

    config.validate().map_err(ConfigError::ValidationErrors)?;

    Ok(config)
}

/// デフォルト設定を `config_path` に書き出す
///
/// 既にファイルがあり `force` が `false` の場合は何もせず `false` を返す。
///
/// # Errors
/// - ファイル書き込みエラー
pub fn write_default_config(config_path: &Path, force: bool) -> Result<bool, ConfigError> {
    if config_path.exists() && !force {
        tracing::warn!("Config file already exists, use --force to overwrite: {:?}", config_path);
        return Ok(false);
    }

    let content = serde_json::to_string_pretty(&I18nConfig::default())?;
    std::fs::write(config_path, content)?;
    tracing::info!("Created config file: {:?}", config_path);
    Ok(true)
}

/// `{{NAME}}` を環境変数の値で置換する
///
/// 変数が未設定または空の場合はエラー。閉じ括弧のない `{{` はそのまま残す。
fn resolve_placeholders<F>(value: &str, field_path: &str, lookup: &F) -> Result<String, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let mut resolved = String::with_capacity(value.len());
    let mut rest = value;

    while let Some(start) = rest.find("{{") {
        let (before, after_open) = rest.split_at(start);
        resolved.push_str(before);

        let Some(inner) = after_open.strip_prefix("{{") else {
            break;
        };
        let Some(end) = inner.find("}}") else {
            resolved.push_str(after_open);
            rest = "";
            break;
        };

        let (name, after_name) = inner.split_at(end);
        let name = name.trim();
        match lookup(name).filter(|v| !v.is_empty()) {
            Some(env_value) => resolved.push_str(&env_value),
            None => {
                return Err(ConfigError::UnresolvedPlaceholder {
                    field_path: field_path.to_string(),
                    name: name.to_string(),
                });
            }
        }
        rest = after_name.strip_prefix("}}").unwrap_or(after_name);
    }

    resolved.push_str(rest);
    Ok(resolved)
}
