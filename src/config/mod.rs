//! Configuration file types, defaults and loading.
/// Config file loader
mod loader;
/// Configuration types and settings
mod types;

pub use loader::{
    load_config,
    write_default_config,
};
pub use types::{
    ConfigError,
    I18nConfig,
    OutputConfig,
    OutputFormat,
    ServiceConfig,
    ValidationError,
};

/// Default config file name, looked up in the working directory.
pub const CONFIG_FILE_NAME: &str = "i18n.config.json";
