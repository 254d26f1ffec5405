//! Settings loading errors.

/// Errors raised while loading or validating engine settings.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("Failed to parse TOML: {0}")]
    TomlParse(String),

    #[error("Failed to parse YAML: {0}")]
    YamlParse(String),

    #[error("Config file has no extension")]
    NoExtension,

    #[error("Unsupported config file format: {0}")]
    UnsupportedFormat(String),

    #[error("Invalid value for {key}: {reason}")]
    InvalidEnv { key: String, reason: String },

    #[error("Invalid settings: {0}")]
    Invalid(#[from] validator::ValidationErrors),
}
