//! # Settings File Loading
//!
//! Loads engine settings from TOML or YAML files.
//!
//! Supports automatic format detection based on file extension.

use crate::config::EngineSettings;
use crate::error::SettingsError;
use std::path::Path;

/// Load engine settings from a TOML file.
///
/// ## Error Handling
/// Returns `SettingsError` for:
/// - File not found
/// - Invalid TOML syntax
pub fn load_from_toml(path: &Path) -> Result<EngineSettings, SettingsError> {
    let contents = std::fs::read_to_string(path)
        .map_err(|_e| SettingsError::FileNotFound(path.display().to_string()))?;

    toml::from_str(&contents).map_err(|e| SettingsError::TomlParse(e.to_string()))
}

/// Load engine settings from a YAML file.
pub fn load_from_yaml(path: &Path) -> Result<EngineSettings, SettingsError> {
    let contents = std::fs::read_to_string(path)
        .map_err(|_e| SettingsError::FileNotFound(path.display().to_string()))?;

    serde_yaml::from_str(&contents).map_err(|e| SettingsError::YamlParse(e.to_string()))
}

/// Load engine settings from file with auto-detection.
///
/// # M-CANONICAL-DOCS
///
/// ## Supported Formats
/// - `.toml`: TOML format
/// - `.yaml`: YAML format
/// - `.yml`: YAML format
///
/// ## Usage
/// ```rust,no_run
/// use config::load_from_file;
/// use std::path::Path;
///
/// fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let settings = load_from_file(Path::new("engine.yaml"))?;
///     println!("Namespace: {}", settings.namespace);
///     Ok(())
/// }
/// ```
pub fn load_from_file(path: &Path) -> Result<EngineSettings, SettingsError> {
    let extension = path
        .extension()
        .and_then(|s| s.to_str())
        .ok_or(SettingsError::NoExtension)?;

    match extension.to_lowercase().as_str() {
        "toml" => load_from_toml(path),
        "yaml" | "yml" => load_from_yaml(path),
        other => Err(SettingsError::UnsupportedFormat(other.to_string())),
    }
}
