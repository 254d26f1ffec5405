//! # Settings Validation
//!
//! Validates engine settings using the `validator` crate.

use crate::config::EngineSettings;
use crate::error::SettingsError;
use validator::Validate;

/// Validate engine settings.
///
/// ## Validation Rules
/// - `namespace`: 1-255 characters
/// - `reload_interval_ms`: 1-86400000
/// - `redis.host`: 1-255 characters
/// - `redis.port`: 1-65535
/// - `redis.db`: 0-15
/// - `redis.timeout_seconds`: 1-300
pub fn validate_settings(settings: &EngineSettings) -> Result<(), SettingsError> {
    settings.validate()?;
    Ok(())
}
