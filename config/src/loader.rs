//! # Environment Variable Loader
//!
//! Loads engine settings from environment variables following 12-factor app
//! principles.
//!
//! # Naming Convention
//! - `RB_*`: Engine settings
//! - `RD_*`: Redis settings

use crate::config::{EngineSettings, RedisConfig};
use crate::error::SettingsError;
use std::env;

/// Load engine settings from environment variables.
///
/// # M-CANONICAL-DOCS
///
/// ## Purpose
/// Builds `EngineSettings` from the process environment. Unset variables fall
/// back to the defaults; a variable that is set but cannot be parsed is an
/// error rather than being silently replaced by the default.
///
/// ## Usage
/// ```rust,no_run
/// use config::load_from_env;
///
/// fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let settings = load_from_env()?;
///     println!("Namespace: {}", settings.namespace);
///     Ok(())
/// }
/// ```
///
/// ## Environment Variables
/// ### Engine Settings (`RB_*`)
/// - `RB_NAMESPACE`: Remote namespace (default: "config")
/// - `RB_RELOAD_INTERVAL_MS`: Auto-reload period (default: 5000)
/// - `RB_AUTO_RELOAD`: Start auto-reload on connect (true/false, default: false)
///
/// ### Redis Settings (`RD_*`)
/// - `RD_HOST`: Redis host (default: "localhost")
/// - `RD_PORT`: Redis port (default: 6379)
/// - `RD_DB`: Redis database number (default: 0)
/// - `RD_PASSWORD`: AUTH password (optional)
/// - `RD_TIMEOUT_SECONDS`: Connection timeout in seconds (default: 30)
pub fn load_from_env() -> Result<EngineSettings, SettingsError> {
    let defaults = EngineSettings::default();

    Ok(EngineSettings {
        namespace: env::var("RB_NAMESPACE").unwrap_or(defaults.namespace),
        reload_interval_ms: parse_env_or("RB_RELOAD_INTERVAL_MS", defaults.reload_interval_ms)?,
        auto_reload: parse_env_or("RB_AUTO_RELOAD", defaults.auto_reload)?,
        redis: load_redis_from_env()?,
    })
}

fn load_redis_from_env() -> Result<RedisConfig, SettingsError> {
    let defaults = RedisConfig::default();

    Ok(RedisConfig {
        host: env::var("RD_HOST").unwrap_or(defaults.host),
        port: parse_env_or("RD_PORT", defaults.port)?,
        db: parse_env_or("RD_DB", defaults.db)?,
        password: env::var("RD_PASSWORD").ok(),
        timeout_seconds: parse_env_or("RD_TIMEOUT_SECONDS", defaults.timeout_seconds)?,
    })
}

fn parse_env_or<T>(key: &str, default: T) -> Result<T, SettingsError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(key) {
        Ok(raw) => raw.trim().parse::<T>().map_err(|e| SettingsError::InvalidEnv {
            key: key.to_string(),
            reason: e.to_string(),
        }),
        Err(_) => Ok(default),
    }
}
