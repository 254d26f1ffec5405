//! # Engine Settings
//!
//! Settings needed to connect a configuration engine to its remote store.
//!
//! All settings structures:
//! - Use `serde` for serialization/deserialization with per-field defaults
//! - Use `validator` for range and length checks

use serde::{Deserialize, Serialize};
use std::time::Duration;
use validator::Validate;

/// Top-level settings for one configuration engine.
///
/// # M-CANONICAL-DOCS
///
/// ## Purpose
/// Names the remote namespace the engine reconciles against, how often it
/// pulls remote changes, and where the Redis server lives.
///
/// ## Usage
/// ```rust,no_run
/// use config::EngineSettings;
///
/// let settings = EngineSettings::default();
/// println!("Namespace: {}", settings.namespace);
/// println!("Redis: {}", settings.redis.connection_url());
/// ```
///
/// ## Fields
/// - `namespace`: Redis hash key holding this instance's fields (default:
///   "config")
/// - `reload_interval_ms`: Auto-reload period in milliseconds (default: 5000)
/// - `auto_reload`: Start auto-reload on connect (default: false)
/// - `redis`: Redis connection settings
#[derive(Debug, Clone, Serialize, Deserialize, Validate, PartialEq)]
pub struct EngineSettings {
    /// Remote namespace (Redis hash key)
    #[serde(default = "default_namespace")]
    #[validate(length(min = 1, max = 255))]
    pub namespace: String,

    /// Auto-reload period in milliseconds
    #[serde(default = "default_reload_interval_ms")]
    #[validate(range(min = 1, max = 86_400_000))]
    pub reload_interval_ms: u64,

    /// Start auto-reload as soon as the engine is connected
    #[serde(default)]
    pub auto_reload: bool,

    /// Redis connection settings
    #[serde(default)]
    #[validate(nested)]
    pub redis: RedisConfig,
}

impl EngineSettings {
    pub fn reload_interval(&self) -> Duration {
        Duration::from_millis(self.reload_interval_ms)
    }
}

fn default_namespace() -> String {
    "config".to_string()
}

fn default_reload_interval_ms() -> u64 {
    5000
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            namespace: default_namespace(),
            reload_interval_ms: default_reload_interval_ms(),
            auto_reload: false,
            redis: RedisConfig::default(),
        }
    }
}

/// Redis configuration.
///
/// # M-CANONICAL-DOCS
///
/// ## Purpose
/// Manages connection settings for the Redis server backing the store.
///
/// ## Fields
/// - `host`: Redis server hostname (default: "localhost")
/// - `port`: Redis server port (default: 6379)
/// - `db`: Redis database number (default: 0, range: 0-15)
/// - `password`: Optional AUTH password
/// - `timeout_seconds`: Connection timeout (default: 30, range: 1-300)
#[derive(Debug, Clone, Serialize, Deserialize, Validate, PartialEq)]
pub struct RedisConfig {
    /// Redis server hostname
    #[serde(default = "default_redis_host")]
    #[validate(length(min = 1, max = 255))]
    pub host: String,

    /// Redis server port
    #[serde(default = "default_redis_port")]
    #[validate(range(min = 1, max = 65535))]
    pub port: u16,

    /// Redis database number
    #[serde(default = "default_redis_db")]
    #[validate(range(min = 0, max = 15))]
    pub db: u8,

    /// AUTH password, if the server requires one
    #[serde(default)]
    pub password: Option<String>,

    /// Connection timeout in seconds
    #[serde(default = "default_redis_timeout")]
    #[validate(range(min = 1, max = 300))]
    pub timeout_seconds: u64,
}

impl RedisConfig {
    /// `redis://[:password@]host:port/db`
    pub fn connection_url(&self) -> String {
        match &self.password {
            Some(password) if !password.is_empty() => format!(
                "redis://:{}@{}:{}/{}",
                password, self.host, self.port, self.db
            ),
            _ => format!("redis://{}:{}/{}", self.host, self.port, self.db),
        }
    }
}

fn default_redis_host() -> String {
    "localhost".to_string()
}

fn default_redis_port() -> u16 {
    6379
}

fn default_redis_db() -> u8 {
    0
}

fn default_redis_timeout() -> u64 {
    30
}

impl Default for RedisConfig {
    fn default() -> Self {
        Self {
            host: default_redis_host(),
            port: default_redis_port(),
            db: default_redis_db(),
            password: None,
            timeout_seconds: default_redis_timeout(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_engine_settings_defaults() {
        let settings = EngineSettings::default();
        assert_eq!(settings.namespace, "config");
        assert_eq!(settings.reload_interval(), Duration::from_secs(5));
        assert!(!settings.auto_reload);
        assert_eq!(settings.redis, RedisConfig::default());
    }

    #[test]
    fn test_connection_url_without_password() {
        let redis = RedisConfig {
            host: "cache".to_string(),
            port: 6380,
            db: 2,
            ..RedisConfig::default()
        };
        assert_eq!(redis.connection_url(), "redis://cache:6380/2");
    }

    #[test]
    fn test_connection_url_with_password() {
        let redis = RedisConfig {
            password: Some("s3cret".to_string()),
            ..RedisConfig::default()
        };
        assert_eq!(redis.connection_url(), "redis://:s3cret@localhost:6379/0");
    }

    #[test]
    fn test_empty_password_is_ignored() {
        let redis = RedisConfig {
            password: Some(String::new()),
            ..RedisConfig::default()
        };
        assert_eq!(redis.connection_url(), "redis://localhost:6379/0");
    }

    #[test]
    fn test_deserialize_partial_uses_defaults() {
        let settings: EngineSettings = serde_json::from_str(r#"{"namespace": "billing"}"#).unwrap();
        assert_eq!(settings.namespace, "billing");
        assert_eq!(settings.reload_interval_ms, 5000);
        assert_eq!(settings.redis.port, 6379);
    }
}
