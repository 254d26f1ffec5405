//! # Engine Settings
//!
//! Settings for connecting a configuration engine to its Redis store.
//!
//! This crate provides:
//! - `EngineSettings` / `RedisConfig` structures with defaults
//! - Environment variable loading (12-factor app principles)
//! - Settings file loading (TOML/YAML)
//! - Validation with the `validator` crate

pub mod config;
pub mod error;
pub mod file_loader;
pub mod loader;
pub mod validation;

pub use config::{EngineSettings, RedisConfig};
pub use error::SettingsError;
pub use file_loader::{load_from_file, load_from_toml, load_from_yaml};
pub use loader::load_from_env;
pub use validation::validate_settings;
