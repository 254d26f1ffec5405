//! # Config Store Errors
//!
//! Error taxonomy shared by the value store, the remote hash backends and the
//! sync engine.
//!
//! - Uses `thiserror` for structured error definitions
//! - Named fields carry the namespace/key context of each failure
//! - Remote failures are wrapped, never flattened, so callers can inspect the
//!   backend error through `source()`

use std::convert::Infallible;
use thiserror::Error;

/// Errors raised by a remote hash backend.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Connection to {backend} failed: {reason}")]
    ConnectionError { backend: String, reason: String },

    #[error("Query on {backend} failed: {reason}")]
    QueryError { backend: String, reason: String },
}

impl StorageError {
    /// Name of the backend that produced the error.
    pub fn backend(&self) -> &str {
        match self {
            StorageError::ConnectionError { backend, .. }
            | StorageError::QueryError { backend, .. } => backend,
        }
    }
}

/// Configuration store errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The value handed to a setter has a shape the serializer cannot encode.
    /// Raised before any mutation, so the store is left untouched.
    #[error("Unsupported value type: {type_name}")]
    UnsupportedValueType { type_name: String },

    #[error("Failed to load namespace {namespace} from store: {source}")]
    LoadFromStore {
        namespace: String,
        #[source]
        source: StorageError,
    },

    #[error("Failed to sync defaults of namespace {namespace} to store: {source}")]
    SyncDefaults {
        namespace: String,
        #[source]
        source: StorageError,
    },

    #[error("Failed to persist namespace {namespace}: {source}")]
    Persist {
        namespace: String,
        #[source]
        source: StorageError,
    },

    #[error("Failed to write {namespace}.{key}: {source}")]
    Write {
        namespace: String,
        key: String,
        #[source]
        source: StorageError,
    },

    #[error("Invalid engine settings: {reason}")]
    InvalidSettings { reason: String },

    #[error("Failed to connect to remote store: {source}")]
    Connect {
        #[source]
        source: StorageError,
    },
}

impl From<Infallible> for ConfigError {
    fn from(never: Infallible) -> Self {
        match never {}
    }
}

pub type ConfigResult<T> = Result<T, ConfigError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    fn query_error() -> StorageError {
        StorageError::QueryError {
            backend: "Redis".to_string(),
            reason: "boom".to_string(),
        }
    }

    #[test]
    fn test_storage_error_display() {
        assert_eq!(query_error().to_string(), "Query on Redis failed: boom");
        assert_eq!(query_error().backend(), "Redis");
    }

    #[test]
    fn test_config_error_keeps_source() {
        let err = ConfigError::LoadFromStore {
            namespace: "config".to_string(),
            source: query_error(),
        };

        assert!(err.to_string().contains("namespace config"));
        let source = err.source().expect("source should be attached");
        assert_eq!(source.to_string(), "Query on Redis failed: boom");
    }

    #[test]
    fn test_write_error_names_key() {
        let err = ConfigError::Write {
            namespace: "config".to_string(),
            key: "title".to_string(),
            source: query_error(),
        };
        assert!(err.to_string().starts_with("Failed to write config.title"));
    }
}
