use crate::traits::HashStore;
use async_trait::async_trait;
use config::RedisConfig;
use errors::StorageError;
use redis::AsyncCommands;
use std::collections::HashMap;
use std::time::Duration;
use tracing::{debug, info};

const BACKEND: &str = "Redis";

fn connection_error(reason: impl ToString) -> StorageError {
    StorageError::ConnectionError {
        backend: BACKEND.to_string(),
        reason: reason.to_string(),
    }
}

fn query_error(e: redis::RedisError) -> StorageError {
    StorageError::QueryError {
        backend: BACKEND.to_string(),
        reason: e.to_string(),
    }
}

/// Hash backend over a Redis connection manager.
///
/// A namespace maps to one Redis hash key: reads are `HGETALL`, bulk writes a
/// single multi-field `HSET`, single writes a one-field `HSET`. The
/// connection manager reconnects transparently, so one instance can be
/// shared by every engine in the process.
#[derive(Clone)]
pub struct RedisHashStore {
    connection_manager: redis::aio::ConnectionManager,
}

impl RedisHashStore {
    pub async fn new(connection_string: &str) -> Result<Self, StorageError> {
        let client = redis::Client::open(connection_string).map_err(connection_error)?;

        let connection_manager = client
            .get_connection_manager()
            .await
            .map_err(connection_error)?;

        info!("Connected to Redis hash store");

        Ok(Self { connection_manager })
    }

    /// Connects using `config`, failing if the connection is not established
    /// within `timeout_seconds`.
    pub async fn from_config(config: &RedisConfig) -> Result<Self, StorageError> {
        let timeout = Duration::from_secs(config.timeout_seconds);
        match tokio::time::timeout(timeout, Self::new(&config.connection_url())).await {
            Ok(result) => result,
            Err(_) => Err(connection_error(format!(
                "timed out after {}s connecting to {}:{}",
                config.timeout_seconds, config.host, config.port
            ))),
        }
    }
}

#[async_trait]
impl HashStore for RedisHashStore {
    async fn read_all(&self, namespace: &str) -> Result<HashMap<String, String>, StorageError> {
        let mut conn = self.connection_manager.clone();
        let fields: HashMap<String, String> =
            conn.hgetall(namespace).await.map_err(query_error)?;
        debug!(namespace, fields = fields.len(), "HGETALL");
        Ok(fields)
    }

    async fn write_many(
        &self,
        namespace: &str,
        fields: &HashMap<String, String>,
    ) -> Result<(), StorageError> {
        // HSET without field/value pairs is a syntax error
        if fields.is_empty() {
            return Ok(());
        }

        let items: Vec<(&str, &str)> = fields
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect();

        let mut conn = self.connection_manager.clone();
        let _: () = conn
            .hset_multiple(namespace, &items)
            .await
            .map_err(query_error)?;
        debug!(namespace, fields = items.len(), "HSET multiple");
        Ok(())
    }

    async fn write_one(
        &self,
        namespace: &str,
        key: &str,
        value: &str,
    ) -> Result<(), StorageError> {
        let mut conn = self.connection_manager.clone();
        let _: () = conn
            .hset(namespace, key, value)
            .await
            .map_err(query_error)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connection_error_names_backend() {
        let err = connection_error("refused");
        assert_eq!(err.backend(), "Redis");
        assert_eq!(err.to_string(), "Connection to Redis failed: refused");
    }

    #[tokio::test]
    async fn test_invalid_url_is_connection_error() {
        let result = RedisHashStore::new("not-a-redis-url").await;

        match result {
            Err(StorageError::ConnectionError { backend, .. }) => assert_eq!(backend, "Redis"),
            Err(other) => panic!("Expected ConnectionError, got {other}"),
            Ok(_) => panic!("Expected ConnectionError"),
        }
    }
}
