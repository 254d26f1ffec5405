use crate::traits::HashStore;
use async_trait::async_trait;
use dashmap::DashMap;
use errors::StorageError;
use std::collections::HashMap;

/// In-process hash backend.
///
/// Each namespace is one `HashMap` behind a `DashMap` shard lock, so a
/// `write_many` lands atomically with respect to concurrent readers.
#[derive(Debug, Default)]
pub struct MemoryHashStore {
    hashes: DashMap<String, HashMap<String, String>>,
}

impl MemoryHashStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Writes a field directly, bypassing any engine. Handy for simulating
    /// another process updating the namespace.
    pub fn insert(&self, namespace: &str, key: &str, value: &str) {
        self.hashes
            .entry(namespace.to_string())
            .or_default()
            .insert(key.to_string(), value.to_string());
    }

    pub fn fields(&self, namespace: &str) -> HashMap<String, String> {
        self.hashes
            .get(namespace)
            .map(|hash| hash.value().clone())
            .unwrap_or_default()
    }

    pub fn remove_namespace(&self, namespace: &str) {
        self.hashes.remove(namespace);
    }
}

#[async_trait]
impl HashStore for MemoryHashStore {
    async fn read_all(&self, namespace: &str) -> Result<HashMap<String, String>, StorageError> {
        Ok(self.fields(namespace))
    }

    async fn write_many(
        &self,
        namespace: &str,
        fields: &HashMap<String, String>,
    ) -> Result<(), StorageError> {
        if fields.is_empty() {
            return Ok(());
        }
        self.hashes
            .entry(namespace.to_string())
            .or_default()
            .extend(fields.iter().map(|(k, v)| (k.clone(), v.clone())));
        Ok(())
    }

    async fn write_one(
        &self,
        namespace: &str,
        key: &str,
        value: &str,
    ) -> Result<(), StorageError> {
        self.insert(namespace, key, value);
        Ok(())
    }
}
