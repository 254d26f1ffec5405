use async_trait::async_trait;
use errors::StorageError;
use std::collections::HashMap;

/// A remote service holding one string→string hash per namespace.
///
/// Writes are all-or-nothing from the caller's point of view; there is no
/// partial-success reporting.
#[async_trait]
pub trait HashStore: Send + Sync {
    /// Every field of the namespace. A namespace that was never written reads
    /// as an empty map.
    async fn read_all(&self, namespace: &str) -> Result<HashMap<String, String>, StorageError>;

    /// Writes all `fields` in one operation. An empty map is a no-op.
    async fn write_many(
        &self,
        namespace: &str,
        fields: &HashMap<String, String>,
    ) -> Result<(), StorageError>;

    async fn write_one(&self, namespace: &str, key: &str, value: &str)
    -> Result<(), StorageError>;
}
