use async_trait::async_trait;
use errors::StorageError;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::time::Duration;
use storage::{HashStore, MemoryHashStore};

const BACKEND: &str = "Flaky";

/// In-memory hash backend with switchable failures and call counters.
#[derive(Debug, Default)]
pub struct FlakyHashStore {
    inner: MemoryHashStore,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
    read_delay_ms: AtomicU64,
    reads: AtomicUsize,
    bulk_writes: AtomicUsize,
    single_writes: AtomicUsize,
}

impl FlakyHashStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// The backing store, for seeding and inspecting namespaces directly.
    pub fn inner(&self) -> &MemoryHashStore {
        &self.inner
    }

    pub fn fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Makes every `read_all` sleep before answering.
    pub fn set_read_delay(&self, delay: Duration) {
        self.read_delay_ms
            .store(delay.as_millis() as u64, Ordering::SeqCst);
    }

    pub fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }

    pub fn bulk_writes(&self) -> usize {
        self.bulk_writes.load(Ordering::SeqCst)
    }

    pub fn single_writes(&self) -> usize {
        self.single_writes.load(Ordering::SeqCst)
    }

    fn injected(operation: &str) -> StorageError {
        StorageError::QueryError {
            backend: BACKEND.to_string(),
            reason: format!("injected {} failure", operation),
        }
    }
}

#[async_trait]
impl HashStore for FlakyHashStore {
    async fn read_all(&self, namespace: &str) -> Result<HashMap<String, String>, StorageError> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        let delay = self.read_delay_ms.load(Ordering::SeqCst);
        if delay > 0 {
            tokio::time::sleep(Duration::from_millis(delay)).await;
        }
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(Self::injected("read"));
        }
        self.inner.read_all(namespace).await
    }

    async fn write_many(
        &self,
        namespace: &str,
        fields: &HashMap<String, String>,
    ) -> Result<(), StorageError> {
        self.bulk_writes.fetch_add(1, Ordering::SeqCst);
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(Self::injected("write"));
        }
        self.inner.write_many(namespace, fields).await
    }

    async fn write_one(
        &self,
        namespace: &str,
        key: &str,
        value: &str,
    ) -> Result<(), StorageError> {
        self.single_writes.fetch_add(1, Ordering::SeqCst);
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(Self::injected("write"));
        }
        self.inner.write_one(namespace, key, value).await
    }
}
