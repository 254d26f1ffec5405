//! Reconciliation and synchronization of a `ValueStore` with its remote hash.

use crate::auto_reload::ReloadTask;
use crate::events::{ReloadEvent, ReloadOutcome};
use config::{EngineSettings, validate_settings};
use errors::{ConfigError, ConfigResult};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use storage::{HashStore, RedisHashStore};
use tokio::sync::broadcast;
use tracing::{debug, info, warn};
use values::{ConfigValue, ValueStore};

pub const DEFAULT_RELOAD_INTERVAL: Duration = Duration::from_secs(5);

const EVENT_CHANNEL_CAPACITY: usize = 64;

/// State shared between the engine and its auto-reload task.
pub(crate) struct Shared {
    pub(crate) store: Arc<ValueStore>,
    pub(crate) remote: Arc<dyn HashStore>,
    pub(crate) namespace: String,
    pub(crate) ready: AtomicBool,
    pub(crate) events: broadcast::Sender<ReloadEvent>,
}

impl Shared {
    /// Pulls the remote namespace into the local store unless local changes
    /// are pending. Dirty is only checked here, before the read: a local
    /// write racing the read may be overwritten for keys present remotely.
    pub(crate) async fn reload(&self) -> ConfigResult<ReloadOutcome> {
        if !self.ready.load(Ordering::Acquire) || self.store.is_dirty() {
            return Ok(ReloadOutcome::Skipped);
        }

        let fields = self
            .remote
            .read_all(&self.namespace)
            .await
            .map_err(|source| ConfigError::LoadFromStore {
                namespace: self.namespace.clone(),
                source,
            })?;

        let keys = self.store.apply_remote(&fields);
        Ok(ReloadOutcome::Applied { keys })
    }

    /// One auto-reload tick. Errors end up in logs, metrics and events.
    pub(crate) async fn tick(&self) {
        let namespace = self.namespace.clone();
        let event = match self.reload().await {
            Ok(ReloadOutcome::Applied { keys }) => {
                metrics::counter!("config.reload.applied", "namespace" => namespace.clone())
                    .increment(1);
                debug!(namespace = %namespace, keys, "Reloaded configuration from store");
                ReloadEvent::Applied { namespace, keys }
            }
            Ok(ReloadOutcome::Skipped) => {
                metrics::counter!("config.reload.skipped", "namespace" => namespace.clone())
                    .increment(1);
                debug!(namespace = %namespace, "Local changes pending, reload skipped");
                ReloadEvent::Skipped { namespace }
            }
            Err(e) => {
                metrics::counter!("config.reload.failures", "namespace" => namespace.clone())
                    .increment(1);
                warn!(namespace = %namespace, error = %e, "Auto-reload failed");
                ReloadEvent::Failed {
                    namespace,
                    error: e.to_string(),
                }
            }
        };

        // no subscribers is fine
        let _ = self.events.send(event);
    }
}

/// A `ValueStore` kept in sync with one namespace of a remote hash store.
///
/// # M-CANONICAL-DOCS
///
/// ## Purpose
/// Boots from compiled-in defaults, reconciles them with what is already
/// stored remotely, then serves reads locally while writes go either to the
/// local store only (`store().set_value`), to both sides at once (`set`), or
/// to the remote side in bulk (`persist`).
///
/// ## Conflict policy
/// Remote wins: at construction and on every reload, a key present on both
/// sides takes the remote value. Defaults only reach the remote store for
/// keys it does not have yet.
///
/// ## Usage
/// ```rust,no_run
/// use std::sync::Arc;
/// use storage::MemoryHashStore;
/// use sync::SyncEngine;
/// use values::ValueStore;
///
/// # async fn run() -> Result<(), errors::ConfigError> {
/// let defaults = ValueStore::new();
/// defaults.set_value("max_connections", 100)?;
///
/// let engine = SyncEngine::with_defaults(Arc::new(MemoryHashStore::new()), "config", defaults).await?;
/// let limit = engine.store().get_int_value_lte("max_connections", 500);
/// engine.set("maintenance", true).await?;
/// # Ok(())
/// # }
/// ```
pub struct SyncEngine {
    pub(crate) shared: Arc<Shared>,
    pub(crate) reload_interval: Mutex<Duration>,
    pub(crate) reload_task: Mutex<Option<ReloadTask>>,
}

impl SyncEngine {
    /// Engine with no defaults: the local store mirrors the remote namespace.
    pub async fn new(
        remote: Arc<dyn HashStore>,
        namespace: impl Into<String>,
    ) -> ConfigResult<Self> {
        Self::with_defaults(remote, namespace, ValueStore::new()).await
    }

    /// Reconciles `defaults` with the remote namespace and returns a ready
    /// engine.
    ///
    /// 1. Reads the remote namespace (`LoadFromStore` on failure).
    /// 2. Pushes, in one bulk write, every default the remote side lacks
    ///    (`SyncDefaults` on failure). Existing remote keys are not touched.
    /// 3. Overwrites local keys with the remote values and clears dirty.
    ///
    /// Nothing is returned on failure; there is no half-initialized engine.
    pub async fn with_defaults(
        remote: Arc<dyn HashStore>,
        namespace: impl Into<String>,
        defaults: ValueStore,
    ) -> ConfigResult<Self> {
        let namespace = namespace.into();

        let remote_fields =
            remote
                .read_all(&namespace)
                .await
                .map_err(|source| ConfigError::LoadFromStore {
                    namespace: namespace.clone(),
                    source,
                })?;

        let missing: HashMap<String, String> = defaults
            .snapshot()
            .into_iter()
            .filter(|(key, _)| !remote_fields.contains_key(key))
            .collect();

        if !missing.is_empty() {
            remote
                .write_many(&namespace, &missing)
                .await
                .map_err(|source| ConfigError::SyncDefaults {
                    namespace: namespace.clone(),
                    source,
                })?;
        }
        metrics::histogram!("config.reconcile.pushed_defaults").record(missing.len() as f64);

        defaults.apply_remote(&remote_fields);
        defaults.mark_clean();

        info!(
            namespace = %namespace,
            remote_keys = remote_fields.len(),
            pushed_defaults = missing.len(),
            "Configuration reconciled with store"
        );

        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        let shared = Arc::new(Shared {
            store: Arc::new(defaults),
            remote,
            namespace,
            ready: AtomicBool::new(false),
            events,
        });
        shared.ready.store(true, Ordering::Release);

        Ok(Self {
            shared,
            reload_interval: Mutex::new(DEFAULT_RELOAD_INTERVAL),
            reload_task: Mutex::new(None),
        })
    }

    /// Opens a Redis store from `settings`, reconciles `defaults` against
    /// `settings.namespace`, applies the reload interval and starts
    /// auto-reload when enabled. Settings failing validation are rejected
    /// before any connection attempt.
    pub async fn connect(settings: &EngineSettings, defaults: ValueStore) -> ConfigResult<Self> {
        validate_settings(settings).map_err(|e| ConfigError::InvalidSettings {
            reason: e.to_string(),
        })?;

        let remote = RedisHashStore::from_config(&settings.redis)
            .await
            .map_err(|source| ConfigError::Connect { source })?;

        let engine =
            Self::with_defaults(Arc::new(remote), settings.namespace.clone(), defaults).await?;
        engine.set_reload_interval(settings.reload_interval());
        if settings.auto_reload {
            engine.start_auto_reload().await;
        }
        Ok(engine)
    }

    pub fn store(&self) -> &ValueStore {
        &self.shared.store
    }

    /// Shared handle to the store, for readers that outlive a borrow of the
    /// engine.
    pub fn store_handle(&self) -> Arc<ValueStore> {
        Arc::clone(&self.shared.store)
    }

    pub fn namespace(&self) -> &str {
        &self.shared.namespace
    }

    pub fn is_ready(&self) -> bool {
        self.shared.ready.load(Ordering::Acquire)
    }

    pub fn is_dirty(&self) -> bool {
        self.shared.store.is_dirty()
    }

    /// Sets `key` locally, then writes that single field to the remote
    /// store.
    ///
    /// A remote failure is returned as `ConfigError::Write` but the local
    /// value stays set: local and remote diverge until the next successful
    /// persist.
    pub async fn set<V>(&self, key: impl Into<String>, value: V) -> ConfigResult<()>
    where
        V: TryInto<ConfigValue>,
        ConfigError: From<V::Error>,
    {
        let key = key.into();
        let value: ConfigValue = value.try_into()?;
        let encoded = value.encode();
        self.shared.store.set_config_value(key.clone(), value);

        if let Err(source) = self
            .shared
            .remote
            .write_one(&self.shared.namespace, &key, &encoded)
            .await
        {
            metrics::counter!("config.set.remote_failures").increment(1);
            return Err(ConfigError::Write {
                namespace: self.shared.namespace.clone(),
                key,
                source,
            });
        }
        Ok(())
    }

    /// Writes every local entry to the remote namespace in one bulk write and
    /// clears dirty. Keys only present remotely are left alone.
    ///
    /// Dirty stays set while the write is in flight and after a failure, so
    /// reloads keep holding off. Local writes made during the persist keep
    /// the store dirty even when it succeeds.
    pub async fn persist(&self) -> ConfigResult<()> {
        let store = &self.shared.store;
        let namespace = &self.shared.namespace;

        let generation = store.generation();
        let fields = store.snapshot();

        metrics::counter!("config.persist.total").increment(1);
        match self.shared.remote.write_many(namespace, &fields).await {
            Ok(()) => {
                let clean = store.mark_clean_at(generation);
                debug!(
                    namespace = %namespace,
                    keys = fields.len(),
                    clean,
                    "Persisted configuration"
                );
                Ok(())
            }
            Err(source) => {
                metrics::counter!("config.persist.failures").increment(1);
                Err(ConfigError::Persist {
                    namespace: namespace.clone(),
                    source,
                })
            }
        }
    }

    /// Pulls remote values into the local store now, unless local changes
    /// are pending.
    pub async fn reload(&self) -> ConfigResult<ReloadOutcome> {
        self.shared.reload().await
    }

    /// Receiver for events published by the auto-reload task.
    pub fn subscribe(&self) -> broadcast::Receiver<ReloadEvent> {
        self.shared.events.subscribe()
    }
}

impl std::fmt::Debug for SyncEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SyncEngine")
            .field("namespace", &self.shared.namespace)
            .field("ready", &self.is_ready())
            .field("dirty", &self.is_dirty())
            .field("keys", &self.shared.store.len())
            .field("reload_interval", &*self.reload_interval.lock())
            .field("auto_reload", &self.is_auto_reloading())
            .finish()
    }
}
