//! Concurrency-safe key/value container with typed accessors.

use crate::value::{ConfigValue, parse_bool};
use dashmap::DashMap;
use errors::{ConfigError, ConfigResult};
use serde_json::from_str;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::trace;

/// Mapping from keys to canonically encoded values.
///
/// # Concurrency
/// Entries live in a sharded `DashMap`; every write replaces one key's value
/// atomically, so readers never observe a partially written value.
///
/// # Dirty flag
/// Every local write through [`ValueStore::set_value`] bumps a write
/// generation after the entry lands. The store is dirty while that generation
/// is ahead of the last generation marked clean, so clearing the flag at a
/// generation read before a snapshot never hides a write made after it.
/// Writes from the remote side go through [`ValueStore::apply_remote`] and
/// leave the flag alone.
#[derive(Debug, Default)]
pub struct ValueStore {
    entries: DashMap<String, String>,
    generation: AtomicU64,
    clean_generation: AtomicU64,
}

impl ValueStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a store pre-populated with defaults. The result is dirty, as if
    /// each pair had been written with `set_value`.
    pub fn from_values<K, I>(values: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, ConfigValue)>,
    {
        let store = Self::new();
        for (key, value) in values {
            store.insert_encoded(key.into(), value.encode());
        }
        store
    }

    /// Encodes `value` and stores it under `key`, marking the store dirty.
    ///
    /// Accepts any native value with a `ConfigValue` conversion, or a
    /// `serde_json::Value` which is rejected with
    /// `ConfigError::UnsupportedValueType` when it has no supported shape. The
    /// store is untouched on failure.
    pub fn set_value<V>(&self, key: impl Into<String>, value: V) -> ConfigResult<()>
    where
        V: TryInto<ConfigValue>,
        ConfigError: From<V::Error>,
    {
        let value: ConfigValue = value.try_into()?;
        self.set_config_value(key, value);
        Ok(())
    }

    /// Stores an already converted value under `key`, marking the store dirty.
    pub fn set_config_value(&self, key: impl Into<String>, value: ConfigValue) {
        self.insert_encoded(key.into(), value.encode());
    }

    fn insert_encoded(&self, key: String, encoded: String) {
        trace!(key = %key, "Setting value");
        self.entries.insert(key, encoded);
        self.generation.fetch_add(1, Ordering::AcqRel);
    }

    /// Overwrites every key present in `snapshot` with the remote value.
    /// Local-only keys are untouched and the dirty flag is not changed.
    ///
    /// Returns the number of keys written.
    pub fn apply_remote(&self, snapshot: &HashMap<String, String>) -> usize {
        for (key, value) in snapshot {
            self.entries.insert(key.clone(), value.clone());
        }
        snapshot.len()
    }

    /// Copy of every entry.
    pub fn snapshot(&self) -> HashMap<String, String> {
        self.entries
            .iter()
            .map(|entry| (entry.key().clone(), entry.value().clone()))
            .collect()
    }

    pub fn keys(&self) -> Vec<String> {
        self.entries.iter().map(|entry| entry.key().clone()).collect()
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn is_dirty(&self) -> bool {
        self.generation() > self.clean_generation.load(Ordering::Acquire)
    }

    /// Current write generation. Every entry written at or before it is
    /// visible to a `snapshot` taken afterwards.
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::Acquire)
    }

    pub fn mark_clean(&self) {
        self.mark_clean_at(self.generation());
    }

    /// Clears dirty for every write up to `generation`. Later writes keep the
    /// store dirty. Returns whether the store is clean afterwards.
    pub fn mark_clean_at(&self, generation: u64) -> bool {
        self.clean_generation.fetch_max(generation, Ordering::AcqRel);
        !self.is_dirty()
    }

    /// Raw stored string, or `default` when the key is absent.
    pub fn get_value(&self, key: &str, default: &str) -> String {
        self.entries
            .get(key)
            .map(|entry| entry.value().clone())
            .unwrap_or_else(|| default.to_string())
    }

    /// Decodes the raw value with `parse`. Absent and empty values count as
    /// missing.
    fn parse_with<T>(&self, key: &str, parse: impl FnOnce(&str) -> Option<T>) -> Option<T> {
        let entry = self.entries.get(key)?;
        let raw = entry.value().as_str();
        if raw.is_empty() {
            return None;
        }
        parse(raw)
    }

    pub fn get_int_value(&self, key: &str, default: i64) -> i64 {
        self.parse_with(key, |raw| raw.parse::<i64>().ok())
            .unwrap_or(default)
    }

    pub fn get_float64_value(&self, key: &str, default: f64) -> f64 {
        self.parse_with(key, |raw| raw.parse::<f64>().ok())
            .unwrap_or(default)
    }

    pub fn get_bool_value(&self, key: &str, default: bool) -> bool {
        self.parse_with(key, parse_bool).unwrap_or(default)
    }

    pub fn get_int_slice_value(&self, key: &str, default: Vec<i64>) -> Vec<i64> {
        self.parse_with(key, |raw| from_str::<Vec<i64>>(raw).ok())
            .unwrap_or(default)
    }

    pub fn get_string_slice_value(&self, key: &str, default: Vec<String>) -> Vec<String> {
        self.parse_with(key, |raw| from_str::<Vec<String>>(raw).ok())
            .unwrap_or(default)
    }

    pub fn get_string_int_map_value(
        &self,
        key: &str,
        default: HashMap<String, i64>,
    ) -> HashMap<String, i64> {
        self.parse_with(key, |raw| from_str::<HashMap<String, i64>>(raw).ok())
            .unwrap_or(default)
    }

    pub fn get_string_string_map_value(
        &self,
        key: &str,
        default: HashMap<String, String>,
    ) -> HashMap<String, String> {
        self.parse_with(key, |raw| from_str::<HashMap<String, String>>(raw).ok())
            .unwrap_or(default)
    }

    /// Stored int if it is strictly less than `bound`, otherwise `bound`.
    /// A missing or malformed value yields `bound`.
    pub fn get_int_value_lt(&self, key: &str, bound: i64) -> i64 {
        let value = self.get_int_value(key, bound);
        if value < bound { value } else { bound }
    }

    /// Stored int if it is at most `bound`, otherwise `bound`.
    pub fn get_int_value_lte(&self, key: &str, bound: i64) -> i64 {
        let value = self.get_int_value(key, bound);
        if value <= bound { value } else { bound }
    }

    /// Stored int if it is strictly greater than `bound`, otherwise `bound`.
    pub fn get_int_value_gt(&self, key: &str, bound: i64) -> i64 {
        let value = self.get_int_value(key, bound);
        if value > bound { value } else { bound }
    }

    /// Stored int if it is at least `bound`, otherwise `bound`.
    pub fn get_int_value_gte(&self, key: &str, bound: i64) -> i64 {
        let value = self.get_int_value(key, bound);
        if value >= bound { value } else { bound }
    }
}
