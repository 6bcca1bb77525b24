//! Cache Store Module
//!
//! Main cache engine combining HashMap storage with LFU eviction, a change
//! log and removal/update observers.

use std::any::Any;
use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use serde::Serialize;
use tracing::{debug, info};

use crate::cache::changelog::Change;
use crate::cache::observer::{Notification, Observers};
use crate::cache::stats::StatsRecorder;
use crate::cache::{
    select_victim, CacheEntry, CacheStats, CacheValue, ChangeLog, DEFAULT_CAPACITY,
};
use crate::config::Config;
use crate::error::{CacheError, Result};

/// Upper bound on slots reserved up front for a new capacity
const MAX_PREALLOCATED_ENTRIES: usize = 1024;

// == Entry Table ==
/// Entries and capacity, guarded together by one lock.
#[derive(Debug)]
struct EntryTable {
    entries: HashMap<String, CacheEntry>,
    capacity: usize,
    next_seq: u64,
}

// == Cache Info ==
/// Summary of the cache's size and performance.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CacheInfo {
    /// Current capacity bound
    pub capacity: usize,
    /// Number of live entries
    pub entries: usize,
    /// Performance statistics
    pub stats: CacheStats,
}

// == Cache Store ==
/// Bounded cache with least-frequently-used eviction.
///
/// All methods take `&self`; share one instance across threads with `Arc`.
/// Mutations are serialised by a write lock on the entry table. Reads share
/// a read lock and bump per-entry atomic usage counters.
///
/// Observers run on the calling thread after the entry table is unlocked
/// and before the mutating call returns.
#[derive(Debug)]
pub struct CacheStore {
    /// Entries, capacity and insertion sequence
    table: RwLock<EntryTable>,
    /// Append-only mutation log
    log: ChangeLog,
    /// Removal and update callbacks
    observers: Observers,
    /// Performance statistics
    stats: StatsRecorder,
}

impl CacheStore {
    // == Constructor ==
    /// Creates a new CacheStore with the default capacity of 10.
    pub fn new() -> Self {
        Self::build(DEFAULT_CAPACITY)
    }

    /// Creates a new CacheStore holding at most `capacity` entries.
    ///
    /// Fails with `InvalidArgument` if `capacity` is zero.
    pub fn with_capacity(capacity: usize) -> Result<Self> {
        validate_capacity(capacity)?;
        Ok(Self::build(capacity))
    }

    /// Creates a new CacheStore from configuration.
    pub fn from_config(config: &Config) -> Result<Self> {
        Self::with_capacity(config.capacity)
    }

    fn build(capacity: usize) -> Self {
        Self {
            table: RwLock::new(EntryTable {
                entries: HashMap::with_capacity(capacity.min(MAX_PREALLOCATED_ENTRIES)),
                capacity,
                next_seq: 0,
            }),
            log: ChangeLog::new(),
            observers: Observers::default(),
            stats: StatsRecorder::default(),
        }
    }

    // == Add ==
    /// Inserts a new entry.
    ///
    /// If the cache is full, least-frequently-used entries are evicted first
    /// (each eviction is logged and reported to removal observers).
    ///
    /// # Errors
    /// - `InvalidArgument` if `key` is empty
    /// - `DuplicateKey` if `key` is already present
    pub fn add<T: Any + Send + Sync>(&self, key: &str, value: T) -> Result<()> {
        self.add_value(key, CacheValue::new(value))
    }

    /// Inserts an already type-erased value. See [`CacheStore::add`].
    pub fn add_value(&self, key: &str, value: CacheValue) -> Result<()> {
        validate_key(key)?;

        let mut notifications = Vec::new();
        {
            let mut table = self.table.write();

            if table.entries.contains_key(key) {
                return Err(CacheError::DuplicateKey(key.to_string()));
            }

            while table.entries.len() >= table.capacity {
                let victim = select_victim(
                    table
                        .entries
                        .iter()
                        .map(|(k, e)| (k.as_str(), e.usage.rank(), e.seq)),
                )
                .map(str::to_string);

                let Some(victim) = victim else { break };
                if let Some(entry) = self.detach(&mut table, &victim) {
                    info!(
                        key = %victim,
                        reads = entry.usage.rank(),
                        "evicted least frequently used entry"
                    );
                }
                self.stats.record_eviction();
                notifications.push(Notification::Removed(victim));
            }

            let seq = table.next_seq;
            table.next_seq += 1;
            table
                .entries
                .insert(key.to_string(), CacheEntry::new(value, seq));
            self.log.append(Change::Added(key));
            debug!(key, "added entry");
        }

        self.observers.dispatch(notifications);
        Ok(())
    }

    // == Get ==
    /// Retrieves a value as `T` and records one read of `key`.
    ///
    /// # Errors
    /// - `InvalidArgument` if `key` is empty
    /// - `NotFound` if `key` is absent
    /// - `TypeMismatch` if the stored value is not a `T`; the read is not counted
    pub fn get<T: Any + Send + Sync>(&self, key: &str) -> Result<Arc<T>> {
        self.read_with(key, |value| value.downcast::<T>(key))
    }

    /// Retrieves the type-erased value and records one read of `key`.
    pub fn get_value(&self, key: &str) -> Result<CacheValue> {
        self.read_with(key, |value| Ok(value.clone()))
    }

    fn read_with<R>(
        &self,
        key: &str,
        extract: impl FnOnce(&CacheValue) -> Result<R>,
    ) -> Result<R> {
        validate_key(key)?;

        let table = self.table.read();
        let Some(entry) = table.entries.get(key) else {
            self.stats.record_miss();
            return Err(CacheError::NotFound(key.to_string()));
        };

        let value = extract(&entry.value)?;
        let reads = entry.usage.increment();
        self.stats.record_hit();
        debug!(key, reads, "read entry");

        Ok(value)
    }

    // == Update ==
    /// Replaces the value of an existing entry and notifies update observers.
    ///
    /// The usage counter is left untouched.
    ///
    /// # Errors
    /// - `InvalidArgument` if `key` is empty
    /// - `NotFound` if `key` is absent
    pub fn update<T: Any + Send + Sync>(&self, key: &str, value: T) -> Result<()> {
        self.update_value(key, CacheValue::new(value))
    }

    /// Replaces an entry with an already type-erased value. See [`CacheStore::update`].
    pub fn update_value(&self, key: &str, value: CacheValue) -> Result<()> {
        validate_key(key)?;

        {
            let mut table = self.table.write();
            let entry = table
                .entries
                .get_mut(key)
                .ok_or_else(|| CacheError::NotFound(key.to_string()))?;
            entry.value = value;
            self.log.append(Change::Updated(key));
            debug!(key, "updated entry");
        }

        self.observers
            .dispatch(vec![Notification::Updated(key.to_string())]);
        Ok(())
    }

    // == Remove ==
    /// Removes an entry with its usage counter and notifies removal observers.
    ///
    /// # Errors
    /// - `InvalidArgument` if `key` is empty
    /// - `NotFound` if `key` is absent
    pub fn remove(&self, key: &str) -> Result<()> {
        validate_key(key)?;

        {
            let mut table = self.table.write();
            self.detach(&mut table, key)
                .ok_or_else(|| CacheError::NotFound(key.to_string()))?;
            debug!(key, "removed entry");
        }

        self.observers
            .dispatch(vec![Notification::Removed(key.to_string())]);
        Ok(())
    }

    /// Removes `key` from the table and logs it. Caller holds the write lock.
    fn detach(&self, table: &mut EntryTable, key: &str) -> Option<CacheEntry> {
        let entry = table.entries.remove(key)?;
        self.log.append(Change::Removed(key));
        Some(entry)
    }

    // == Clear All ==
    /// Removes every entry and usage counter.
    ///
    /// Does nothing on an empty cache. Otherwise appends a single
    /// `"cache cleared"` record; removal observers are not notified.
    pub fn clear_all(&self) {
        let mut table = self.table.write();
        if table.entries.is_empty() {
            return;
        }

        let removed = table.entries.len();
        table.entries.clear();
        self.log.append(Change::Cleared);
        info!(removed, "cache cleared");
    }

    // == Set Capacity ==
    /// Changes the capacity bound.
    ///
    /// Existing entries are kept even if they exceed the new bound; the next
    /// `add` evicts down to it.
    ///
    /// # Errors
    /// - `InvalidArgument` if `capacity` is zero
    pub fn set_capacity(&self, capacity: usize) -> Result<()> {
        validate_capacity(capacity)?;

        let mut table = self.table.write();
        let previous = table.capacity;
        table.capacity = capacity;
        let additional = capacity
            .min(MAX_PREALLOCATED_ENTRIES)
            .saturating_sub(table.entries.len());
        // Preallocation is best effort
        let _ = table.entries.try_reserve(additional);
        info!(previous, capacity, "cache capacity changed");

        Ok(())
    }

    // == Change Log ==
    /// Returns a live view of the change log.
    pub fn change_log(&self) -> ChangeLog {
        self.log.clone()
    }

    // == Observers ==
    /// Registers a callback invoked with the key of every removed or evicted entry.
    pub fn on_item_removed<F>(&self, callback: F)
    where
        F: Fn(&str) + Send + Sync + 'static,
    {
        self.observers.removed.register(Arc::new(callback));
    }

    /// Registers a callback invoked with the key of every updated entry.
    pub fn on_item_updated<F>(&self, callback: F)
    where
        F: Fn(&str) + Send + Sync + 'static,
    {
        self.observers.updated.register(Arc::new(callback));
    }

    // == Info ==
    /// Returns capacity, entry count and statistics.
    pub fn info(&self) -> CacheInfo {
        let table = self.table.read();
        CacheInfo {
            capacity: table.capacity,
            entries: table.entries.len(),
            stats: self.stats.snapshot(table.entries.len()),
        }
    }

    // == Stats ==
    /// Returns current cache statistics.
    pub fn stats(&self) -> CacheStats {
        self.stats.snapshot(self.len())
    }

    // == Usage Count ==
    /// Returns how many times `key` was read, or None if it is absent or was
    /// never read.
    pub fn usage_count(&self, key: &str) -> Option<u64> {
        self.table.read().entries.get(key)?.usage.get()
    }

    // == Keys ==
    /// Returns live keys, oldest insertion first.
    pub fn keys(&self) -> Vec<String> {
        let table = self.table.read();
        let mut keys: Vec<(&String, u64)> =
            table.entries.iter().map(|(k, e)| (k, e.seq)).collect();
        keys.sort_by_key(|&(_, seq)| seq);
        keys.into_iter().map(|(k, _)| k.clone()).collect()
    }

    // == Contains Key ==
    pub fn contains_key(&self, key: &str) -> bool {
        self.table.read().entries.contains_key(key)
    }

    // == Capacity ==
    pub fn capacity(&self) -> usize {
        self.table.read().capacity
    }

    // == Length ==
    /// Returns the current number of entries in the cache.
    pub fn len(&self) -> usize {
        self.table.read().entries.len()
    }

    // == Is Empty ==
    /// Returns true if the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.table.read().entries.is_empty()
    }
}

impl Default for CacheStore {
    fn default() -> Self {
        Self::new()
    }
}

fn validate_key(key: &str) -> Result<()> {
    if key.is_empty() {
        return Err(CacheError::InvalidArgument(
            "Key cannot be empty".to_string(),
        ));
    }
    Ok(())
}

fn validate_capacity(capacity: usize) -> Result<()> {
    if capacity == 0 {
        return Err(CacheError::InvalidArgument(
            "Capacity must be greater than zero".to_string(),
        ));
    }
    Ok(())
}
