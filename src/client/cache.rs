//! Cache for published query results
//!
//! Entries are keyed by a hash of the rendered query and its parameters and
//! expire after a fixed TTL. Draft reads never touch the cache.

use moka::sync::Cache;
use serde_json::Value;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::time::Duration;

use crate::config::CacheConfig;
use crate::query::Query;

/// In-process result cache with TTL and a size bound
///
/// A zero TTL or capacity disables caching entirely.
pub struct QueryCache {
    entries: Option<Cache<u64, Value>>,
}

/// Calculate the cache key for a query
pub fn hash_query(query: &Query) -> u64 {
    let mut hasher = DefaultHasher::new();
    query.to_groq().hash(&mut hasher);
    for (name, value) in query.params() {
        name.hash(&mut hasher);
        value.to_string().hash(&mut hasher);
    }
    hasher.finish()
}

impl QueryCache {
    pub fn new(config: &CacheConfig) -> Self {
        let entries = (config.ttl_secs > 0 && config.capacity > 0).then(|| {
            Cache::builder()
                .time_to_live(Duration::from_secs(config.ttl_secs))
                .max_capacity(config.capacity as u64)
                .build()
        });
        Self { entries }
    }

    /// A fresh cached value, if any
    pub fn get(&self, key: u64) -> Option<Value> {
        self.entries.as_ref()?.get(&key)
    }

    pub fn insert(&self, key: u64, value: Value) {
        if let Some(entries) = &self.entries {
            entries.insert(key, value);
        }
    }

    pub fn clear(&self) {
        if let Some(entries) = &self.entries {
            entries.invalidate_all();
        }
    }

    /// Number of entries after pending evictions have run
    pub fn len(&self) -> usize {
        self.entries.as_ref().map_or(0, |entries| {
            entries.run_pending_tasks();
            entries.entry_count() as usize
        })
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
