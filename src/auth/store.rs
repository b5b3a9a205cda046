//! Injected keyed stores with per-entry TTL.
//!
//! Lockout and OTP state are process-lifetime only, but the components never
//! touch a global map: they receive an `Arc<dyn StateStore<_>>`. Single-node
//! deployments use [`MemoryStore`]; a multi-instance deployment would provide
//! an implementation backed by a shared TTL-capable cache instead.

use chrono::{DateTime, TimeDelta, Utc};
use dashmap::DashMap;
use std::time::Duration;

/// Keyed get/set/remove with a TTL per entry.
pub trait StateStore<V>: Send + Sync {
    fn get(&self, key: &str) -> Option<V>;

    fn set(&self, key: &str, value: V, ttl: Duration);

    fn remove(&self, key: &str);
}

struct Entry<V> {
    value: V,
    expires_at: DateTime<Utc>,
}

/// Concurrent in-memory store. Expired entries are dropped on read; there is
/// no background sweeper, so an abandoned key lives until its next lookup.
pub struct MemoryStore<V> {
    entries: DashMap<String, Entry<V>>,
}

impl<V> MemoryStore<V> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: DashMap::new(),
        }
    }
}

impl<V> Default for MemoryStore<V> {
    fn default() -> Self {
        Self::new()
    }
}

fn expiry_from(ttl: Duration) -> DateTime<Utc> {
    let delta = TimeDelta::from_std(ttl).unwrap_or(TimeDelta::MAX);
    Utc::now().checked_add_signed(delta).unwrap_or(DateTime::<Utc>::MAX_UTC)
}

impl<V: Clone + Send + Sync> StateStore<V> for MemoryStore<V> {
    fn get(&self, key: &str) -> Option<V> {
        let expired = match self.entries.get(key) {
            Some(entry) => {
                if entry.expires_at > Utc::now() {
                    return Some(entry.value.clone());
                }
                true
            }
            None => false,
        };
        if expired {
            self.entries.remove(key);
        }
        None
    }

    fn set(&self, key: &str, value: V, ttl: Duration) {
        self.entries.insert(
            key.to_string(),
            Entry {
                value,
                expires_at: expiry_from(ttl),
            },
        );
    }

    fn remove(&self, key: &str) {
        self.entries.remove(key);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_get_remove() {
        let store = MemoryStore::new();
        store.set("k", 7u32, Duration::from_secs(60));
        assert_eq!(store.get("k"), Some(7));

        store.remove("k");
        assert_eq!(store.get("k"), None);
    }

    #[test]
    fn overwrite_replaces_value() {
        let store = MemoryStore::new();
        store.set("k", "first".to_string(), Duration::from_secs(60));
        store.set("k", "second".to_string(), Duration::from_secs(60));
        assert_eq!(store.get("k").as_deref(), Some("second"));
    }

    #[test]
    fn expired_entry_is_dropped_on_read() {
        let store = MemoryStore::new();
        store.set("k", 1u32, Duration::ZERO);
        assert_eq!(store.get("k"), None);
        // The expired entry was physically removed, not just hidden.
        assert!(store.entries.is_empty());
    }

    #[test]
    fn missing_key_is_none() {
        let store: MemoryStore<u32> = MemoryStore::new();
        assert_eq!(store.get("missing"), None);
    }
}
