//! Process-local TTL cache for analytics responses
//!
//! One instance per process; entries expire after a fixed TTL. Each
//! service instance has its own independent view, so cross-instance
//! staleness is bounded by the TTL.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use serde_json::Value;

struct CacheEntry {
    expires_at: Instant,
    value: Value,
}

/// Expiring key → JSON value map
pub struct TtlCache {
    ttl: Duration,
    entries: Mutex<HashMap<String, CacheEntry>>,
}

impl TtlCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Look up a live entry. Expired entries are dropped on access.
    pub fn get(&self, key: &str) -> Option<Value> {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        match entries.get(key) {
            Some(entry) if entry.expires_at > Instant::now() => Some(entry.value.clone()),
            Some(_) => {
                entries.remove(key);
                None
            }
            None => None,
        }
    }

    /// Insert or refresh an entry with the configured TTL.
    pub fn set(&self, key: &str, value: Value) {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.insert(
            key.to_string(),
            CacheEntry {
                expires_at: Instant::now() + self.ttl,
                value,
            },
        );
    }
}

/// Canonical cache key: request path plus sorted query parameters.
///
/// The `nocache` flag never participates in the key.
pub fn cache_key(path: &str, params: &[(&str, String)]) -> String {
    let mut kept: Vec<(&str, &str)> = params
        .iter()
        .filter(|(name, _)| *name != "nocache")
        .map(|(name, value)| (*name, value.as_str()))
        .collect();
    kept.sort();
    let query: Vec<String> = kept.iter().map(|(n, v)| format!("{}={}", n, v)).collect();
    format!("{}?{}", path, query.join("&"))
}
