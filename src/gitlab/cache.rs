//! Run-scoped cache over GitLab GET responses.
//!
//! The cache lives inside one client value and dies with it, so repeated
//! lookups within a run (the resolved-peer fetches during reconciliation in
//! particular) reuse the snapshot instead of hitting the API again. Entries
//! expire after a TTL bounded by the lifetime of a single run.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

/// Operation plus parameters, one variant per cached endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CacheKey {
    Project(i64),
    MergeRequestList(i64),
    MergeRequest(i64, i64),
    MergeRequestChanges(i64, i64),
}

pub struct ResponseCache {
    ttl: Duration,
    entries: Mutex<HashMap<CacheKey, (Instant, serde_json::Value)>>,
}

impl ResponseCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Fresh entry for the key, if any. Expired entries are dropped on read.
    pub fn get(&self, key: &CacheKey) -> Option<serde_json::Value> {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        match entries.get(key) {
            Some((stored_at, value)) if stored_at.elapsed() < self.ttl => Some(value.clone()),
            Some(_) => {
                entries.remove(key);
                None
            }
            None => None,
        }
    }

    pub fn put(&self, key: CacheKey, value: serde_json::Value) {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.insert(key, (Instant::now(), value));
    }

    /// Drop a single entry, used after a mutation makes it stale.
    pub fn invalidate(&self, key: &CacheKey) {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.remove(key);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_miss_then_hit() {
        let cache = ResponseCache::new(Duration::from_secs(60));
        let key = CacheKey::Project(1);
        assert!(cache.get(&key).is_none());
        cache.put(key.clone(), serde_json::json!({"id": 1}));
        assert_eq!(cache.get(&key).unwrap()["id"], 1);
    }

    #[test]
    fn test_expired_entry_is_dropped() {
        let cache = ResponseCache::new(Duration::ZERO);
        let key = CacheKey::MergeRequest(1, 2);
        cache.put(key.clone(), serde_json::json!(null));
        assert!(cache.get(&key).is_none());
    }

    #[test]
    fn test_keys_are_parameter_sensitive() {
        let cache = ResponseCache::new(Duration::from_secs(60));
        cache.put(CacheKey::MergeRequest(1, 2), serde_json::json!(2));
        assert!(cache.get(&CacheKey::MergeRequest(1, 3)).is_none());
        assert!(cache.get(&CacheKey::MergeRequestChanges(1, 2)).is_none());
    }

    #[test]
    fn test_invalidate_removes_entry() {
        let cache = ResponseCache::new(Duration::from_secs(60));
        let key = CacheKey::MergeRequest(7, 7);
        cache.put(key.clone(), serde_json::json!(7));
        cache.invalidate(&key);
        assert!(cache.get(&key).is_none());
    }
}
