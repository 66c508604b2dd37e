//! TTL-based response cache.

use std::collections::HashMap;
use std::hash::Hash;

use chrono::{DateTime, Duration, Utc};

/// One cached value with its fetch timestamp.
#[derive(Debug, Clone)]
struct CacheEntry<V> {
    data: V,
    cached_at: DateTime<Utc>,
}

/// In-memory cache where entries expire after a fixed TTL.
///
/// An entry whose age is greater than or equal to the TTL is a miss;
/// callers re-fetch and overwrite it. Each integration owns its own
/// cache instance and key prefix, so keyspaces never mix.
#[derive(Debug)]
pub struct TtlCache<K, V> {
    entries: HashMap<K, CacheEntry<V>>,
    ttl: Duration,
}

impl<K: Eq + Hash, V: Clone> TtlCache<K, V> {
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: HashMap::new(),
            ttl,
        }
    }

    /// Fresh value for `key`, if present and not stale at `now`.
    pub fn get(&self, key: &K, now: DateTime<Utc>) -> Option<V> {
        let entry = self.entries.get(key)?;
        if now - entry.cached_at >= self.ttl {
            return None;
        }
        Some(entry.data.clone())
    }

    /// Store a value fetched at `now`, replacing any stale entry.
    pub fn insert(&mut self, key: K, data: V, now: DateTime<Utc>) {
        self.entries.insert(key, CacheEntry { data, cached_at: now });
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_entries_hit() {
        let mut cache: TtlCache<String, u32> = TtlCache::new(Duration::hours(24));
        let now = Utc::now();
        cache.insert("today:goarch:2025-03-10".to_string(), 7, now);
        assert_eq!(cache.get(&"today:goarch:2025-03-10".to_string(), now), Some(7));
        assert_eq!(
            cache.get(
                &"today:goarch:2025-03-10".to_string(),
                now + Duration::hours(23)
            ),
            Some(7)
        );
    }

    #[test]
    fn entries_at_or_past_ttl_miss() {
        let mut cache: TtlCache<String, u32> = TtlCache::new(Duration::hours(24));
        let now = Utc::now();
        cache.insert("k".to_string(), 7, now);
        // Exactly at the TTL counts as stale.
        assert_eq!(cache.get(&"k".to_string(), now + Duration::hours(24)), None);
        assert_eq!(cache.get(&"k".to_string(), now + Duration::hours(25)), None);
    }

    #[test]
    fn insert_refreshes_timestamp() {
        let mut cache: TtlCache<String, u32> = TtlCache::new(Duration::hours(24));
        let now = Utc::now();
        cache.insert("k".to_string(), 1, now);
        cache.insert("k".to_string(), 2, now + Duration::hours(30));
        assert_eq!(cache.get(&"k".to_string(), now + Duration::hours(31)), Some(2));
        assert_eq!(cache.len(), 1);
    }
}
