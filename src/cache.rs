use dashmap::DashMap;
use sha2::{Digest, Sha256};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};
use tracing::debug;

use crate::clock::{Clock, SystemClock};

// Cache entry with absolute expiry, stamped with the generation it was filled in
#[derive(Clone)]
pub struct CacheEntry<V> {
    pub value: V,
    pub expires_at: Instant,
    pub generation: u64,
}

// In-memory TTL cache keyed by request fingerprint.
// Expired entries are only dropped when they are looked up again; there is no
// size bound and no background sweep. `clear` bumps the generation, and an
// entry from an older generation is never served.
pub struct ResponseCache<V> {
    entries: DashMap<String, CacheEntry<V>>,
    generation: AtomicU64,
    default_ttl: Duration,
    clock: Arc<dyn Clock>,
}

impl<V: Clone> ResponseCache<V> {
    pub fn new(default_ttl: Duration) -> Self {
        Self::with_clock(default_ttl, Arc::new(SystemClock))
    }

    pub fn with_clock(default_ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: DashMap::new(),
            generation: AtomicU64::new(0),
            default_ttl,
            clock,
        }
    }

    pub fn default_ttl(&self) -> Duration {
        self.default_ttl
    }

    // read before computing a value that will be passed to insert_for_generation
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::Acquire)
    }

    // Returns the stored value if present, unexpired and from the current generation.
    pub fn get(&self, key: &str) -> Option<V> {
        let now = self.clock.now();
        let generation = self.generation();
        let stale =
            |entry: &CacheEntry<V>| now >= entry.expires_at || entry.generation != generation;

        if let Some(entry) = self.entries.get(key) {
            if !stale(entry.value()) {
                debug!("Cache HIT for key: {}...", short(key));
                return Some(entry.value.clone());
            }
        }

        // only drop it if nobody refreshed it in the meantime
        if self.entries.remove_if(key, |_, entry| stale(entry)).is_some() {
            debug!("Cache EXPIRED for key: {}...", short(key));
        }

        debug!("Cache MISS for key: {}...", short(key));
        None
    }

    pub fn insert(&self, key: String, value: V) {
        self.insert_with_ttl(key, value, self.default_ttl);
    }

    // overwrites whatever was there
    pub fn insert_with_ttl(&self, key: String, value: V, ttl: Duration) {
        self.store(key, value, ttl, self.generation());
    }

    // Stores `value` only if no clear happened since `generation` was read.
    // Returns whether it was stored.
    pub fn insert_for_generation(&self, key: String, value: V, generation: u64) -> bool {
        if generation != self.generation() {
            debug!("Cache SKIP for key: {}... (cleared while computing)", short(&key));
            return false;
        }
        self.store(key, value, self.default_ttl, generation);
        true
    }

    fn store(&self, key: String, value: V, ttl: Duration, generation: u64) {
        let expires_at = self.clock.now() + ttl;
        debug!("Cache SET for key: {}... (TTL: {}s)", short(&key), ttl.as_secs());
        self.entries.insert(
            key,
            CacheEntry {
                value,
                expires_at,
                generation,
            },
        );
    }

    pub fn clear(&self) {
        // bump first so a fill racing with the clear lands in the old generation
        self.generation.fetch_add(1, Ordering::AcqRel);
        self.entries.clear();
        debug!("Cache cleared");
    }

    // Number of held entries, expired-but-unread ones included.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// Create a cache key (hash of method + path + query)
pub fn fingerprint(method: &str, path: &str, query: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(format!("{}:{}:{}", method, path, query));
    format!("{:x}", hasher.finalize())
}

fn short(key: &str) -> &str {
    key.get(..8).unwrap_or(key)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;

    fn cache_with_clock(ttl_secs: u64) -> (ResponseCache<String>, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::new());
        let cache = ResponseCache::with_clock(Duration::from_secs(ttl_secs), clock.clone());
        (cache, clock)
    }

    #[test]
    fn stored_value_is_visible_immediately() {
        let (cache, _clock) = cache_with_clock(30);
        cache.insert("k".into(), "v".into());
        assert_eq!(cache.get("k"), Some("v".to_string()));
    }

    #[test]
    fn entry_expires_after_default_ttl() {
        let (cache, clock) = cache_with_clock(2);
        cache.insert("k".into(), "v".into());

        clock.set(Duration::from_secs(1));
        assert_eq!(cache.get("k"), Some("v".to_string()));

        clock.set(Duration::from_secs(3));
        assert_eq!(cache.get("k"), None);
    }

    #[test]
    fn entry_is_absent_exactly_at_expiry() {
        let (cache, clock) = cache_with_clock(2);
        cache.insert("k".into(), "v".into());
        clock.set(Duration::from_secs(2));
        assert_eq!(cache.get("k"), None);
    }

    #[test]
    fn explicit_ttl_overrides_default() {
        let (cache, clock) = cache_with_clock(1800);
        cache.insert_with_ttl("k".into(), "v".into(), Duration::from_secs(5));

        clock.advance(Duration::from_secs(6));
        assert_eq!(cache.get("k"), None);
    }

    #[test]
    fn reinsert_keeps_latest_value_and_resets_expiry() {
        let (cache, clock) = cache_with_clock(10);
        cache.insert("k".into(), "first".into());
        clock.advance(Duration::from_secs(8));
        cache.insert("k".into(), "second".into());
        cache.insert("k".into(), "second".into());

        clock.advance(Duration::from_secs(8));
        assert_eq!(cache.get("k"), Some("second".to_string()));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn expired_entries_linger_until_read() {
        let (cache, clock) = cache_with_clock(1);
        cache.insert("a".into(), "1".into());
        cache.insert("b".into(), "2".into());
        clock.advance(Duration::from_secs(5));

        assert_eq!(cache.len(), 2);
        assert_eq!(cache.get("a"), None);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn clear_drops_everything() {
        let (cache, _clock) = cache_with_clock(60);
        cache.insert("a".into(), "1".into());
        cache.insert("b".into(), "2".into());
        cache.clear();
        assert!(cache.is_empty());
        assert_eq!(cache.get("a"), None);
    }

    #[test]
    fn fill_started_before_clear_is_dropped() {
        let (cache, _clock) = cache_with_clock(60);
        let generation = cache.generation();

        cache.clear();
        assert!(!cache.insert_for_generation("k".into(), "old".into(), generation));
        assert_eq!(cache.get("k"), None);
        assert!(cache.is_empty());

        let current = cache.generation();
        assert!(cache.insert_for_generation("k".into(), "new".into(), current));
        assert_eq!(cache.get("k"), Some("new".to_string()));
    }

    #[test]
    fn entries_from_an_older_generation_are_never_served() {
        let (cache, _clock) = cache_with_clock(60);
        let generation = cache.generation();
        // fill passed its generation check, then a clear ran before the entry landed
        cache.generation.fetch_add(1, Ordering::AcqRel);
        cache.store("k".into(), "old".into(), Duration::from_secs(60), generation);

        assert_eq!(cache.get("k"), None);
        assert!(cache.is_empty());
    }

    #[test]
    fn fingerprint_depends_on_method_path_and_query() {
        let base = fingerprint("GET", "/api/portfolio", "");
        assert_eq!(base, fingerprint("GET", "/api/portfolio", ""));
        assert_ne!(base, fingerprint("HEAD", "/api/portfolio", ""));
        assert_ne!(base, fingerprint("GET", "/api/portfolio/", ""));
        assert_ne!(base, fingerprint("GET", "/api/portfolio", "lang=en"));
        assert_eq!(base.len(), 64);
    }
}
