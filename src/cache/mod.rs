//! Response cache.
//!
//! # Responsibilities
//! - Keep encoded GET responses keyed by request path
//! - Bound the number of entries, evicting the oldest insertion first
//!
//! # Design Decisions
//! - Reads go straight to a `DashMap`; writers serialise through the
//!   insertion-order queue so check → evict → insert is atomic
//! - Replacing an existing key keeps its position and evicts nothing
//! - No expiry: handler output is assumed to depend only on the path

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, PoisonError};

use dashmap::DashMap;

use crate::config::CacheConfig;
use crate::http::Method;
use crate::observability::metrics;

/// Bounded FIFO cache of encoded responses.
#[derive(Debug)]
pub struct ResponseCache {
    entries: DashMap<String, Arc<[u8]>>,
    order: Mutex<VecDeque<String>>,
    capacity: usize,
    max_entry_bytes: usize,
}

impl ResponseCache {
    /// Create an empty cache. A zero capacity is treated as one.
    pub fn new(capacity: usize, max_entry_bytes: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: DashMap::with_capacity(capacity),
            order: Mutex::new(VecDeque::with_capacity(capacity)),
            capacity,
            max_entry_bytes,
        }
    }

    pub fn from_config(config: &CacheConfig) -> Self {
        Self::new(config.capacity, config.max_entry_bytes)
    }

    /// Cached bytes for a path, if any.
    pub fn try_get(&self, path: &str) -> Option<Arc<[u8]>> {
        self.entries.get(path).map(|r| Arc::clone(r.value()))
    }

    /// Whether a response of `len` bytes to `method` may be cached.
    pub fn is_cacheable(&self, method: &Method, len: usize) -> bool {
        *method == Method::Get && len <= self.max_entry_bytes
    }

    /// Insert or replace an entry, returning the key evicted to make room.
    pub fn put(&self, path: &str, bytes: Arc<[u8]>) -> Option<String> {
        // `order` and `entries` only change together under this lock.
        let mut order = self.order.lock().unwrap_or_else(PoisonError::into_inner);

        if self.entries.contains_key(path) {
            self.entries.insert(path.to_string(), bytes);
            return None;
        }

        let evicted = if order.len() >= self.capacity {
            order.pop_front().inspect(|oldest| {
                self.entries.remove(oldest);
            })
        } else {
            None
        };

        order.push_back(path.to_string());
        self.entries.insert(path.to_string(), bytes);

        if let Some(oldest) = &evicted {
            tracing::debug!(evicted = %oldest, inserted = %path, "Cache entry evicted");
        }
        metrics::record_cache_size(self.entries.len());
        evicted
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn max_entry_bytes(&self) -> usize {
        self.max_entry_bytes
    }

    pub fn contains(&self, path: &str) -> bool {
        self.entries.contains_key(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    fn bytes(s: &str) -> Arc<[u8]> {
        Arc::from(s.as_bytes())
    }

    #[test]
    fn get_after_put() {
        let cache = ResponseCache::new(4, 1024);
        assert!(cache.try_get("/about").is_none());

        cache.put("/about", bytes("about"));
        assert_eq!(&*cache.try_get("/about").unwrap(), b"about");
    }

    #[test]
    fn evicts_oldest_insertion() {
        let cache = ResponseCache::new(3, 1024);
        assert_eq!(cache.put("/c", bytes("c")), None);
        assert_eq!(cache.put("/a", bytes("a")), None);
        assert_eq!(cache.put("/b", bytes("b")), None);

        assert_eq!(cache.put("/d", bytes("d")), Some("/c".to_string()));
        assert_eq!(cache.len(), 3);
        assert!(!cache.contains("/c"));
        assert!(cache.contains("/a") && cache.contains("/b") && cache.contains("/d"));

        assert_eq!(cache.put("/e", bytes("e")), Some("/a".to_string()));
    }

    #[test]
    fn replace_does_not_evict_or_reorder() {
        let cache = ResponseCache::new(2, 1024);
        cache.put("/a", bytes("a1"));
        cache.put("/b", bytes("b"));

        assert_eq!(cache.put("/a", bytes("a2")), None);
        assert_eq!(&*cache.try_get("/a").unwrap(), b"a2");
        assert_eq!(cache.len(), 2);

        // `/a` is still the oldest insertion.
        assert_eq!(cache.put("/c", bytes("c")), Some("/a".to_string()));
    }

    #[test]
    fn cacheability() {
        let cache = ResponseCache::new(2, 10);
        assert!(cache.is_cacheable(&Method::Get, 10));
        assert!(!cache.is_cacheable(&Method::Get, 11));
        assert!(!cache.is_cacheable(&Method::Post, 1));
    }

    #[test]
    fn put_survives_poisoned_lock() {
        let cache = Arc::new(ResponseCache::new(2, 1024));
        cache.put("/a", bytes("a"));

        let poisoner = Arc::clone(&cache);
        let result = thread::spawn(move || {
            let _order = poisoner.order.lock().unwrap();
            panic!("worker died holding the cache lock");
        })
        .join();
        assert!(result.is_err());
        assert!(cache.order.is_poisoned());

        assert_eq!(cache.put("/b", bytes("b")), None);
        assert_eq!(cache.put("/c", bytes("c")), Some("/a".to_string()));
        assert_eq!(&*cache.try_get("/c").unwrap(), b"c");
    }

    #[test]
    fn concurrent_puts_respect_capacity() {
        let cache = Arc::new(ResponseCache::new(16, 1024));
        let handles: Vec<_> = (0..8)
            .map(|t| {
                let cache = Arc::clone(&cache);
                thread::spawn(move || {
                    for i in 0..100 {
                        cache.put(&format!("/t{t}/{i}"), bytes("x"));
                        assert!(cache.len() <= 16);
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }
        assert_eq!(cache.len(), 16);
    }
}
