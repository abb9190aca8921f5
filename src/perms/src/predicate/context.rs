//! Request-scoped evaluation context and result cache

use dashmap::DashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::debug;

use super::PredicateId;

/// Cache key: which predicate, evaluated against which object
#[derive(Debug, Clone, Hash, Eq, PartialEq)]
pub struct CacheKey {
    predicate: PredicateId,
    object: Option<String>,
}

impl CacheKey {
    pub fn new(predicate: PredicateId, object: Option<String>) -> Self {
        Self { predicate, object }
    }
}

/// Per-request permission result cache
///
/// Lives exactly as long as the [`RequestContext`] that owns it. There is
/// no expiry and no invalidation; a new request gets a new cache.
#[derive(Debug, Default)]
pub struct ResultCache {
    entries: DashMap<CacheKey, bool>,
    hits: AtomicUsize,
    misses: AtomicUsize,
}

impl ResultCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a cached result
    pub fn get(&self, key: &CacheKey) -> Option<bool> {
        // Copy the value out so no shard guard outlives this call.
        let cached = self.entries.get(key).map(|entry| *entry);

        match cached {
            Some(result) => {
                self.hits.fetch_add(1, Ordering::Relaxed);
                debug!(predicate = key.predicate.0, object = ?key.object, result, "permission cache hit");
                Some(result)
            }
            None => {
                self.misses.fetch_add(1, Ordering::Relaxed);
                None
            }
        }
    }

    /// Store a result
    pub fn put(&self, key: CacheKey, result: bool) {
        self.entries.insert(key, result);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Get cache statistics
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            entries: self.entries.len(),
        }
    }
}

/// Cache statistics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: usize,
    pub misses: usize,
    pub entries: usize,
}

impl CacheStats {
    /// Calculate cache hit rate
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

/// Evaluation context for a single request
///
/// Owns the acting user and the result cache for that user. Create one at
/// the start of a request and drop it at the end; re-fetching the user
/// means building a new context, which starts with an empty cache.
#[derive(Debug)]
pub struct RequestContext<U> {
    user: U,
    cache: ResultCache,
}

impl<U> RequestContext<U> {
    pub fn new(user: U) -> Self {
        Self {
            user,
            cache: ResultCache::new(),
        }
    }

    /// The acting user
    pub fn user(&self) -> &U {
        &self.user
    }

    pub fn cache(&self) -> &ResultCache {
        &self.cache
    }

    /// End the request and hand the user back, discarding cached results
    pub fn into_user(self) -> U {
        self.user
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_put_get() {
        let cache = ResultCache::new();
        let key = CacheKey::new(PredicateId(1), Some("doc:1".to_string()));

        // Initially not in cache
        assert!(cache.get(&key).is_none());

        cache.put(key.clone(), true);
        assert_eq!(cache.get(&key), Some(true));

        let stats = cache.stats();
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.entries, 1);
        assert!((stats.hit_rate() - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_cache_keys_distinguish_objects() {
        let cache = ResultCache::new();
        let with_obj = CacheKey::new(PredicateId(7), Some("a".to_string()));
        let without_obj = CacheKey::new(PredicateId(7), None);
        let other_pred = CacheKey::new(PredicateId(8), Some("a".to_string()));

        cache.put(with_obj.clone(), true);
        cache.put(without_obj.clone(), false);

        assert_eq!(cache.get(&with_obj), Some(true));
        assert_eq!(cache.get(&without_obj), Some(false));
        assert!(cache.get(&other_pred).is_none());
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn test_new_context_starts_empty() {
        let ctx = RequestContext::new("alice".to_string());
        ctx.cache().put(CacheKey::new(PredicateId(1), None), true);
        assert_eq!(ctx.cache().len(), 1);

        let user = ctx.into_user();
        let refetched = RequestContext::new(user);
        assert!(refetched.cache().is_empty());
        assert_eq!(refetched.user(), "alice");
    }

    #[test]
    fn test_hit_rate_empty() {
        assert_eq!(CacheStats::default().hit_rate(), 0.0);
    }
}
