//! Named ownership of object caches.
//!
//! The metadata layer keeps one cache per backing collection (runs, tags,
//! experiments) and invalidates them together whenever the backing store may
//! have changed.

use std::collections::HashMap;
use std::hash::Hash;

use crate::object_cache::ObjectCache;

/// Owner of named [`ObjectCache`]s sharing one object and key type.
pub struct CacheRegistry<T, K> {
    caches: HashMap<String, ObjectCache<T, K>>,
}

impl<T, K: Eq + Hash> CacheRegistry<T, K> {
    pub fn new() -> Self {
        Self {
            caches: HashMap::new(),
        }
    }

    /// Register a cache under `name` with its fetch and key functions.
    ///
    /// Idempotent: a second registration under an existing name is a no-op,
    /// keeping the first cache and whatever it has already populated.
    pub fn init_cache<F, G>(&mut self, name: impl Into<String>, fetch: F, key_of: G)
    where
        F: Fn() -> Vec<T> + Send + 'static,
        G: Fn(&T) -> K + Send + 'static,
    {
        self.caches
            .entry(name.into())
            .or_insert_with(|| ObjectCache::new(fetch, key_of));
    }

    /// Borrow a registered cache for lookups.
    pub fn cache_mut(&mut self, name: &str) -> Option<&mut ObjectCache<T, K>> {
        self.caches.get_mut(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.caches.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.caches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.caches.is_empty()
    }

    /// Invalidate every registered cache in place; registrations survive and
    /// each cache refetches on its next lookup.
    pub fn invalidate_all(&mut self) {
        for cache in self.caches.values_mut() {
            cache.invalidate();
        }
    }

    /// Drop every registration outright. Callers re-register before the next
    /// lookup.
    pub fn clear(&mut self) {
        self.caches.clear();
    }
}

impl<T, K: Eq + Hash> Default for CacheRegistry<T, K> {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// TESTS
// =============================================================================
