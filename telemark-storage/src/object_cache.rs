//! Read-through memoizing lookup table.
//!
//! Speeds up repeated identity-keyed lookups against backing storage: the
//! first lookup after construction or invalidation runs one bulk fetch,
//! indexes every fetched object by its extracted key, and later lookups hit
//! the in-memory map. Missing keys are an expected condition on read paths
//! and come back as `None`, never as an error.

use std::collections::HashMap;
use std::hash::Hash;

/// Generic read-through cache over a bulk-fetch function and a
/// key-extraction function.
///
/// Population is lazy and wholesale: the fetch runs at most once between
/// invalidations, triggered by the first `get`. Duplicate keys among fetched
/// objects resolve last-write-wins. The exclusive borrow on `get` makes the
/// single-fetch property structural; callers sharing a cache across threads
/// wrap it in their own lock.
pub struct ObjectCache<T, K> {
    fetch: Box<dyn Fn() -> Vec<T> + Send>,
    key_of: Box<dyn Fn(&T) -> K + Send>,
    data: HashMap<K, T>,
    populated: bool,
}

impl<T, K: Eq + Hash> ObjectCache<T, K> {
    pub fn new<F, G>(fetch: F, key_of: G) -> Self
    where
        F: Fn() -> Vec<T> + Send + 'static,
        G: Fn(&T) -> K + Send + 'static,
    {
        Self {
            fetch: Box::new(fetch),
            key_of: Box::new(key_of),
            data: HashMap::new(),
            populated: false,
        }
    }

    /// Look up an object by key, populating the cache on first use.
    ///
    /// Returns `None` for keys with no matching backing object; callers
    /// branch on presence explicitly.
    pub fn get(&mut self, key: &K) -> Option<&T> {
        if !self.populated {
            self.populate();
        }
        self.data.get(key)
    }

    /// Drop all cached data; the next `get` refetches from scratch.
    pub fn invalidate(&mut self) {
        self.data.clear();
        self.populated = false;
    }

    /// Whether the bulk fetch has run since the last invalidation.
    pub fn is_populated(&self) -> bool {
        self.populated
    }

    /// Number of currently cached objects. Zero before first population.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    fn populate(&mut self) {
        for obj in (self.fetch)() {
            let key = (self.key_of)(&obj);
            self.data.insert(key, obj);
        }
        self.populated = true;
    }
}

// =============================================================================
// TESTS
// =============================================================================
