//! Telemark Storage - Lookup Acceleration and Handle Lifecycle
//!
//! Support layer consumed by the metadata store: read-through object caches
//! keyed by the durable identities `telemark-core` produces, named cache
//! ownership, and an explicit registry of open store handles. Everything is
//! synchronous; blocking I/O stays inside the fetch and init functions the
//! metadata layer supplies.

pub mod cache_registry;
pub mod error;
pub mod object_cache;
pub mod store_registry;

pub use cache_registry::CacheRegistry;
pub use error::{StorageResult, StoreError};
pub use object_cache::ObjectCache;
pub use store_registry::{require_existing_dir, StoreRegistry};

use telemark_core::Selector;

/// Cache of domain objects addressed by series selector, the common shape
/// for per-series metadata lookups.
pub type SeriesCache<T> = ObjectCache<T, Selector>;

/// Cache of domain objects addressed by a context or metric identity.
pub type IdentityCache<T> = ObjectCache<T, u64>;
