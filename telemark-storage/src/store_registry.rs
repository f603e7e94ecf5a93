//! Explicit store-handle registry.
//!
//! One handle per store path, owned by the caller with an explicit
//! open/close lifecycle. There is no process-wide pool and no hidden weak
//! references; whoever owns the registry decides when handles appear and
//! disappear.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::error::{StorageResult, StoreError};

/// Caller-owned registry mapping store paths to open handles.
pub struct StoreRegistry<H> {
    handles: HashMap<PathBuf, H>,
}

impl<H> StoreRegistry<H> {
    pub fn new() -> Self {
        Self {
            handles: HashMap::new(),
        }
    }

    /// Return the handle for `path`, opening it with `init` if absent.
    ///
    /// `init` runs at most once per path until the handle is closed. Opening
    /// a store that was never initialized on disk is the typical failure and
    /// surfaces as [`StoreError::OpenFailed`].
    pub fn open_with<F>(&mut self, path: impl AsRef<Path>, init: F) -> StorageResult<&H>
    where
        F: FnOnce(&Path) -> StorageResult<H>,
    {
        let path = path.as_ref();
        if !self.handles.contains_key(path) {
            let handle = init(path)?;
            self.handles.insert(path.to_path_buf(), handle);
        }
        Ok(&self.handles[path])
    }

    /// Close the handle for `path`, dropping it. Returns whether a handle
    /// was open.
    pub fn close(&mut self, path: impl AsRef<Path>) -> bool {
        self.handles.remove(path.as_ref()).is_some()
    }

    /// Drop every open handle.
    pub fn close_all(&mut self) {
        self.handles.clear();
    }

    pub fn contains(&self, path: impl AsRef<Path>) -> bool {
        self.handles.contains_key(path.as_ref())
    }

    pub fn len(&self) -> usize {
        self.handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }
}

impl<H> Default for StoreRegistry<H> {
    fn default() -> Self {
        Self::new()
    }
}

/// Standard init guard for directory-backed stores: the path must already
/// exist (stores are initialized out of band before they are opened).
pub fn require_existing_dir(path: &Path) -> StorageResult<()> {
    if path.is_dir() {
        Ok(())
    } else {
        Err(StoreError::OpenFailed {
            path: path.display().to_string(),
            reason: "no such directory, initialize the store first".to_string(),
        })
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU64, Ordering};

    #[derive(Debug, PartialEq)]
    struct Handle {
        path: PathBuf,
    }

    #[test]
    fn test_open_runs_init_once_per_path() {
        let inits = AtomicU64::new(0);
        let mut registry: StoreRegistry<Handle> = StoreRegistry::new();

        for _ in 0..3 {
            let handle = registry
                .open_with("/data/exp-1", |p| {
                    inits.fetch_add(1, Ordering::SeqCst);
                    Ok(Handle {
                        path: p.to_path_buf(),
                    })
                })
                .unwrap();
            assert_eq!(handle.path, PathBuf::from("/data/exp-1"));
        }
        assert_eq!(inits.load(Ordering::SeqCst), 1);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_distinct_paths_get_distinct_handles() {
        let mut registry: StoreRegistry<Handle> = StoreRegistry::new();
        for path in ["/data/a", "/data/b"] {
            registry
                .open_with(path, |p| {
                    Ok(Handle {
                        path: p.to_path_buf(),
                    })
                })
                .unwrap();
        }
        assert_eq!(registry.len(), 2);
        assert!(registry.contains("/data/a"));
        assert!(registry.contains("/data/b"));
    }

    #[test]
    fn test_failed_init_retains_nothing() {
        let mut registry: StoreRegistry<Handle> = StoreRegistry::new();
        let err = registry
            .open_with("/missing", |p| {
                Err(StoreError::OpenFailed {
                    path: p.display().to_string(),
                    reason: "no such directory, initialize the store first".to_string(),
                })
            })
            .unwrap_err();
        assert!(matches!(err, StoreError::OpenFailed { .. }));
        assert!(registry.is_empty());

        // A later open may succeed once the store exists.
        registry
            .open_with("/missing", |p| {
                Ok(Handle {
                    path: p.to_path_buf(),
                })
            })
            .unwrap();
        assert!(registry.contains("/missing"));
    }

    #[test]
    fn test_close_reopens_with_fresh_init() {
        let inits = AtomicU64::new(0);
        let mut registry: StoreRegistry<Handle> = StoreRegistry::new();
        let open = |registry: &mut StoreRegistry<Handle>| {
            registry
                .open_with("/data/exp-1", |p| {
                    inits.fetch_add(1, Ordering::SeqCst);
                    Ok(Handle {
                        path: p.to_path_buf(),
                    })
                })
                .map(|_| ())
        };

        open(&mut registry).unwrap();
        assert!(registry.close("/data/exp-1"));
        assert!(!registry.close("/data/exp-1"));
        open(&mut registry).unwrap();
        assert_eq!(inits.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_require_existing_dir() {
        let dir = tempfile::tempdir().unwrap();
        assert!(require_existing_dir(dir.path()).is_ok());
        let missing = dir.path().join("not-created");
        let err = require_existing_dir(&missing).unwrap_err();
        assert!(matches!(err, StoreError::OpenFailed { .. }));
    }

    #[test]
    fn test_close_all() {
        let mut registry: StoreRegistry<Handle> = StoreRegistry::new();
        for path in ["/a", "/b", "/c"] {
            registry
                .open_with(path, |p| {
                    Ok(Handle {
                        path: p.to_path_buf(),
                    })
                })
                .unwrap();
        }
        registry.close_all();
        assert!(registry.is_empty());
    }
}
