//! Immutable context snapshots with memoized structural identity.
//!
//! A `Context` captures the nested configuration/parameter value a metric is
//! tagged with. It owns a private copy of that value, never aliasing caller
//! data, and derives a durable 64-bit identity from it on first access.

use std::fmt;
use std::hash::{Hash, Hasher};

use once_cell::sync::OnceCell;
use serde::{Serialize, Serializer};
use serde_json::Value;

use crate::canonical;
use crate::error::TelemarkResult;
use crate::hashing;

/// Immutable snapshot of a canonical value, used as a storage key source.
///
/// Two contexts are equal iff their values are deeply equal; the memoized
/// identity is only a cheap pre-filter, never the deciding comparison.
#[derive(Clone)]
pub struct Context {
    raw: Value,
    idx: OnceCell<u64>,
}

impl Context {
    /// Build a context from any serializable value.
    ///
    /// The value is copied into the canonical universe via the checked
    /// serializer; this is both the deep copy (the caller's original can be
    /// mutated freely afterwards) and the eager universe validation. Values
    /// outside the universe fail with
    /// [`HashError::UnsupportedType`](crate::error::HashError::UnsupportedType).
    pub fn new<T: Serialize>(value: &T) -> TelemarkResult<Self> {
        let raw = canonical::to_canonical_value(value)?;
        Ok(Self::from_value(raw))
    }

    /// Adopt an owned canonical value directly.
    pub fn from_value(raw: Value) -> Self {
        Self {
            raw,
            idx: OnceCell::new(),
        }
    }

    /// Durable structural identity of this context.
    ///
    /// Computed once and memoized; a race on first access recomputes the
    /// same value, so the cell stays consistent.
    pub fn idx(&self) -> u64 {
        *self.idx.get_or_init(|| hashing::hash_value(&self.raw))
    }

    /// Read-only view of the underlying canonical value.
    pub fn as_value(&self) -> &Value {
        &self.raw
    }

    /// Number of top-level entries (mapping) or elements (sequence).
    /// Scalars report zero.
    pub fn len(&self) -> usize {
        match &self.raw {
            Value::Object(map) => map.len(),
            Value::Array(items) => items.len(),
            _ => 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Iterate over top-level mapping keys. Empty for non-mapping values.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.raw
            .as_object()
            .into_iter()
            .flat_map(|map| map.keys())
            .map(String::as_str)
    }

    /// Index into a top-level mapping by key.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.raw.get(key)
    }
}

impl Default for Context {
    /// The empty context: a mapping with no entries, the identity every
    /// untagged metric carries.
    fn default() -> Self {
        Self::from_value(Value::Object(serde_json::Map::new()))
    }
}

impl PartialEq for Context {
    fn eq(&self, other: &Self) -> bool {
        // Identity mismatch rules equality out cheaply; identity match alone
        // never rules it in.
        if self.idx() != other.idx() {
            return false;
        }
        self.raw == other.raw
    }
}

impl Hash for Context {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u64(self.idx());
    }
}

impl Serialize for Context {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.raw.serialize(serializer)
    }
}

impl fmt::Debug for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Context#{:016x} {}", self.idx(), self.raw)
    }
}

impl fmt::Display for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.raw)
    }
}

// =============================================================================
// TESTS
// =============================================================================
