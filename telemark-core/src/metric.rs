//! Named metric identity.
//!
//! A metric is a named time series tagged with a [`Context`]. Its storage
//! address is the `(context identity, name)` selector; the name-only
//! grouping key lets callers correlate the same series across contexts.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};

use crate::context::Context;
use crate::hashing;

/// Address of one logical time series in the backing store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Selector {
    /// Structural identity of the tagging context.
    pub context_idx: u64,
    /// Metric name.
    pub name: String,
}

/// Composite identity of a named, context-tagged metric.
///
/// The context is shared, not copied; many metrics logged under the same run
/// configuration point at one `Context`.
#[derive(Clone)]
pub struct Metric {
    name: String,
    context: Arc<Context>,
    idx: OnceCell<u64>,
    metric_idx: OnceCell<u64>,
}

impl Metric {
    pub fn new(name: impl Into<String>, context: Arc<Context>) -> Self {
        Self {
            name: name.into(),
            context,
            idx: OnceCell::new(),
            metric_idx: OnceCell::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn context(&self) -> &Context {
        &self.context
    }

    /// The `(context identity, name)` pair addressing this series.
    ///
    /// Equal for deeply-equal names and contexts even when the contexts are
    /// distinct instances.
    pub fn selector(&self) -> Selector {
        Selector {
            context_idx: self.context.idx(),
            name: self.name.clone(),
        }
    }

    /// Identity of the tagging context alone.
    pub fn context_idx(&self) -> u64 {
        self.context.idx()
    }

    /// Memoized identity of the `(name, context)` pair.
    pub fn idx(&self) -> u64 {
        *self
            .idx
            .get_or_init(|| hashing::hash_named_pair(&self.name, self.context.idx()))
    }

    /// Memoized grouping key derived from the name alone, independent of
    /// context.
    pub fn metric_idx(&self) -> u64 {
        *self.metric_idx.get_or_init(|| hashing::hash_str(&self.name))
    }
}

impl PartialEq for Metric {
    fn eq(&self, other: &Self) -> bool {
        // Same discipline as Context: identity filters, exact comparison
        // decides.
        if self.idx() != other.idx() {
            return false;
        }
        self.name == other.name && *self.context == *other.context
    }
}

impl Hash for Metric {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u64(self.idx());
    }
}

impl fmt::Debug for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Metric#{:016x} {} {:?}",
            self.idx(),
            self.name,
            self.context
        )
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} @ {}", self.name, self.context)
    }
}

// =============================================================================
// TESTS
// =============================================================================
