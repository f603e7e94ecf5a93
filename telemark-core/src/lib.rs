//! Telemark Core - Structural Identity
//!
//! Deterministic content-addressed identity for the Telemark metrics store:
//! the canonical hash function, immutable `Context` snapshots, and the
//! `Metric` composite key built from a name and a shared context. Everything
//! here is pure, synchronous computation; persistence and query layers
//! consume the identities this crate produces.

pub mod canonical;
pub mod context;
pub mod error;
pub mod hashing;
pub mod metric;

pub use canonical::to_canonical_value;
pub use context::Context;
pub use error::{HashError, TelemarkError, TelemarkResult};
pub use hashing::{hash_named_pair, hash_serialize, hash_str, hash_value};
pub use metric::{Metric, Selector};
