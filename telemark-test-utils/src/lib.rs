//! Telemark Test Utilities
//!
//! Centralized test infrastructure for the Telemark workspace:
//! - Proptest generators for canonical values
//! - Fixture helpers for insertion-order experiments
//! - Re-exports of core types for test convenience

pub use telemark_core::{
    hash_named_pair, hash_serialize, hash_str, hash_value, Context, HashError, Metric, Selector,
    TelemarkError, TelemarkResult,
};

use proptest::prelude::*;
use serde_json::Value;

// ============================================================================
// CANONICAL VALUE GENERATORS
// ============================================================================

/// Strategy over scalar canonical values.
pub fn arb_scalar() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(Value::from),
        // Finite floats only; NaN and infinities are outside the universe.
        (-1.0e12..1.0e12f64).prop_map(|f| {
            serde_json::Number::from_f64(f)
                .map(Value::Number)
                .unwrap_or(Value::Null)
        }),
        "[a-zA-Z0-9_./-]{0,12}".prop_map(Value::String),
    ]
}

/// Strategy over the full canonical universe: scalars, sequences, and
/// string-keyed mappings, nested a few levels deep.
pub fn arb_canonical_value() -> impl Strategy<Value = Value> {
    arb_scalar().prop_recursive(3, 32, 6, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..6).prop_map(Value::Array),
            prop::collection::btree_map("[a-z]{1,8}", inner, 0..6)
                .prop_map(|entries| Value::Object(entries.into_iter().collect())),
        ]
    })
}

/// Strategy over mapping-shaped contexts, the common case for run
/// configurations.
pub fn arb_context_mapping() -> impl Strategy<Value = Value> {
    prop::collection::btree_map("[a-z]{1,8}", arb_scalar(), 0..8)
        .prop_map(|entries| Value::Object(entries.into_iter().collect()))
}

/// Strategy over plausible metric names.
pub fn arb_metric_name() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9_]{0,15}(/[a-z0-9_]{1,8})?"
}

// ============================================================================
// FIXTURES
// ============================================================================

/// Build the same mapping twice, inserting entries in the given order and in
/// reverse. Deep-equal values, potentially different iteration orders.
pub fn mapping_in_both_orders(entries: &[(&str, Value)]) -> (Value, Value) {
    let mut forward = serde_json::Map::new();
    for (key, value) in entries {
        forward.insert((*key).to_string(), value.clone());
    }
    let mut reverse = serde_json::Map::new();
    for (key, value) in entries.iter().rev() {
        reverse.insert((*key).to_string(), value.clone());
    }
    (Value::Object(forward), Value::Object(reverse))
}

// =============================================================================
// TESTS
// =============================================================================
