//! Canonical structural hashing.
//!
//! Maps any canonical value (null, bool, integer, float, string, sequence,
//! string-keyed mapping) to a deterministic 64-bit identifier. The output is
//! persisted as a storage key, so it must be identical across processes and
//! platforms: no randomized seeding, no pointer identity, no platform-sized
//! integers in the payload encoding.
//!
//! Discrimination rules:
//! - Every node is tagged with its canonical type before its payload, so
//!   `1`, `1.0` and `"1"` never collide.
//! - Sequences fold `(position, element hash)` pairs in order.
//! - Mappings hash each entry, sort the entry hashes, then fold the sorted
//!   list, so insertion order never affects the result.
//!
//! Changing any constant or fold in this module invalidates every key ever
//! persisted by a Telemark store.

use serde::Serialize;
use serde_json::Value;
use sha2::{Digest, Sha256};

use crate::error::TelemarkResult;

// ============================================================================
// TYPE TAGS
// ============================================================================

const TAG_NULL: u8 = 0x00;
const TAG_BOOL: u8 = 0x01;
const TAG_INT: u8 = 0x02;
const TAG_FLOAT: u8 = 0x03;
const TAG_STRING: u8 = 0x04;
const TAG_SEQ: u8 = 0x05;
const TAG_MAP: u8 = 0x06;
const TAG_MAP_ENTRY: u8 = 0x07;
const TAG_NAMED_PAIR: u8 = 0x08;

/// Truncate a SHA-256 digest to the 64-bit key width.
fn trunc64(digest: &[u8]) -> u64 {
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&digest[..8]);
    u64::from_le_bytes(bytes)
}

fn finish(hasher: Sha256) -> u64 {
    trunc64(&hasher.finalize())
}

// ============================================================================
// SCALAR HASHES
// ============================================================================

fn hash_null() -> u64 {
    let mut hasher = Sha256::new();
    hasher.update([TAG_NULL]);
    finish(hasher)
}

fn hash_bool(b: bool) -> u64 {
    let mut hasher = Sha256::new();
    hasher.update([TAG_BOOL, b as u8]);
    finish(hasher)
}

/// Integers widen to i128 so i64 and u64 representations of the same
/// mathematical value hash identically.
fn hash_int(i: i128) -> u64 {
    let mut hasher = Sha256::new();
    hasher.update([TAG_INT]);
    hasher.update(i.to_le_bytes());
    finish(hasher)
}

/// Floats hash their IEEE-754 bit pattern, with negative zero normalized to
/// positive zero. `-0.0 == 0.0` under value equality, and hash equality must
/// hold wherever value equality does.
fn hash_float(f: f64) -> u64 {
    let normalized = if f == 0.0 { 0.0 } else { f };
    let mut hasher = Sha256::new();
    hasher.update([TAG_FLOAT]);
    hasher.update(normalized.to_bits().to_le_bytes());
    finish(hasher)
}

/// Hash a bare string as a canonical string value.
pub fn hash_str(s: &str) -> u64 {
    let mut hasher = Sha256::new();
    hasher.update([TAG_STRING]);
    hasher.update(s.as_bytes());
    finish(hasher)
}

// ============================================================================
// COMPOSITE HASHES
// ============================================================================

fn hash_seq(items: &[Value]) -> u64 {
    let mut hasher = Sha256::new();
    hasher.update([TAG_SEQ]);
    for (position, item) in items.iter().enumerate() {
        hasher.update((position as u64).to_le_bytes());
        hasher.update(hash_value(item).to_le_bytes());
    }
    finish(hasher)
}

fn hash_map(map: &serde_json::Map<String, Value>) -> u64 {
    let mut entry_hashes: Vec<u64> = map
        .iter()
        .map(|(key, value)| {
            let mut entry = Sha256::new();
            entry.update([TAG_MAP_ENTRY]);
            entry.update(hash_str(key).to_le_bytes());
            entry.update(hash_value(value).to_le_bytes());
            finish(entry)
        })
        .collect();
    // Sorting per-entry hashes makes the fold order-independent while keeping
    // the key/value pairing intact (unlike a plain xor/sum combine).
    entry_hashes.sort_unstable();

    let mut hasher = Sha256::new();
    hasher.update([TAG_MAP]);
    for entry_hash in entry_hashes {
        hasher.update(entry_hash.to_le_bytes());
    }
    finish(hasher)
}

/// Hash a `(name, identity)` pair under a dedicated tag.
///
/// Used for metric keys so that a metric never collides with the plain value
/// hash of its own name or context.
pub fn hash_named_pair(name: &str, idx: u64) -> u64 {
    let mut hasher = Sha256::new();
    hasher.update([TAG_NAMED_PAIR]);
    hasher.update(hash_str(name).to_le_bytes());
    hasher.update(idx.to_le_bytes());
    finish(hasher)
}

// ============================================================================
// ENTRY POINTS
// ============================================================================

/// Hash a canonical value. Pure and deterministic across process runs.
pub fn hash_value(value: &Value) -> u64 {
    match value {
        Value::Null => hash_null(),
        Value::Bool(b) => hash_bool(*b),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                hash_int(i128::from(i))
            } else if let Some(u) = n.as_u64() {
                hash_int(i128::from(u))
            } else {
                match n.as_f64() {
                    Some(f) => hash_float(f),
                    // A Number is i64, u64, or f64; the first two arms
                    // already matched.
                    None => unreachable!("number outside i64/u64/f64"),
                }
            }
        }
        Value::String(s) => hash_str(s),
        Value::Array(items) => hash_seq(items),
        Value::Object(map) => hash_map(map),
    }
}

/// Hash any serializable value by converting it into the canonical universe
/// first.
///
/// Fails with [`HashError::UnsupportedType`] for values the universe cannot
/// represent (non-string mapping keys, non-finite floats, out-of-range
/// integers, opaque types).
pub fn hash_serialize<T: Serialize>(value: &T) -> TelemarkResult<u64> {
    let canonical = crate::canonical::to_canonical_value(value)?;
    Ok(hash_value(&canonical))
}

// =============================================================================
// TESTS
// =============================================================================
