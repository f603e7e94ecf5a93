//! Error types for Telemark identity operations

use thiserror::Error;

/// Canonical hashing errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum HashError {
    #[error("Unsupported value type: {reason}")]
    UnsupportedType { reason: String },
}

// Lets the canonical serializer report rejections from inside serde's
// serialization machinery (opaque Serialize impls call `Error::custom`).
impl serde::ser::Error for HashError {
    fn custom<T: std::fmt::Display>(msg: T) -> Self {
        HashError::UnsupportedType {
            reason: msg.to_string(),
        }
    }
}

/// Master error type for all Telemark core errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TelemarkError {
    #[error("Hash error: {0}")]
    Hash(#[from] HashError),
}

/// Result type alias for Telemark core operations.
pub type TelemarkResult<T> = Result<T, TelemarkError>;

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_error_display_unsupported_type() {
        let err = HashError::UnsupportedType {
            reason: "key must be a string".to_string(),
        };
        let msg = format!("{}", err);
        assert!(msg.contains("Unsupported value type"));
        assert!(msg.contains("key must be a string"));
    }

    #[test]
    fn test_telemark_error_from_hash_error() {
        let err = TelemarkError::from(HashError::UnsupportedType {
            reason: "nan".to_string(),
        });
        assert!(matches!(err, TelemarkError::Hash(_)));
    }
}
