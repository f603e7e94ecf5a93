//! Error types for store-handle lifecycle operations

use thiserror::Error;

/// Store registry errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("Cannot open store at {path}: {reason}")]
    OpenFailed { path: String, reason: String },
}

/// Result type alias for storage-layer operations.
pub type StorageResult<T> = Result<T, StoreError>;
