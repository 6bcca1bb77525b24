//! Error types for the cache store
//!
//! Provides unified error handling using thiserror.

use thiserror::Error;

// == Cache Error Enum ==
/// Unified error type for cache operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CacheError {
    /// Empty key or non-positive capacity
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Add on a key that is already present
    #[error("Duplicate key: {0}")]
    DuplicateKey(String),

    /// Key not present in the cache
    #[error("Key not found: {0}")]
    NotFound(String),

    /// Stored value is not of the type requested by the caller
    #[error("Type mismatch for key {key}: expected {expected}, found {found}")]
    TypeMismatch {
        key: String,
        expected: &'static str,
        found: &'static str,
    },
}

// == Result Type Alias ==
/// Convenience Result type for cache operations.
pub type Result<T> = std::result::Result<T, CacheError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        assert_eq!(
            CacheError::NotFound("a".to_string()).to_string(),
            "Key not found: a"
        );
        assert_eq!(
            CacheError::DuplicateKey("a".to_string()).to_string(),
            "Duplicate key: a"
        );

        let err = CacheError::TypeMismatch {
            key: "a".to_string(),
            expected: "i32",
            found: "alloc::string::String",
        };
        assert!(err.to_string().contains("expected i32"));
    }
}
