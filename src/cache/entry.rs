//! Cache Entry Module
//!
//! Defines type-erased cache values and the entries that hold them.

use std::any::{type_name, Any};
use std::fmt;
use std::sync::Arc;

use crate::cache::UsageCounter;
use crate::error::{CacheError, Result};

// == Cache Value ==
/// A type-erased, shareable cache payload.
///
/// The concrete type's name is kept alongside the value so that a failed
/// downcast can report what was actually stored.
#[derive(Clone)]
pub struct CacheValue {
    inner: Arc<dyn Any + Send + Sync>,
    type_name: &'static str,
}

impl CacheValue {
    // == Constructor ==
    /// Wraps a value of any `Send + Sync` type.
    pub fn new<T: Any + Send + Sync>(value: T) -> Self {
        Self {
            inner: Arc::new(value),
            type_name: type_name::<T>(),
        }
    }

    // == Type Name ==
    /// Returns the type name of the stored value.
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    // == Is ==
    /// Returns true if the stored value is a `T`.
    pub fn is<T: Any>(&self) -> bool {
        self.inner.is::<T>()
    }

    // == Downcast ==
    /// Recovers the concrete value as a shared `Arc<T>`.
    ///
    /// `key` is only used to build the error.
    pub fn downcast<T: Any + Send + Sync>(&self, key: &str) -> Result<Arc<T>> {
        Arc::clone(&self.inner)
            .downcast::<T>()
            .map_err(|_| CacheError::TypeMismatch {
                key: key.to_string(),
                expected: type_name::<T>(),
                found: self.type_name,
            })
    }
}

impl fmt::Debug for CacheValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CacheValue")
            .field("type_name", &self.type_name)
            .finish_non_exhaustive()
    }
}

// == Cache Entry ==
/// Represents a single cache entry with value and usage metadata.
#[derive(Debug)]
pub(crate) struct CacheEntry {
    /// The stored value
    pub(crate) value: CacheValue,
    /// Insertion sequence number, used to break eviction ties
    pub(crate) seq: u64,
    /// Number of successful reads
    pub(crate) usage: UsageCounter,
}

impl CacheEntry {
    // == Constructor ==
    /// Creates a new entry that has never been read.
    pub fn new(value: CacheValue, seq: u64) -> Self {
        Self {
            value,
            seq,
            usage: UsageCounter::new(),
        }
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_downcast() {
        let value = CacheValue::new(42_i32);

        assert!(value.is::<i32>());
        assert_eq!(*value.downcast::<i32>("k").unwrap(), 42);
    }

    #[test]
    fn test_value_downcast_mismatch() {
        let value = CacheValue::new("hello".to_string());

        let err = value.downcast::<i32>("k").unwrap_err();
        assert_eq!(
            err,
            CacheError::TypeMismatch {
                key: "k".to_string(),
                expected: "i32",
                found: type_name::<String>(),
            }
        );
    }

    #[test]
    fn test_value_clone_shares_payload() {
        let value = CacheValue::new(vec![1u8, 2, 3]);
        let copy = value.clone();

        let a = value.downcast::<Vec<u8>>("k").unwrap();
        let b = copy.downcast::<Vec<u8>>("k").unwrap();
        assert!(Arc::ptr_eq(&a, &b));
    }

    #[test]
    fn test_entry_creation() {
        let entry = CacheEntry::new(CacheValue::new("v"), 7);

        assert_eq!(entry.seq, 7);
        assert_eq!(entry.usage.get(), None);
        assert_eq!(entry.value.type_name(), type_name::<&str>());
    }
}
