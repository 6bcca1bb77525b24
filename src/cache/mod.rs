//! Cache Module
//!
//! Provides a bounded in-memory cache with LFU eviction, an append-only
//! change log and removal/update observers.

mod changelog;
mod entry;
mod lfu;
mod observer;
mod stats;
mod store;


// Re-export public types
pub use changelog::{ChangeLog, ChangeLogIter, ChangeLogRecord};
pub(crate) use entry::CacheEntry;
pub use entry::CacheValue;
pub(crate) use lfu::{select_victim, UsageCounter};
pub use stats::CacheStats;
pub use store::{CacheInfo, CacheStore};

// == Public Constants ==
/// Capacity used when none is given
pub const DEFAULT_CAPACITY: usize = 10;
