//! LFU Cache - a bounded in-process key-value cache
//!
//! Evicts the least frequently used entry when full, records every mutation
//! in an append-only change log, and notifies observers on removal/update.

pub mod cache;
pub mod config;
pub mod error;
pub mod shell;

pub use cache::{CacheStore, ChangeLog, ChangeLogRecord};
pub use config::Config;
pub use error::{CacheError, Result};
