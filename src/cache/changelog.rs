//! Change Log Module
//!
//! Append-only audit trail of cache mutations.

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use parking_lot::RwLock;
use serde::Serialize;

// == Change Log Record ==
/// A single mutation record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChangeLogRecord {
    /// Human readable description, e.g. `"a added at 2026-01-01T00:00:00+00:00"`
    pub message: String,
    /// When the record was appended
    pub timestamp: DateTime<Utc>,
}

impl fmt::Display for ChangeLogRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Kind of mutation being recorded.
#[derive(Debug, Clone, Copy)]
pub(crate) enum Change<'a> {
    Added(&'a str),
    Updated(&'a str),
    Removed(&'a str),
    Cleared,
}

// == Change Log ==
/// Shared handle to the change log.
///
/// Cloning yields another view of the same log. Iteration is lazy: each step
/// takes the read lock briefly, so records appended while iterating are
/// observed, and the sequence ends at whatever length the log has when the
/// iterator catches up.
#[derive(Debug, Clone, Default)]
pub struct ChangeLog {
    records: Arc<RwLock<Vec<ChangeLogRecord>>>,
}

impl ChangeLog {
    // == Constructor ==
    pub(crate) fn new() -> Self {
        Self::default()
    }

    // == Append ==
    /// Appends a record stamped strictly after the previous one.
    pub(crate) fn append(&self, change: Change<'_>) {
        let mut records = self.records.write();

        let mut timestamp = Utc::now();
        if let Some(last) = records.last() {
            if timestamp <= last.timestamp {
                timestamp = last.timestamp + Duration::microseconds(1);
            }
        }

        let at = timestamp.to_rfc3339();
        let message = match change {
            Change::Added(key) => format!("{} added at {}", key, at),
            Change::Updated(key) => format!("{} updated at {}", key, at),
            Change::Removed(key) => format!("{} removed at {}", key, at),
            Change::Cleared => format!("cache cleared at {}", at),
        };

        records.push(ChangeLogRecord { message, timestamp });
    }

    // == Iter ==
    /// Returns a lazy iterator starting at the first record.
    pub fn iter(&self) -> ChangeLogIter {
        ChangeLogIter {
            records: Arc::clone(&self.records),
            pos: 0,
        }
    }

    // == Length ==
    /// Returns the number of records appended so far.
    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    // == Is Empty ==
    pub fn is_empty(&self) -> bool {
        self.records.read().is_empty()
    }

    // == Snapshot ==
    /// Copies out the records present right now.
    pub fn snapshot(&self) -> Vec<ChangeLogRecord> {
        self.records.read().clone()
    }
}

impl<'a> IntoIterator for &'a ChangeLog {
    type Item = ChangeLogRecord;
    type IntoIter = ChangeLogIter;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

// == Change Log Iterator ==
/// Iterator over change log records in insertion order.
#[derive(Debug)]
pub struct ChangeLogIter {
    records: Arc<RwLock<Vec<ChangeLogRecord>>>,
    pos: usize,
}

impl Iterator for ChangeLogIter {
    type Item = ChangeLogRecord;

    fn next(&mut self) -> Option<Self::Item> {
        let record = self.records.read().get(self.pos).cloned()?;
        self.pos += 1;
        Some(record)
    }
}
