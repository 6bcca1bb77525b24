//! LFU Module
//!
//! Usage-frequency accounting and eviction victim selection.

use std::sync::atomic::{AtomicU64, Ordering};

// == Usage Counter ==
/// Per-entry read counter.
///
/// A counter that has never been incremented is reported as absent, which
/// the eviction policy ranks as usage 0.
#[derive(Debug, Default)]
pub(crate) struct UsageCounter {
    reads: AtomicU64,
}

impl UsageCounter {
    // == Constructor ==
    /// Creates a counter with no recorded reads.
    pub fn new() -> Self {
        Self::default()
    }

    // == Increment ==
    /// Records one read and returns the new count.
    pub fn increment(&self) -> u64 {
        self.reads.fetch_add(1, Ordering::AcqRel) + 1
    }

    // == Get ==
    /// Returns the read count, or None if the key was never read.
    pub fn get(&self) -> Option<u64> {
        match self.reads.load(Ordering::Acquire) {
            0 => None,
            n => Some(n),
        }
    }

    // == Rank ==
    /// Returns the usage value the eviction policy compares on.
    pub fn rank(&self) -> u64 {
        self.reads.load(Ordering::Acquire)
    }
}

// == Select Victim ==
/// Picks the key to evict from `(key, usage, insertion_seq)` candidates.
///
/// Lowest usage wins; ties go to the lowest insertion sequence (oldest).
/// Returns None if there are no candidates.
pub(crate) fn select_victim<'a, I>(candidates: I) -> Option<&'a str>
where
    I: IntoIterator<Item = (&'a str, u64, u64)>,
{
    candidates
        .into_iter()
        .min_by_key(|&(_, usage, seq)| (usage, seq))
        .map(|(key, _, _)| key)
}
