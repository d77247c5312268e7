//! Expanding bloom filter: component H.
//!
//! A chain of [`BloomFilter`]s that starts with a single filter sized for
//! `estimated_elements` and appends a fresh, identically-sized filter
//! whenever the most recent one fills up, so the overall structure can
//! absorb more elements than any single filter was designed for without
//! the false-positive rate drifting above `false_positive_rate`.

use crate::standard::BloomFilter;
use probables_core::error::ProbablesResult;
use probables_core::hash::{default_fnv1a, HashFunction};

/// A growable sequence of same-sized bloom filters.
pub struct ExpandingBloomFilter {
    estimated_elements: u64,
    false_positive_rate: f32,
    hash_func: HashFunction,
    filters: Vec<BloomFilter>,
}

impl ExpandingBloomFilter {
    pub fn new(estimated_elements: u64, false_positive_rate: f32) -> ProbablesResult<Self> {
        Self::with_hash_function(estimated_elements, false_positive_rate, default_fnv1a)
    }

    pub fn with_hash_function(
        estimated_elements: u64,
        false_positive_rate: f32,
        hash_func: HashFunction,
    ) -> ProbablesResult<Self> {
        let first = BloomFilter::with_hash_function(estimated_elements, false_positive_rate, hash_func)?;
        Ok(Self {
            estimated_elements,
            false_positive_rate,
            hash_func,
            filters: vec![first],
        })
    }

    #[must_use]
    pub fn filter_count(&self) -> usize {
        self.filters.len()
    }

    #[must_use]
    pub fn elements_added(&self) -> u64 {
        self.filters.iter().map(BloomFilter::elements_added).sum()
    }

    /// Adds `key` to the tail filter unless it already answers true
    /// somewhere in the chain, in which case the insert is skipped (it
    /// would not change `check`'s answer). `force = true` always inserts
    /// into the tail regardless. Either way, a fresh filter is appended
    /// afterward if the tail has reached its designed capacity.
    pub fn add(&mut self, key: &[u8], force: bool) -> ProbablesResult<()> {
        if force || !self.check(key) {
            self.filters.last_mut().expect("always at least one filter").add(key);
        }
        if self.filters.last().expect("always at least one filter").elements_added() >= self.estimated_elements {
            let fresh = BloomFilter::with_hash_function(self.estimated_elements, self.false_positive_rate, self.hash_func)?;
            self.filters.push(fresh);
        }
        Ok(())
    }

    /// True if `key` is present in any filter in the chain.
    #[must_use]
    pub fn check(&self, key: &[u8]) -> bool {
        self.filters.iter().any(|f| f.check(key))
    }
}

