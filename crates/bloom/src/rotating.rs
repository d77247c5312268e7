//! Rotating bloom filter: component H's FIFO-bounded variant.
//!
//! Behaves like [`crate::expanding::ExpandingBloomFilter`], but caps the
//! number of filters retained at `max_queue_size`: once the cap is reached,
//! appending a new filter evicts the oldest one, so membership is only
//! reliable for elements added within the last `max_queue_size` "periods".

use crate::standard::BloomFilter;
use probables_core::error::{ProbablesError, ProbablesResult};
use probables_core::hash::{default_fnv1a, HashFunction};
use std::collections::VecDeque;

/// A bounded, FIFO queue of same-sized bloom filters.
pub struct RotatingBloomFilter {
    estimated_elements: u64,
    false_positive_rate: f32,
    hash_func: HashFunction,
    max_queue_size: usize,
    filters: VecDeque<BloomFilter>,
}

impl RotatingBloomFilter {
    pub fn new(estimated_elements: u64, false_positive_rate: f32, max_queue_size: usize) -> ProbablesResult<Self> {
        Self::with_hash_function(estimated_elements, false_positive_rate, max_queue_size, default_fnv1a)
    }

    pub fn with_hash_function(
        estimated_elements: u64,
        false_positive_rate: f32,
        max_queue_size: usize,
        hash_func: HashFunction,
    ) -> ProbablesResult<Self> {
        let first = BloomFilter::with_hash_function(estimated_elements, false_positive_rate, hash_func)?;
        let mut filters = VecDeque::with_capacity(max_queue_size.max(1));
        filters.push_back(first);
        Ok(Self {
            estimated_elements,
            false_positive_rate,
            hash_func,
            max_queue_size: max_queue_size.max(1),
            filters,
        })
    }

    #[must_use]
    pub fn filter_count(&self) -> usize {
        self.filters.len()
    }

    /// Same semantics as [`crate::expanding::ExpandingBloomFilter::add`],
    /// except the new-tail check rotates the oldest filter out once the
    /// queue is at `max_queue_size`.
    pub fn add(&mut self, key: &[u8], force: bool) -> ProbablesResult<()> {
        if force || !self.check(key) {
            self.filters.back_mut().expect("always at least one filter").add(key);
        }
        if self.filters.back().expect("always at least one filter").elements_added() >= self.estimated_elements {
            self.push()?;
        }
        Ok(())
    }

    /// Forcibly appends a fresh, empty filter as the newest "period",
    /// evicting the oldest one if the queue is already at
    /// `max_queue_size`.
    pub fn push(&mut self) -> ProbablesResult<()> {
        if self.filters.len() >= self.max_queue_size {
            self.pop()?;
        }
        let fresh = BloomFilter::with_hash_function(self.estimated_elements, self.false_positive_rate, self.hash_func)?;
        self.filters.push_back(fresh);
        Ok(())
    }

    /// Drops the oldest filter in the queue. Fails if that would leave the
    /// queue empty.
    pub fn pop(&mut self) -> ProbablesResult<BloomFilter> {
        if self.filters.len() <= 1 {
            return Err(ProbablesError::NotSupported(
                "cannot pop the last remaining filter from a rotating bloom filter".into(),
            ));
        }
        Ok(self.filters.pop_front().expect("length just checked"))
    }

    #[must_use]
    pub fn check(&self, key: &[u8]) -> bool {
        self.filters.iter().any(|f| f.check(key))
    }
}

