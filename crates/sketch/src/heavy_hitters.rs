//! Heavy hitters and stream threshold: component L.
//!
//! Both wrap a [`CountMinSketch`] with a small tracked map, keeping only
//! the keys worth holding onto in full: the top-k by estimated count for
//! heavy hitters, or every key currently above a fixed threshold for
//! stream threshold.

use crate::count_min::CountMinSketch;
use probables_core::error::{ProbablesError, ProbablesResult};
use std::collections::HashMap;

/// Tracks the `num_hitters` keys with the largest observed count, backed by
/// a count-min sketch for the underlying frequency estimate.
pub struct HeavyHitters {
    sketch: CountMinSketch,
    num_hitters: usize,
    tracked: HashMap<Vec<u8>, i32>,
}

impl HeavyHitters {
    pub fn new(width: usize, depth: usize, num_hitters: usize) -> ProbablesResult<Self> {
        if num_hitters == 0 {
            return Err(ProbablesError::Initialization("num_hitters must be > 0".into()));
        }
        Ok(Self {
            sketch: CountMinSketch::new(width, depth)?,
            num_hitters,
            tracked: HashMap::new(),
        })
    }

    #[must_use]
    pub fn tracked(&self) -> &HashMap<Vec<u8>, i32> {
        &self.tracked
    }

    /// Adds `n` occurrences of `key`, then updates the tracked set: always
    /// updates an already-tracked key, fills empty slots first, and
    /// otherwise evicts the current smallest tracked entry if `key`'s new
    /// count exceeds it.
    pub fn add(&mut self, key: &[u8], n: i32) {
        let r = self.sketch.add(key, n);

        if self.tracked.contains_key(key) {
            self.tracked.insert(key.to_vec(), r);
            return;
        }
        if self.tracked.len() < self.num_hitters {
            self.tracked.insert(key.to_vec(), r);
            return;
        }
        if let Some((smallest_key, &smallest_val)) = self.tracked.iter().min_by_key(|(_, &v)| v) {
            if r > smallest_val {
                let smallest_key = smallest_key.clone();
                self.tracked.remove(&smallest_key);
                self.tracked.insert(key.to_vec(), r);
            }
        }
    }

    #[must_use]
    pub fn check(&self, key: &[u8]) -> i32 {
        self.sketch.check(key)
    }

    /// Heavy hitters never support removal: evicting a tracked key's count
    /// without re-scanning the whole stream could make the tracked set
    /// silently wrong.
    pub fn remove(&self, _key: &[u8]) -> ProbablesResult<()> {
        Err(ProbablesError::NotSupported(
            "heavy hitters does not support remove".into(),
        ))
    }
}

/// Tracks every key whose estimated count is currently at or above
/// `threshold`.
pub struct StreamThreshold {
    sketch: CountMinSketch,
    threshold: i32,
    tracked: HashMap<Vec<u8>, i32>,
}

impl StreamThreshold {
    pub fn new(width: usize, depth: usize, threshold: i32) -> ProbablesResult<Self> {
        Ok(Self {
            sketch: CountMinSketch::new(width, depth)?,
            threshold,
            tracked: HashMap::new(),
        })
    }

    #[must_use]
    pub fn tracked(&self) -> &HashMap<Vec<u8>, i32> {
        &self.tracked
    }

    pub fn add(&mut self, key: &[u8], n: i32) {
        let r = self.sketch.add(key, n);
        if r >= self.threshold {
            self.tracked.insert(key.to_vec(), r);
        }
    }

    /// Removes `n` occurrences of `key`. If the resulting estimate falls
    /// below `threshold`, `key` is dropped from the tracked set; otherwise
    /// its tracked count is refreshed.
    pub fn remove(&mut self, key: &[u8], n: i32) {
        let r = self.sketch.remove(key, n);
        if r < self.threshold {
            self.tracked.remove(key);
        } else {
            self.tracked.insert(key.to_vec(), r);
        }
    }

    #[must_use]
    pub fn check(&self, key: &[u8]) -> i32 {
        self.sketch.check(key)
    }
}

