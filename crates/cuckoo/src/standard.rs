//! Standard cuckoo filter: component I.
//!
//! A bucketed fingerprint store: each key maps to two candidate buckets,
//! insertion falls back to random eviction chains when both are full, and
//! the whole table can grow (`expand`) rather than fail once eviction
//! chains are exhausted.

use crate::fingerprint::{alternate_index, derive};
use probables_core::error::{ProbablesError, ProbablesResult};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Fixed seed exposed so tests (and callers who need bit-for-bit
/// reproducible eviction behavior) don't have to invent their own.
pub const DEFAULT_SEED: u64 = 0x5eed_cafe_d00d_1234;

/// A cuckoo filter: two candidate buckets per key, bounded random eviction,
/// optional auto-expansion.
pub struct CuckooFilter {
    buckets: Vec<Vec<u32>>,
    capacity: u64,
    bucket_size: usize,
    max_swaps: u32,
    expansion_rate: f32,
    fingerprint_size_bytes: usize,
    auto_expand: bool,
    inserted_elements: u64,
    rng: StdRng,
}

impl CuckooFilter {
    /// `capacity` is the number of buckets (`C`); total slot count is
    /// `C * bucket_size`.
    pub fn new(capacity: u64, bucket_size: usize, max_swaps: u32, auto_expand: bool) -> ProbablesResult<Self> {
        Self::with_seed(capacity, bucket_size, max_swaps, auto_expand, 2.0, 2, DEFAULT_SEED)
    }

    #[allow(clippy::too_many_arguments)]
    pub fn with_seed(
        capacity: u64,
        bucket_size: usize,
        max_swaps: u32,
        auto_expand: bool,
        expansion_rate: f32,
        fingerprint_size_bytes: usize,
        seed: u64,
    ) -> ProbablesResult<Self> {
        if capacity == 0 || bucket_size == 0 {
            return Err(ProbablesError::Initialization(
                "capacity and bucket_size must be > 0".into(),
            ));
        }
        Ok(Self {
            buckets: (0..capacity).map(|_| Vec::with_capacity(bucket_size)).collect(),
            capacity,
            bucket_size,
            max_swaps,
            expansion_rate,
            fingerprint_size_bytes: fingerprint_size_bytes.clamp(1, 4),
            auto_expand,
            inserted_elements: 0,
            rng: StdRng::seed_from_u64(seed),
        })
    }

    #[must_use]
    pub fn capacity(&self) -> u64 {
        self.capacity
    }
    #[must_use]
    pub fn bucket_size(&self) -> usize {
        self.bucket_size
    }
    #[must_use]
    pub fn max_swaps(&self) -> u32 {
        self.max_swaps
    }
    #[must_use]
    pub fn expansion_rate(&self) -> f32 {
        self.expansion_rate
    }
    #[must_use]
    pub fn fingerprint_size_bytes(&self) -> usize {
        self.fingerprint_size_bytes
    }
    #[must_use]
    pub fn inserted_elements(&self) -> u64 {
        self.inserted_elements
    }

    #[must_use]
    pub fn load_factor(&self) -> f64 {
        self.inserted_elements as f64 / (self.capacity as f64 * self.bucket_size as f64)
    }

    pub fn add(&mut self, key: &[u8]) -> ProbablesResult<()> {
        let (f, idx1, idx2) = derive(key, self.fingerprint_size_bytes, self.capacity);
        match self.try_insert(f, idx1, idx2) {
            Ok(()) => {
                self.inserted_elements += 1;
                Ok(())
            }
            Err(leftover) => {
                if self.auto_expand {
                    self.expand()?;
                    self.add(key)
                } else {
                    Err(ProbablesError::CuckooFilterFull { evicted: Some(leftover) })
                }
            }
        }
    }

    #[must_use]
    pub fn contains(&self, key: &[u8]) -> bool {
        let (f, idx1, idx2) = derive(key, self.fingerprint_size_bytes, self.capacity);
        self.buckets[idx1 as usize].contains(&f) || self.buckets[idx2 as usize].contains(&f)
    }

    pub fn remove(&mut self, key: &[u8]) -> bool {
        let (f, idx1, idx2) = derive(key, self.fingerprint_size_bytes, self.capacity);
        if let Some(pos) = self.buckets[idx1 as usize].iter().position(|&slot| slot == f) {
            self.buckets[idx1 as usize].swap_remove(pos);
            self.inserted_elements -= 1;
            return true;
        }
        if let Some(pos) = self.buckets[idx2 as usize].iter().position(|&slot| slot == f) {
            self.buckets[idx2 as usize].swap_remove(pos);
            self.inserted_elements -= 1;
            return true;
        }
        false
    }

    /// Grows the table to `capacity * expansion_rate` buckets and reinserts
    /// every stored fingerprint. Fatal (propagates the error) if any
    /// reinsertion fails in the larger table.
    pub fn expand(&mut self) -> ProbablesResult<()> {
        let new_capacity = ((self.capacity as f64) * f64::from(self.expansion_rate)).ceil() as u64;
        let new_capacity = new_capacity.max(self.capacity + 1);
        let mut new_buckets: Vec<Vec<u32>> = (0..new_capacity).map(|_| Vec::with_capacity(self.bucket_size)).collect();

        for (old_idx, bucket) in self.buckets.iter().enumerate() {
            for &f in bucket {
                let idx1 = old_idx as u64;
                let idx2 = alternate_index(idx1, f, new_capacity);
                if let Err(leftover) = try_insert_into(&mut new_buckets, self.bucket_size, &mut self.rng, f, idx1, idx2, self.max_swaps, new_capacity) {
                    return Err(ProbablesError::Initialization(format!(
                        "expansion failed to reinsert fingerprint {leftover}"
                    )));
                }
            }
        }

        self.buckets = new_buckets;
        self.capacity = new_capacity;
        Ok(())
    }

    /// Attempts to place `f` at `idx1`, then `idx2`, then via bounded random
    /// eviction. Returns the fingerprint left homeless on exhaustion.
    fn try_insert(&mut self, f: u32, idx1: u64, idx2: u64) -> Result<(), u32> {
        try_insert_into(&mut self.buckets, self.bucket_size, &mut self.rng, f, idx1, idx2, self.max_swaps, self.capacity)
    }
}

#[allow(clippy::too_many_arguments)]
fn try_insert_into(
    buckets: &mut [Vec<u32>],
    bucket_size: usize,
    rng: &mut StdRng,
    f: u32,
    idx1: u64,
    idx2: u64,
    max_swaps: u32,
    capacity: u64,
) -> Result<(), u32> {
    if buckets[idx1 as usize].len() < bucket_size {
        buckets[idx1 as usize].push(f);
        return Ok(());
    }
    if buckets[idx2 as usize].len() < bucket_size {
        buckets[idx2 as usize].push(f);
        return Ok(());
    }

    let mut f = f;
    let mut victim_idx = if rng.gen_bool(0.5) { idx1 } else { idx2 };
    for _ in 0..max_swaps {
        let bucket = &mut buckets[victim_idx as usize];
        let slot = rng.gen_range(0..bucket.len());
        std::mem::swap(&mut f, &mut bucket[slot]);
        victim_idx = alternate_index(victim_idx, f, capacity);
        if buckets[victim_idx as usize].len() < bucket_size {
            buckets[victim_idx as usize].push(f);
            return Ok(());
        }
    }
    Err(f)
}

