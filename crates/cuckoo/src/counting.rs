//! Counting cuckoo filter: component J.
//!
//! Each slot pairs a fingerprint with a `u32` occurrence counter, so
//! repeated inserts of the same key increment a counter in place instead of
//! consuming a second slot, and `unique_elements` tracks distinct keys
//! separately from `inserted_elements` (which counts every `add`).

use crate::fingerprint::{alternate_index, derive};
use probables_core::error::{ProbablesError, ProbablesResult};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

pub use crate::standard::DEFAULT_SEED;

type Slot = (u32, u32); // (fingerprint, count)

/// A cuckoo filter whose slots carry a multiplicity counter alongside the
/// fingerprint.
pub struct CountingCuckooFilter {
    buckets: Vec<Vec<Slot>>,
    capacity: u64,
    bucket_size: usize,
    max_swaps: u32,
    expansion_rate: f32,
    fingerprint_size_bytes: usize,
    auto_expand: bool,
    inserted_elements: u64,
    unique_elements: u64,
    rng: StdRng,
}

impl CountingCuckooFilter {
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
            unique_elements: 0,
            rng: StdRng::seed_from_u64(seed),
        })
    }

    #[must_use]
    pub fn capacity(&self) -> u64 {
        self.capacity
    }
    #[must_use]
    pub fn inserted_elements(&self) -> u64 {
        self.inserted_elements
    }
    #[must_use]
    pub fn unique_elements(&self) -> u64 {
        self.unique_elements
    }
    #[must_use]
    pub fn load_factor(&self) -> f64 {
        self.unique_elements as f64 / (self.capacity as f64 * self.bucket_size as f64)
    }

    pub fn add(&mut self, key: &[u8]) -> ProbablesResult<()> {
        let (f, idx1, idx2) = derive(key, self.fingerprint_size_bytes, self.capacity);

        if let Some(slot) = self.buckets[idx1 as usize].iter_mut().find(|(sf, _)| *sf == f) {
            slot.1 = slot.1.saturating_add(1);
            self.inserted_elements += 1;
            return Ok(());
        }
        if let Some(slot) = self.buckets[idx2 as usize].iter_mut().find(|(sf, _)| *sf == f) {
            slot.1 = slot.1.saturating_add(1);
            self.inserted_elements += 1;
            return Ok(());
        }

        match try_insert(&mut self.buckets, self.bucket_size, &mut self.rng, (f, 1), idx1, idx2, self.max_swaps, self.capacity) {
            Ok(()) => {
                self.inserted_elements += 1;
                self.unique_elements += 1;
                Ok(())
            }
            Err((leftover, _)) => {
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
    pub fn check(&self, key: &[u8]) -> u32 {
        let (f, idx1, idx2) = derive(key, self.fingerprint_size_bytes, self.capacity);
        self.buckets[idx1 as usize]
            .iter()
            .find(|(sf, _)| *sf == f)
            .or_else(|| self.buckets[idx2 as usize].iter().find(|(sf, _)| *sf == f))
            .map_or(0, |(_, c)| *c)
    }

    #[must_use]
    pub fn contains(&self, key: &[u8]) -> bool {
        self.check(key) > 0
    }

    /// Decrements `key`'s counter; removes the slot entirely (decrementing
    /// `unique_elements`) once the count reaches zero.
    pub fn remove(&mut self, key: &[u8]) -> bool {
        let (f, idx1, idx2) = derive(key, self.fingerprint_size_bytes, self.capacity);
        for idx in [idx1, idx2] {
            let bucket = &mut self.buckets[idx as usize];
            if let Some(pos) = bucket.iter().position(|(sf, _)| *sf == f) {
                bucket[pos].1 -= 1;
                self.inserted_elements -= 1;
                if bucket[pos].1 == 0 {
                    bucket.swap_remove(pos);
                    self.unique_elements -= 1;
                }
                return true;
            }
        }
        false
    }

    pub fn expand(&mut self) -> ProbablesResult<()> {
        let new_capacity = ((self.capacity as f64) * f64::from(self.expansion_rate)).ceil() as u64;
        let new_capacity = new_capacity.max(self.capacity + 1);
        let mut new_buckets: Vec<Vec<Slot>> = (0..new_capacity).map(|_| Vec::with_capacity(self.bucket_size)).collect();

        for (old_idx, bucket) in self.buckets.iter().enumerate() {
            for &(f, count) in bucket {
                let idx1 = old_idx as u64;
                let idx2 = alternate_index(idx1, f, new_capacity);
                if let Err((leftover, _)) = try_insert(&mut new_buckets, self.bucket_size, &mut self.rng, (f, count), idx1, idx2, self.max_swaps, new_capacity) {
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
}

#[allow(clippy::too_many_arguments)]
fn try_insert(
    buckets: &mut [Vec<Slot>],
    bucket_size: usize,
    rng: &mut StdRng,
    initial: Slot,
    idx1: u64,
    idx2: u64,
    max_swaps: u32,
    capacity: u64,
) -> Result<(), (u32, u32)> {
    if buckets[idx1 as usize].len() < bucket_size {
        buckets[idx1 as usize].push(initial);
        return Ok(());
    }
    if buckets[idx2 as usize].len() < bucket_size {
        buckets[idx2 as usize].push(initial);
        return Ok(());
    }

    let mut slot: Slot = initial;
    let mut victim_idx = if rng.gen_bool(0.5) { idx1 } else { idx2 };
    for _ in 0..max_swaps {
        let bucket = &mut buckets[victim_idx as usize];
        let pos = rng.gen_range(0..bucket.len());
        std::mem::swap(&mut slot, &mut bucket[pos]);
        victim_idx = alternate_index(victim_idx, slot.0, capacity);
        if buckets[victim_idx as usize].len() < bucket_size {
            buckets[victim_idx as usize].push(slot);
            return Ok(());
        }
    }
    Err(slot)
}

