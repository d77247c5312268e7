//! # quotient
//!
//! Quotient filter: component M. An ordered-remainder approximate-set
//! tester that, unlike a bloom filter, supports `remove` and iterates its
//! contents in hash order, at the cost of needing three bits of metadata
//! per slot instead of one.
//!
//! A hash `h` is split into a `q`-bit quotient `k = h >> r` (the slot's
//! canonical home) and an `r`-bit remainder `v = h & ((1 << r) - 1)`
//! (stored in that home's "cluster" of slots, in ascending order).

use probables_core::error::{ProbablesError, ProbablesResult};
use probables_core::hash::fnv1a_32;
use probables_core::BitStore;

/// Signature for a quotient filter's hash provider: one 32-bit hash per
/// key, later split into `(quotient, remainder)` by bit position.
pub type QuotientHashFunction = fn(&[u8]) -> u32;

/// A quotient filter with `2^q` slots and `r`-bit remainders.
pub struct QuotientFilter {
    q: u32,
    r: u32,
    num_slots: u64,
    remainder_mask: u32,
    remainders: Vec<u32>,
    is_occupied: BitStore,
    is_continuation: BitStore,
    is_shifted: BitStore,
    num_elements: u64,
    hash_func: QuotientHashFunction,
}

impl QuotientFilter {
    /// Creates a filter with `2^q` slots, each storing an `r`-bit
    /// remainder. `q + r` must be at most 32 (the default hash is 32-bit).
    pub fn new(q: u32, r: u32) -> ProbablesResult<Self> {
        Self::with_hash_function(q, r, fnv1a_32)
    }

    pub fn with_hash_function(q: u32, r: u32, hash_func: QuotientHashFunction) -> ProbablesResult<Self> {
        if q == 0 || r == 0 || q + r > 32 {
            return Err(ProbablesError::Initialization(
                "q and r must be > 0 and q + r <= 32".into(),
            ));
        }
        let num_slots = 1u64 << q;
        Ok(Self {
            q,
            r,
            num_slots,
            remainder_mask: (1u32 << r) - 1,
            remainders: vec![0u32; num_slots as usize],
            is_occupied: BitStore::new(num_slots),
            is_continuation: BitStore::new(num_slots),
            is_shifted: BitStore::new(num_slots),
            num_elements: 0,
            hash_func,
        })
    }

    #[must_use]
    pub fn num_slots(&self) -> u64 {
        self.num_slots
    }
    #[must_use]
    pub fn num_elements(&self) -> u64 {
        self.num_elements
    }
    #[must_use]
    pub fn load_factor(&self) -> f64 {
        self.num_elements as f64 / self.num_slots as f64
    }

    fn split(&self, key: &[u8]) -> (u64, u32) {
        let h = (self.hash_func)(key);
        let k = (h >> self.r) as u64 & (self.num_slots - 1);
        let v = h & self.remainder_mask;
        (k, v)
    }

    fn inc(&self, i: u64) -> u64 {
        (i + 1) % self.num_slots
    }
    fn dec(&self, i: u64) -> u64 {
        (i + self.num_slots - 1) % self.num_slots
    }

    fn slot_is_empty(&self, i: u64) -> bool {
        !self.is_occupied.test(i) && !self.is_continuation.test(i) && !self.is_shifted.test(i)
    }

    /// Locates the start of the run of remainders belonging to canonical
    /// slot `k`: walk left over shifted slots to the start of `k`'s
    /// cluster, then walk right counting occupied canonical slots to find
    /// the `rank`-th run in that cluster (the one belonging to `k`).
    fn get_start_index(&self, k: u64) -> u64 {
        let mut b = k;
        while self.is_shifted.test(b) {
            b = self.dec(b);
        }

        let mut rank = 0u64;
        let mut i = b;
        loop {
            if self.is_occupied.test(i) {
                rank += 1;
            }
            if i == k {
                break;
            }
            i = self.inc(i);
        }

        let mut s = b;
        let mut remaining = rank;
        loop {
            if !self.is_continuation.test(s) {
                remaining -= 1;
                if remaining == 0 {
                    return s;
                }
            }
            s = self.inc(s);
        }
    }

    /// Inserts `remainder` at `pos`, sliding every following occupied slot
    /// forward by one until reaching an empty slot. `is_occupied` is never
    /// touched here — it is canonical-slot metadata, not tied to where a
    /// remainder physically lands.
    fn shift_insert(&mut self, mut pos: u64, mut remainder: u32, mut is_continuation: bool) {
        loop {
            let empty = self.slot_is_empty(pos);
            let carried_remainder = self.remainders[pos as usize];
            let carried_is_continuation = self.is_continuation.test(pos);

            self.remainders[pos as usize] = remainder;
            if is_continuation {
                self.is_continuation.set(pos);
            } else {
                self.is_continuation.clear(pos);
            }
            self.is_shifted.set(pos);

            if empty {
                return;
            }
            remainder = carried_remainder;
            is_continuation = carried_is_continuation;
            pos = self.inc(pos);
        }
    }

    /// Inserts `key` if not already present. A no-op if `contains(key)` is
    /// already true.
    pub fn add(&mut self, key: &[u8]) -> ProbablesResult<()> {
        if self.num_elements >= self.num_slots {
            return Err(ProbablesError::Initialization("quotient filter is full".into()));
        }
        let (k, v) = self.split(key);
        if self.contains_split(k, v) {
            return Ok(());
        }

        if self.slot_is_empty(k) {
            self.remainders[k as usize] = v;
            self.is_occupied.set(k);
            self.num_elements += 1;
            return Ok(());
        }

        let was_occupied = self.is_occupied.test(k);
        let start = self.get_start_index(k);
        self.is_occupied.set(k);

        if !was_occupied {
            self.shift_insert(start, v, false);
        } else {
            let mut pos = start;
            loop {
                if self.remainders[pos as usize] >= v {
                    break;
                }
                let next = self.inc(pos);
                if self.is_continuation.test(next) {
                    pos = next;
                } else {
                    pos = next;
                    break;
                }
            }
            self.shift_insert(pos, v, true);
        }
        self.num_elements += 1;
        Ok(())
    }

    /// True iff `key`'s run (if any) contains its remainder.
    #[must_use]
    pub fn contains(&self, key: &[u8]) -> bool {
        let (k, v) = self.split(key);
        self.contains_split(k, v)
    }

    fn contains_split(&self, k: u64, v: u32) -> bool {
        if !self.is_occupied.test(k) {
            return false;
        }
        let mut pos = self.get_start_index(k);
        loop {
            match self.remainders[pos as usize].cmp(&v) {
                std::cmp::Ordering::Equal => return true,
                std::cmp::Ordering::Greater => return false,
                std::cmp::Ordering::Less => {}
            }
            let next = self.inc(pos);
            if !self.is_continuation.test(next) {
                return false;
            }
            pos = next;
        }
    }
}
