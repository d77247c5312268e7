//! Counting bloom filter: component G.
//!
//! Like [`crate::standard::BloomFilter`], but each slot is a saturating
//! `u32` counter instead of a single bit, so elements can be removed as
//! well as added, and membership queries return an (over-)estimate of
//! multiplicity rather than a bare boolean.

use byteorder::{NativeEndian, ReadBytesExt, WriteBytesExt};
use probables_core::error::{ProbablesError, ProbablesResult};
use probables_core::hash::{default_fnv1a, HashFunction};
use probables_core::params::bloom_params;
use std::fs;
use std::io::{self, Cursor, Read};
use std::path::Path;

const FOOTER_BYTES: usize = 8 + 8 + 4;

/// A counting bloom filter: supports `remove` in addition to `add`/`check`
/// by tracking a saturating per-slot occupancy count instead of a single
/// bit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountingBloomFilter {
    estimated_elements: u64,
    false_positive_rate_bits: u32, // f32 stored as bits so the struct can derive Eq
    number_hashes: u32,
    number_bits: u64,
    counters: Vec<u32>,
    elements_added: u64,
    hash_func: HashFunction,
}

impl CountingBloomFilter {
    pub fn new(estimated_elements: u64, false_positive_rate: f32) -> ProbablesResult<Self> {
        Self::with_hash_function(estimated_elements, false_positive_rate, default_fnv1a)
    }

    pub fn with_hash_function(
        estimated_elements: u64,
        false_positive_rate: f32,
        hash_func: HashFunction,
    ) -> ProbablesResult<Self> {
        if estimated_elements == 0 {
            return Err(ProbablesError::Initialization(
                "estimated_elements must be > 0".into(),
            ));
        }
        if !(false_positive_rate > 0.0 && false_positive_rate < 1.0) {
            return Err(ProbablesError::Initialization(
                "false_positive_rate must be in (0, 1)".into(),
            ));
        }
        let (number_bits, number_hashes) = bloom_params(estimated_elements, false_positive_rate);
        Ok(Self {
            estimated_elements,
            false_positive_rate_bits: false_positive_rate.to_bits(),
            number_hashes,
            number_bits,
            counters: vec![0u32; number_bits as usize],
            elements_added: 0,
            hash_func,
        })
    }

    #[must_use]
    pub fn false_positive_rate(&self) -> f32 {
        f32::from_bits(self.false_positive_rate_bits)
    }
    #[must_use]
    pub fn estimated_elements(&self) -> u64 {
        self.estimated_elements
    }
    #[must_use]
    pub fn number_hashes(&self) -> u32 {
        self.number_hashes
    }
    #[must_use]
    pub fn number_bits(&self) -> u64 {
        self.number_bits
    }
    #[must_use]
    pub fn elements_added(&self) -> u64 {
        self.elements_added
    }

    #[must_use]
    pub fn hashes(&self, key: &[u8], depth: Option<usize>) -> Vec<u64> {
        (self.hash_func)(key, depth.unwrap_or(self.number_hashes as usize))
    }

    /// Adds `n` occurrences of `key`, saturating each of its `k` slots at
    /// `u32::MAX`. Returns the minimum resulting slot value, i.e. the
    /// filter's current multiplicity estimate for `key`.
    pub fn add(&mut self, key: &[u8], n: u32) -> u32 {
        let hashes = self.hashes(key, None);
        self.add_alt(&hashes, n)
    }

    pub fn add_alt(&mut self, hashes: &[u64], n: u32) -> u32 {
        let mut min = u32::MAX;
        for &h in hashes {
            let idx = (h % self.number_bits) as usize;
            self.counters[idx] = self.counters[idx].saturating_add(n);
            min = min.min(self.counters[idx]);
        }
        self.elements_added += 1;
        min
    }

    /// Removes `n` occurrences of `key`, saturating each slot at `0`.
    /// Returns the minimum resulting slot value.
    pub fn remove(&mut self, key: &[u8], n: u32) -> u32 {
        let hashes = self.hashes(key, None);
        self.remove_alt(&hashes, n)
    }

    pub fn remove_alt(&mut self, hashes: &[u64], n: u32) -> u32 {
        let mut min = u32::MAX;
        for &h in hashes {
            let idx = (h % self.number_bits) as usize;
            self.counters[idx] = self.counters[idx].saturating_sub(n);
            min = min.min(self.counters[idx]);
        }
        self.elements_added = self.elements_added.saturating_sub(1);
        min
    }

    /// The minimum slot value across `key`'s `k` hashes: zero if `key` was
    /// never added (or has been fully removed), otherwise an
    /// over-estimate of its multiplicity.
    #[must_use]
    pub fn check(&self, key: &[u8]) -> u32 {
        self.check_alt(&self.hashes(key, None))
    }

    #[must_use]
    pub fn check_alt(&self, hashes: &[u64]) -> u32 {
        hashes
            .iter()
            .map(|&h| self.counters[(h % self.number_bits) as usize])
            .min()
            .unwrap_or(0)
    }

    pub fn clear(&mut self) {
        self.counters.iter_mut().for_each(|c| *c = 0);
        self.elements_added = 0;
    }

    #[must_use]
    pub fn is_compatible_with(&self, other: &Self) -> bool {
        self.number_bits == other.number_bits
            && self.number_hashes == other.number_hashes
            && (self.hash_func)(b"test", self.number_hashes as usize)
                == (other.hash_func)(b"test", other.number_hashes as usize)
    }

    pub fn union(&self, other: &Self) -> ProbablesResult<Self> {
        self.combine(other, u32::saturating_add)
    }

    pub fn intersection(&self, other: &Self) -> ProbablesResult<Self> {
        self.combine(other, u32::min)
    }

    fn combine(&self, other: &Self, op: fn(u32, u32) -> u32) -> ProbablesResult<Self> {
        if !self.is_compatible_with(other) {
            return Err(ProbablesError::Initialization(
                "counting bloom filters are not compatible (mismatched m/k/hash)".into(),
            ));
        }
        let mut result =
            Self::with_hash_function(self.estimated_elements, self.false_positive_rate(), self.hash_func)?;
        for i in 0..self.counters.len() {
            result.counters[i] = op(self.counters[i], other.counters[i]);
        }
        result.elements_added = result.counters.iter().filter(|&&c| c > 0).count() as u64;
        Ok(result)
    }

    /// `popcount(both nonzero) / popcount(either nonzero)`; `1.0` when both
    /// are empty, `0.0` when exactly one is.
    pub fn jaccard_index(&self, other: &Self) -> ProbablesResult<f64> {
        if !self.is_compatible_with(other) {
            return Err(ProbablesError::Initialization(
                "counting bloom filters are not compatible (mismatched m/k/hash)".into(),
            ));
        }
        let mut both = 0u64;
        let mut either = 0u64;
        for i in 0..self.counters.len() {
            let a = self.counters[i] > 0;
            let b = other.counters[i] > 0;
            if a && b {
                both += 1;
            }
            if a || b {
                either += 1;
            }
        }
        if either == 0 {
            return Ok(1.0);
        }
        Ok(both as f64 / either as f64)
    }

    /// Estimates distinct elements inserted from the fraction of nonzero
    /// slots, identically to the standard filter's bit-based estimator.
    #[must_use]
    pub fn estimate_elements(&self) -> i64 {
        let nonzero = self.counters.iter().filter(|&&c| c > 0).count() as u64;
        if nonzero == self.number_bits {
            return -1;
        }
        let m = self.number_bits as f64;
        let k = f64::from(self.number_hashes);
        let ratio = 1.0 - (nonzero as f64 / m);
        (-(m / k) * ratio.ln()).floor() as i64
    }

    /// Serializes each `u32` counter native-endian, followed by the usual
    /// footer.
    #[must_use]
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.counters.len() * 4 + FOOTER_BYTES);
        for &c in &self.counters {
            out.write_u32::<NativeEndian>(c).unwrap();
        }
        out.write_u64::<NativeEndian>(self.estimated_elements).unwrap();
        out.write_u64::<NativeEndian>(self.elements_added).unwrap();
        out.write_f32::<NativeEndian>(self.false_positive_rate()).unwrap();
        out
    }

    pub fn from_bytes(bytes: &[u8]) -> ProbablesResult<Self> {
        Self::from_bytes_with_hash(bytes, default_fnv1a)
    }

    pub fn from_bytes_with_hash(bytes: &[u8], hash_func: HashFunction) -> ProbablesResult<Self> {
        if bytes.len() < FOOTER_BYTES {
            return Err(ProbablesError::Initialization(
                "buffer too short for counting bloom footer".into(),
            ));
        }
        let split = bytes.len() - FOOTER_BYTES;
        let (body, footer) = bytes.split_at(split);
        let mut cursor = Cursor::new(footer);
        let estimated_elements = cursor.read_u64::<NativeEndian>()?;
        let elements_added = cursor.read_u64::<NativeEndian>()?;
        let false_positive_rate = cursor.read_f32::<NativeEndian>()?;

        let mut filter = Self::with_hash_function(estimated_elements, false_positive_rate, hash_func)?;
        if body.len() as u64 != filter.number_bits * 4 {
            return Err(ProbablesError::Initialization(
                "body length does not match derived counter array size".into(),
            ));
        }
        let mut body_cursor = Cursor::new(body);
        for slot in filter.counters.iter_mut() {
            *slot = body_cursor.read_u32::<NativeEndian>()?;
        }
        filter.elements_added = elements_added;
        Ok(filter)
    }

    pub fn export<P: AsRef<Path>>(&self, path: P) -> io::Result<()> {
        fs::write(path, self.to_bytes())
    }

    pub fn load<P: AsRef<Path>>(path: P) -> ProbablesResult<Self> {
        Self::load_with_hash(path, default_fnv1a)
    }

    pub fn load_with_hash<P: AsRef<Path>>(path: P, hash_func: HashFunction) -> ProbablesResult<Self> {
        let mut bytes = Vec::new();
        fs::File::open(path)?.read_to_end(&mut bytes)?;
        Self::from_bytes_with_hash(&bytes, hash_func)
    }
}

