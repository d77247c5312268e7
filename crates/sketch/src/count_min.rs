//! Count-min sketch: component K.
//!
//! A `depth * width` counter matrix, row-major, giving upper-bound
//! frequency estimates for any key in sublinear space: each row hashes a
//! key to one column and increments it, so `check(key)` — the minimum
//! across a key's `depth` cells — never undercounts, but may overcount
//! when two keys collide in every row.

use byteorder::{NativeEndian, ReadBytesExt, WriteBytesExt};
use probables_core::error::{ProbablesError, ProbablesResult};
use probables_core::hash::{default_fnv1a, HashFunction};
use probables_core::params::{sketch_params_from_rate, sketch_rate_from_params};
use std::io::Cursor;

const FOOTER_BYTES: usize = 4 + 4 + 8;

/// Which statistic to derive from a key's `depth` observed cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryStrategy {
    /// The smallest observed cell — never undercounts. The default.
    Min,
    /// Integer mean (`sum / depth`) across observed cells.
    Mean,
    /// Bias-corrected median: for each cell, subtract an estimate of the
    /// noise contributed by every other key hashed into it, then take the
    /// median of the corrected values.
    MeanMin,
}

/// A count-min sketch with saturating, clamped counters.
#[derive(Debug, Clone)]
pub struct CountMinSketch {
    width: usize,
    depth: usize,
    bins: Vec<i32>,
    elements_added: i64,
    hash_func: HashFunction,
    strategy: QueryStrategy,
}

impl CountMinSketch {
    /// Builds a sketch sized directly by `(width, depth)`.
    pub fn new(width: usize, depth: usize) -> ProbablesResult<Self> {
        Self::with_hash_function(width, depth, default_fnv1a)
    }

    pub fn with_hash_function(width: usize, depth: usize, hash_func: HashFunction) -> ProbablesResult<Self> {
        if width == 0 || depth == 0 {
            return Err(ProbablesError::Initialization("width and depth must be > 0".into()));
        }
        Ok(Self {
            width,
            depth,
            bins: vec![0i32; width * depth],
            elements_added: 0,
            hash_func,
            strategy: QueryStrategy::Min,
        })
    }

    /// Builds a sketch sized to hit `error_rate` at `confidence`, per
    /// [`probables_core::params::sketch_params_from_rate`].
    pub fn from_error_rate(error_rate: f64, confidence: f64) -> ProbablesResult<Self> {
        if !(error_rate > 0.0 && error_rate < 1.0) || !(confidence > 0.0 && confidence < 1.0) {
            return Err(ProbablesError::Initialization(
                "error_rate and confidence must be in (0, 1)".into(),
            ));
        }
        let (width, depth) = sketch_params_from_rate(error_rate, confidence);
        Self::new(width, depth)
    }

    #[must_use]
    pub fn with_strategy(mut self, strategy: QueryStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    #[must_use]
    pub fn width(&self) -> usize {
        self.width
    }
    #[must_use]
    pub fn depth(&self) -> usize {
        self.depth
    }
    #[must_use]
    pub fn elements_added(&self) -> i64 {
        self.elements_added
    }
    #[must_use]
    pub fn error_rate(&self) -> f64 {
        sketch_rate_from_params(self.width, self.depth).0
    }
    #[must_use]
    pub fn confidence(&self) -> f64 {
        sketch_rate_from_params(self.width, self.depth).1
    }

    fn columns(&self, key: &[u8]) -> Vec<usize> {
        (self.hash_func)(key, self.depth)
            .into_iter()
            .map(|h| (h % self.width as u64) as usize)
            .collect()
    }

    fn cell(&self, row: usize, col: usize) -> i32 {
        self.bins[row * self.width + col]
    }
    fn cell_mut(&mut self, row: usize, col: usize) -> &mut i32 {
        &mut self.bins[row * self.width + col]
    }

    /// Adds `n` occurrences of `key`, saturating each touched cell at
    /// `i32::MAX`. Returns the post-update query result.
    pub fn add(&mut self, key: &[u8], n: i32) -> i32 {
        let cols = self.columns(key);
        let mut observed = Vec::with_capacity(self.depth);
        for (row, col) in cols.into_iter().enumerate() {
            let cell = self.cell_mut(row, col);
            *cell = cell.saturating_add(n);
            observed.push(*cell);
        }
        self.elements_added = self.elements_added.saturating_add(i64::from(n));
        observed.sort_unstable();
        self.apply_strategy(&observed)
    }

    /// Removes `n` occurrences of `key`, saturating each touched cell at
    /// `i32::MIN`.
    pub fn remove(&mut self, key: &[u8], n: i32) -> i32 {
        let cols = self.columns(key);
        let mut observed = Vec::with_capacity(self.depth);
        for (row, col) in cols.into_iter().enumerate() {
            let cell = self.cell_mut(row, col);
            *cell = cell.saturating_sub(n);
            observed.push(*cell);
        }
        self.elements_added = self.elements_added.saturating_sub(i64::from(n));
        observed.sort_unstable();
        self.apply_strategy(&observed)
    }

    /// The query-strategy result for `key`'s current cells.
    #[must_use]
    pub fn check(&self, key: &[u8]) -> i32 {
        let cols = self.columns(key);
        let mut observed: Vec<i32> = cols.into_iter().enumerate().map(|(row, col)| self.cell(row, col)).collect();
        observed.sort_unstable();
        self.apply_strategy(&observed)
    }

    fn apply_strategy(&self, sorted: &[i32]) -> i32 {
        match self.strategy {
            QueryStrategy::Min => sorted[0],
            QueryStrategy::Mean => {
                let sum: i64 = sorted.iter().map(|&c| i64::from(c)).sum();
                (sum / sorted.len() as i64) as i32
            }
            QueryStrategy::MeanMin => {
                let w = self.width as i64;
                let mut corrected: Vec<i64> = sorted
                    .iter()
                    .map(|&cell| {
                        let cell = i64::from(cell);
                        cell - (self.elements_added - cell) / (w - 1).max(1)
                    })
                    .collect();
                corrected.sort_unstable();
                let mid = corrected.len() / 2;
                let median = if corrected.len() % 2 == 0 {
                    (corrected[mid - 1] + corrected[mid]).div_euclid(2)
                } else {
                    corrected[mid]
                };
                median.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32
            }
        }
    }

    #[must_use]
    pub fn is_compatible_with(&self, other: &Self) -> bool {
        self.width == other.width
            && self.depth == other.depth
            && (self.hash_func)(b"test", self.depth) == (other.hash_func)(b"test", other.depth)
    }

    /// Merges `other` into `self`: per-cell saturating add, clamped
    /// `elements_added`. Requires identical `(width, depth, hash)`.
    pub fn join(&mut self, other: &Self) -> ProbablesResult<()> {
        if !self.is_compatible_with(other) {
            return Err(ProbablesError::CountMinMismatch(
                "sketches are not compatible (mismatched width/depth/hash)".into(),
            ));
        }
        for (a, &b) in self.bins.iter_mut().zip(other.bins.iter()) {
            *a = a.saturating_add(b);
        }
        self.elements_added = self.elements_added.saturating_add(other.elements_added);
        Ok(())
    }

    /// Serializes the bin matrix (row-major, native-endian `i32`s)
    /// followed by a `(u32 width, u32 depth, i64 elements_added)` footer.
    #[must_use]
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.bins.len() * 4 + FOOTER_BYTES);
        for &c in &self.bins {
            out.write_i32::<NativeEndian>(c).unwrap();
        }
        out.write_u32::<NativeEndian>(self.width as u32).unwrap();
        out.write_u32::<NativeEndian>(self.depth as u32).unwrap();
        out.write_i64::<NativeEndian>(self.elements_added).unwrap();
        out
    }

    pub fn from_bytes(bytes: &[u8]) -> ProbablesResult<Self> {
        Self::from_bytes_with_hash(bytes, default_fnv1a)
    }

    pub fn from_bytes_with_hash(bytes: &[u8], hash_func: HashFunction) -> ProbablesResult<Self> {
        if bytes.len() < FOOTER_BYTES {
            return Err(ProbablesError::Initialization("buffer too short for sketch footer".into()));
        }
        let split = bytes.len() - FOOTER_BYTES;
        let (body, footer) = bytes.split_at(split);
        let mut cursor = Cursor::new(footer);
        let width = cursor.read_u32::<NativeEndian>()? as usize;
        let depth = cursor.read_u32::<NativeEndian>()? as usize;
        let elements_added = cursor.read_i64::<NativeEndian>()?;

        let mut sketch = Self::with_hash_function(width, depth, hash_func)?;
        if body.len() != width * depth * 4 {
            return Err(ProbablesError::Initialization(
                "body length does not match derived width * depth".into(),
            ));
        }
        let mut body_cursor = Cursor::new(body);
        for cell in sketch.bins.iter_mut() {
            *cell = body_cursor.read_i32::<NativeEndian>()?;
        }
        sketch.elements_added = elements_added;
        Ok(sketch)
    }
}

