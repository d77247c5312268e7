//! # probables
//!
//! Approximate membership and frequency data structures: bloom filters
//! (standard, on-disk, counting, expanding, rotating), cuckoo filters
//! (standard and counting), a count-min sketch with heavy-hitters and
//! stream-threshold trackers, and a quotient filter.
//!
//! This crate is a thin facade: every type lives in its own crate
//! (`bloom`, `cuckoo`, `sketch`, `quotient`) built on the shared
//! foundation in `probables-core`. Re-exporting them here gives callers a
//! single dependency and a single namespace.

pub use bloom::{
    is_compatible, BloomFilter, BloomFilterOnDisk, BloomLike, CountingBloomFilter,
    ExpandingBloomFilter, RotatingBloomFilter,
};
pub use cuckoo::{CountingCuckooFilter, CuckooFilter, DEFAULT_SEED};
pub use probables_core::error::{ProbablesError, ProbablesResult};
pub use quotient::QuotientFilter;
pub use sketch::{CountMinSketch, HeavyHitters, QueryStrategy, StreamThreshold};
