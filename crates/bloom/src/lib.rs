//! # bloom
//!
//! Space-efficient probabilistic set-membership filters: a standard
//! in-memory bloom filter, a memory-mapped on-disk variant, a counting
//! variant that supports removal, and expanding/rotating chains that grow
//! (or age out) past a single filter's designed capacity.
//!
//! A bloom filter can tell you with certainty that a key is **not** in the
//! set (no false negatives), but may occasionally report that a key **is**
//! in the set when it isn't (false positives). The false positive rate
//! depends on the number of bits and hash functions used, both derived from
//! the caller's `(estimated_elements, false_positive_rate)` target by
//! [`probables_core::params::bloom_params`].

pub mod counting;
pub mod expanding;
pub mod on_disk;
pub mod rotating;
pub mod standard;

pub use counting::CountingBloomFilter;
pub use expanding::ExpandingBloomFilter;
pub use on_disk::BloomFilterOnDisk;
pub use rotating::RotatingBloomFilter;
pub use standard::{is_compatible, BloomFilter, BloomLike, FOOTER_BYTES};

#[cfg(test)]
mod tests;
