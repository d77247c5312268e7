//! # cuckoo
//!
//! Bucketed fingerprint filters: a [`standard::CuckooFilter`] supporting
//! insertion, membership, removal, and auto-expansion, and a
//! [`counting::CountingCuckooFilter`] that tracks per-fingerprint
//! multiplicity instead of a single occupied/empty bit.

pub mod counting;
pub mod fingerprint;
pub mod standard;

pub use counting::CountingCuckooFilter;
pub use standard::{CuckooFilter, DEFAULT_SEED};
