//! # probables-core
//!
//! Foundational types shared by every filter and sketch in this workspace:
//! the hash provider (component A), the parameter solver (component C), the
//! bit store (component D), a shared hex/footer codec, and the error
//! taxonomy every crate returns.
//!
//! Nothing here is useful on its own — it exists so `bloom`, `cuckoo`,
//! `sketch`, and `quotient` don't each reimplement FNV-1a or the
//! initialization-error plumbing.

pub mod bitstore;
pub mod codec;
pub mod error;
pub mod hash;
pub mod params;

pub use bitstore::BitStore;
pub use error::{ProbablesError, ProbablesResult};
pub use hash::{default_fnv1a, fnv1a_32, fnv1a_64, HashFunction};

#[cfg(test)]
mod tests;
