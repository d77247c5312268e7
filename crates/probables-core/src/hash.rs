//! Hash provider: a pluggable `(key, depth) -> [u64; depth]` contract.
//!
//! The default implementation is FNV-1a, chained: the first hash covers the
//! key itself, and each subsequent hash covers the lowercase hex string (no
//! `0x` prefix) of the previous hash. This chained form is a
//! persistence-visible contract — filters saved under the default hash must
//! remain decodable by any conforming implementation, so the chaining rule
//! below must never change.

/// Signature every hash provider must implement.
///
/// A plain function pointer, not a boxed closure: the contract is
/// "pluggable function", not a pluggable stateful object, so filters that
/// store a `HashFunction` stay `Copy`, `Send`, and `Sync` without needing a
/// lifetime parameter.
pub type HashFunction = fn(&[u8], usize) -> Vec<u64>;

pub(crate) const FNV_OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2349;
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

/// 64-bit FNV-1a over a single byte string.
#[must_use]
pub fn fnv1a_64(data: &[u8]) -> u64 {
    let mut hash = FNV_OFFSET_BASIS;
    for &byte in data {
        hash ^= u64::from(byte);
        hash = hash.wrapping_mul(FNV_PRIME);
    }
    hash
}

/// The default hash provider: chained FNV-1a.
///
/// `hashes[0] = fnv1a(key)`, and for `i > 0`,
/// `hashes[i] = fnv1a(hex_lowercase_no_prefix(hashes[i-1]))`.
#[must_use]
pub fn default_fnv1a(key: &[u8], depth: usize) -> Vec<u64> {
    let mut out = Vec::with_capacity(depth);
    let mut prev = fnv1a_64(key);
    if depth > 0 {
        out.push(prev);
    }
    for _ in 1..depth {
        let hex = format!("{:x}", prev);
        prev = fnv1a_64(hex.as_bytes());
        out.push(prev);
    }
    out
}

/// 32-bit FNV-1a, used by the quotient filter's default hash (masked down to
/// `q + r` bits).
#[must_use]
pub fn fnv1a_32(data: &[u8]) -> u32 {
    const OFFSET_BASIS: u32 = 0x811c_9dc5;
    const PRIME: u32 = 0x0100_0193;
    let mut hash = OFFSET_BASIS;
    for &byte in data {
        hash ^= u32::from(byte);
        hash = hash.wrapping_mul(PRIME);
    }
    hash
}
