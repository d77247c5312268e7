//! Fingerprint derivation shared by the standard and counting cuckoo
//! filters: component I's candidate-index arithmetic.

use probables_core::hash::fnv1a_64;

/// Derives a key's fingerprint and its two candidate bucket indices.
///
/// 1. `h = fnv1a_64(key)`.
/// 2. Encode `h` as a minimal big-endian byte sequence; take the first
///    `fingerprint_size_bytes` bytes (left-padded with zeros if shorter) as
///    the fingerprint integer `f`; if `f == 0`, replace with `1` (zero is
///    reserved to mean "empty slot").
/// 3. `idx1 = h mod capacity`.
/// 4. `idx2 = (idx1 XOR fnv1a_64(hex_lowercase(f))) mod capacity`.
#[must_use]
pub fn derive(key: &[u8], fingerprint_size_bytes: usize, capacity: u64) -> (u32, u64, u64) {
    let h = fnv1a_64(key);
    let f = truncate_fingerprint(h, fingerprint_size_bytes);
    let idx1 = h % capacity;
    let idx2 = alternate_index(idx1, f, capacity);
    (f, idx1, idx2)
}

/// Given one of a fingerprint's candidate indices, computes the other —
/// used both at insertion time and to recompute an evicted fingerprint's
/// new home during a swap chain.
#[must_use]
pub fn alternate_index(idx: u64, fingerprint: u32, capacity: u64) -> u64 {
    let hex = format!("{fingerprint:x}");
    idx ^ (fnv1a_64(hex.as_bytes()) % capacity)
}

/// Takes the first `size` bytes of `h`'s minimal (leading-zero-stripped)
/// big-endian representation — the most-significant end, not the least —
/// left-padded with zeros if that minimal representation is shorter than
/// `size`.
pub(crate) fn truncate_fingerprint(h: u64, fingerprint_size_bytes: usize) -> u32 {
    let bytes = h.to_be_bytes();
    let size = fingerprint_size_bytes.clamp(1, 4);
    let first_nonzero = bytes.iter().position(|&b| b != 0).unwrap_or(bytes.len() - 1);
    let minimal = &bytes[first_nonzero..];
    let take = minimal.len().min(size);
    let mut f: u32 = 0;
    for &b in &minimal[..take] {
        f = (f << 8) | u32::from(b);
    }
    if f == 0 {
        1
    } else {
        f
    }
}

