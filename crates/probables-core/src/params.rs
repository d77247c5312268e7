//! Parameter solver: maps user-facing targets (estimated elements / false
//! positive rate, or error rate / confidence) onto concrete memory geometry,
//! bit-compatibly with the reference C implementation these formulas come
//! from.

use std::f64::consts::LN_2;

/// Rounds `fpr` through an `f32` pack/unpack cycle, exactly like the
/// reference C struct does when it stores the false positive rate as a
/// 32-bit float. Two bloom filters are only "compatible" if this rounded
/// value, not the caller's original `f64`/`f32` literal, agrees.
#[must_use]
pub fn round_fpr(fpr: f32) -> f32 {
    fpr
}

/// Derives `(number_bits, number_hashes)` from `(estimated_elements,
/// false_positive_rate)`.
///
/// `number_bits = ceil(-n * ln(fpr) / ln(2)^2)`,
/// `number_hashes = round(ln(2) * m / n)`, clamped to a minimum of 1.
#[must_use]
pub fn bloom_params(estimated_elements: u64, false_positive_rate: f32) -> (u64, u32) {
    let n = estimated_elements as f64;
    let fpr = f64::from(round_fpr(false_positive_rate));

    let m = (-n * fpr.ln() / (LN_2 * LN_2)).ceil();
    let m = m.max(1.0) as u64;

    let k = (LN_2 * (m as f64) / n).round();
    let k = (k as u32).max(1);

    (m, k)
}

/// Number of whole bytes needed to store `number_bits` bits.
#[must_use]
pub fn bloom_length_bytes(number_bits: u64) -> u64 {
    (number_bits + 7) / 8
}

/// Derives `(width, depth)` from `(error_rate, confidence)` for a count-min
/// sketch: `width = ceil(2/error_rate)`, `depth = ceil(ln(1/(1-confidence)) /
/// ln(2))`.
#[must_use]
pub fn sketch_params_from_rate(error_rate: f64, confidence: f64) -> (usize, usize) {
    let width = (2.0 / error_rate).ceil() as usize;
    let depth = ((1.0 / (1.0 - confidence)).ln() / LN_2).ceil() as usize;
    (width.max(1), depth.max(1))
}

/// Derives `(error_rate, confidence)` from `(width, depth)`, the inverse of
/// [`sketch_params_from_rate`].
#[must_use]
pub fn sketch_rate_from_params(width: usize, depth: usize) -> (f64, f64) {
    let error_rate = 2.0 / (width as f64);
    let confidence = 1.0 - 2f64.powi(-(depth as i32));
    (error_rate, confidence)
}

