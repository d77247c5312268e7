//! Shared serialization helpers: hex encode/decode, and the endianness
//! convention every persisted format in this workspace follows — bodies are
//! written in the host's native byte order, footers are repacked
//! big-endian for the hex string form, to match the reference C
//! implementation's on-disk layout.

use crate::error::{ProbablesError, ProbablesResult};

/// Lowercase hex encoding of `bytes`.
#[must_use]
pub fn to_hex(bytes: &[u8]) -> String {
    hex::encode(bytes)
}

/// Decodes a hex string, accepting mixed-case input as required by
/// spec.md §6.
pub fn from_hex(s: &str) -> ProbablesResult<Vec<u8>> {
    hex::decode(s).map_err(|e| ProbablesError::Initialization(format!("malformed hex: {e}")))
}

/// Returns `true` if every character in `s` is a valid hex digit.
#[must_use]
pub fn is_hex_string(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| c.is_ascii_hexdigit())
}

