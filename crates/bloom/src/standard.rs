//! Standard (in-memory) bloom filter: component E.

use byteorder::{BigEndian, NativeEndian, ReadBytesExt, WriteBytesExt};
use probables_core::codec::{from_hex, is_hex_string, to_hex};
use probables_core::error::{ProbablesError, ProbablesResult};
use probables_core::hash::{default_fnv1a, HashFunction};
use probables_core::params::{bloom_length_bytes, bloom_params};
use probables_core::BitStore;
use std::fs;
use std::io::{self, Cursor, Read, Write};
use std::path::Path;

/// Size in bytes of the footer appended after every bloom filter's bit
/// array: `u64 estimated_elements + u64 elements_added + f32
/// false_positive_rate`.
pub const FOOTER_BYTES: usize = 8 + 8 + 4;

/// A capability shared by every bloom-shaped filter (standard and on-disk),
/// so set algebra can operate across the two concrete types the way the
/// reference implementation lets a `BloomFilterOnDisk` appear on either
/// side of a `union`/`intersection`.
pub trait BloomLike {
    fn number_bits(&self) -> u64;
    fn number_hashes(&self) -> u32;
    fn hash_function(&self) -> HashFunction;
    fn get_bit(&self, idx: u64) -> bool;
}

/// Two bloom filters are compatible for set algebra iff they share
/// `(m, k)` and produce identical hashes for a canary key.
#[must_use]
pub fn is_compatible(a: &dyn BloomLike, b: &dyn BloomLike) -> bool {
    a.number_bits() == b.number_bits()
        && a.number_hashes() == b.number_hashes()
        && (a.hash_function())(b"test", a.number_hashes() as usize)
            == (b.hash_function())(b"test", b.number_hashes() as usize)
}

/// A standard, in-memory bloom filter.
///
/// Supports insertion, membership testing, population estimation, set
/// algebra (union/intersection/Jaccard), and byte/hex/file persistence that
/// round-trips bit-for-bit with the reference C layout.
#[derive(Debug, Clone)]
pub struct BloomFilter {
    estimated_elements: u64,
    false_positive_rate: f32,
    number_hashes: u32,
    number_bits: u64,
    bits: BitStore,
    elements_added: u64,
    hash_func: HashFunction,
}

impl PartialEq for BloomFilter {
    fn eq(&self, other: &Self) -> bool {
        self.estimated_elements == other.estimated_elements
            && self.false_positive_rate == other.false_positive_rate
            && self.number_hashes == other.number_hashes
            && self.number_bits == other.number_bits
            && self.elements_added == other.elements_added
            && self.bits == other.bits
    }
}

impl BloomFilter {
    /// Creates a filter sized for `estimated_elements` items at
    /// `false_positive_rate`, using the default chained FNV-1a hash.
    ///
    /// # Errors
    /// Returns [`ProbablesError::Initialization`] if `estimated_elements ==
    /// 0` or `false_positive_rate` is not in `(0, 1)`.
    pub fn new(estimated_elements: u64, false_positive_rate: f32) -> ProbablesResult<Self> {
        Self::with_hash_function(estimated_elements, false_positive_rate, default_fnv1a)
    }

    /// Like [`Self::new`], but with a caller-supplied hash function.
    ///
    /// The caller is responsible for supplying the *same* function when
    /// reloading a persisted filter — only a reference to the function is
    /// kept, not an identity token.
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
        if number_hashes == 0 {
            return Err(ProbablesError::Initialization(
                "derived number_hashes is 0".into(),
            ));
        }

        Ok(Self {
            estimated_elements,
            false_positive_rate,
            number_hashes,
            number_bits,
            bits: BitStore::new(number_bits),
            elements_added: 0,
            hash_func,
        })
    }

    #[must_use]
    pub fn estimated_elements(&self) -> u64 {
        self.estimated_elements
    }

    #[must_use]
    pub fn false_positive_rate(&self) -> f32 {
        self.false_positive_rate
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
    pub fn bloom_length(&self) -> u64 {
        bloom_length_bytes(self.number_bits)
    }

    #[must_use]
    pub fn elements_added(&self) -> u64 {
        self.elements_added
    }

    #[must_use]
    pub fn hash_function(&self) -> HashFunction {
        self.hash_func
    }

    /// The hash vector for `key`, using `depth` hashes (defaults to
    /// `number_hashes`).
    #[must_use]
    pub fn hashes(&self, key: &[u8], depth: Option<usize>) -> Vec<u64> {
        (self.hash_func)(key, depth.unwrap_or(self.number_hashes as usize))
    }

    pub fn add(&mut self, key: &[u8]) {
        let hashes = self.hashes(key, None);
        self.add_alt(&hashes);
    }

    pub fn add_alt(&mut self, hashes: &[u64]) {
        for &h in hashes {
            self.bits.set(h % self.number_bits);
        }
        self.elements_added += 1;
    }

    #[must_use]
    pub fn check(&self, key: &[u8]) -> bool {
        self.check_alt(&self.hashes(key, None))
    }

    #[must_use]
    pub fn check_alt(&self, hashes: &[u64]) -> bool {
        hashes.iter().all(|&h| self.bits.test(h % self.number_bits))
    }

    /// Estimates the number of distinct elements inserted, from the
    /// fraction of bits set. Returns `-1` when every bit is set (the
    /// estimator is undefined at full saturation).
    #[must_use]
    pub fn estimate_elements(&self) -> i64 {
        let popcount = self.bits.popcount();
        if popcount == self.number_bits {
            return -1;
        }
        let m = self.number_bits as f64;
        let k = self.number_hashes as f64;
        let ratio = 1.0 - (popcount as f64 / m);
        (-(m / k) * ratio.ln()).floor() as i64
    }

    /// The false positive rate implied by the number of elements actually
    /// added so far (as opposed to `false_positive_rate`, the design
    /// target).
    #[must_use]
    pub fn current_false_positive_rate(&self) -> f64 {
        let k = f64::from(self.number_hashes);
        let exp = (-k * self.elements_added as f64 / self.number_bits as f64).exp();
        (1.0 - exp).powf(k)
    }

    pub fn clear(&mut self) {
        self.bits.clear_all();
        self.elements_added = 0;
    }

    #[must_use]
    pub fn is_compatible_with(&self, other: &dyn BloomLike) -> bool {
        is_compatible(self, other)
    }

    /// Bitwise-OR of `self` and `other` into a freshly constructed filter.
    /// `other` may be any [`BloomLike`] (e.g. an on-disk bloom filter).
    pub fn union(&self, other: &dyn BloomLike) -> ProbablesResult<Self> {
        self.combine(other, |a, b| a || b)
    }

    /// Bitwise-AND of `self` and `other` into a freshly constructed filter.
    pub fn intersection(&self, other: &dyn BloomLike) -> ProbablesResult<Self> {
        self.combine(other, |a, b| a && b)
    }

    fn combine(&self, other: &dyn BloomLike, op: fn(bool, bool) -> bool) -> ProbablesResult<Self> {
        if !self.is_compatible_with(other) {
            return Err(ProbablesError::Initialization(
                "bloom filters are not compatible (mismatched m/k/hash)".into(),
            ));
        }
        let mut result = Self::with_hash_function(
            self.estimated_elements,
            self.false_positive_rate,
            self.hash_func,
        )?;
        for i in 0..self.number_bits {
            if op(self.bits.test(i), other.get_bit(i)) {
                result.bits.set(i);
            }
        }
        result.elements_added = result.estimate_elements().max(0) as u64;
        Ok(result)
    }

    /// Jaccard index between `self` and `other`:
    /// `popcount(A & B) / popcount(A | B)`. `Ok(1.0)` if the union is empty,
    /// `Ok(None)` is never returned for compatible filters — incompatible
    /// filters yield `Err`, matching spec's "null on incompatibility"
    /// contract expressed as a typed error instead of a sentinel `None`.
    pub fn jaccard_index(&self, other: &dyn BloomLike) -> ProbablesResult<f64> {
        if !self.is_compatible_with(other) {
            return Err(ProbablesError::Initialization(
                "bloom filters are not compatible (mismatched m/k/hash)".into(),
            ));
        }
        let mut both = 0u64;
        let mut either = 0u64;
        for i in 0..self.number_bits {
            let a = self.bits.test(i);
            let b = other.get_bit(i);
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

    /// Serializes to bytes: the packed bit array followed by the
    /// native-endian footer.
    #[must_use]
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.bloom_length() as usize + FOOTER_BYTES);
        out.extend_from_slice(self.bits.bytes());
        out.write_u64::<NativeEndian>(self.estimated_elements).unwrap();
        out.write_u64::<NativeEndian>(self.elements_added).unwrap();
        out.write_f32::<NativeEndian>(self.false_positive_rate).unwrap();
        out
    }

    /// Deserializes a filter previously produced by [`Self::to_bytes`].
    pub fn from_bytes(bytes: &[u8]) -> ProbablesResult<Self> {
        Self::from_bytes_with_hash(bytes, default_fnv1a)
    }

    pub fn from_bytes_with_hash(bytes: &[u8], hash_func: HashFunction) -> ProbablesResult<Self> {
        if bytes.len() < FOOTER_BYTES {
            return Err(ProbablesError::Initialization(
                "buffer too short for bloom footer".into(),
            ));
        }
        let split = bytes.len() - FOOTER_BYTES;
        let (body, footer) = bytes.split_at(split);
        let mut cursor = Cursor::new(footer);
        let estimated_elements = cursor.read_u64::<NativeEndian>()?;
        let elements_added = cursor.read_u64::<NativeEndian>()?;
        let false_positive_rate = cursor.read_f32::<NativeEndian>()?;

        let mut filter = Self::with_hash_function(estimated_elements, false_positive_rate, hash_func)?;
        if body.len() as u64 != filter.bloom_length() {
            return Err(ProbablesError::Initialization(
                "body length does not match derived bloom_length".into(),
            ));
        }
        filter.bits = BitStore::from_bytes(body.to_vec(), filter.number_bits);
        filter.elements_added = elements_added;
        Ok(filter)
    }

    /// Exports the footer repacked big-endian, concatenated after the hex
    /// body, so the footer is recoverable as the trailing `2 *
    /// FOOTER_BYTES` hex characters.
    #[must_use]
    pub fn export_hex(&self) -> String {
        let mut footer = Vec::with_capacity(FOOTER_BYTES);
        footer.write_u64::<BigEndian>(self.estimated_elements).unwrap();
        footer.write_u64::<BigEndian>(self.elements_added).unwrap();
        footer.write_f32::<BigEndian>(self.false_positive_rate).unwrap();
        format!("{}{}", to_hex(self.bits.bytes()), to_hex(&footer))
    }

    pub fn from_hex(hex_string: &str) -> ProbablesResult<Self> {
        Self::from_hex_with_hash(hex_string, default_fnv1a)
    }

    pub fn from_hex_with_hash(hex_string: &str, hash_func: HashFunction) -> ProbablesResult<Self> {
        if !is_hex_string(hex_string) {
            return Err(ProbablesError::Initialization("not a valid hex string".into()));
        }
        let footer_hex_chars = FOOTER_BYTES * 2;
        if hex_string.len() < footer_hex_chars {
            return Err(ProbablesError::Initialization("hex string too short".into()));
        }
        let split = hex_string.len() - footer_hex_chars;
        let footer_bytes = from_hex(&hex_string[split..])?;
        let body_bytes = from_hex(&hex_string[..split])?;

        let mut cursor = Cursor::new(footer_bytes);
        let estimated_elements = cursor.read_u64::<BigEndian>()?;
        let elements_added = cursor.read_u64::<BigEndian>()?;
        let false_positive_rate = cursor.read_f32::<BigEndian>()?;

        let mut filter = Self::with_hash_function(estimated_elements, false_positive_rate, hash_func)?;
        if body_bytes.len() as u64 != filter.bloom_length() {
            return Err(ProbablesError::Initialization(
                "body length does not match derived bloom_length".into(),
            ));
        }
        filter.bits = BitStore::from_bytes(body_bytes, filter.number_bits);
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

    /// Renders a C header declaring this filter's parameters and raw bytes,
    /// matching the layout the reference C library's `export` produces.
    #[must_use]
    pub fn to_c_header(&self, name: &str) -> String {
        let mut out = String::new();
        out.push_str("/* standard BloomFilter */\n");
        out.push_str(&format!("const unsigned long long {name}_estimated_elements = {}ULL;\n", self.estimated_elements));
        out.push_str(&format!("const unsigned long long {name}_elements_added = {}ULL;\n", self.elements_added));
        out.push_str(&format!("const float {name}_false_positive_rate = {}f;\n", self.false_positive_rate));
        out.push_str(&format!("const unsigned long long {name}_number_bits = {}ULL;\n", self.number_bits));
        out.push_str(&format!("const unsigned int {name}_number_hashes = {};\n", self.number_hashes));
        out.push_str(&format!(
            "const unsigned char {name}_bloom[] = {{{}}};\n",
            self.bits
                .bytes()
                .iter()
                .map(|b| format!("0x{b:02x}"))
                .collect::<Vec<_>>()
                .join(", ")
        ));
        out
    }
}

impl BloomLike for BloomFilter {
    fn number_bits(&self) -> u64 {
        self.number_bits
    }
    fn number_hashes(&self) -> u32 {
        self.number_hashes
    }
    fn hash_function(&self) -> HashFunction {
        self.hash_func
    }
    fn get_bit(&self, idx: u64) -> bool {
        self.bits.test(idx)
    }
}

