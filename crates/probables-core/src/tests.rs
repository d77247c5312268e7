use crate::bitstore::BitStore;
use crate::codec::{from_hex, is_hex_string, to_hex};
use crate::hash::{default_fnv1a, fnv1a_64, FNV_OFFSET_BASIS};
use crate::params::{bloom_length_bytes, bloom_params, sketch_params_from_rate, sketch_rate_from_params};

// -------------------- bitstore --------------------

#[test]
fn set_and_test_round_trip() {
    let mut store = BitStore::new(20);
    assert!(!store.test(5));
    store.set(5);
    assert!(store.test(5));
    assert_eq!(store.popcount(), 1);
}

#[test]
fn clear_zeroes_everything() {
    let mut store = BitStore::new(16);
    store.set(0);
    store.set(15);
    store.clear_all();
    assert_eq!(store.popcount(), 0);
}

#[test]
fn clear_single_bit() {
    let mut store = BitStore::new(16);
    store.set(3);
    store.set(7);
    store.clear(3);
    assert!(!store.test(3));
    assert!(store.test(7));
}

#[test]
fn union_and_intersect() {
    let mut a = BitStore::new(8);
    let mut b = BitStore::new(8);
    a.set(0);
    b.set(1);
    let mut u = a.clone();
    u.union_with(&b);
    assert!(u.test(0) && u.test(1));

    let mut i = a.clone();
    i.intersect_with(&b);
    assert_eq!(i.popcount(), 0);
}

// -------------------- codec --------------------

#[test]
fn hex_round_trips() {
    let bytes = vec![0xDE, 0xAD, 0xBE, 0xEF];
    let hex = to_hex(&bytes);
    assert_eq!(hex, "deadbeef");
    assert_eq!(from_hex(&hex).unwrap(), bytes);
}

#[test]
fn hex_decode_accepts_mixed_case() {
    assert_eq!(from_hex("DeAdBeEf").unwrap(), vec![0xDE, 0xAD, 0xBE, 0xEF]);
}

#[test]
fn is_hex_string_rejects_empty_and_non_hex() {
    assert!(!is_hex_string(""));
    assert!(!is_hex_string("zz"));
    assert!(is_hex_string("abc123"));
}

// -------------------- hash --------------------

#[test]
fn fnv1a_matches_known_vector() {
    // fnv-1a 64 of the empty string is the offset basis itself.
    assert_eq!(fnv1a_64(b""), FNV_OFFSET_BASIS);
}

#[test]
fn fnv1a_matches_reference_offset_basis() {
    // spec.md pins this to the reference implementation's non-standard
    // basis (14695981039346656073), not the textbook FNV-1a-64 constant.
    assert_eq!(FNV_OFFSET_BASIS, 14_695_981_039_346_656_073);
}

#[test]
fn chained_hash_is_deterministic() {
    let a = default_fnv1a(b"this is a test", 4);
    let b = default_fnv1a(b"this is a test", 4);
    assert_eq!(a, b);
    assert_eq!(a.len(), 4);
}

#[test]
fn chained_hash_rehashes_hex_of_prior_value() {
    let hashes = default_fnv1a(b"test", 2);
    let expected_second = fnv1a_64(format!("{:x}", hashes[0]).as_bytes());
    assert_eq!(hashes[1], expected_second);
}

#[test]
fn depth_zero_yields_empty_vector() {
    assert!(default_fnv1a(b"key", 0).is_empty());
}

// -------------------- params --------------------

#[test]
fn s1_small_bloom() {
    let (m, k) = bloom_params(10, 0.05);
    assert_eq!(m, 63);
    assert_eq!(k, 4);
    assert_eq!(bloom_length_bytes(m), 8);
}

#[test]
fn s2_large_bloom() {
    let (m, _k) = bloom_params(16_000_000, 0.001);
    assert_eq!(m, 230_041_400);
    assert_eq!(bloom_length_bytes(m), 28_755_175);
}

#[test]
fn sketch_params_round_trip_is_consistent() {
    let (w, d) = sketch_params_from_rate(0.002, 1.0 - 1.0 / 32.0);
    assert_eq!(w, 1000);
    assert_eq!(d, 5);
    let (err, conf) = sketch_rate_from_params(w, d);
    assert!((err - 0.002).abs() < 1e-9);
    assert!((conf - (1.0 - 1.0 / 32.0)).abs() < 1e-9);
}
