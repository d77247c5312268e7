use crate::fingerprint::{alternate_index, derive, truncate_fingerprint};

#[test]
fn fingerprint_is_never_zero() {
    for key in [b"a".as_slice(), b"b", b"c", b"\0\0\0\0"] {
        let (f, _, _) = derive(key, 2, 997);
        assert_ne!(f, 0);
    }
}

#[test]
fn alternate_index_is_its_own_inverse() {
    let (f, idx1, idx2) = derive(b"roundtrip", 2, 997);
    assert_eq!(alternate_index(idx2, f, 997), idx1);
}

#[test]
fn derivation_is_deterministic() {
    let a = derive(b"stable", 2, 997);
    let b = derive(b"stable", 2, 997);
    assert_eq!(a, b);
}

// Takes the most-significant bytes of the minimal (leading-zero-stripped)
// representation, not the least-significant bytes of the full 8-byte hash.
#[test]
fn truncate_takes_most_significant_bytes_of_minimal_representation() {
    // h = 0x0000_00ab_cdef_0102: minimal big-endian form is [ab cd ef 01 02].
    let h: u64 = 0x0000_00ab_cdef_0102;
    assert_eq!(truncate_fingerprint(h, 2), 0xabcd);
    assert_eq!(truncate_fingerprint(h, 1), 0xab);
}

#[test]
fn truncate_left_pads_when_minimal_representation_is_shorter_than_size() {
    // h = 0x0000_0000_0000_00ab: minimal big-endian form is [ab], shorter
    // than the requested 2-byte fingerprint.
    let h: u64 = 0x0000_0000_0000_00ab;
    assert_eq!(truncate_fingerprint(h, 2), 0x00ab);
}

#[test]
fn truncate_never_returns_zero() {
    assert_eq!(truncate_fingerprint(0, 2), 1);
}
