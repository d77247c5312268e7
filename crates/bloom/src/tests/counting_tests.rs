use crate::counting::CountingBloomFilter;

#[test]
fn add_check_remove_round_trip() {
    let mut cbf = CountingBloomFilter::new(100, 0.01).unwrap();
    cbf.add(b"a", 1);
    cbf.add(b"a", 1);
    assert_eq!(cbf.check(b"a"), 2);
    assert_eq!(cbf.remove(b"a", 1), 1);
    assert_eq!(cbf.check(b"a"), 1);
    assert_eq!(cbf.remove(b"a", 1), 0);
    assert_eq!(cbf.check(b"a"), 0);
}

#[test]
fn remove_of_absent_key_saturates_at_zero() {
    let mut cbf = CountingBloomFilter::new(100, 0.01).unwrap();
    assert_eq!(cbf.remove(b"never-added", 1), 0);
    assert_eq!(cbf.check(b"never-added"), 0);
}

#[test]
fn bytes_round_trip_is_bit_exact() {
    let mut cbf = CountingBloomFilter::new(200, 0.02).unwrap();
    for i in 0..20 {
        cbf.add(format!("x{i}").as_bytes(), 1);
    }
    let bytes = cbf.to_bytes();
    let restored = CountingBloomFilter::from_bytes(&bytes).unwrap();
    assert_eq!(cbf, restored);
}

#[test]
fn union_and_intersection() {
    let mut a = CountingBloomFilter::new(100, 0.02).unwrap();
    let mut b = CountingBloomFilter::new(100, 0.02).unwrap();
    a.add(b"shared", 1);
    a.add(b"only-a", 1);
    b.add(b"shared", 1);
    b.add(b"only-b", 1);

    let u = a.union(&b).unwrap();
    assert!(u.check(b"shared") > 0 && u.check(b"only-a") > 0 && u.check(b"only-b") > 0);

    let i = a.intersection(&b).unwrap();
    assert!(i.check(b"shared") > 0);
    assert_eq!(i.check(b"only-a"), 0);
    assert_eq!(i.check(b"only-b"), 0);
}

#[test]
fn jaccard_index_self_is_one() {
    let mut a = CountingBloomFilter::new(100, 0.02).unwrap();
    a.add(b"x", 1);
    assert_eq!(a.jaccard_index(&a).unwrap(), 1.0);
}

// spec.md's S3 oracle: a fixed add sequence whose serialized bytes must
// hash, byte-for-byte, to a specific MD5 digest from the reference
// implementation.
#[test]
fn s3_md5_oracle() {
    let mut cbf = CountingBloomFilter::new(10, 0.01).unwrap();
    cbf.add(b"test", 1);
    cbf.add(b"out", 1);
    cbf.add(b"the", 1);
    cbf.add(b"counting", 1);
    cbf.add(b"bloom", 1);
    cbf.add(b"filter", 1);
    cbf.add(b"test", 1);
    cbf.add(b"Test", 1);
    cbf.add(b"out", 1);
    cbf.add(b"test", 1);

    let digest = md5::compute(cbf.to_bytes());
    assert_eq!(format!("{digest:x}"), "0b83c837da30e25f768f0527c039d341");
}
