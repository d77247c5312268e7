use crate::standard::BloomFilter;
use crate::BloomLike;

#[test]
fn s1_geometry_and_membership() {
    let bf = BloomFilter::new(10, 0.05).unwrap();
    assert_eq!(bf.number_bits(), 63);
    assert_eq!(bf.number_hashes(), 4);
    assert_eq!(bf.bloom_length(), 8);
}

#[test]
fn add_then_check_is_true() {
    let mut bf = BloomFilter::new(10, 0.05).unwrap();
    bf.add(b"this is a test");
    assert!(bf.check(b"this is a test"));
    assert!(!bf.check(b"this is not a test"));
}

#[test]
fn rejects_invalid_params() {
    assert!(BloomFilter::new(0, 0.05).is_err());
    assert!(BloomFilter::new(10, 0.0).is_err());
    assert!(BloomFilter::new(10, 1.0).is_err());
}

#[test]
fn bytes_round_trip_is_bit_exact() {
    let mut bf = BloomFilter::new(1000, 0.01).unwrap();
    for i in 0..50 {
        bf.add(format!("item-{i}").as_bytes());
    }
    let bytes = bf.to_bytes();
    let restored = BloomFilter::from_bytes(&bytes).unwrap();
    assert_eq!(bf, restored);
    assert_eq!(bytes, restored.to_bytes());
    for i in 0..50 {
        assert!(restored.check(format!("item-{i}").as_bytes()));
    }
}

#[test]
fn hex_round_trip_is_bit_exact() {
    let mut bf = BloomFilter::new(100, 0.02).unwrap();
    bf.add(b"hello");
    let hex = bf.export_hex();
    let restored = BloomFilter::from_hex(&hex).unwrap();
    assert_eq!(bf, restored);
    assert_eq!(hex, restored.export_hex());
}

// spec.md's S1 oracle: the exact hex serialization of a specific fixed
// sequence of insertions, checked bit-for-bit against the reference
// implementation rather than against our own round-trip.
#[test]
fn s1_hex_oracle() {
    let mut bf = BloomFilter::new(10, 0.05).unwrap();
    for i in 0..10 {
        bf.add(format!("this is a test {i}").as_bytes());
    }
    assert_eq!(
        bf.export_hex(),
        "6da491461a6bba4d000000000000000a000000000000000a3d4ccccd"
    );
}

#[test]
fn union_is_commutative_and_idempotent() {
    let mut a = BloomFilter::new(100, 0.02).unwrap();
    let mut b = BloomFilter::new(100, 0.02).unwrap();
    a.add(b"alpha");
    b.add(b"beta");

    let ab = a.union(&b).unwrap();
    let ba = b.union(&a).unwrap();
    assert_eq!(ab, ba);

    let aa = a.union(&a).unwrap();
    for i in 0..a.number_bits() {
        assert_eq!(aa.get_bit(i), a.get_bit(i));
    }

    assert!(ab.check(b"alpha"));
    assert!(ab.check(b"beta"));
}

#[test]
fn intersection_is_commutative_and_idempotent() {
    let mut a = BloomFilter::new(100, 0.02).unwrap();
    let mut b = BloomFilter::new(100, 0.02).unwrap();
    a.add(b"shared");
    b.add(b"shared");

    let ab = a.intersection(&b).unwrap();
    let ba = b.intersection(&a).unwrap();
    assert_eq!(ab, ba);
    assert!(ab.check(b"shared"));

    let aa = a.intersection(&a).unwrap();
    for i in 0..a.number_bits() {
        assert_eq!(aa.get_bit(i), a.get_bit(i));
    }
}

#[test]
fn jaccard_index_self_is_one() {
    let mut a = BloomFilter::new(100, 0.02).unwrap();
    a.add(b"x");
    assert_eq!(a.jaccard_index(&a).unwrap(), 1.0);
}

#[test]
fn jaccard_index_empty_vs_nonempty_is_zero() {
    let empty = BloomFilter::new(100, 0.02).unwrap();
    let mut nonempty = BloomFilter::new(100, 0.02).unwrap();
    nonempty.add(b"x");
    assert_eq!(nonempty.jaccard_index(&empty).unwrap(), 0.0);
}

#[test]
fn incompatible_filters_reject_set_algebra() {
    let a = BloomFilter::new(100, 0.02).unwrap();
    let b = BloomFilter::new(500, 0.02).unwrap();
    assert!(a.union(&b).is_err());
    assert!(a.intersection(&b).is_err());
    assert!(a.jaccard_index(&b).is_err());
}

#[test]
fn estimate_elements_is_within_five_percent() {
    let mut bf = BloomFilter::new(10_000, 0.01).unwrap();
    for i in 0..9_000u32 {
        bf.add(&i.to_le_bytes());
    }
    let est = bf.estimate_elements();
    assert!(est > 0);
    let diff = (est - 9_000).abs() as f64;
    assert!(diff / 9_000.0 <= 0.05, "estimate {est} too far from 9000");
}

#[test]
fn false_positive_rate_bound_holds() {
    let n = 2_000u32;
    let fpr = 0.02f32;
    let mut bf = BloomFilter::new(u64::from(n), fpr).unwrap();
    for i in 0..n {
        bf.add(format!("seen-{i}").as_bytes());
    }
    let mut false_positives = 0u32;
    let trials = 10_000u32;
    for i in 0..trials {
        if bf.check(format!("unseen-{i}").as_bytes()) {
            false_positives += 1;
        }
    }
    let empirical = f64::from(false_positives) / f64::from(trials);
    assert!(empirical <= 2.0 * f64::from(fpr), "empirical fpr {empirical} too high");
}
