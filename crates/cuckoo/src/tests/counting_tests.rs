use crate::counting::CountingCuckooFilter;

#[test]
fn repeated_add_increments_counter_not_slot_count() {
    let mut ccf = CountingCuckooFilter::new(100, 2, 100, false).unwrap();
    ccf.add(b"x").unwrap();
    ccf.add(b"x").unwrap();
    ccf.add(b"x").unwrap();
    assert_eq!(ccf.check(b"x"), 3);
    assert_eq!(ccf.unique_elements(), 1);
    assert_eq!(ccf.inserted_elements(), 3);
}

#[test]
fn remove_decrements_then_deletes_at_zero() {
    let mut ccf = CountingCuckooFilter::new(100, 2, 100, false).unwrap();
    ccf.add(b"x").unwrap();
    ccf.add(b"x").unwrap();
    assert!(ccf.remove(b"x"));
    assert_eq!(ccf.check(b"x"), 1);
    assert!(ccf.remove(b"x"));
    assert_eq!(ccf.check(b"x"), 0);
    assert_eq!(ccf.unique_elements(), 0);
}
