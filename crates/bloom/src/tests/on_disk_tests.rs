use crate::on_disk::BloomFilterOnDisk;

#[test]
fn add_then_check_is_true() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bf.bin");
    let mut bf = BloomFilterOnDisk::create(&path, 100, 0.01).unwrap();
    bf.add(b"hello").unwrap();
    assert!(bf.check(b"hello"));
    assert!(!bf.check(b"goodbye"));
}

#[test]
fn footer_tracks_elements_added_across_reload() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bf.bin");
    {
        let mut bf = BloomFilterOnDisk::create(&path, 100, 0.01).unwrap();
        for i in 0..10 {
            bf.add(format!("item-{i}").as_bytes()).unwrap();
        }
        bf.close().unwrap();
    }
    let reloaded = BloomFilterOnDisk::load(&path).unwrap();
    assert_eq!(reloaded.elements_added(), 10);
    assert!(reloaded.check(b"item-0"));
}

#[test]
fn export_to_same_path_is_a_no_op() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bf.bin");
    let mut bf = BloomFilterOnDisk::create(&path, 100, 0.01).unwrap();
    bf.add(b"x").unwrap();
    bf.export(&path).unwrap(); // should not error or truncate
    assert!(bf.check(b"x"));
}

#[test]
fn export_to_new_path_copies_file() {
    let dir = tempfile::tempdir().unwrap();
    let src = dir.path().join("bf.bin");
    let dst = dir.path().join("bf-copy.bin");
    let mut bf = BloomFilterOnDisk::create(&src, 100, 0.01).unwrap();
    bf.add(b"x").unwrap();
    bf.export(&dst).unwrap();
    let copy = BloomFilterOnDisk::load(&dst).unwrap();
    assert!(copy.check(b"x"));
}

#[test]
fn hex_and_bytes_loading_are_rejected() {
    assert!(BloomFilterOnDisk::from_hex("deadbeef").is_err());
    assert!(BloomFilterOnDisk::from_bytes(&[0u8; 4]).is_err());
}

#[test]
fn close_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bf.bin");
    let mut bf = BloomFilterOnDisk::create(&path, 100, 0.01).unwrap();
    bf.close().unwrap();
    bf.close().unwrap();
}
