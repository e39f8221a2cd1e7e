//! Session semantics against a real device directory
#![allow(clippy::expect_used, clippy::unwrap_used)]

use std::io::{Read, Write};

use iffclip_storage::{ClipboardDevice, StorageConfig, StorageError, Unit};
use pretty_assertions::assert_eq;
use tempfile::TempDir;

fn device() -> (TempDir, ClipboardDevice) {
    let dir = tempfile::tempdir().expect("tempdir");
    let device = ClipboardDevice::open(StorageConfig::new(dir.path())).expect("device");
    (dir, device)
}

fn store(device: &ClipboardDevice, unit: Unit, data: &[u8]) {
    let mut session = device.open_write(unit).unwrap();
    session.write_all(data).unwrap();
    session.commit().unwrap();
    session.close();
}

fn load(device: &ClipboardDevice, unit: Unit) -> Vec<u8> {
    let mut session = device.open_read(unit).unwrap();
    let mut data = Vec::new();
    session.read_to_end(&mut data).unwrap();
    assert_eq!(session.close().unwrap(), 0);
    data
}

#[test]
fn committed_content_is_visible() {
    let (_dir, device) = device();
    store(&device, Unit::new(3), b"first generation");
    assert_eq!(load(&device, Unit::new(3)), b"first generation");
    assert!(load(&device, Unit::new(4)).is_empty());
}

#[test]
fn uncommitted_write_leaves_prior_content() {
    let (_dir, device) = device();
    let unit = Unit::PRIMARY;
    store(&device, unit, b"old content");

    let mut session = device.open_write(unit).unwrap();
    let temp = device.temp_path(unit, session.generation());
    session
        .write_all(b"new content that is never committed")
        .unwrap();
    assert!(temp.exists());
    session.close();

    assert!(!temp.exists());
    assert_eq!(load(&device, unit), b"old content");
}

#[test]
fn uncommitted_write_on_empty_unit_stays_empty() {
    let (_dir, device) = device();
    let mut session = device.open_write(Unit::new(9)).unwrap();
    session.write_all(b"abandoned").unwrap();
    drop(session);
    assert!(load(&device, Unit::new(9)).is_empty());
    assert!(!device.content_path(Unit::new(9)).exists());
}

#[test]
fn commit_replaces_rather_than_merges() {
    let (_dir, device) = device();
    let unit = Unit::new(1);
    store(&device, unit, b"a much longer first payload");
    store(&device, unit, b"short");
    assert_eq!(load(&device, unit), b"short");
}

#[test]
fn empty_commit_clears_unit() {
    let (_dir, device) = device();
    let unit = Unit::new(2);
    store(&device, unit, b"something");
    let mut session = device.open_write(unit).unwrap();
    session.commit().unwrap();
    session.close();
    assert!(!device.content_path(unit).exists());
    assert!(load(&device, unit).is_empty());
}

#[test]
fn double_commit_is_rejected() {
    let (_dir, device) = device();
    let mut session = device.open_write(Unit::new(5)).unwrap();
    session.write_chunk(b"x").unwrap();
    session.commit().unwrap();
    assert!(matches!(
        session.commit(),
        Err(StorageError::AlreadyCommitted(_))
    ));
    assert!(matches!(
        session.write_chunk(b"y"),
        Err(StorageError::AlreadyCommitted(_))
    ));
}

#[test]
fn writes_are_accepted_in_bounded_pieces() {
    let dir = tempfile::tempdir().expect("tempdir");
    let device =
        ClipboardDevice::open(StorageConfig::new(dir.path()).with_max_write_chunk(4)).unwrap();
    let mut session = device.open_write(Unit::new(7)).unwrap();
    assert_eq!(session.write_chunk(b"0123456789").unwrap(), 4);
    assert_eq!(session.written(), 4);
    session.write_all(b"456789").unwrap();
    assert_eq!(session.written(), 10);
    session.commit().unwrap();
    session.close();
    assert_eq!(load(&device, Unit::new(7)), b"0123456789");
}

#[test]
fn reads_shrink_to_a_zero_length_end() {
    let dir = tempfile::tempdir().expect("tempdir");
    let device =
        ClipboardDevice::open(StorageConfig::new(dir.path()).with_read_buffer_size(4)).unwrap();
    store(&device, Unit::new(8), b"abcdefghij");

    let mut session = device.open_read(Unit::new(8)).unwrap();
    assert_eq!(session.len(), 10);
    let mut sizes = Vec::new();
    loop {
        let chunk = session.read_chunk(100).unwrap();
        sizes.push((chunk.data.len(), chunk.is_final));
        assert!(session.cursor() <= session.len());
        if chunk.data.is_empty() {
            break;
        }
    }
    assert_eq!(sizes, vec![(4, false), (4, false), (2, true), (0, true)]);
    assert_eq!(session.cursor(), 10);
    assert_eq!(session.close().unwrap(), 0);
}

#[test]
fn zero_length_read_is_rejected() {
    let (_dir, device) = device();
    store(&device, Unit::new(11), b"pending");

    let mut session = device.open_read(Unit::new(11)).unwrap();
    match session.read_chunk(0) {
        Err(StorageError::ReadFailed { source, .. }) => {
            assert_eq!(source.kind(), std::io::ErrorKind::InvalidInput);
        }
        other => panic!("expected ReadFailed, got {other:?}"),
    }
    assert_eq!(session.cursor(), 0);
    assert_eq!(session.read_chunk(100).unwrap().data, b"pending");
    assert_eq!(session.close().unwrap(), 0);
}

#[test]
fn undrained_reader_does_not_wedge_unit() {
    let (_dir, device) = device();
    let unit = Unit::new(10);
    let payload = vec![0x5a; 1000];
    store(&device, unit, &payload);

    let session = device.open_read(unit).unwrap();
    assert_eq!(session.close().unwrap(), 1000);

    // implicit drain on drop
    let mut session = device.open_read(unit).unwrap();
    let first = session.read_chunk(10).unwrap();
    assert_eq!(first.data.len(), 10);
    drop(session);

    assert_eq!(load(&device, unit), payload);
    store(&device, unit, b"next");
    assert_eq!(load(&device, unit), b"next");
}

#[test]
fn units_are_independent() {
    let (_dir, device) = device();
    let _held = device.open_read(Unit::new(20)).unwrap();
    store(&device, Unit::new(21), b"other unit");
    assert!(matches!(
        device.open_write(Unit::new(20)),
        Err(StorageError::UnitUnavailable { .. })
    ));
    assert_eq!(load(&device, Unit::new(21)), b"other unit");
}
