//! Integration tests exercising handles, mappings and buffers together.

use file_buffer::{
    FileBuffer, FileBufferError, FileMapping, MapMode, PositionalFile, SystemFileBuffer,
    allocation_granularity,
};
use proptest::prelude::*;
use test_support::{TestDir, patterned_bytes};

#[test]
fn mapped_writes_are_visible_to_positional_reads() {
    let dir = TestDir::new().unwrap();
    let handle = PositionalFile::open(dir.join("shared.bin"), false).unwrap();
    let granule = allocation_granularity();

    let mapping = FileMapping::open(&handle, MapMode::ReadWrite, granule * 2).unwrap();
    let mut view = mapping.view(MapMode::ReadWrite, granule, 16).unwrap();
    view.write(0, b"second page data").unwrap();
    view.flush(0, 16).unwrap();

    let mut buf = [0u8; 16];
    assert_eq!(handle.read(granule, &mut buf).unwrap(), Some(16));
    assert_eq!(&buf, b"second page data");
}

#[test]
fn positional_writes_are_visible_through_shared_view() {
    let dir = TestDir::new().unwrap();
    let handle = PositionalFile::open(dir.join("shared.bin"), false).unwrap();
    handle.write(0, &[0u8; 32]).unwrap();

    let mapping = FileMapping::open(&handle, MapMode::ReadOnly, 32).unwrap();
    let view = mapping.view(MapMode::ReadOnly, 0, 32).unwrap();
    handle.write(4, b"live").unwrap();

    assert_eq!(&view.as_slice()[4..8], b"live");
}

#[test]
fn release_order_is_independent() {
    let dir = TestDir::new().unwrap();
    dir.write_file("order.bin", &patterned_bytes(b"xyz", 300)).unwrap();

    let handle = PositionalFile::open(dir.join("order.bin"), true).unwrap();
    let mapping = FileMapping::open(&handle, MapMode::ReadOnly, 300).unwrap();
    let view = mapping.view(MapMode::ReadOnly, 0, 300).unwrap();

    drop(mapping);
    handle.close().unwrap();
    assert_eq!(view.read_byte(297), b'x');
    assert_eq!(view.read_byte(299), b'z');
    drop(view);
}

#[test]
fn failed_mapping_leaves_buffer_usable() {
    let dir = TestDir::new().unwrap();
    let buffer = SystemFileBuffer::open(dir.join("small.bin"), false).unwrap();
    buffer.write(0, b"tiny").unwrap();

    let err = buffer.map(MapMode::ReadOnly, 0, 4096).unwrap_err();
    assert!(matches!(err, FileBufferError::Io { code: Some(_), .. }));
    assert!(buffer.is_open());
    assert_eq!(buffer.read_byte(0).unwrap(), Some(b't'));
}

#[test]
fn buffers_are_usable_as_trait_objects() {
    let dir = TestDir::new().unwrap();
    let file = SystemFileBuffer::open(dir.join("dyn.bin"), false).unwrap();
    file.write(0, b"0123456789").unwrap();
    let mapped = file.map(MapMode::ReadOnly, 2, 6).unwrap();

    let buffers: [&dyn FileBuffer; 2] = [&file, &mapped];
    let sizes: Vec<u64> = buffers.iter().map(|b| b.size().unwrap()).collect();
    assert_eq!(sizes, [10, 6]);
    assert_eq!(buffers[1].read_byte(0).unwrap(), Some(b'2'));
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    /// Bytes written at any position read back intact, and the gap before
    /// them reads as zeros.
    #[test]
    fn positional_round_trip(
        position in 0u64..65_536,
        data in prop::collection::vec(any::<u8>(), 1..512),
    ) {
        let dir = TestDir::new().unwrap();
        let buffer = SystemFileBuffer::open(dir.join("prop.bin"), false).unwrap();

        prop_assert_eq!(buffer.write(position, &data).unwrap(), data.len());
        prop_assert_eq!(buffer.size().unwrap(), position + data.len() as u64);

        let mut back = vec![0u8; data.len()];
        prop_assert_eq!(buffer.read(position, &mut back).unwrap(), Some(data.len()));
        prop_assert_eq!(&back, &data);

        if position > 0 {
            prop_assert_eq!(buffer.read_byte(position - 1).unwrap(), Some(0));
        }
        prop_assert_eq!(buffer.read_byte(position + data.len() as u64).unwrap(), None);
    }

    /// Truncation never grows the file and reads stop at the new end.
    #[test]
    fn truncate_is_shrink_only(initial in 1usize..2048, target in 0u64..4096) {
        let dir = TestDir::new().unwrap();
        let buffer = SystemFileBuffer::open(dir.join("trunc.bin"), false).unwrap();
        buffer.write(0, &patterned_bytes(b"ab", initial)).unwrap();

        buffer.truncate(target).unwrap();
        let expected = target.min(initial as u64);
        prop_assert_eq!(buffer.size().unwrap(), expected);
        prop_assert_eq!(buffer.read_byte(expected).unwrap(), None);
    }
}
