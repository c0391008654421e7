//! Property tests: no input makes the parser panic.
//!
//! Tests verify:
//! - Arbitrary bytes, with and without a JPEG start marker
//! - Random mutations and truncations of a valid file
//! - Random directory entries inside a well-formed container

use proptest::prelude::*;

use exif_probe::{extract_metadata, try_extract_metadata};

use super::test_utils::{camera_exif, ByteOrderType, ExifBuilder, Value};

fn camera_jpeg() -> Vec<u8> {
    camera_exif(ByteOrderType::LittleEndian).build_jpeg()
}

proptest! {
    #[test]
    fn random_bytes_never_panic(bytes in proptest::collection::vec(any::<u8>(), 0..512)) {
        let _ = extract_metadata(&bytes);
    }

    #[test]
    fn random_bytes_after_soi_never_panic(tail in proptest::collection::vec(any::<u8>(), 0..512)) {
        let mut bytes = vec![0xFF, 0xD8, 0xFF, 0xE1];
        bytes.extend(tail);
        let _ = extract_metadata(&bytes);
    }

    #[test]
    fn mutated_file_never_panics(
        mutations in proptest::collection::vec((any::<prop::sample::Index>(), any::<u8>()), 1..16)
    ) {
        let mut bytes = camera_jpeg();
        for (index, value) in mutations {
            let i = index.index(bytes.len());
            bytes[i] = value;
        }
        let _ = extract_metadata(&bytes);
    }

    #[test]
    fn truncated_file_never_panics(cut in any::<prop::sample::Index>()) {
        let bytes = camera_jpeg();
        let len = cut.index(bytes.len());
        let _ = extract_metadata(&bytes[..len]);
    }

    #[test]
    fn random_entries_never_panic(
        entries in proptest::collection::vec(
            (
                prop::sample::select(vec![0x010Fu16, 0x0110, 0x0132, 0x829A, 0x829D, 0x8769, 0x8827, 0x9003, 0x9204, 0x920A, 0xA434]),
                0u16..16,
                any::<u32>(),
                proptest::collection::vec(any::<u8>(), 0..32),
            ),
            0..12,
        ),
        big_endian in any::<bool>(),
    ) {
        let order = if big_endian { ByteOrderType::BigEndian } else { ByteOrderType::LittleEndian };
        let builder = entries.into_iter().fold(
            ExifBuilder::new(order),
            |builder, (tag, field_type, count, bytes)| {
                builder.entry(tag, Value::Raw { field_type, count, bytes })
            },
        );
        let jpeg = builder.build_jpeg();

        // A well-formed container with a valid header always yields a record
        prop_assert!(try_extract_metadata(&jpeg).is_ok());
    }

    #[test]
    fn parsing_is_deterministic(
        mutations in proptest::collection::vec((any::<prop::sample::Index>(), any::<u8>()), 0..8)
    ) {
        let mut bytes = camera_jpeg();
        for (index, value) in mutations {
            let i = index.index(bytes.len());
            bytes[i] = value;
        }
        prop_assert_eq!(extract_metadata(&bytes), extract_metadata(&bytes));
    }
}
