//! Property-based tests for the chunk walker, CRC checks and reconstruction.

use png_chunk_io::{
    parse, parse_with, reconstruct, test_utils::*, walk, ErrorKind, ParseOptions, RetainSet,
};
use proptest::prelude::*;

/// Tags for ancillary chunks the parser keeps opaque
fn ancillary_tag() -> impl Strategy<Value = [u8; 4]> {
    (
        b'a'..=b'z',
        prop::sample::select(vec![b'A', b'b', b'X']),
        b'A'..=b'Z',
        b'a'..=b'z',
    )
        .prop_map(|(a, b, c, d)| [a, b, c, d])
}

fn stream_strategy() -> impl Strategy<Value = Vec<u8>> {
    (
        prop::collection::vec(prop::collection::vec(any::<u8>(), 0..64), 1..5),
        prop::collection::vec((ancillary_tag(), prop::collection::vec(any::<u8>(), 0..32)), 0..4),
    )
        .prop_map(|(idats, extras)| {
            let mut b = PngBuilder::new().ihdr(8, 8, 8, 2);
            for (tag, payload) in &extras {
                b = b.chunk(tag, payload);
            }
            for idat in &idats {
                b = b.idat(idat);
            }
            b.iend().build()
        })
}

// =============================================================================
// Walker
// =============================================================================

proptest! {
    /// Chunk sizes account for every byte after the signature
    #[test]
    fn walker_consumes_exactly(data in stream_strategy()) {
        let chunks = walk(&data).unwrap();
        let total: u64 = chunks.iter().map(|c| c.wire_size()).sum();
        prop_assert_eq!(total, data.len() as u64 - 8);
    }

    /// Any extra bytes after the terminator are rejected
    #[test]
    fn walker_rejects_trailing(data in stream_strategy(), extra in prop::collection::vec(any::<u8>(), 1..32)) {
        let mut data = data;
        data.extend_from_slice(&extra);
        let err = parse(&data).unwrap_err();
        prop_assert_eq!(err.kind(), Some(ErrorKind::TrailingBytes));
    }

    /// Image data fragments come back in order, whatever they contain
    #[test]
    fn image_data_order_preserved(idats in prop::collection::vec(prop::collection::vec(any::<u8>(), 0..48), 1..6)) {
        let mut b = PngBuilder::new().ihdr(1, 1, 8, 0);
        for idat in &idats {
            b = b.idat(idat);
        }
        let data = b.iend().build();
        let store = parse(&data).unwrap();
        let got: Vec<Vec<u8>> = store.image_data().iter().map(|c| c.data.clone()).collect();
        prop_assert_eq!(got, idats);
    }
}

// =============================================================================
// CRC
// =============================================================================

proptest! {
    /// Flipping any bit of an IDAT payload is caught in strict mode
    #[test]
    fn payload_mutation_detected(payload in prop::collection::vec(any::<u8>(), 1..64), idx in any::<prop::sample::Index>(), bit in 0u8..8) {
        let mut data = PngBuilder::new().ihdr(1, 1, 8, 0).idat(&payload).iend().build();
        let pos = 33 + 8 + idx.index(payload.len());
        data[pos] ^= 1 << bit;

        let err = parse(&data).unwrap_err();
        prop_assert_eq!(err.kind(), Some(ErrorKind::ChecksumMismatch));
        prop_assert_eq!(err.as_format().unwrap().offset(), 33);

        let store = parse_with(&data, ParseOptions::new().lenient()).unwrap();
        prop_assert!(store.image_data().is_empty());
        prop_assert_eq!(store.issues().len(), 1);
    }
}

// =============================================================================
// Palette
// =============================================================================

proptest! {
    /// Palette lengths that aren't a multiple of 3 are malformed
    #[test]
    fn palette_length_not_multiple_of_three(len in 1usize..300) {
        prop_assume!(len % 3 != 0);
        let data = PngBuilder::new()
            .ihdr(1, 1, 8, 3)
            .chunk(b"PLTE", &vec![0u8; len])
            .iend()
            .build();
        let err = parse(&data).unwrap_err();
        prop_assert_eq!(err.kind(), Some(ErrorKind::MalformedPalette));
    }
}

// =============================================================================
// Reconstruction
// =============================================================================

proptest! {
    /// Keeping everything reproduces the input
    #[test]
    fn reconstruct_all_is_identity(data in stream_strategy()) {
        let store = parse(&data).unwrap();
        prop_assert_eq!(reconstruct(&data, &store, &RetainSet::all()).unwrap(), data);
    }

    /// A critical-only copy is a fixed point of full reconstruction
    #[test]
    fn reconstruct_critical_fixed_point(data in stream_strategy()) {
        let store = parse(&data).unwrap();
        let critical = reconstruct(&data, &store, &RetainSet::critical()).unwrap();
        let store2 = parse(&critical).unwrap();
        prop_assert!(store2.unknown().is_empty());
        let again = reconstruct(&critical, &store2, &RetainSet::all()).unwrap();
        prop_assert_eq!(again, critical);
    }
}
