// Integration tests built on the test_utils fixture builder

#[cfg(test)]
mod parse_tests {
    use png_chunk_io::{
        parse, parse_with, reconstruct, test_utils::*, ChunkKind, ChunkStatus, ChunkType,
        ColorType, ErrorKind, FormatError, ParseOptions, RetainSet,
    };

    fn minimal() -> Vec<u8> {
        PngBuilder::new()
            .ihdr(1, 1, 8, 0)
            .idat(&[0x78, 0x9c, 0x63, 0x00, 0x00, 0x00, 0x01, 0x00, 0x01])
            .iend()
            .build()
    }

    #[test]
    fn test_end_to_end_minimal() {
        let data = minimal();
        let store = parse(&data).expect("minimal stream should parse");

        let header = store.header().expect("header");
        assert_eq!(header.width, 1);
        assert_eq!(header.height, 1);
        assert_eq!(header.bit_depth, 8);
        assert_eq!(header.color_type, ColorType::Grayscale);
        assert_eq!(store.image_data().len(), 1);

        let out = reconstruct(&data, &store, &RetainSet::critical()).unwrap();
        let header_size = 13 + 12;
        let image_data_size = 9 + 12;
        let terminator_size = 12;
        assert_eq!(out.len(), 8 + header_size + image_data_size + terminator_size);
        assert_eq!(out, data);
    }

    #[test]
    fn test_truncated_stream() {
        let mut data = minimal();
        data.truncate(data.len() - 3);
        let err = parse(&data).unwrap_err();
        assert_eq!(err.kind(), Some(ErrorKind::Truncated));
        // The damaged chunk is the terminator
        assert_eq!(err.as_format().unwrap().offset(), data.len() as u64 - 9);
    }

    #[test]
    fn test_every_truncation_fails_cleanly() {
        let data = minimal();
        for cut in 0..data.len() {
            let err = parse(&data[..cut]).unwrap_err();
            let kind = err.kind().expect("format error");
            assert!(
                matches!(
                    kind,
                    ErrorKind::BadSignature | ErrorKind::Truncated | ErrorKind::TrailingBytes
                ),
                "cut at {cut}: unexpected {kind:?}"
            );
        }
    }

    #[test]
    fn test_image_data_order_with_tag_like_bytes() {
        let p1 = b"first fragment".to_vec();
        let mut p2 = Vec::new();
        p2.extend_from_slice(&[0, 0, 0, 0]);
        p2.extend_from_slice(b"IEND");
        p2.extend_from_slice(&[0xAE, 0x42, 0x60, 0x82]);
        p2.extend_from_slice(b"IHDRPLTE");

        let data = PngBuilder::new()
            .ihdr(2, 2, 8, 2)
            .idat(&p1)
            .idat(&p2)
            .iend()
            .build();
        let store = parse(&data).unwrap();

        let fragments: Vec<&[u8]> = store.image_data().iter().map(|c| c.data.as_slice()).collect();
        assert_eq!(fragments, vec![p1.as_slice(), p2.as_slice()]);
        assert_eq!(store.entries_of(ChunkKind::Terminator).count(), 1);
        assert!(store.terminator().unwrap().offset as usize + 12 == data.len());
    }

    #[test]
    fn test_palette_before_header_regardless_of_crc() {
        for corrupt in [false, true] {
            let mut b = PngBuilder::new().plte(&[[0, 0, 0]]);
            if corrupt {
                b = b.corrupt_crc();
            }
            let data = b.ihdr(1, 1, 8, 3).iend().build();
            let err = parse(&data).unwrap_err();
            assert_eq!(err.kind(), Some(ErrorKind::UnexpectedChunk), "corrupt={corrupt}");
        }
    }

    #[test]
    fn test_palette_image() {
        let data = PngBuilder::new()
            .ihdr(2, 1, 1, 3)
            .gama(45455)
            .plte(&[[255, 0, 0], [0, 0, 255]])
            .idat(b"\x08\xd7")
            .iend()
            .build();
        let store = parse(&data).unwrap();

        let palette = store.palette().unwrap();
        assert_eq!(palette.len(), 2);
        assert_eq!(palette.get(1).map(|e| e.blue), Some(255));
        let gamma = store.gamma().unwrap();
        assert!((gamma.as_f64() - 0.45455).abs() < 1e-9);
    }

    #[test]
    fn test_palette_not_multiple_of_three() {
        let data = PngBuilder::new()
            .ihdr(1, 1, 8, 3)
            .chunk(b"PLTE", &[1, 2, 3, 4, 5])
            .iend()
            .build();
        let err = parse(&data).unwrap_err();
        assert!(matches!(
            err.as_format(),
            Some(FormatError::MalformedPalette { offset: 33, len: 5 })
        ));
    }

    #[test]
    fn test_invalid_header_fields() {
        let zero_width = PngBuilder::new().ihdr(0, 1, 8, 0).iend().build();
        assert_eq!(
            parse(&zero_width).unwrap_err().kind(),
            Some(ErrorKind::InvalidDimensions)
        );

        let rgb_depth_4 = PngBuilder::new().ihdr(1, 1, 4, 2).iend().build();
        assert_eq!(
            parse(&rgb_depth_4).unwrap_err().kind(),
            Some(ErrorKind::InvalidColorDepth)
        );
    }

    #[test]
    fn test_trailing_bytes_after_iend() {
        let mut data = minimal();
        data.extend_from_slice(b"garbage");
        let err = parse(&data).unwrap_err();
        assert!(matches!(
            err.as_format(),
            Some(FormatError::TrailingBytes { count: 7, .. })
        ));
    }

    #[test]
    fn test_lenient_reports_every_issue() {
        let data = PngBuilder::new()
            .ihdr(1, 1, 8, 0)
            .idat(b"a")
            .corrupt_crc()
            .gama(100_000)
            .gama(100_000)
            .idat(b"b")
            .iend()
            .build();
        assert!(parse(&data).is_err());

        let store = parse_with(&data, ParseOptions::new().lenient()).unwrap();
        let kinds: Vec<ErrorKind> = store.issues().iter().map(FormatError::kind).collect();
        assert_eq!(kinds, vec![ErrorKind::ChecksumMismatch, ErrorKind::DuplicateChunk]);
        assert_eq!(store.compressed_image_data(), b"b");

        let statuses: Vec<bool> = store.entries().iter().map(|e| e.status.is_valid()).collect();
        assert_eq!(statuses, vec![true, false, true, false, true, true]);
        assert!(matches!(
            store.entries()[3].status,
            ChunkStatus::Rejected(ErrorKind::DuplicateChunk)
        ));
    }

    #[test]
    fn test_unknown_chunks_preserved_opaque() {
        let data = PngBuilder::new()
            .ihdr(1, 1, 8, 0)
            .chunk(b"tEXt", b"Comment\0hello")
            .chunk(b"prVt", &[1, 2, 3])
            .idat(b"x")
            .iend()
            .build();
        let store = parse(&data).unwrap();

        let unknown = store.unknown();
        assert_eq!(unknown.len(), 2);
        assert_eq!(unknown[0].chunk_type, ChunkType(*b"tEXt"));
        assert_eq!(unknown[0].data, b"Comment\0hello");
        assert_eq!(unknown[1].chunk_type, ChunkType(*b"prVt"));
        assert_eq!(store.notices().len(), 2);

        let all = reconstruct(&data, &store, &RetainSet::all()).unwrap();
        assert_eq!(all, data);
    }

    #[test]
    fn test_reconstruction_fixed_point() {
        let data = PngBuilder::new()
            .ihdr(3, 3, 8, 6)
            .gama(45455)
            .chunk(b"tEXt", b"k\0v")
            .idat(b"one")
            .idat(b"two")
            .iend()
            .build();
        let store = parse(&data).unwrap();
        let critical = reconstruct(&data, &store, &RetainSet::critical()).unwrap();

        let store2 = parse(&critical).unwrap();
        let again = reconstruct(&critical, &store2, &RetainSet::all()).unwrap();
        assert_eq!(again, critical);
    }

    #[test]
    fn test_entry_listing() {
        let data = minimal();
        let store = parse(&data).unwrap();
        let lines: Vec<String> = store.entries().iter().map(|e| e.to_string()).collect();
        assert_eq!(lines[0], "IHDR at 8: 13 bytes, crc 0x3a7e9b55 [ok]");
        assert_eq!(lines[2], "IEND at 54: 0 bytes, crc 0xae426082 [ok]");
    }
}

#[cfg(test)]
mod file_tests {
    use png_chunk_io::{test_utils::*, ParseOptions, PngFile, RetainSet};

    #[test]
    fn test_write_retained_to_disk() {
        let data = PngBuilder::new()
            .ihdr(1, 1, 8, 0)
            .chunk(b"eXIf", b"MM\0*")
            .idat(b"x")
            .iend()
            .build();
        let png = PngFile::from_bytes("camera", data, ParseOptions::default()).unwrap();
        assert_eq!(png.anonymized_file_name(), "camera_anonymized.png");

        let path = std::env::temp_dir().join("png_chunk_io_it_camera_anonymized.png");
        let written = png.write_retained(&path, &RetainSet::critical()).unwrap();
        let reread = PngFile::open(&path).unwrap();
        assert_eq!(written, reread.bytes().len() as u64);
        assert!(reread.store().unknown().is_empty());
        std::fs::remove_file(&path).ok();
    }
}

#[cfg(test)]
mod api_tests {
    use png_chunk_io::{
        decoders, parse, test_utils::*, ChunkRecord, ChunkStore, DecodeContext, MAX_PALETTE_ENTRIES,
    };

    /// A collaborator that only sees the parsed store
    fn describe(store: &ChunkStore) -> (u32, usize) {
        let width = store.header().map_or(0, |h| h.width);
        (width, store.compressed_image_data().len())
    }

    #[test]
    fn test_store_is_a_nameable_value() {
        let data = PngBuilder::new().ihdr(7, 1, 8, 0).idat(b"abcd").iend().build();
        let store: ChunkStore = parse(&data).unwrap();
        assert_eq!(describe(&store), (7, 4));

        let owned = store.clone();
        assert_eq!(owned.entries().len(), store.entries().len());
    }

    #[test]
    fn test_decode_with_explicit_context() {
        let data = PngBuilder::new().ihdr(1, 1, 8, 3).plte(&[[1, 2, 3]]).iend().build();
        let store = parse(&data).unwrap();
        let chunks = png_chunk_io::walk(&data).unwrap();

        let ctx = DecodeContext {
            header: store.header(),
        };
        let record = decoders::decode(&chunks[1], ctx).unwrap();
        assert!(matches!(record, ChunkRecord::Palette(ref p) if p.len() == 1));

        let err = decoders::decode(&chunks[1], DecodeContext::default()).unwrap_err();
        assert_eq!(err.offset(), 33);
    }

    #[test]
    fn test_largest_palette_accepted() {
        let entries = vec![[9u8, 8, 7]; MAX_PALETTE_ENTRIES];
        let data = PngBuilder::new().ihdr(1, 1, 8, 3).plte(&entries).iend().build();
        assert_eq!(parse(&data).unwrap().palette().unwrap().len(), MAX_PALETTE_ENTRIES);

        let too_many = vec![[0u8; 3]; MAX_PALETTE_ENTRIES + 1];
        let data = PngBuilder::new().ihdr(1, 1, 8, 3).plte(&too_many).iend().build();
        assert!(parse(&data).is_err());
    }
}
