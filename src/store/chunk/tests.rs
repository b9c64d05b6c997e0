mod unit_chunk_reference {

	use crate::store::{ChunkLayout, FileChunkReference, FormatError};

	const LAYOUTS: [ChunkLayout; 3] = [ChunkLayout::FCR32, ChunkLayout::FCR64, ChunkLayout::FCR64X32];

	#[test]
	fn sentinels_are_mutually_exclusive() {
		for layout in LAYOUTS {
			let nil = FileChunkReference::nil(layout);
			let zero = FileChunkReference::zero(layout);
			assert!(nil.is_nil() && !nil.is_zero(), "{layout:?}");
			assert!(zero.is_zero() && !zero.is_nil(), "{layout:?}");
			assert!(!nil.is_populated() && !zero.is_populated());
		}

		let sized_nil = FileChunkReference::from_raw(u64::MAX, 16, ChunkLayout::FCR64X32);
		assert!(!sized_nil.is_nil(), "nil requires size zero");
		assert!(sized_nil.is_populated());
	}

	#[test]
	fn nil_is_all_location_bits_of_the_layout() {
		let bytes = [0xFF, 0xFF, 0xFF, 0xFF, 0, 0, 0, 0];
		let fcr32 = FileChunkReference::decode(&bytes, 0, ChunkLayout::FCR32).expect("fcr32 decodes");
		assert!(fcr32.is_nil());

		let mut wide = vec![0xFF; 4];
		wide.extend_from_slice(&[0; 8]);
		let fcr64x32 = FileChunkReference::decode(&wide, 0, ChunkLayout::FCR64X32).expect("fcr64x32 decodes");
		assert!(!fcr64x32.is_nil(), "upper location bytes are zero");
	}

	#[test]
	fn node_formats_scale_compressed_fields() {
		let layout = ChunkLayout::from_node_formats(2, 3);
		assert_eq!(layout.encoded_len(), 4);

		let bytes = [0x10, 0x00, 0x04, 0x00];
		let fcr = FileChunkReference::decode(&bytes, 0, layout).expect("compressed reference decodes");
		assert_eq!(fcr.raw_location(), 0x10);
		assert_eq!(fcr.location(), 0x80);
		assert_eq!(fcr.size(), 0x20);

		let mut out = Vec::new();
		fcr.encode(&mut out);
		assert_eq!(out, bytes);
	}

	#[test]
	fn uncompressed_node_format_is_eight_plus_four() {
		let layout = ChunkLayout::from_node_formats(0, 0);
		assert_eq!(layout, ChunkLayout::FCR64X32);
		assert_eq!(layout.encoded_len(), 12);
	}

	#[test]
	fn byte_range_rejects_chunks_past_end_of_file() {
		let fcr = FileChunkReference::from_raw(1000, 48, ChunkLayout::FCR64X32);
		assert_eq!(fcr.byte_range("probe", 1048).expect("exact fit is in range"), 1000..1048);

		let err = fcr.byte_range("probe", 1047).expect_err("one byte short");
		assert!(matches!(err, FormatError::ChunkOutOfRange { location: 1000, size: 48, .. }));

		let overflow = FileChunkReference::from_raw(u64::MAX - 1, 8, ChunkLayout::FCR64);
		assert!(overflow.byte_range("probe", usize::MAX).is_err());
	}

	#[test]
	fn decode_past_end_is_eof() {
		let short = FileChunkReference::decode(&[0; 6], 0, ChunkLayout::FCR32);
		assert!(matches!(short, Err(FormatError::UnexpectedEof { at: 4, need: 4, rem: 2 })));

		let outside = FileChunkReference::decode(&[0; 6], 12, ChunkLayout::FCR32);
		assert!(matches!(outside, Err(FormatError::UnexpectedEof { at: 12, .. })));
	}
}
