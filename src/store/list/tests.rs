mod unit_file_node_list {

	use onestore_testkit::{self as kit, Flavor, FragmentSpec, StoreBuilder};

	use crate::store::{
		ChunkLayout, DecodeOptions, Diagnostics, FileChunkReference, FileNodeListReader, FileProfile, FormatError, IterState, NodeCounts, Rule,
	};

	fn fcr(chunk: kit::Chunk) -> FileChunkReference {
		FileChunkReference::from_raw(chunk.location, u64::from(chunk.size), ChunkLayout::FCR64X32)
	}

	fn marker(n: u32) -> Vec<u8> {
		kit::revision_manifest_list_start(kit::ExGuid::new(uuid::Uuid::from_u128(0xABCD), n), n)
	}

	fn finish(b: StoreBuilder, start: kit::Chunk) -> Vec<u8> {
		b.finish(start, "list.one")
	}

	fn read(bytes: &[u8], start: kit::Chunk, options: &DecodeOptions) -> (crate::store::ListContents, Diagnostics) {
		let mut diags = Diagnostics::new();
		let contents = FileNodeListReader::new(bytes, fcr(start), FileProfile::One, options).read_all(&mut diags);
		(contents, diags)
	}

	#[test]
	fn fragments_concatenate_into_one_stream() {
		let mut b = StoreBuilder::new(Flavor::One);
		let start = b.list_in_fragments(&[vec![marker(0), marker(1)], vec![marker(2)], vec![marker(3)]]);
		let bytes = finish(b, start);

		let (contents, diags) = read(&bytes, start, &DecodeOptions::default());
		assert!(diags.is_empty(), "unexpected violations: {:?}", diags.items());
		assert!(contents.complete);
		assert_eq!(contents.fragments, 3);
		assert_eq!(contents.list_id, Some(0x10));
		let order: Vec<u32> = contents
			.nodes
			.iter()
			.map(|node| match node.fnd {
				crate::store::Fnd::RevisionManifestListStart { n_instance, .. } => n_instance,
				_ => u32::MAX,
			})
			.collect();
		assert_eq!(order, vec![0, 1, 2, 3]);
	}

	#[test]
	fn short_trailing_bytes_are_not_a_node() {
		let mut b = StoreBuilder::new(Flavor::One);
		let mut spec = FragmentSpec::new(0x20, 0, vec![marker(0)]);
		spec.padding = 3;
		let start = b.fragment(&spec);
		let bytes = finish(b, start);

		let (contents, diags) = read(&bytes, start, &DecodeOptions::default());
		assert!(diags.is_empty());
		assert!(contents.complete);
		assert_eq!(contents.nodes.len(), 1);
		assert_eq!(contents.nodes_seen, 1);
	}

	#[test]
	fn terminator_ends_fragment_body() {
		let mut b = StoreBuilder::new(Flavor::One);
		let mut trailing = kit::chunk_terminator();
		trailing.extend_from_slice(&[0xEE; 8]);
		let start = b.list_in_fragments(&[vec![marker(0), trailing], vec![marker(1)]]);
		let bytes = finish(b, start);

		let (contents, diags) = read(&bytes, start, &DecodeOptions::default());
		assert!(diags.is_empty());
		assert_eq!(contents.nodes.len(), 2);
		assert!(contents.nodes.iter().all(|node| node.type_id() != 0x0FF));
	}

	#[test]
	fn terminator_in_final_fragment_is_recorded() {
		let mut b = StoreBuilder::new(Flavor::One);
		let start = b.list(&[marker(0), kit::chunk_terminator()]);
		let bytes = finish(b, start);

		let (contents, diags) = read(&bytes, start, &DecodeOptions::default());
		assert_eq!(contents.nodes.len(), 1);
		assert!(matches!(
			diags.items(),
			[item] if matches!(item.error, FormatError::UnexpectedTerminator { list_id: 0x10, .. })
		));
	}

	#[test]
	fn sequence_gap_is_recorded_and_reading_continues() {
		let mut b = StoreBuilder::new(Flavor::One);
		let tail = b.fragment(&FragmentSpec::new(0x30, 2, vec![marker(1)]));
		let mut head = FragmentSpec::new(0x30, 0, vec![marker(0)]);
		head.next = tail;
		let start = b.fragment(&head);
		let bytes = finish(b, start);

		let (contents, diags) = read(&bytes, start, &DecodeOptions::default());
		assert_eq!(contents.nodes.len(), 2);
		assert!(contents.complete);
		assert!(matches!(
			diags.items(),
			[item] if matches!(item.error, FormatError::FragmentSequence { expected: 1, found: 2, .. })
		));
	}

	#[test]
	fn first_fragment_must_start_at_zero() {
		let mut b = StoreBuilder::new(Flavor::One);
		let start = b.fragment(&FragmentSpec::new(0x30, 1, vec![marker(0)]));
		let bytes = finish(b, start);

		let (_, diags) = read(&bytes, start, &DecodeOptions::default());
		assert!(diags.has(Rule::FragmentSequence));
	}

	#[test]
	fn list_id_floor_and_consistency() {
		let mut b = StoreBuilder::new(Flavor::One);
		let tail = b.fragment(&FragmentSpec::new(0x31, 1, vec![marker(1)]));
		let mut head = FragmentSpec::new(0x0F, 0, vec![marker(0)]);
		head.next = tail;
		let start = b.fragment(&head);
		let bytes = finish(b, start);

		let (contents, diags) = read(&bytes, start, &DecodeOptions::default());
		assert_eq!(contents.list_id, Some(0x0F));
		let list_ids: Vec<_> = diags.for_rule(Rule::FragmentListId).collect();
		assert_eq!(list_ids.len(), 2);
		assert!(matches!(list_ids[0].error, FormatError::InvalidListId { list_id: 0x0F, .. }));
		assert!(matches!(list_ids[1].error, FormatError::IdentityMismatch { .. }));
	}

	#[test]
	fn bad_footer_fails_the_list() {
		let mut b = StoreBuilder::new(Flavor::One);
		let mut spec = FragmentSpec::new(0x40, 0, vec![marker(0)]);
		spec.footer = 0;
		let start = b.fragment(&spec);
		let bytes = finish(b, start);

		let options = DecodeOptions::default();
		let reader = FileNodeListReader::new(&bytes, fcr(start), FileProfile::One, &options);
		let mut iter = reader.nodes();
		assert!(iter.next().is_none());
		assert_eq!(iter.state(), IterState::Failed);
		assert!(iter.next().is_none(), "failed is terminal");
		let diags = iter.into_diagnostics();
		assert!(matches!(
			diags.items(),
			[item] if item.rule == Rule::FragmentMagic && matches!(item.error, FormatError::BadMagicOrFooter { what: "fragment footer", .. })
		));
	}

	#[test]
	fn bad_header_magic_in_later_fragment_keeps_earlier_nodes() {
		let mut b = StoreBuilder::new(Flavor::One);
		let mut tail = FragmentSpec::new(0x41, 1, vec![marker(1)]);
		tail.magic = 0x1122_3344;
		let tail = b.fragment(&tail);
		let mut head = FragmentSpec::new(0x41, 0, vec![marker(0)]);
		head.next = tail;
		let start = b.fragment(&head);
		let bytes = finish(b, start);

		let (contents, diags) = read(&bytes, start, &DecodeOptions::default());
		assert_eq!(contents.nodes.len(), 1);
		assert!(!contents.complete);
		assert!(diags.has(Rule::FragmentMagic));
	}

	#[test]
	fn self_referencing_fragment_is_a_cycle() {
		let mut b = StoreBuilder::new(Flavor::One);
		let node = marker(0);
		let location = b.len() as u64;
		let mut spec = FragmentSpec::new(0x50, 0, vec![node.clone()]);
		spec.next = kit::Chunk {
			location,
			size: (16 + node.len() + 20) as u32,
		};
		let start = b.fragment(&spec);
		assert_eq!(start, spec.next);
		let bytes = finish(b, start);

		let (contents, diags) = read(&bytes, start, &DecodeOptions::default());
		assert_eq!(contents.nodes.len(), 1);
		assert!(!contents.complete);
		assert!(diags.items().iter().any(|item| matches!(item.error, FormatError::ChunkCycle { .. })));
	}

	#[test]
	fn out_of_range_start_fails() {
		let mut b = StoreBuilder::new(Flavor::One);
		let start = b.list(&[marker(0)]);
		let bytes = finish(b, start);
		let past_end = kit::Chunk {
			location: bytes.len() as u64 - 8,
			size: 64,
		};

		let (contents, diags) = read(&bytes, past_end, &DecodeOptions::default());
		assert!(contents.nodes.is_empty());
		assert!(diags.has(Rule::ChunkRange));
	}

	#[test]
	fn committed_count_stops_the_stream() {
		let mut b = StoreBuilder::new(Flavor::One);
		let start = b.list(&[marker(0), marker(1), marker(2)]);
		let bytes = finish(b, start);
		let counts = NodeCounts::from([(0x10, 2)]);

		let mut diags = Diagnostics::new();
		let options = DecodeOptions::default();
		let contents = FileNodeListReader::new(&bytes, fcr(start), FileProfile::One, &options)
			.with_node_counts(&counts)
			.read_all(&mut diags);
		assert_eq!(contents.nodes.len(), 2);
		assert!(contents.complete);
		assert!(diags.is_empty());

		let ignore = DecodeOptions {
			use_transaction_counts: false,
			..DecodeOptions::default()
		};
		let all = FileNodeListReader::new(&bytes, fcr(start), FileProfile::One, &ignore)
			.with_node_counts(&counts)
			.read_all(&mut diags);
		assert_eq!(all.nodes.len(), 3);
	}

	#[test]
	fn node_limit_fails_the_list() {
		let mut b = StoreBuilder::new(Flavor::One);
		let start = b.list(&[marker(0), marker(1), marker(2)]);
		let bytes = finish(b, start);
		let options = DecodeOptions {
			max_nodes_per_list: 2,
			..DecodeOptions::default()
		};

		let (contents, diags) = read(&bytes, start, &options);
		assert_eq!(contents.nodes.len(), 2);
		assert!(!contents.complete);
		assert!(matches!(
			diags.items(),
			[item] if matches!(item.error, FormatError::LimitExceeded { what: "nodes per list", limit: 2 })
		));
	}

	#[test]
	fn undecodable_node_is_skipped_and_recorded() {
		let mut b = StoreBuilder::new(Flavor::One);
		let start = b.list(&[marker(0), kit::revision_manifest_start4(kit::ExGuid::NIL, kit::ExGuid::NIL), marker(2)]);
		let bytes = finish(b, start);

		let (contents, diags) = read(&bytes, start, &DecodeOptions::default());
		assert_eq!(contents.nodes.len(), 2);
		assert_eq!(contents.nodes_seen, 3);
		assert!(diags.has(Rule::NodeContext));
	}

	#[test]
	fn oversized_node_fails_the_list() {
		let mut b = StoreBuilder::new(Flavor::One);
		let mut node = marker(0);
		node[..4].copy_from_slice(&kit::node_header(0x014, 200, 0).to_le_bytes());
		let start = b.list(&[node]);
		let bytes = finish(b, start);

		let (contents, diags) = read(&bytes, start, &DecodeOptions::default());
		assert!(contents.nodes.is_empty());
		assert!(!contents.complete);
		assert!(diags.has(Rule::NodeSize));
	}

	#[test]
	fn reader_restarts_from_the_first_fragment() {
		let mut b = StoreBuilder::new(Flavor::One);
		let start = b.list_in_fragments(&[vec![marker(0)], vec![marker(1)]]);
		let bytes = finish(b, start);

		let options = DecodeOptions::default();
		let reader = FileNodeListReader::new(&bytes, fcr(start), FileProfile::One, &options).expect_list_id(0x10);
		let first: Vec<_> = reader.nodes().collect();
		let second: Vec<_> = reader.nodes().collect();
		assert_eq!(first.len(), 2);
		assert_eq!(first, second);
	}
}
