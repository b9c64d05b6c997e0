mod samples_object_graph {

	use onestore_testkit::{self as kit, SampleSpec};

	use crate::store::{
		DecodeOptions, Diagnostics, ExtendedGuid, FILE_DATA_STORE_OBJECT_FOOTER, FILE_DATA_STORE_OBJECT_HEADER, FormatError, Header, ObjectGraph,
		Rule, TransactionLog,
	};

	fn build(bytes: &[u8], options: &DecodeOptions) -> (ObjectGraph, Diagnostics) {
		let header = Header::parse(bytes).expect("header parses");
		let mut diags = Diagnostics::new();
		let profile = header.verify(&mut diags).expect("known file type");
		let txlog = TransactionLog::read(bytes, &header, options, &mut diags);
		let graph = ObjectGraph::build(bytes, &header, profile, &txlog, options, &mut diags);
		(graph, diags)
	}

	fn eguid(ex: kit::ExGuid) -> ExtendedGuid {
		ExtendedGuid::new(ex.guid, ex.n)
	}

	#[test]
	fn one_sample_builds_containment_tree() {
		let spec = SampleSpec::one();
		let bytes = spec.build();
		let (graph, diags) = build(&bytes, &DecodeOptions::default());
		assert!(diags.is_empty(), "unexpected violations: {:?}", diags.items());

		assert_eq!(graph.root.manifest_roots, vec![eguid(spec.gosid_root)]);
		assert_eq!(graph.object_spaces.len(), 1);
		let space = &graph.object_spaces[0];
		assert_eq!(space.start_gosid, Some(eguid(spec.gosid)));
		assert_eq!(space.revision_lists.len(), 1);

		let list = &space.revision_lists[0];
		assert_eq!(list.manifests.len(), 2);
		assert_eq!(list.role_declarations.len(), 1);
		let first = &list.manifests[0];
		assert!(first.ended);
		assert_eq!(first.start_type, 0x01E);
		assert_eq!(first.object_groups.len(), 1);
		let group = &first.object_groups[0];
		assert_eq!(group.start_oid, Some(group.object_group_id));
		assert!(group.ended);
		assert_eq!(group.global_id_table.as_ref().map(|table| table.len()), Some(2));
		assert_eq!(first.root_objects.len(), 1);

		let store = graph.file_data_store.as_ref().expect("file data store");
		assert_eq!(store.objects.len(), 1);
		assert_eq!(store.objects[0].guid_reference, spec.file_data_store_guid);
		assert_eq!(store.objects[0].data_len, Some(b"embedded file payload".len() as u64));

		let declarations: Vec<_> = graph.file_data_declarations().collect();
		assert_eq!(declarations.len(), 1);
		assert_eq!(declarations[0].1.ifndf_guid(), Some(spec.ifndf_guid));
		assert_eq!(graph.lists.len(), 5);
		assert!(graph.lists.iter().all(|list| list.complete));
	}

	#[test]
	fn dependent_revision_resolves_roots_through_map_and_copy() {
		let bytes = SampleSpec::onetoc2().build();
		let (graph, diags) = build(&bytes, &DecodeOptions::default());
		assert!(diags.is_empty(), "unexpected violations: {:?}", diags.items());

		let manifests = &graph.object_spaces[0].revision_lists[0].manifests;
		assert_eq!(manifests.len(), 2);
		let base = manifests[0].global_id_table.as_ref().expect("first table");
		let derived = manifests[1].global_id_table.as_ref().expect("second table");
		assert_eq!(derived.len(), 3);
		assert_eq!(derived.get(0), base.get(0));
		assert_eq!(derived.get(1), base.get(1));

		let root = manifests[1].root_objects[0];
		assert_eq!(root.oid.guid, derived.get(2).expect("index 2"));
		assert_eq!(root.oid.n, 1);
		assert_eq!(manifests[0].root_objects[0].oid.guid, base.get(1).expect("index 1"));
	}

	#[test]
	fn onetoc2_manifest_must_open_with_start4() {
		let gosid = kit::ExGuid::new(uuid::Uuid::from_u128(7), 1);
		let bytes = single_space(
			kit::Flavor::OneToc2,
			gosid,
			vec![
				kit::revision_manifest_list_start(gosid, 0),
				kit::revision_manifest_list_start(gosid, 0),
				kit::revision_manifest_end(),
			],
		);
		let (_, diags) = build(&bytes, &DecodeOptions::default());
		assert!(diags.items().iter().any(|item| matches!(
			item.error,
			FormatError::InvalidNodeContext {
				type_id: 0x014,
				profile: crate::store::FileProfile::OneToc2,
				..
			}
		)));
	}

	#[test]
	fn onetoc2_manifest_needs_end_marker() {
		let mut spec = SampleSpec::onetoc2();
		spec.revisions[1].end_marker = false;
		let (graph, diags) = build(&spec.build(), &DecodeOptions::default());
		assert!(!graph.object_spaces[0].revision_lists[0].manifests[1].ended);
		assert!(matches!(
			diags.items(),
			[item] if item.rule == Rule::RevisionManifestShape
		));
	}

	#[test]
	fn one_manifest_may_close_implicitly() {
		let mut spec = SampleSpec::one();
		spec.revisions[1].end_marker = false;
		let (graph, diags) = build(&spec.build(), &DecodeOptions::default());
		assert!(diags.is_empty());
		assert!(!graph.object_spaces[0].revision_lists[0].manifests[1].ended);
	}

	#[test]
	fn object_group_needs_end_marker() {
		let gosid = kit::ExGuid::new(uuid::Uuid::from_u128(9), 1);
		let group_id = kit::ExGuid::new(uuid::Uuid::from_u128(10), 1);
		let mut b = kit::StoreBuilder::new(kit::Flavor::One);
		let group = b.list(&[kit::object_group_start(group_id), kit::data_signature_group_definition(kit::ExGuid::NIL)]);
		let revisions = b.list(&[
			kit::revision_manifest_list_start(gosid, 0),
			kit::revision_manifest_start6(kit::ExGuid::new(gosid.guid, 2), kit::ExGuid::NIL, 0),
			kit::object_group_list_reference(group, group_id),
			kit::revision_manifest_end(),
		]);
		let bytes = finish_space(b, gosid, revisions);

		let (graph, diags) = build(&bytes, &DecodeOptions::default());
		let group = graph.object_groups().next().expect("object group");
		assert!(!group.ended);
		assert!(matches!(
			diags.items(),
			[item] if item.rule == Rule::ObjectGroupEnd
		));
	}

	#[test]
	fn misplaced_root_node_is_invalid_context() {
		let gosid = kit::ExGuid::new(uuid::Uuid::from_u128(12), 1);
		let mut b = kit::StoreBuilder::new(kit::Flavor::OneToc2);
		let revisions = b.list(&[
			kit::revision_manifest_list_start(gosid, 0),
			kit::revision_manifest_start4(kit::ExGuid::new(gosid.guid, 2), kit::ExGuid::NIL),
			kit::revision_manifest_end(),
		]);
		let manifest_list = b.list(&[kit::object_space_manifest_list_start(gosid), kit::revision_manifest_list_reference(revisions)]);
		let root = b.list(&[
			kit::object_space_manifest_root(gosid),
			kit::object_space_manifest_list_reference(manifest_list, gosid),
			kit::revision_manifest_end(),
		]);
		let bytes = b.finish(root, "misplaced.onetoc2");

		let (graph, diags) = build(&bytes, &DecodeOptions::default());
		assert_eq!(graph.object_spaces.len(), 1);
		assert!(matches!(
			diags.items(),
			[item] if matches!(item.error, FormatError::InvalidNodeContext { type_id: 0x01C, .. })
		));
	}

	#[test]
	fn broken_file_data_envelope_is_recorded() {
		let mut bytes = SampleSpec::one().build();
		let footer = FILE_DATA_STORE_OBJECT_FOOTER.to_bytes_le();
		let at = bytes.windows(16).position(|window| window == footer).expect("footer present");
		bytes[at] ^= 0xFF;

		let (graph, diags) = build(&bytes, &DecodeOptions::default());
		let store = graph.file_data_store.expect("file data store");
		assert_eq!(store.objects[0].data_len, None);
		assert!(matches!(
			diags.items(),
			[item] if matches!(item.error, FormatError::BadMagicGuid { what: "FileDataStoreObject footer", .. })
		));
	}

	#[test]
	fn encryption_key_follows_list_start() {
		let gosid = kit::ExGuid::new(uuid::Uuid::from_u128(13), 1);
		let mut b = kit::StoreBuilder::new(kit::Flavor::One);
		let key = b.blob(&[0x33; 32]);
		let revisions = b.list(&[
			kit::revision_manifest_list_start(gosid, 0),
			kit::object_data_encryption_key_v2(key),
			kit::revision_manifest_start6(kit::ExGuid::new(gosid.guid, 2), kit::ExGuid::NIL, 0),
			kit::revision_manifest_end(),
		]);
		let bytes = finish_space(b, gosid, revisions);

		let (graph, diags) = build(&bytes, &DecodeOptions::default());
		assert!(diags.is_empty(), "unexpected violations: {:?}", diags.items());
		let list = &graph.object_spaces[0].revision_lists[0];
		assert_eq!(list.encryption_key.map(|reference| reference.location()), Some(key.location));
		assert_eq!(list.manifests.len(), 1);
	}

	#[test]
	fn encryption_key_elsewhere_is_invalid_context() {
		let gosid = kit::ExGuid::new(uuid::Uuid::from_u128(14), 1);
		let mut b = kit::StoreBuilder::new(kit::Flavor::One);
		let key = b.blob(&[0x44; 32]);
		let revisions = b.list(&[
			kit::revision_manifest_list_start(gosid, 0),
			kit::revision_manifest_start6(kit::ExGuid::new(gosid.guid, 2), kit::ExGuid::NIL, 0),
			kit::object_data_encryption_key_v2(key),
			kit::revision_manifest_end(),
			kit::object_data_encryption_key_v2(key),
		]);
		let bytes = finish_space(b, gosid, revisions);

		let (graph, diags) = build(&bytes, &DecodeOptions::default());
		let list = &graph.object_spaces[0].revision_lists[0];
		assert_eq!(list.encryption_key, None);
		assert!(list.manifests[0].ended);
		assert_eq!(diags.len(), 2);
		assert!(diags.items().iter().all(|item| item.rule == Rule::NodeContext
			&& matches!(item.error, FormatError::InvalidNodeContext { type_id: 0x07C, .. })));
	}

	#[test]
	fn huge_file_data_length_is_out_of_range() {
		let mut bytes = SampleSpec::one().build();
		let header = FILE_DATA_STORE_OBJECT_HEADER.to_bytes_le();
		let at = bytes.windows(16).position(|window| window == header).expect("header present") + 16;
		bytes[at..at + 8].copy_from_slice(&0xFFFF_FFFF_FFFF_FFF0_u64.to_le_bytes());

		let (graph, diags) = build(&bytes, &DecodeOptions::default());
		let store = graph.file_data_store.expect("file data store");
		assert_eq!(store.objects[0].data_len, None);
		assert!(matches!(
			diags.items(),
			[item] if item.rule == Rule::FileDataStoreObject
				&& matches!(item.error, FormatError::ChunkOutOfRange { what: "FileData", size: 0xFFFF_FFFF_FFFF_FFF0, .. })
		));
	}

	#[test]
	fn list_depth_limit_stops_descent() {
		let bytes = SampleSpec::one().build();
		let options = DecodeOptions {
			max_list_depth: 1,
			..DecodeOptions::default()
		};
		let (graph, diags) = build(&bytes, &options);
		assert!(graph.object_spaces[0].revision_lists.is_empty());
		assert!(diags.has(Rule::DecodeLimit));
	}

	#[test]
	fn nil_list_reference_is_recorded() {
		let gosid = kit::ExGuid::new(uuid::Uuid::from_u128(11), 1);
		let mut b = kit::StoreBuilder::new(kit::Flavor::OneToc2);
		let root = b.list(&[
			kit::object_space_manifest_root(gosid),
			kit::object_space_manifest_list_reference(kit::Chunk::NIL, gosid),
		]);
		let bytes = b.finish(root, "nil.onetoc2");

		let (graph, diags) = build(&bytes, &DecodeOptions::default());
		assert!(graph.object_spaces.is_empty());
		assert_eq!(graph.root.manifest_list_refs.len(), 1);
		assert!(diags.has(Rule::ChunkRange));
	}

	fn single_space(flavor: kit::Flavor, gosid: kit::ExGuid, revision_nodes: Vec<Vec<u8>>) -> Vec<u8> {
		let mut b = kit::StoreBuilder::new(flavor);
		let revisions = b.list(&revision_nodes);
		finish_space(b, gosid, revisions)
	}

	fn finish_space(mut b: kit::StoreBuilder, gosid: kit::ExGuid, revisions: kit::Chunk) -> Vec<u8> {
		let manifest_list = b.list(&[kit::object_space_manifest_list_start(gosid), kit::revision_manifest_list_reference(revisions)]);
		let root = b.list(&[kit::object_space_manifest_root(gosid), kit::object_space_manifest_list_reference(manifest_list, gosid)]);
		b.finish(root, "space.one")
	}
}
