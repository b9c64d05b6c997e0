mod unit_node_table {

	use crate::store::{BaseType, NODE_TYPES, Profiles, node_spec};

	#[test]
	fn table_is_sorted_and_unique() {
		assert!(NODE_TYPES.windows(2).all(|pair| pair[0].type_id < pair[1].type_id));
	}

	#[test]
	fn lookup_reports_base_type_and_profile() {
		let reference = node_spec(0x008).expect("object space manifest list reference");
		assert_eq!(reference.base_type, BaseType::ListReference);
		assert_eq!(reference.profiles, Profiles::Both);

		let start4 = node_spec(0x01B).expect("revision manifest start 4");
		assert_eq!(start4.profiles, Profiles::OneToc2);
		assert_eq!(start4.name, "RevisionManifestStart4FND");

		assert!(node_spec(0x003).is_none());
		assert!(node_spec(0x3FF).is_none());
	}
}

mod unit_file_node {

	use onestore_testkit as kit;
	use uuid::uuid;

	use crate::store::{
		BaseType, Diagnostics, ExtendedGuid, FileNode, FileNodeHeader, FileProfile, Fnd, FormatError, ObjectDeclarationBody, Rule,
	};

	fn parse(node: &[u8], profile: FileProfile) -> (Result<FileNode, FormatError>, Diagnostics) {
		let mut diags = Diagnostics::new();
		let parsed = FileNode::parse(node, 0, profile, &mut diags);
		(parsed, diags)
	}

	#[test]
	fn header_bits_round_trip() {
		let raw = kit::node_header(0x0B0, 36, 2);
		let header = FileNodeHeader::from_u32(raw);
		assert_eq!(header.type_id, 0x0B0);
		assert_eq!(header.size, 36);
		assert_eq!(BaseType::from_bits(header.base_type), Some(BaseType::ListReference));
		assert_eq!(BaseType::from_bits(3), None);
		assert_eq!((header.stp_format, header.cb_format), (0, 0));
		assert!(header.reserved);
		assert_eq!(header.to_u32(), raw);
	}

	#[test]
	fn manifest_root_decodes_gosid() {
		let gosid = kit::ExGuid::new(uuid!("11111111-2222-4333-8444-555555555555"), 3);
		let bytes = kit::object_space_manifest_root(gosid);
		let (parsed, diags) = parse(&bytes, FileProfile::One);
		let node = parsed.expect("manifest root decodes");
		assert!(diags.is_empty());
		assert_eq!(node.size(), 24);
		assert_eq!(node.name(), "ObjectSpaceManifestRootFND");
		assert_eq!(
			node.fnd,
			Fnd::ObjectSpaceManifestRoot {
				gosid_root: ExtendedGuid::new(gosid.guid, 3)
			}
		);
	}

	#[test]
	fn data_base_type_on_plain_node_is_invalid_context() {
		let mut bytes = kit::object_space_manifest_root(kit::ExGuid::NIL);
		bytes[..4].copy_from_slice(&kit::node_header(0x004, 24, 1).to_le_bytes());
		let (parsed, _) = parse(&bytes, FileProfile::One);
		assert!(matches!(
			parsed,
			Err(FormatError::InvalidNodeContext {
				type_id: 0x004,
				base_type: 1,
				profile: FileProfile::One,
				at: 0
			})
		));
	}

	#[test]
	fn profile_restricted_node_is_invalid_context() {
		let bytes = kit::revision_manifest_start4(kit::ExGuid::NIL, kit::ExGuid::NIL);
		let (parsed, _) = parse(&bytes, FileProfile::One);
		assert!(matches!(parsed, Err(FormatError::InvalidNodeContext { type_id: 0x01B, .. })));

		let (parsed, _) = parse(&bytes, FileProfile::OneToc2);
		let node = parsed.expect("start 4 is valid in onetoc2");
		let start = node.fnd.revision_manifest_start().expect("manifest start");
		assert_eq!(start.time_creation, Some(0));
		assert_eq!(start.revision_role, 1);
	}

	#[test]
	fn unknown_type_is_rejected() {
		let bytes = kit::node(0x3F0, 0, &[]);
		let (parsed, _) = parse(&bytes, FileProfile::OneToc2);
		assert!(matches!(parsed, Err(FormatError::UnknownNodeType { type_id: 0x3F0, .. })));
	}

	#[test]
	fn declared_size_must_match_payload() {
		let mut bytes = kit::revision_manifest_list_start(kit::ExGuid::NIL, 0);
		bytes.extend_from_slice(&[0; 4]);
		bytes[..4].copy_from_slice(&kit::node_header(0x014, 32, 0).to_le_bytes());
		let (parsed, _) = parse(&bytes, FileProfile::One);
		assert!(matches!(
			parsed,
			Err(FormatError::NodeSizeMismatch {
				type_id: 0x014,
				declared: 32,
				consumed: 28,
				..
			})
		));

		let mut short = kit::revision_manifest_list_start(kit::ExGuid::NIL, 0);
		short[..4].copy_from_slice(&kit::node_header(0x014, 20, 0).to_le_bytes());
		let (parsed, _) = parse(&short, FileProfile::One);
		assert!(matches!(parsed, Err(FormatError::NodeSizeMismatch { declared: 20, .. })));
	}

	#[test]
	fn nil_guid_with_nonzero_n_is_recorded() {
		let bytes = kit::object_group_start(kit::ExGuid::new(uuid::Uuid::nil(), 7));
		let (parsed, diags) = parse(&bytes, FileProfile::One);
		assert!(parsed.is_ok());
		assert!(diags.has(Rule::ExtendedGuidNil));
	}

	#[test]
	fn file_data_reference_prefix_is_checked() {
		let ok = kit::object_declaration_file_data3(kit::compact(0, 1), 0x0008_0001, "<file>image.png", ".png");
		let (parsed, diags) = parse(&ok, FileProfile::One);
		let node = parsed.expect("file data declaration decodes");
		assert!(diags.is_empty());
		let Fnd::ObjectDeclarationFileData3RefCount(decl) = node.fnd else {
			panic!("expected file data declaration");
		};
		assert_eq!(decl.file_data_reference, "<file>image.png");
		assert_eq!(decl.extension, ".png");
		assert!(decl.jcid.is_file_data);

		let bad = kit::object_declaration_file_data3(kit::compact(0, 1), 0x0008_0001, "image.png", ".png");
		let (parsed, diags) = parse(&bad, FileProfile::One);
		assert!(parsed.is_ok());
		assert!(diags.has(Rule::FileDataReferencePrefix));
	}

	#[test]
	fn file_data_jcid_excludes_other_flags() {
		let bytes = kit::object_declaration_file_data3(kit::compact(0, 1), 0x000A_0001, "<invfdo>", "");
		let (_, diags) = parse(&bytes, FileProfile::One);
		assert!(diags.has(Rule::JcidFileData));
	}

	#[test]
	fn declaration_with_ref_count_unpacks_body() {
		let blob = kit::Chunk { location: 2048, size: 24 };
		let bytes = kit::object_declaration_with_ref_count(blob, kit::compact(2, 5));
		let (parsed, diags) = parse(&bytes, FileProfile::OneToc2);
		let node = parsed.expect("declaration decodes");
		assert!(diags.is_empty());
		let Fnd::ObjectDeclarationWithRefCount(decl) = &node.fnd else {
			panic!("expected object declaration");
		};
		assert_eq!(decl.reference.location(), 2048);
		assert_eq!(decl.c_ref, 1);
		let ObjectDeclarationBody::WithRefCount(body) = decl.body else {
			panic!("expected onetoc2 body");
		};
		assert_eq!((body.oid.n, body.oid.guid_index), (2, 5));
		assert_eq!(body.jci, 1);
		assert_eq!(node.fnd.reference().map(|fcr| fcr.size()), Some(24));
	}

	#[test]
	fn inline_dependency_overrides_decode() {
		let bytes = kit::object_info_dependency_overrides_inline(&[(kit::compact(0, 1), 3), (kit::compact(0, 2), 4)]);
		let (parsed, diags) = parse(&bytes, FileProfile::One);
		let node = parsed.expect("overrides decode");
		assert!(diags.is_empty());
		let Fnd::ObjectInfoDependencyOverrides { reference, data } = node.fnd else {
			panic!("expected dependency overrides");
		};
		assert!(reference.is_nil());
		let data = data.expect("inline data");
		assert_eq!(data.overrides_8.len(), 2);
		assert_eq!(data.overrides_8[1].1, 4);
		assert!(data.overrides_32.is_empty());
	}

	#[test]
	fn reserved_start_byte_is_recorded() {
		let bytes = kit::global_id_table_start(1);
		let (parsed, diags) = parse(&bytes, FileProfile::OneToc2);
		assert!(matches!(parsed.map(|node| node.fnd), Ok(Fnd::GlobalIdTableStart { reserved: 1 })));
		assert!(diags.has(Rule::NodeReserved));
	}
}
