use uuid::Uuid;

/// A 64-bit location and 32-bit size, the layout every synthetic reference uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Chunk {
	/// Byte location.
	pub location: u64,
	/// Byte size.
	pub size: u32,
}

impl Chunk {
	/// `fcrNil`.
	pub const NIL: Self = Self {
		location: u64::MAX,
		size: 0,
	};
	/// `fcrZero`.
	pub const ZERO: Self = Self { location: 0, size: 0 };

	/// Append the 12-byte encoding.
	pub fn encode(&self, out: &mut Vec<u8>) {
		out.extend_from_slice(&self.location.to_le_bytes());
		out.extend_from_slice(&self.size.to_le_bytes());
	}
}

/// GUID plus sequence number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ExGuid {
	/// Base GUID.
	pub guid: Uuid,
	/// Sequence number.
	pub n: u32,
}

impl ExGuid {
	/// All-zero identity.
	pub const NIL: Self = Self { guid: Uuid::nil(), n: 0 };

	/// Construct from parts.
	pub const fn new(guid: Uuid, n: u32) -> Self {
		Self { guid, n }
	}

	/// Append the 20-byte encoding.
	pub fn encode(&self, out: &mut Vec<u8>) {
		out.extend_from_slice(&self.guid.to_bytes_le());
		out.extend_from_slice(&self.n.to_le_bytes());
	}
}

/// Pack a compact id.
pub fn compact(n: u8, guid_index: u32) -> u32 {
	u32::from(n) | (guid_index << 8)
}

/// Pack a node header with chunk reference formats 0/0 and the reserved bit set.
pub fn node_header(type_id: u16, size: usize, base_type: u8) -> u32 {
	u32::from(type_id & 0x3FF) | ((size as u32 & 0x1FFF) << 10) | (u32::from(base_type & 0xF) << 27) | (1 << 31)
}

/// Encode a whole node: header followed by `payload`.
pub fn node(type_id: u16, base_type: u8, payload: &[u8]) -> Vec<u8> {
	let mut out = Vec::with_capacity(4 + payload.len());
	out.extend_from_slice(&node_header(type_id, 4 + payload.len(), base_type).to_le_bytes());
	out.extend_from_slice(payload);
	out
}

fn payload(build: impl FnOnce(&mut Vec<u8>)) -> Vec<u8> {
	let mut out = Vec::new();
	build(&mut out);
	out
}

fn storage_string(out: &mut Vec<u8>, value: &str) {
	let units: Vec<u16> = value.encode_utf16().collect();
	out.extend_from_slice(&(units.len() as u32).to_le_bytes());
	for unit in units {
		out.extend_from_slice(&unit.to_le_bytes());
	}
}

/// `ObjectSpaceManifestRootFND`.
pub fn object_space_manifest_root(gosid_root: ExGuid) -> Vec<u8> {
	node(0x004, 0, &payload(|out| gosid_root.encode(out)))
}

/// `ObjectSpaceManifestListReferenceFND`.
pub fn object_space_manifest_list_reference(list: Chunk, gosid: ExGuid) -> Vec<u8> {
	node(
		0x008,
		2,
		&payload(|out| {
			list.encode(out);
			gosid.encode(out);
		}),
	)
}

/// `ObjectSpaceManifestListStartFND`.
pub fn object_space_manifest_list_start(gosid: ExGuid) -> Vec<u8> {
	node(0x00C, 0, &payload(|out| gosid.encode(out)))
}

/// `RevisionManifestListReferenceFND`.
pub fn revision_manifest_list_reference(list: Chunk) -> Vec<u8> {
	node(0x010, 2, &payload(|out| list.encode(out)))
}

/// `RevisionManifestListStartFND`.
pub fn revision_manifest_list_start(gosid: ExGuid, n_instance: u32) -> Vec<u8> {
	node(
		0x014,
		0,
		&payload(|out| {
			gosid.encode(out);
			out.extend_from_slice(&n_instance.to_le_bytes());
		}),
	)
}

/// `RevisionManifestStart4FND` with role 1 and `odcsDefault` 0.
pub fn revision_manifest_start4(rid: ExGuid, rid_dependent: ExGuid) -> Vec<u8> {
	node(
		0x01B,
		0,
		&payload(|out| {
			rid.encode(out);
			rid_dependent.encode(out);
			out.extend_from_slice(&0_u64.to_le_bytes());
			out.extend_from_slice(&1_u32.to_le_bytes());
			out.extend_from_slice(&0_u16.to_le_bytes());
		}),
	)
}

/// `RevisionManifestStart6FND` with role 1 and the given `odcsDefault`.
pub fn revision_manifest_start6(rid: ExGuid, rid_dependent: ExGuid, odcs_default: u16) -> Vec<u8> {
	node(
		0x01E,
		0,
		&payload(|out| {
			rid.encode(out);
			rid_dependent.encode(out);
			out.extend_from_slice(&1_u32.to_le_bytes());
			out.extend_from_slice(&odcs_default.to_le_bytes());
		}),
	)
}

/// `RevisionManifestStart7FND` with role 1 and `odcsDefault` 0.
pub fn revision_manifest_start7(rid: ExGuid, rid_dependent: ExGuid, gctxid: ExGuid) -> Vec<u8> {
	node(
		0x01F,
		0,
		&payload(|out| {
			rid.encode(out);
			rid_dependent.encode(out);
			out.extend_from_slice(&1_u32.to_le_bytes());
			out.extend_from_slice(&0_u16.to_le_bytes());
			gctxid.encode(out);
		}),
	)
}

/// `RevisionManifestEndFND`.
pub fn revision_manifest_end() -> Vec<u8> {
	node(0x01C, 0, &[])
}

/// `RevisionRoleDeclarationFND`.
pub fn revision_role_declaration(rid: ExGuid, role: u32) -> Vec<u8> {
	node(
		0x05C,
		0,
		&payload(|out| {
			rid.encode(out);
			out.extend_from_slice(&role.to_le_bytes());
		}),
	)
}

/// `GlobalIdTableStartFNDX` with the given reserved byte.
pub fn global_id_table_start(reserved: u8) -> Vec<u8> {
	node(0x021, 0, &[reserved])
}

/// `GlobalIdTableStart2FND`.
pub fn global_id_table_start2() -> Vec<u8> {
	node(0x022, 0, &[])
}

/// `GlobalIdTableEntryFNDX`.
pub fn global_id_table_entry(index: u32, guid: Uuid) -> Vec<u8> {
	node(
		0x024,
		0,
		&payload(|out| {
			out.extend_from_slice(&index.to_le_bytes());
			out.extend_from_slice(&guid.to_bytes_le());
		}),
	)
}

/// `GlobalIdTableEntry2FNDX`.
pub fn global_id_table_entry2(from: u32, to: u32) -> Vec<u8> {
	node(
		0x025,
		0,
		&payload(|out| {
			out.extend_from_slice(&from.to_le_bytes());
			out.extend_from_slice(&to.to_le_bytes());
		}),
	)
}

/// `GlobalIdTableEntry3FNDX`.
pub fn global_id_table_entry3(from_start: u32, count: u32, to_start: u32) -> Vec<u8> {
	node(
		0x026,
		0,
		&payload(|out| {
			out.extend_from_slice(&from_start.to_le_bytes());
			out.extend_from_slice(&count.to_le_bytes());
			out.extend_from_slice(&to_start.to_le_bytes());
		}),
	)
}

/// `GlobalIdTableEndFNDX`.
pub fn global_id_table_end() -> Vec<u8> {
	node(0x028, 0, &[])
}

/// `ObjectDeclarationWithRefCountFNDX` with `jci` 1 and a reference count of 1.
pub fn object_declaration_with_ref_count(blob: Chunk, oid: u32) -> Vec<u8> {
	node(
		0x02D,
		1,
		&payload(|out| {
			blob.encode(out);
			out.extend_from_slice(&oid.to_le_bytes());
			out.extend_from_slice(&1_u64.to_le_bytes()[..6]);
			out.push(1);
		}),
	)
}

/// `ObjectRevisionWithRefCountFNDX` with a reference count of 1.
pub fn object_revision_with_ref_count(blob: Chunk, oid: u32) -> Vec<u8> {
	node(
		0x041,
		1,
		&payload(|out| {
			blob.encode(out);
			out.extend_from_slice(&oid.to_le_bytes());
			out.push(1 << 2);
		}),
	)
}

/// `RootObjectReference2FNDX`.
pub fn root_object_reference2(oid_root: u32, root_role: u32) -> Vec<u8> {
	node(
		0x059,
		0,
		&payload(|out| {
			out.extend_from_slice(&oid_root.to_le_bytes());
			out.extend_from_slice(&root_role.to_le_bytes());
		}),
	)
}

/// `RootObjectReference3FND`.
pub fn root_object_reference3(oid_root: ExGuid, root_role: u32) -> Vec<u8> {
	node(
		0x05A,
		0,
		&payload(|out| {
			oid_root.encode(out);
			out.extend_from_slice(&root_role.to_le_bytes());
		}),
	)
}

/// `ObjectDeclarationFileData3RefCountFND` with a reference count of 1.
pub fn object_declaration_file_data3(oid: u32, jcid: u32, file_data_reference: &str, extension: &str) -> Vec<u8> {
	node(
		0x072,
		0,
		&payload(|out| {
			out.extend_from_slice(&oid.to_le_bytes());
			out.extend_from_slice(&jcid.to_le_bytes());
			out.push(1);
			storage_string(out, file_data_reference);
			storage_string(out, extension);
		}),
	)
}

/// `ObjectInfoDependencyOverridesFND` with inline 8-bit overrides.
pub fn object_info_dependency_overrides_inline(overrides: &[(u32, u8)]) -> Vec<u8> {
	node(
		0x084,
		1,
		&payload(|out| {
			Chunk::NIL.encode(out);
			out.extend_from_slice(&(overrides.len() as u32).to_le_bytes());
			out.extend_from_slice(&0_u32.to_le_bytes());
			out.extend_from_slice(&0_u32.to_le_bytes());
			for (oid, c_ref) in overrides {
				out.extend_from_slice(&oid.to_le_bytes());
				out.push(*c_ref);
			}
		}),
	)
}

/// `ObjectDataEncryptionKeyV2FNDX`.
pub fn object_data_encryption_key_v2(key: Chunk) -> Vec<u8> {
	node(0x07C, 1, &payload(|out| key.encode(out)))
}

/// `DataSignatureGroupDefinitionFND`.
pub fn data_signature_group_definition(group: ExGuid) -> Vec<u8> {
	node(0x08C, 0, &payload(|out| group.encode(out)))
}

/// `FileDataStoreListReferenceFND`.
pub fn file_data_store_list_reference(list: Chunk) -> Vec<u8> {
	node(0x090, 2, &payload(|out| list.encode(out)))
}

/// `FileDataStoreObjectReferenceFND`.
pub fn file_data_store_object_reference(object: Chunk, guid_reference: Uuid) -> Vec<u8> {
	node(
		0x094,
		1,
		&payload(|out| {
			object.encode(out);
			out.extend_from_slice(&guid_reference.to_bytes_le());
		}),
	)
}

/// `ObjectDeclaration2RefCountFND` with no reference flags and a reference count of 1.
pub fn object_declaration2(blob: Chunk, oid: u32, jcid: u32) -> Vec<u8> {
	node(
		0x0A4,
		1,
		&payload(|out| {
			blob.encode(out);
			out.extend_from_slice(&oid.to_le_bytes());
			out.extend_from_slice(&jcid.to_le_bytes());
			out.push(0);
			out.push(1);
		}),
	)
}

/// `ObjectGroupListReferenceFND`.
pub fn object_group_list_reference(list: Chunk, object_group_id: ExGuid) -> Vec<u8> {
	node(
		0x0B0,
		2,
		&payload(|out| {
			list.encode(out);
			object_group_id.encode(out);
		}),
	)
}

/// `ObjectGroupStartFND`.
pub fn object_group_start(oid: ExGuid) -> Vec<u8> {
	node(0x0B4, 0, &payload(|out| oid.encode(out)))
}

/// `ObjectGroupEndFND`.
pub fn object_group_end() -> Vec<u8> {
	node(0x0B8, 0, &[])
}

/// `ChunkTerminatorFND`.
pub fn chunk_terminator() -> Vec<u8> {
	node(0x0FF, 0, &[])
}
