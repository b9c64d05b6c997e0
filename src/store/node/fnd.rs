use uuid::Uuid;

use crate::store::bytes::Cursor;
use crate::store::{ChunkLayout, CompactId, Diagnostics, ExtendedGuid, FileChunkReference, FormatError, Jcid, Result, Rule};

/// Common start of the three revision manifest start markers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RevisionManifestStart {
	/// Revision id.
	pub rid: ExtendedGuid,
	/// Revision this one is a delta against, or nil.
	pub rid_dependent: ExtendedGuid,
	/// Creation time, only in `RevisionManifestStart4FND`.
	pub time_creation: Option<u64>,
	/// Revision role.
	pub revision_role: u32,
	/// Default object data compression scheme.
	pub odcs_default: u16,
	/// Context id, only in `RevisionManifestStart7FND`.
	pub gctxid: Option<ExtendedGuid>,
}

/// `ObjectDeclarationWithRefCountBody`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ObjectDeclarationWithRefCountBody {
	/// Declared object.
	pub oid: CompactId,
	/// 10-bit type, always 1.
	pub jci: u16,
	/// 4-bit compression, always 0.
	pub odc: u8,
	/// Object data holds object references.
	pub has_oid_references: bool,
	/// Object data holds object space references.
	pub has_osid_references: bool,
}

/// `ObjectDeclaration2Body`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ObjectDeclaration2Body {
	/// Declared object.
	pub oid: CompactId,
	/// Object classification.
	pub jcid: Jcid,
	/// Object data holds object references.
	pub has_oid_references: bool,
	/// Object data holds object space references.
	pub has_osid_references: bool,
}

/// An object declared with a data blob and reference count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectDeclaration {
	/// Reference to the object's property set blob.
	pub reference: FileChunkReference,
	/// Declared identity and flags.
	pub body: ObjectDeclarationBody,
	/// Reference count.
	pub c_ref: u32,
	/// MD5 of the blob, only for read-only declarations.
	pub md5_hash: Option<[u8; 16]>,
}

/// Body layouts used by object declarations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectDeclarationBody {
	/// `.onetoc2` declarations.
	WithRefCount(ObjectDeclarationWithRefCountBody),
	/// `.one` declarations.
	Declaration2(ObjectDeclaration2Body),
}

impl ObjectDeclarationBody {
	/// Declared compact object id.
	pub fn oid(&self) -> CompactId {
		match self {
			Self::WithRefCount(body) => body.oid,
			Self::Declaration2(body) => body.oid,
		}
	}
}

/// A new revision of an already declared object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectRevision {
	/// Reference to the revised property set blob.
	pub reference: FileChunkReference,
	/// Revised object.
	pub oid: CompactId,
	/// Object data holds object references.
	pub has_oid_references: bool,
	/// Object data holds object space references.
	pub has_osid_references: bool,
	/// Reference count.
	pub c_ref: u32,
}

/// A file data object declared by string reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileDataDeclaration {
	/// Declared object.
	pub oid: CompactId,
	/// Object classification.
	pub jcid: Jcid,
	/// Reference count.
	pub c_ref: u32,
	/// `<file>`, `<ifndf>`, or `<invfdo>` reference string.
	pub file_data_reference: String,
	/// File name extension of the referenced data.
	pub extension: String,
}

impl FileDataDeclaration {
	/// GUID named by an `<ifndf>` reference.
	pub fn ifndf_guid(&self) -> Option<Uuid> {
		let rest = self.file_data_reference.strip_prefix("<ifndf>")?;
		Uuid::parse_str(rest.trim_start_matches('{').trim_end_matches('}')).ok()
	}
}

/// Reference-count overrides for a set of objects.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DependencyOverrideData {
	/// Overrides with 8-bit counts.
	pub overrides_8: Vec<(CompactId, u8)>,
	/// Overrides with 32-bit counts.
	pub overrides_32: Vec<(CompactId, u32)>,
	/// Stored CRC of the override data.
	pub crc: u32,
}

impl DependencyOverrideData {
	/// Read from the cursor position.
	pub fn read(c: &mut Cursor<'_>) -> Result<Self> {
		let c8 = c.read_u32_le()?;
		let c32 = c.read_u32_le()?;
		let crc = c.read_u32_le()?;
		let mut data = Self {
			crc,
			..Self::default()
		};
		for _ in 0..c8 {
			data.overrides_8.push((CompactId::read(c)?, c.read_u8()?));
		}
		for _ in 0..c32 {
			data.overrides_32.push((CompactId::read(c)?, c.read_u32_le()?));
		}
		Ok(data)
	}
}

/// Decoded node payload, one case per node type.
#[allow(missing_docs)]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fnd {
	ObjectSpaceManifestRoot {
		gosid_root: ExtendedGuid,
	},
	ObjectSpaceManifestListReference {
		reference: FileChunkReference,
		gosid: ExtendedGuid,
	},
	ObjectSpaceManifestListStart {
		gosid: ExtendedGuid,
	},
	RevisionManifestListReference {
		reference: FileChunkReference,
	},
	RevisionManifestListStart {
		gosid: ExtendedGuid,
		n_instance: u32,
	},
	RevisionManifestStart4(RevisionManifestStart),
	RevisionManifestEnd,
	RevisionManifestStart6(RevisionManifestStart),
	RevisionManifestStart7(RevisionManifestStart),
	GlobalIdTableStart {
		reserved: u8,
	},
	GlobalIdTableStart2,
	GlobalIdTableEntry {
		index: u32,
		guid: Uuid,
	},
	GlobalIdTableEntry2 {
		index_map_from: u32,
		index_map_to: u32,
	},
	GlobalIdTableEntry3 {
		index_copy_from_start: u32,
		entries_to_copy: u32,
		index_copy_to_start: u32,
	},
	GlobalIdTableEnd,
	ObjectDeclarationWithRefCount(ObjectDeclaration),
	ObjectDeclarationWithRefCount2(ObjectDeclaration),
	ObjectRevisionWithRefCount(ObjectRevision),
	ObjectRevisionWithRefCount2(ObjectRevision),
	RootObjectReference2 {
		oid_root: CompactId,
		root_role: u32,
	},
	RootObjectReference3 {
		oid_root: ExtendedGuid,
		root_role: u32,
	},
	RevisionRoleDeclaration {
		rid: ExtendedGuid,
		revision_role: u32,
	},
	RevisionRoleAndContextDeclaration {
		rid: ExtendedGuid,
		revision_role: u32,
		gctxid: ExtendedGuid,
	},
	ObjectDeclarationFileData3RefCount(FileDataDeclaration),
	ObjectDeclarationFileData3LargeRefCount(FileDataDeclaration),
	ObjectDataEncryptionKeyV2 {
		reference: FileChunkReference,
	},
	ObjectInfoDependencyOverrides {
		reference: FileChunkReference,
		data: Option<DependencyOverrideData>,
	},
	DataSignatureGroupDefinition {
		data_signature_group: ExtendedGuid,
	},
	FileDataStoreListReference {
		reference: FileChunkReference,
	},
	FileDataStoreObjectReference {
		reference: FileChunkReference,
		guid_reference: Uuid,
	},
	ObjectDeclaration2RefCount(ObjectDeclaration),
	ObjectDeclaration2LargeRefCount(ObjectDeclaration),
	ObjectGroupListReference {
		reference: FileChunkReference,
		object_group_id: ExtendedGuid,
	},
	ObjectGroupStart {
		oid: ExtendedGuid,
	},
	ObjectGroupEnd,
	HashedChunkDescriptor2 {
		blob_ref: FileChunkReference,
		guid_hash: [u8; 16],
	},
	ReadOnlyObjectDeclaration2RefCount(ObjectDeclaration),
	ReadOnlyObjectDeclaration2LargeRefCount(ObjectDeclaration),
	ChunkTerminator,
}

impl Fnd {
	/// Node type id of this payload.
	pub fn type_id(&self) -> u16 {
		match self {
			Self::ObjectSpaceManifestRoot { .. } => 0x004,
			Self::ObjectSpaceManifestListReference { .. } => 0x008,
			Self::ObjectSpaceManifestListStart { .. } => 0x00C,
			Self::RevisionManifestListReference { .. } => 0x010,
			Self::RevisionManifestListStart { .. } => 0x014,
			Self::RevisionManifestStart4(_) => 0x01B,
			Self::RevisionManifestEnd => 0x01C,
			Self::RevisionManifestStart6(_) => 0x01E,
			Self::RevisionManifestStart7(_) => 0x01F,
			Self::GlobalIdTableStart { .. } => 0x021,
			Self::GlobalIdTableStart2 => 0x022,
			Self::GlobalIdTableEntry { .. } => 0x024,
			Self::GlobalIdTableEntry2 { .. } => 0x025,
			Self::GlobalIdTableEntry3 { .. } => 0x026,
			Self::GlobalIdTableEnd => 0x028,
			Self::ObjectDeclarationWithRefCount(_) => 0x02D,
			Self::ObjectDeclarationWithRefCount2(_) => 0x02E,
			Self::ObjectRevisionWithRefCount(_) => 0x041,
			Self::ObjectRevisionWithRefCount2(_) => 0x042,
			Self::RootObjectReference2 { .. } => 0x059,
			Self::RootObjectReference3 { .. } => 0x05A,
			Self::RevisionRoleDeclaration { .. } => 0x05C,
			Self::RevisionRoleAndContextDeclaration { .. } => 0x05D,
			Self::ObjectDeclarationFileData3RefCount(_) => 0x072,
			Self::ObjectDeclarationFileData3LargeRefCount(_) => 0x073,
			Self::ObjectDataEncryptionKeyV2 { .. } => 0x07C,
			Self::ObjectInfoDependencyOverrides { .. } => 0x084,
			Self::DataSignatureGroupDefinition { .. } => 0x08C,
			Self::FileDataStoreListReference { .. } => 0x090,
			Self::FileDataStoreObjectReference { .. } => 0x094,
			Self::ObjectDeclaration2RefCount(_) => 0x0A4,
			Self::ObjectDeclaration2LargeRefCount(_) => 0x0A5,
			Self::ObjectGroupListReference { .. } => 0x0B0,
			Self::ObjectGroupStart { .. } => 0x0B4,
			Self::ObjectGroupEnd => 0x0B8,
			Self::HashedChunkDescriptor2 { .. } => 0x0C2,
			Self::ReadOnlyObjectDeclaration2RefCount(_) => 0x0C4,
			Self::ReadOnlyObjectDeclaration2LargeRefCount(_) => 0x0C5,
			Self::ChunkTerminator => 0x0FF,
		}
	}

	/// Leading chunk reference for data- and list-reference nodes.
	pub fn reference(&self) -> Option<FileChunkReference> {
		match self {
			Self::ObjectSpaceManifestListReference { reference, .. }
			| Self::RevisionManifestListReference { reference }
			| Self::ObjectDataEncryptionKeyV2 { reference }
			| Self::ObjectInfoDependencyOverrides { reference, .. }
			| Self::FileDataStoreListReference { reference }
			| Self::FileDataStoreObjectReference { reference, .. }
			| Self::ObjectGroupListReference { reference, .. }
			| Self::HashedChunkDescriptor2 { blob_ref: reference, .. } => Some(*reference),
			Self::ObjectDeclarationWithRefCount(decl)
			| Self::ObjectDeclarationWithRefCount2(decl)
			| Self::ObjectDeclaration2RefCount(decl)
			| Self::ObjectDeclaration2LargeRefCount(decl)
			| Self::ReadOnlyObjectDeclaration2RefCount(decl)
			| Self::ReadOnlyObjectDeclaration2LargeRefCount(decl) => Some(decl.reference),
			Self::ObjectRevisionWithRefCount(rev) | Self::ObjectRevisionWithRefCount2(rev) => Some(rev.reference),
			_ => None,
		}
	}

	/// Start marker fields for any of the revision manifest start nodes.
	pub fn revision_manifest_start(&self) -> Option<&RevisionManifestStart> {
		match self {
			Self::RevisionManifestStart4(start) | Self::RevisionManifestStart6(start) | Self::RevisionManifestStart7(start) => Some(start),
			_ => None,
		}
	}

	/// Return whether this node belongs to a global id table run.
	pub fn is_global_id_table(&self) -> bool {
		matches!(
			self,
			Self::GlobalIdTableStart { .. }
				| Self::GlobalIdTableStart2
				| Self::GlobalIdTableEntry { .. }
				| Self::GlobalIdTableEntry2 { .. }
				| Self::GlobalIdTableEntry3 { .. }
				| Self::GlobalIdTableEnd
		)
	}
}

/// Inputs shared by every payload decoder.
pub(super) struct PayloadContext<'a, 'd> {
	pub bytes: &'a [u8],
	pub at: u64,
	pub layout: ChunkLayout,
	pub diags: &'d mut Diagnostics,
}

impl PayloadContext<'_, '_> {
	fn reserved(&mut self, rule: Rule, field: &'static str) {
		self.diags.push(rule, FormatError::ReservedFieldNonZero { field, at: self.at });
	}

	fn eguid(&mut self, c: &mut Cursor<'_>, field: &'static str) -> Result<ExtendedGuid> {
		ExtendedGuid::read_checked(c, field, self.diags)
	}

	fn reference(&self, c: &mut Cursor<'_>) -> Result<FileChunkReference> {
		FileChunkReference::read(c, self.layout)
	}
}

/// Decode the payload of node `type_id` from `c`.
pub(super) fn decode_payload(type_id: u16, c: &mut Cursor<'_>, cx: &mut PayloadContext<'_, '_>) -> Result<Fnd> {
	let fnd = match type_id {
		0x004 => Fnd::ObjectSpaceManifestRoot {
			gosid_root: cx.eguid(c, "gosidRoot")?,
		},
		0x008 => Fnd::ObjectSpaceManifestListReference {
			reference: cx.reference(c)?,
			gosid: cx.eguid(c, "gosid")?,
		},
		0x00C => Fnd::ObjectSpaceManifestListStart { gosid: cx.eguid(c, "gosid")? },
		0x010 => Fnd::RevisionManifestListReference { reference: cx.reference(c)? },
		0x014 => Fnd::RevisionManifestListStart {
			gosid: cx.eguid(c, "gosid")?,
			n_instance: c.read_u32_le()?,
		},
		0x01B => Fnd::RevisionManifestStart4(read_manifest_start(type_id, c, cx)?),
		0x01C => Fnd::RevisionManifestEnd,
		0x01E => Fnd::RevisionManifestStart6(read_manifest_start(type_id, c, cx)?),
		0x01F => Fnd::RevisionManifestStart7(read_manifest_start(type_id, c, cx)?),
		0x021 => {
			let reserved = c.read_u8()?;
			if reserved != 0 {
				cx.reserved(Rule::NodeReserved, "GlobalIdTableStartFNDX.Reserved");
			}
			Fnd::GlobalIdTableStart { reserved }
		}
		0x022 => Fnd::GlobalIdTableStart2,
		0x024 => Fnd::GlobalIdTableEntry {
			index: c.read_u32_le()?,
			guid: c.read_guid()?,
		},
		0x025 => Fnd::GlobalIdTableEntry2 {
			index_map_from: c.read_u32_le()?,
			index_map_to: c.read_u32_le()?,
		},
		0x026 => Fnd::GlobalIdTableEntry3 {
			index_copy_from_start: c.read_u32_le()?,
			entries_to_copy: c.read_u32_le()?,
			index_copy_to_start: c.read_u32_le()?,
		},
		0x028 => Fnd::GlobalIdTableEnd,
		0x02D => Fnd::ObjectDeclarationWithRefCount(read_declaration_with_ref_count(c, cx, false)?),
		0x02E => Fnd::ObjectDeclarationWithRefCount2(read_declaration_with_ref_count(c, cx, true)?),
		0x041 => {
			let reference = cx.reference(c)?;
			let oid = CompactId::read(c)?;
			let packed = c.read_u8()?;
			Fnd::ObjectRevisionWithRefCount(ObjectRevision {
				reference,
				oid,
				has_oid_references: packed & 0b01 != 0,
				has_osid_references: packed & 0b10 != 0,
				c_ref: u32::from(packed >> 2),
			})
		}
		0x042 => {
			let reference = cx.reference(c)?;
			let oid = CompactId::read(c)?;
			let flags = c.read_u32_le()?;
			if flags >> 2 != 0 {
				cx.reserved(Rule::NodeReserved, "ObjectRevisionWithRefCount2FNDX.Reserved");
			}
			Fnd::ObjectRevisionWithRefCount2(ObjectRevision {
				reference,
				oid,
				has_oid_references: flags & 0b01 != 0,
				has_osid_references: flags & 0b10 != 0,
				c_ref: c.read_u32_le()?,
			})
		}
		0x059 => Fnd::RootObjectReference2 {
			oid_root: CompactId::read(c)?,
			root_role: c.read_u32_le()?,
		},
		0x05A => Fnd::RootObjectReference3 {
			oid_root: cx.eguid(c, "oidRoot")?,
			root_role: c.read_u32_le()?,
		},
		0x05C => Fnd::RevisionRoleDeclaration {
			rid: cx.eguid(c, "rid")?,
			revision_role: c.read_u32_le()?,
		},
		0x05D => Fnd::RevisionRoleAndContextDeclaration {
			rid: cx.eguid(c, "rid")?,
			revision_role: c.read_u32_le()?,
			gctxid: cx.eguid(c, "gctxid")?,
		},
		0x072 => Fnd::ObjectDeclarationFileData3RefCount(read_file_data_declaration(c, cx, false)?),
		0x073 => Fnd::ObjectDeclarationFileData3LargeRefCount(read_file_data_declaration(c, cx, true)?),
		0x07C => Fnd::ObjectDataEncryptionKeyV2 { reference: cx.reference(c)? },
		0x084 => read_dependency_overrides(c, cx)?,
		0x08C => Fnd::DataSignatureGroupDefinition {
			data_signature_group: cx.eguid(c, "DataSignatureGroup")?,
		},
		0x090 => Fnd::FileDataStoreListReference { reference: cx.reference(c)? },
		0x094 => Fnd::FileDataStoreObjectReference {
			reference: cx.reference(c)?,
			guid_reference: c.read_guid()?,
		},
		0x0A4 => Fnd::ObjectDeclaration2RefCount(read_declaration2(c, cx, false, false)?),
		0x0A5 => Fnd::ObjectDeclaration2LargeRefCount(read_declaration2(c, cx, true, false)?),
		0x0B0 => Fnd::ObjectGroupListReference {
			reference: cx.reference(c)?,
			object_group_id: cx.eguid(c, "ObjectGroupID")?,
		},
		0x0B4 => Fnd::ObjectGroupStart { oid: cx.eguid(c, "oid")? },
		0x0B8 => Fnd::ObjectGroupEnd,
		0x0C2 => Fnd::HashedChunkDescriptor2 {
			blob_ref: cx.reference(c)?,
			guid_hash: c.read_array()?,
		},
		0x0C4 => Fnd::ReadOnlyObjectDeclaration2RefCount(read_declaration2(c, cx, false, true)?),
		0x0C5 => Fnd::ReadOnlyObjectDeclaration2LargeRefCount(read_declaration2(c, cx, true, true)?),
		0x0FF => Fnd::ChunkTerminator,
		_ => return Err(FormatError::UnknownNodeType { type_id, at: cx.at }),
	};
	Ok(fnd)
}

fn read_manifest_start(type_id: u16, c: &mut Cursor<'_>, cx: &mut PayloadContext<'_, '_>) -> Result<RevisionManifestStart> {
	let rid = cx.eguid(c, "rid")?;
	let rid_dependent = cx.eguid(c, "ridDependent")?;
	let time_creation = if type_id == 0x01B { Some(c.read_u64_le()?) } else { None };
	let revision_role = c.read_u32_le()?;
	let odcs_default = c.read_u16_le()?;
	let gctxid = if type_id == 0x01F { Some(cx.eguid(c, "gctxid")?) } else { None };

	let odcs_ok = if type_id == 0x01B { odcs_default == 0 } else { matches!(odcs_default, 0 | 2) };
	if !odcs_ok {
		cx.reserved(Rule::NodeReserved, "odcsDefault");
	}

	Ok(RevisionManifestStart {
		rid,
		rid_dependent,
		time_creation,
		revision_role,
		odcs_default,
		gctxid,
	})
}

fn read_ref_count(c: &mut Cursor<'_>, large: bool) -> Result<u32> {
	if large { c.read_u32_le() } else { Ok(u32::from(c.read_u8()?)) }
}

fn read_declaration_with_ref_count(c: &mut Cursor<'_>, cx: &mut PayloadContext<'_, '_>, large: bool) -> Result<ObjectDeclaration> {
	let reference = cx.reference(c)?;
	let oid = CompactId::read(c)?;
	let packed = c.read_uint(6)?;
	let body = ObjectDeclarationWithRefCountBody {
		oid,
		jci: (packed & 0x3FF) as u16,
		odc: ((packed >> 10) & 0xF) as u8,
		has_oid_references: packed & (1 << 16) != 0,
		has_osid_references: packed & (1 << 17) != 0,
	};
	if body.jci != 1 {
		cx.reserved(Rule::NodeReserved, "ObjectDeclarationWithRefCountBody.jci");
	}
	if body.odc != 0 {
		cx.reserved(Rule::NodeReserved, "ObjectDeclarationWithRefCountBody.odc");
	}
	if (packed >> 14) & 0b11 != 0 || packed >> 18 != 0 {
		cx.reserved(Rule::NodeReserved, "ObjectDeclarationWithRefCountBody.fReserved");
	}

	Ok(ObjectDeclaration {
		reference,
		body: ObjectDeclarationBody::WithRefCount(body),
		c_ref: read_ref_count(c, large)?,
		md5_hash: None,
	})
}

fn read_declaration2(c: &mut Cursor<'_>, cx: &mut PayloadContext<'_, '_>, large: bool, read_only: bool) -> Result<ObjectDeclaration> {
	let reference = cx.reference(c)?;
	let oid = CompactId::read(c)?;
	let jcid = Jcid::read_checked(c, cx.diags)?;
	let packed = c.read_u8()?;
	if packed >> 2 != 0 {
		cx.reserved(Rule::NodeReserved, "ObjectDeclaration2Body.fReserved2");
	}
	let body = ObjectDeclaration2Body {
		oid,
		jcid,
		has_oid_references: packed & 0b01 != 0,
		has_osid_references: packed & 0b10 != 0,
	};
	let c_ref = read_ref_count(c, large)?;
	let md5_hash = if read_only { Some(c.read_array()?) } else { None };

	Ok(ObjectDeclaration {
		reference,
		body: ObjectDeclarationBody::Declaration2(body),
		c_ref,
		md5_hash,
	})
}

const FILE_DATA_PREFIXES: [&str; 3] = ["<file>", "<ifndf>", "<invfdo>"];

fn read_file_data_declaration(c: &mut Cursor<'_>, cx: &mut PayloadContext<'_, '_>, large: bool) -> Result<FileDataDeclaration> {
	let oid = CompactId::read(c)?;
	let jcid = Jcid::read_checked(c, cx.diags)?;
	let c_ref = read_ref_count(c, large)?;
	let file_data_reference = read_storage_string(c)?;
	let extension = read_storage_string(c)?;

	if !FILE_DATA_PREFIXES.iter().any(|prefix| file_data_reference.starts_with(prefix)) {
		cx.diags.push(
			Rule::FileDataReferencePrefix,
			FormatError::StringPrefixViolation {
				at: cx.at,
				value: file_data_reference.clone(),
			},
		);
	}

	Ok(FileDataDeclaration {
		oid,
		jcid,
		c_ref,
		file_data_reference,
		extension,
	})
}

/// Read a `StringInStorageBuffer`: character count then UTF-16LE code units.
fn read_storage_string(c: &mut Cursor<'_>) -> Result<String> {
	let cch = c.read_u32_le()? as usize;
	let raw = c.read_exact(cch.saturating_mul(2))?;
	let units: Vec<u16> = raw.chunks_exact(2).map(|pair| u16::from_le_bytes([pair[0], pair[1]])).collect();
	Ok(String::from_utf16_lossy(&units))
}

fn read_dependency_overrides(c: &mut Cursor<'_>, cx: &mut PayloadContext<'_, '_>) -> Result<Fnd> {
	let reference = cx.reference(c)?;
	if reference.is_nil() {
		let data = DependencyOverrideData::read(c)?;
		return Ok(Fnd::ObjectInfoDependencyOverrides {
			reference,
			data: Some(data),
		});
	}

	let data = match reference.byte_range("ObjectInfoDependencyOverrideData", cx.bytes.len()) {
		Ok(range) => {
			let mut chunk = Cursor::window(cx.bytes, range.start, range.end);
			match DependencyOverrideData::read(&mut chunk) {
				Ok(data) => Some(data),
				Err(err) => {
					cx.diags.push(Rule::NodeSize, err);
					None
				}
			}
		}
		Err(err) => {
			cx.diags.push(Rule::ChunkRange, err);
			None
		}
	};
	Ok(Fnd::ObjectInfoDependencyOverrides { reference, data })
}
