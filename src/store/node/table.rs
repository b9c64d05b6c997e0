use self::BaseType::{DataReference as Data, ListReference as List, NoReference as Plain};
use crate::store::FileProfile;

/// Base type of a node: how its payload begins.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BaseType {
	/// No chunk reference.
	NoReference,
	/// Payload starts with a reference to opaque data.
	DataReference,
	/// Payload starts with a reference to another file node list.
	ListReference,
}

impl BaseType {
	/// Decode the 4-bit header value.
	pub fn from_bits(bits: u8) -> Option<Self> {
		match bits {
			0 => Some(Self::NoReference),
			1 => Some(Self::DataReference),
			2 => Some(Self::ListReference),
			_ => None,
		}
	}
}

/// File profiles a node type may appear in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Profiles {
	/// Both `.one` and `.onetoc2`.
	Both,
	/// `.one` only.
	One,
	/// `.onetoc2` only.
	OneToc2,
}

impl Profiles {
	/// Return whether `profile` is allowed.
	pub fn allows(self, profile: FileProfile) -> bool {
		match self {
			Self::Both => true,
			Self::One => profile == FileProfile::One,
			Self::OneToc2 => profile == FileProfile::OneToc2,
		}
	}
}

/// Static description of one node type.
#[derive(Debug, Clone, Copy)]
pub struct NodeSpec {
	/// 10-bit node type id.
	pub type_id: u16,
	/// Documented structure name.
	pub name: &'static str,
	/// Required base type.
	pub base_type: BaseType,
	/// Profiles the node may appear in.
	pub profiles: Profiles,
}

const fn spec(type_id: u16, name: &'static str, base_type: BaseType, profiles: Profiles) -> NodeSpec {
	NodeSpec {
		type_id,
		name,
		base_type,
		profiles,
	}
}

/// Every recognised node type, ordered by id.
pub static NODE_TYPES: &[NodeSpec] = &[
	spec(0x004, "ObjectSpaceManifestRootFND", Plain, Profiles::Both),
	spec(0x008, "ObjectSpaceManifestListReferenceFND", List, Profiles::Both),
	spec(0x00C, "ObjectSpaceManifestListStartFND", Plain, Profiles::Both),
	spec(0x010, "RevisionManifestListReferenceFND", List, Profiles::Both),
	spec(0x014, "RevisionManifestListStartFND", Plain, Profiles::Both),
	spec(0x01B, "RevisionManifestStart4FND", Plain, Profiles::OneToc2),
	spec(0x01C, "RevisionManifestEndFND", Plain, Profiles::Both),
	spec(0x01E, "RevisionManifestStart6FND", Plain, Profiles::One),
	spec(0x01F, "RevisionManifestStart7FND", Plain, Profiles::One),
	spec(0x021, "GlobalIdTableStartFNDX", Plain, Profiles::OneToc2),
	spec(0x022, "GlobalIdTableStart2FND", Plain, Profiles::One),
	spec(0x024, "GlobalIdTableEntryFNDX", Plain, Profiles::Both),
	spec(0x025, "GlobalIdTableEntry2FNDX", Plain, Profiles::OneToc2),
	spec(0x026, "GlobalIdTableEntry3FNDX", Plain, Profiles::OneToc2),
	spec(0x028, "GlobalIdTableEndFNDX", Plain, Profiles::Both),
	spec(0x02D, "ObjectDeclarationWithRefCountFNDX", Data, Profiles::OneToc2),
	spec(0x02E, "ObjectDeclarationWithRefCount2FNDX", Data, Profiles::OneToc2),
	spec(0x041, "ObjectRevisionWithRefCountFNDX", Data, Profiles::Both),
	spec(0x042, "ObjectRevisionWithRefCount2FNDX", Data, Profiles::Both),
	spec(0x059, "RootObjectReference2FNDX", Plain, Profiles::OneToc2),
	spec(0x05A, "RootObjectReference3FND", Plain, Profiles::One),
	spec(0x05C, "RevisionRoleDeclarationFND", Plain, Profiles::Both),
	spec(0x05D, "RevisionRoleAndContextDeclarationFND", Plain, Profiles::One),
	spec(0x072, "ObjectDeclarationFileData3RefCountFND", Plain, Profiles::One),
	spec(0x073, "ObjectDeclarationFileData3LargeRefCountFND", Plain, Profiles::One),
	spec(0x07C, "ObjectDataEncryptionKeyV2FNDX", Data, Profiles::One),
	spec(0x084, "ObjectInfoDependencyOverridesFND", Data, Profiles::Both),
	spec(0x08C, "DataSignatureGroupDefinitionFND", Plain, Profiles::Both),
	spec(0x090, "FileDataStoreListReferenceFND", List, Profiles::One),
	spec(0x094, "FileDataStoreObjectReferenceFND", Data, Profiles::One),
	spec(0x0A4, "ObjectDeclaration2RefCountFND", Data, Profiles::One),
	spec(0x0A5, "ObjectDeclaration2LargeRefCountFND", Data, Profiles::One),
	spec(0x0B0, "ObjectGroupListReferenceFND", List, Profiles::One),
	spec(0x0B4, "ObjectGroupStartFND", Plain, Profiles::One),
	spec(0x0B8, "ObjectGroupEndFND", Plain, Profiles::One),
	spec(0x0C2, "HashedChunkDescriptor2FND", Data, Profiles::One),
	spec(0x0C4, "ReadOnlyObjectDeclaration2RefCountFND", Data, Profiles::One),
	spec(0x0C5, "ReadOnlyObjectDeclaration2LargeRefCountFND", Data, Profiles::One),
	spec(0x0FF, "ChunkTerminatorFND", Plain, Profiles::Both),
];

/// Look up a node type by id.
pub fn node_spec(type_id: u16) -> Option<&'static NodeSpec> {
	NODE_TYPES
		.binary_search_by_key(&type_id, |spec| spec.type_id)
		.ok()
		.map(|index| &NODE_TYPES[index])
}
