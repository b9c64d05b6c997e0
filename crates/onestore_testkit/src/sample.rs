use uuid::{Uuid, uuid};

use crate::nodes::*;
use crate::writer::{Flavor, StoreBuilder};

const SPACE: Uuid = uuid!("A1B2C3D4-0001-4000-8000-000000000001");
const REVISION: Uuid = uuid!("A1B2C3D4-0002-4000-8000-000000000002");
const GROUP: Uuid = uuid!("A1B2C3D4-0003-4000-8000-000000000003");
const FILE_DATA: Uuid = uuid!("A1B2C3D4-0004-4000-8000-000000000004");
const OBJECTS: [Uuid; 3] = [
	uuid!("B0000000-0000-4000-8000-000000000010"),
	uuid!("B0000000-0000-4000-8000-000000000011"),
	uuid!("B0000000-0000-4000-8000-000000000012"),
];

const JCID_PROPERTY_SET: u32 = 0x0002_0001;
const JCID_FILE_DATA: u32 = 0x0008_0001;

/// One global id table entry of a sample revision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GidEntry {
	/// `GlobalIdTableEntryFNDX`.
	Add {
		/// Table index.
		index: u32,
		/// GUID stored at `index`.
		guid: Uuid,
	},
	/// `GlobalIdTableEntry2FNDX`.
	Map {
		/// Index in the dependency table.
		from: u32,
		/// Index in this table.
		to: u32,
	},
	/// `GlobalIdTableEntry3FNDX`.
	CopyRange {
		/// First index in the dependency table.
		from: u32,
		/// Number of entries.
		count: u32,
		/// First index in this table.
		to: u32,
	},
}

/// One revision manifest of a sample file.
#[derive(Debug, Clone)]
pub struct RevisionSpec {
	/// Revision id.
	pub rid: ExGuid,
	/// Revision this one depends on.
	pub rid_dependent: ExGuid,
	/// Global id table entries.
	pub gid: Vec<GidEntry>,
	/// Table index of the root object.
	pub root_index: u32,
	/// Write the closing `RevisionManifestEndFND`.
	pub end_marker: bool,
}

impl RevisionSpec {
	fn root_guid(&self) -> Uuid {
		self.gid
			.iter()
			.find_map(|entry| match entry {
				GidEntry::Add { index, guid } if *index == self.root_index => Some(*guid),
				_ => None,
			})
			.unwrap_or_else(Uuid::nil)
	}
}

/// Description of a complete, valid-by-default revision store file.
///
/// Tests change one field to produce exactly one violation.
#[derive(Debug, Clone)]
pub struct SampleSpec {
	/// File type to write.
	pub flavor: Flavor,
	/// Name hashed into `crcName`.
	pub file_name: String,
	/// Object space id carried by the root list reference.
	pub gosid: ExGuid,
	/// `gosidRoot` of the root list.
	pub gosid_root: ExGuid,
	/// `gosid` of `ObjectSpaceManifestListStartFND`.
	pub manifest_list_gosid: ExGuid,
	/// `gosid` of `RevisionManifestListStartFND`.
	pub revision_list_gosid: ExGuid,
	/// Revisions in list order.
	pub revisions: Vec<RevisionSpec>,
	/// Reference an object group from the first revision (`.one` only).
	pub object_group: bool,
	/// `ObjectGroupID` of the group reference.
	pub object_group_id: ExGuid,
	/// `oid` of `ObjectGroupStartFND`.
	pub object_group_start_oid: ExGuid,
	/// Declare a file data object and write the file data store (`.one` only).
	pub file_data: bool,
	/// GUID named by the `<ifndf>` reference.
	pub ifndf_guid: Uuid,
	/// GUID of the stored file data object.
	pub file_data_store_guid: Uuid,
}

impl SampleSpec {
	/// A `.one` section with two revisions, an object group, and one file data object.
	pub fn one() -> Self {
		let first = ExGuid::new(REVISION, 1);
		Self {
			flavor: Flavor::One,
			file_name: "Sample.one".to_owned(),
			gosid: ExGuid::new(SPACE, 1),
			gosid_root: ExGuid::new(SPACE, 1),
			manifest_list_gosid: ExGuid::new(SPACE, 1),
			revision_list_gosid: ExGuid::new(SPACE, 1),
			revisions: vec![
				RevisionSpec {
					rid: first,
					rid_dependent: ExGuid::NIL,
					gid: vec![GidEntry::Add { index: 0, guid: OBJECTS[0] }],
					root_index: 0,
					end_marker: true,
				},
				RevisionSpec {
					rid: ExGuid::new(REVISION, 2),
					rid_dependent: first,
					gid: vec![
						GidEntry::Add { index: 0, guid: OBJECTS[0] },
						GidEntry::Add { index: 1, guid: OBJECTS[1] },
					],
					root_index: 1,
					end_marker: true,
				},
			],
			object_group: true,
			object_group_id: ExGuid::new(GROUP, 1),
			object_group_start_oid: ExGuid::new(GROUP, 1),
			file_data: true,
			ifndf_guid: FILE_DATA,
			file_data_store_guid: FILE_DATA,
		}
	}

	/// A `.onetoc2` table of contents whose second revision maps and copies ids from the first.
	pub fn onetoc2() -> Self {
		let first = ExGuid::new(REVISION, 1);
		Self {
			flavor: Flavor::OneToc2,
			file_name: "Open Notebook.onetoc2".to_owned(),
			gosid: ExGuid::new(SPACE, 1),
			gosid_root: ExGuid::new(SPACE, 1),
			manifest_list_gosid: ExGuid::new(SPACE, 1),
			revision_list_gosid: ExGuid::new(SPACE, 1),
			revisions: vec![
				RevisionSpec {
					rid: first,
					rid_dependent: ExGuid::NIL,
					gid: vec![
						GidEntry::Add { index: 0, guid: OBJECTS[0] },
						GidEntry::Add { index: 1, guid: OBJECTS[1] },
					],
					root_index: 1,
					end_marker: true,
				},
				RevisionSpec {
					rid: ExGuid::new(REVISION, 2),
					rid_dependent: first,
					gid: vec![
						GidEntry::Map { from: 0, to: 0 },
						GidEntry::CopyRange { from: 1, count: 1, to: 1 },
						GidEntry::Add { index: 2, guid: OBJECTS[2] },
					],
					root_index: 2,
					end_marker: true,
				},
			],
			object_group: false,
			object_group_id: ExGuid::NIL,
			object_group_start_oid: ExGuid::NIL,
			file_data: false,
			ifndf_guid: Uuid::nil(),
			file_data_store_guid: Uuid::nil(),
		}
	}

	/// Reference string of the declared file data object.
	pub fn file_data_reference(&self) -> String {
		format!("<ifndf>{{{}}}", self.ifndf_guid.hyphenated())
	}

	/// Write the file.
	pub fn build(&self) -> Vec<u8> {
		let mut b = StoreBuilder::new(self.flavor);
		let blob = b.blob(&[0x5A; 24]);

		let file_data_store = if self.file_data {
			let object = b.file_data_store_object(b"embedded file payload");
			Some(b.list(&[file_data_store_object_reference(object, self.file_data_store_guid)]))
		} else {
			None
		};
		let object_group = self.object_group.then(|| self.write_object_group(&mut b, blob));

		let mut revision_nodes = vec![revision_manifest_list_start(self.revision_list_gosid, 0)];
		for (i, revision) in self.revisions.iter().enumerate() {
			let group = if i == 0 { object_group } else { None };
			revision_nodes.extend(self.revision_nodes(revision, blob, group));
		}
		if let Some(last) = self.revisions.last() {
			revision_nodes.push(revision_role_declaration(last.rid, 1));
		}
		let revision_list = b.list(&revision_nodes);
		b.commit();

		let manifest_list = b.list(&[
			object_space_manifest_list_start(self.manifest_list_gosid),
			revision_manifest_list_reference(revision_list),
		]);

		let mut root_nodes = vec![
			object_space_manifest_root(self.gosid_root),
			object_space_manifest_list_reference(manifest_list, self.gosid),
		];
		if let Some(store) = file_data_store {
			root_nodes.push(file_data_store_list_reference(store));
		}
		let root = b.list(&root_nodes);
		b.finish(root, &self.file_name)
	}

	fn write_object_group(&self, b: &mut StoreBuilder, blob: Chunk) -> Chunk {
		let mut nodes = vec![
			object_group_start(self.object_group_start_oid),
			global_id_table_start2(),
			global_id_table_entry(0, OBJECTS[0]),
			global_id_table_entry(1, OBJECTS[1]),
			global_id_table_end(),
			object_declaration2(blob, compact(0, 0), JCID_PROPERTY_SET),
		];
		if self.file_data {
			nodes.push(object_declaration_file_data3(compact(0, 1), JCID_FILE_DATA, &self.file_data_reference(), ".bin"));
		}
		nodes.push(object_group_end());
		b.list(&nodes)
	}

	fn revision_nodes(&self, revision: &RevisionSpec, blob: Chunk, object_group: Option<Chunk>) -> Vec<Vec<u8>> {
		let mut nodes = Vec::new();
		match self.flavor {
			Flavor::One => {
				nodes.push(revision_manifest_start6(revision.rid, revision.rid_dependent, 0));
				if let Some(group) = object_group {
					nodes.push(object_group_list_reference(group, self.object_group_id));
				}
				nodes.push(global_id_table_start2());
			}
			Flavor::OneToc2 => {
				nodes.push(revision_manifest_start4(revision.rid, revision.rid_dependent));
				nodes.push(global_id_table_start(0));
			}
		}

		for entry in &revision.gid {
			nodes.push(match *entry {
				GidEntry::Add { index, guid } => global_id_table_entry(index, guid),
				GidEntry::Map { from, to } => global_id_table_entry2(from, to),
				GidEntry::CopyRange { from, count, to } => global_id_table_entry3(from, count, to),
			});
		}
		nodes.push(global_id_table_end());

		match self.flavor {
			Flavor::One => nodes.push(root_object_reference3(ExGuid::new(revision.root_guid(), 1), 1)),
			Flavor::OneToc2 => {
				nodes.push(object_declaration_with_ref_count(blob, compact(0, revision.root_index)));
				nodes.push(root_object_reference2(compact(1, revision.root_index), 1));
			}
		}
		if revision.end_marker {
			nodes.push(revision_manifest_end());
		}
		nodes
	}
}
