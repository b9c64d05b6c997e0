use std::collections::{BTreeMap, HashSet};

use uuid::Uuid;

use crate::store::ids::guid_label;
use crate::store::{CompactId, Diagnostics, ExtendedGuid, FileNode, Fnd, FormatError, Result, Rule};

/// Maps compact GUID indices to full GUIDs for one revision or object group.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GlobalIdTable {
	entries: BTreeMap<u32, Uuid>,
}

impl GlobalIdTable {
	/// Create an empty table.
	pub fn new() -> Self {
		Self::default()
	}

	/// Build a table from the nodes of one global id table run.
	///
	/// Map and copy entries read from `dependency`, the table of the revision the
	/// run's revision depends on.
	pub fn from_nodes(nodes: &[FileNode], dependency: Option<&GlobalIdTable>, diags: &mut Diagnostics) -> Self {
		let mut table = Self::new();
		let mut seen = HashSet::new();
		for node in nodes {
			let at = node.offset;
			match node.fnd {
				Fnd::GlobalIdTableEntry { index, guid } => table.insert(index, guid, at, &mut seen, diags),
				Fnd::GlobalIdTableEntry2 { index_map_from, index_map_to } => match lookup(dependency, index_map_from) {
					Ok(guid) => table.insert(index_map_to, guid, at, &mut seen, diags),
					Err(err) => diags.push(Rule::GlobalIdTable, err),
				},
				Fnd::GlobalIdTableEntry3 {
					index_copy_from_start,
					entries_to_copy,
					index_copy_to_start,
				} => {
					for offset in 0..entries_to_copy {
						let from = index_copy_from_start.wrapping_add(offset);
						match lookup(dependency, from) {
							Ok(guid) => table.insert(index_copy_to_start.wrapping_add(offset), guid, at, &mut seen, diags),
							Err(err) => {
								diags.push(Rule::GlobalIdTable, err);
								break;
							}
						}
					}
				}
				_ => {}
			}
		}
		tracing::trace!(target: "onestore::gid", entries = table.len(), "global id table");
		table
	}

	fn insert(&mut self, index: u32, guid: Uuid, at: u64, seen: &mut HashSet<Uuid>, diags: &mut Diagnostics) {
		if guid.is_nil() {
			diags.push(
				Rule::GlobalIdTable,
				FormatError::ReservedFieldNonZero {
					field: "GlobalIdTableEntry guid is nil",
					at,
				},
			);
		}
		if !seen.insert(guid) {
			diags.push(
				Rule::GlobalIdTable,
				FormatError::IdentityMismatch {
					what: "global id table guid",
					expected: "a guid not already in the table".to_owned(),
					found: guid_label(&guid),
				},
			);
		}
		if self.entries.insert(index, guid).is_some() {
			diags.push(
				Rule::GlobalIdTable,
				FormatError::IdentityMismatch {
					what: "global id table index",
					expected: "an index not already in the table".to_owned(),
					found: index.to_string(),
				},
			);
		}
	}

	/// GUID stored at `index`.
	pub fn get(&self, index: u32) -> Option<Uuid> {
		self.entries.get(&index).copied()
	}

	/// Expand a compact id into an extended GUID.
	pub fn resolve(&self, id: CompactId) -> Result<ExtendedGuid> {
		let guid = self.get(id.guid_index).ok_or(FormatError::UnresolvedIndex {
			what: "compact id",
			index: id.guid_index,
		})?;
		Ok(ExtendedGuid::new(guid, u32::from(id.n)))
	}

	/// Number of entries.
	pub fn len(&self) -> usize {
		self.entries.len()
	}

	/// Return whether the table is empty.
	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}

	/// Iterate `(index, guid)` pairs in index order.
	pub fn iter(&self) -> impl Iterator<Item = (u32, Uuid)> + '_ {
		self.entries.iter().map(|(index, guid)| (*index, *guid))
	}
}

fn lookup(dependency: Option<&GlobalIdTable>, index: u32) -> Result<Uuid> {
	dependency.and_then(|table| table.get(index)).ok_or(FormatError::UnresolvedIndex {
		what: "dependency revision global id table",
		index,
	})
}
