use std::collections::HashMap;
use std::ops::Range;

use uuid::{Uuid, uuid};

use crate::store::bytes::Cursor;
use crate::store::list::FileNodeListReader;
use crate::store::{
	CompactId, DecodeOptions, Diagnostics, ExtendedGuid, FileChunkReference, FileDataDeclaration, FileNode, FileProfile, Fnd, FormatError,
	GlobalIdTable, Header, Rule, RevisionManifestStart, TransactionLog,
};

/// Header GUID of a `FileDataStoreObject`.
pub const FILE_DATA_STORE_OBJECT_HEADER: Uuid = uuid!("BDE316E7-2665-4511-A4C4-8D4D0B7A9EAC");
/// Footer GUID of a `FileDataStoreObject`.
pub const FILE_DATA_STORE_OBJECT_FOOTER: Uuid = uuid!("71FBA722-0F79-4A0B-BB13-899256426B24");

const FILE_DATA_STORE_OBJECT_PREFIX: usize = 16 + 8 + 4 + 8;

/// Index range of nodes in the [`ObjectGraph`] arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct NodeSpan {
	/// First arena index.
	pub start: usize,
	/// One past the last arena index.
	pub end: usize,
}

impl NodeSpan {
	/// Arena index range.
	pub fn range(&self) -> Range<usize> {
		self.start..self.end
	}

	/// Number of nodes.
	pub fn len(&self) -> usize {
		self.end - self.start
	}

	/// Return whether the span holds no nodes.
	pub fn is_empty(&self) -> bool {
		self.start == self.end
	}
}

/// Bookkeeping for one list that was read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListSummary {
	/// What the list holds.
	pub what: &'static str,
	/// List id from its first fragment.
	pub list_id: Option<u32>,
	/// Location of the first fragment.
	pub at: u64,
	/// Nodes found, including ones that failed to decode.
	pub nodes_seen: usize,
	/// The fragment chain ended normally.
	pub complete: bool,
}

/// Root file node list.
#[derive(Debug, Clone, Default)]
pub struct RootList {
	/// Arena span of the root list nodes.
	pub span: NodeSpan,
	/// `gosidRoot` of every `ObjectSpaceManifestRootFND`.
	pub manifest_roots: Vec<ExtendedGuid>,
	/// Every `ObjectSpaceManifestListReferenceFND`.
	pub manifest_list_refs: Vec<ManifestListRef>,
	/// Every `FileDataStoreListReferenceFND` target.
	pub file_data_store_refs: Vec<FileChunkReference>,
}

/// One object space manifest list reference from the root list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ManifestListRef {
	/// Object space id carried by the reference.
	pub gosid: ExtendedGuid,
	/// Location of the object space manifest list.
	pub reference: FileChunkReference,
	/// File offset of the referencing node.
	pub at: u64,
}

/// An object space and its revision manifest lists.
#[derive(Debug, Clone)]
pub struct ObjectSpace {
	/// Object space id from the root list reference.
	pub gosid: ExtendedGuid,
	/// Location of the object space manifest list.
	pub reference: FileChunkReference,
	/// Arena span of the manifest list nodes.
	pub span: NodeSpan,
	/// `gosid` from `ObjectSpaceManifestListStartFND`.
	pub start_gosid: Option<ExtendedGuid>,
	/// Revision manifest lists in reference order; the last one is current.
	pub revision_lists: Vec<RevisionManifestList>,
}

/// A revision manifest list.
#[derive(Debug, Clone)]
pub struct RevisionManifestList {
	/// Location of the list.
	pub reference: FileChunkReference,
	/// Arena span of the list nodes.
	pub span: NodeSpan,
	/// `gosid` from `RevisionManifestListStartFND`.
	pub start_gosid: Option<ExtendedGuid>,
	/// Encryption key reference, if present.
	pub encryption_key: Option<FileChunkReference>,
	/// Role declarations in list order.
	pub role_declarations: Vec<RoleDeclaration>,
	/// Revision manifests in list order.
	pub manifests: Vec<RevisionManifest>,
}

/// A revision role, optionally scoped to a context.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoleDeclaration {
	/// Revision the role is assigned to.
	pub rid: ExtendedGuid,
	/// Role value.
	pub revision_role: u32,
	/// Context id for `RevisionRoleAndContextDeclarationFND`.
	pub gctxid: Option<ExtendedGuid>,
}

/// One revision manifest.
#[derive(Debug, Clone)]
pub struct RevisionManifest {
	/// File offset of the start marker.
	pub at: u64,
	/// Node type of the start marker.
	pub start_type: u16,
	/// Start marker fields.
	pub start: RevisionManifestStart,
	/// Arena span from the start marker to the last node of the manifest.
	pub span: NodeSpan,
	/// An explicit `RevisionManifestEndFND` closed the manifest.
	pub ended: bool,
	/// Global id table declared in the manifest.
	pub global_id_table: Option<GlobalIdTable>,
	/// Object groups referenced by the manifest.
	pub object_groups: Vec<ObjectGroup>,
	/// Root objects declared by the manifest.
	pub root_objects: Vec<RootObject>,
}

/// A root object declared by a revision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RootObject {
	/// Root object id.
	pub oid: ExtendedGuid,
	/// Root role.
	pub root_role: u32,
}

/// An object group list.
#[derive(Debug, Clone)]
pub struct ObjectGroup {
	/// `ObjectGroupID` from the referencing node.
	pub object_group_id: ExtendedGuid,
	/// Location of the object group list.
	pub reference: FileChunkReference,
	/// Arena span of the list nodes.
	pub span: NodeSpan,
	/// `oid` from `ObjectGroupStartFND`.
	pub start_oid: Option<ExtendedGuid>,
	/// The list ends with `ObjectGroupEndFND`.
	pub ended: bool,
	/// Global id table declared in the group.
	pub global_id_table: Option<GlobalIdTable>,
}

/// File data store list and the objects it references.
#[derive(Debug, Clone)]
pub struct FileDataStore {
	/// Location of the list.
	pub reference: FileChunkReference,
	/// Arena span of the list nodes.
	pub span: NodeSpan,
	/// Objects in list order.
	pub objects: Vec<FileDataStoreEntry>,
}

/// One `FileDataStoreObjectReferenceFND`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileDataStoreEntry {
	/// GUID named by `<ifndf>` references.
	pub guid_reference: Uuid,
	/// Location of the `FileDataStoreObject`.
	pub reference: FileChunkReference,
	/// `cbLength` of the object when its envelope is valid.
	pub data_len: Option<u64>,
}

/// Containment graph over every list reachable from the root list.
#[derive(Debug, Clone, Default)]
pub struct ObjectGraph {
	nodes: Vec<FileNode>,
	/// Root file node list.
	pub root: RootList,
	/// Object spaces in root list order.
	pub object_spaces: Vec<ObjectSpace>,
	/// File data store, when the root list references one.
	pub file_data_store: Option<FileDataStore>,
	/// Every list read, in read order.
	pub lists: Vec<ListSummary>,
}

impl ObjectGraph {
	/// Read every list reachable from `fcrFileNodeListRoot`.
	///
	/// Nodes in the wrong position are recorded as `InvalidNodeContext`; identity
	/// and cardinality rules are left to [`crate::store::validate`].
	pub fn build(
		bytes: &[u8],
		header: &Header,
		profile: FileProfile,
		txlog: &TransactionLog,
		options: &DecodeOptions,
		diags: &mut Diagnostics,
	) -> Self {
		let mut builder = Builder {
			bytes,
			profile,
			options,
			txlog,
			diags,
			graph: Self::default(),
		};
		builder.root_list(header.fcr_file_node_list_root);
		tracing::debug!(
			target: "onestore::graph",
			nodes = builder.graph.nodes.len(),
			lists = builder.graph.lists.len(),
			object_spaces = builder.graph.object_spaces.len(),
			"object graph built"
		);
		builder.graph
	}

	/// Nodes covered by `span`.
	pub fn nodes(&self, span: NodeSpan) -> &[FileNode] {
		&self.nodes[span.range()]
	}

	/// Every node read, grouped by list.
	pub fn all_nodes(&self) -> &[FileNode] {
		&self.nodes
	}

	/// Every file data declaration with the node that carries it.
	pub fn file_data_declarations(&self) -> impl Iterator<Item = (&FileNode, &FileDataDeclaration)> {
		self.nodes.iter().filter_map(|node| match &node.fnd {
			Fnd::ObjectDeclarationFileData3RefCount(decl) | Fnd::ObjectDeclarationFileData3LargeRefCount(decl) => Some((node, decl)),
			_ => None,
		})
	}

	/// Every object group in the graph.
	pub fn object_groups(&self) -> impl Iterator<Item = &ObjectGroup> {
		self.object_spaces
			.iter()
			.flat_map(|space| &space.revision_lists)
			.flat_map(|list| &list.manifests)
			.flat_map(|manifest| &manifest.object_groups)
	}
}

#[derive(Default)]
struct GidRun {
	open: Option<Vec<FileNode>>,
	table: Option<GlobalIdTable>,
}

struct ManifestDraft {
	first: usize,
	last: usize,
	at: u64,
	start_type: u16,
	start: RevisionManifestStart,
	gid: GidRun,
	object_groups: Vec<ObjectGroup>,
	root_objects: Vec<RootObject>,
	compact_roots: Vec<(CompactId, u32)>,
}

struct Builder<'a, 'd> {
	bytes: &'a [u8],
	profile: FileProfile,
	options: &'a DecodeOptions,
	txlog: &'a TransactionLog,
	diags: &'d mut Diagnostics,
	graph: ObjectGraph,
}

impl Builder<'_, '_> {
	fn read_list(&mut self, what: &'static str, reference: FileChunkReference, depth: usize) -> Option<NodeSpan> {
		if depth > self.options.max_list_depth {
			self.diags.push(
				Rule::DecodeLimit,
				FormatError::LimitExceeded {
					what: "list depth",
					limit: self.options.max_list_depth,
				},
			);
			return None;
		}
		if !reference.is_populated() {
			self.diags.push(
				Rule::ChunkRange,
				FormatError::SentinelExpected {
					field: what,
					sentinel: "neither fcrNil nor fcrZero",
				},
			);
			return None;
		}

		let contents = FileNodeListReader::new(self.bytes, reference, self.profile, self.options)
			.with_node_counts(self.txlog.node_counts())
			.read_all(self.diags);
		tracing::debug!(
			target: "onestore::graph",
			what,
			list_id = ?contents.list_id,
			nodes = contents.nodes.len(),
			fragments = contents.fragments,
			"list read"
		);
		self.graph.lists.push(ListSummary {
			what,
			list_id: contents.list_id,
			at: reference.location(),
			nodes_seen: contents.nodes_seen,
			complete: contents.complete,
		});

		let start = self.graph.nodes.len();
		self.graph.nodes.extend(contents.nodes);
		Some(NodeSpan {
			start,
			end: self.graph.nodes.len(),
		})
	}

	fn node(&self, index: usize) -> FileNode {
		self.graph.nodes[index].clone()
	}

	fn misplaced(&mut self, node: &FileNode) {
		self.diags.push(
			Rule::NodeContext,
			FormatError::InvalidNodeContext {
				type_id: node.type_id(),
				base_type: node.header.base_type,
				profile: self.profile,
				at: node.offset,
			},
		);
	}

	fn root_list(&mut self, reference: FileChunkReference) {
		let Some(span) = self.read_list("root file node list", reference, 0) else {
			return;
		};
		self.graph.root.span = span;

		for index in span.range() {
			let node = self.node(index);
			match node.fnd {
				Fnd::ObjectSpaceManifestRoot { gosid_root } => self.graph.root.manifest_roots.push(gosid_root),
				Fnd::ObjectSpaceManifestListReference { reference, gosid } => {
					self.graph.root.manifest_list_refs.push(ManifestListRef {
						gosid,
						reference,
						at: node.offset,
					});
					if let Some(space) = self.object_space(gosid, reference) {
						self.graph.object_spaces.push(space);
					}
				}
				Fnd::FileDataStoreListReference { reference } => {
					self.graph.root.file_data_store_refs.push(reference);
					if self.graph.file_data_store.is_none() {
						self.graph.file_data_store = self.file_data_store(reference);
					}
				}
				_ => self.misplaced(&node),
			}
		}
	}

	fn object_space(&mut self, gosid: ExtendedGuid, reference: FileChunkReference) -> Option<ObjectSpace> {
		let span = self.read_list("object space manifest list", reference, 1)?;
		let mut space = ObjectSpace {
			gosid,
			reference,
			span,
			start_gosid: None,
			revision_lists: Vec::new(),
		};

		for index in span.range() {
			let node = self.node(index);
			match node.fnd {
				Fnd::ObjectSpaceManifestListStart { gosid } if index == span.start => space.start_gosid = Some(gosid),
				Fnd::RevisionManifestListReference { reference } if index > span.start => {
					if let Some(list) = self.revision_list(reference) {
						space.revision_lists.push(list);
					}
				}
				_ => self.misplaced(&node),
			}
		}
		Some(space)
	}

	fn revision_list(&mut self, reference: FileChunkReference) -> Option<RevisionManifestList> {
		let span = self.read_list("revision manifest list", reference, 2)?;
		let mut list = RevisionManifestList {
			reference,
			span,
			start_gosid: None,
			encryption_key: None,
			role_declarations: Vec::new(),
			manifests: Vec::new(),
		};
		let mut tables: HashMap<ExtendedGuid, GlobalIdTable> = HashMap::new();
		let mut current: Option<ManifestDraft> = None;

		for index in span.range() {
			let node = self.node(index);
			if index == span.start {
				match node.fnd {
					Fnd::RevisionManifestListStart { gosid, .. } => list.start_gosid = Some(gosid),
					_ => self.misplaced(&node),
				}
				continue;
			}

			match &node.fnd {
				Fnd::RevisionManifestStart4(start) | Fnd::RevisionManifestStart6(start) | Fnd::RevisionManifestStart7(start) => {
					if let Some(draft) = current.take() {
						self.finish_manifest(draft, false, &mut list, &mut tables);
					}
					current = Some(ManifestDraft {
						first: index,
						last: index,
						at: node.offset,
						start_type: node.type_id(),
						start: start.clone(),
						gid: GidRun::default(),
						object_groups: Vec::new(),
						root_objects: Vec::new(),
						compact_roots: Vec::new(),
					});
				}
				Fnd::RevisionManifestEnd => match current.take() {
					Some(mut draft) => {
						draft.last = index;
						self.finish_manifest(draft, true, &mut list, &mut tables);
					}
					None => self.misplaced(&node),
				},
				Fnd::ObjectDataEncryptionKeyV2 { reference } if index == span.start + 1 => list.encryption_key = Some(*reference),
				Fnd::ObjectDataEncryptionKeyV2 { .. } => self.misplaced(&node),
				Fnd::RevisionRoleDeclaration { rid, revision_role } => {
					if let Some(draft) = current.take() {
						self.finish_manifest(draft, false, &mut list, &mut tables);
					}
					list.role_declarations.push(RoleDeclaration {
						rid: *rid,
						revision_role: *revision_role,
						gctxid: None,
					});
				}
				Fnd::RevisionRoleAndContextDeclaration { rid, revision_role, gctxid } => {
					if let Some(draft) = current.take() {
						self.finish_manifest(draft, false, &mut list, &mut tables);
					}
					list.role_declarations.push(RoleDeclaration {
						rid: *rid,
						revision_role: *revision_role,
						gctxid: Some(*gctxid),
					});
				}
				_ => match current.as_mut() {
					Some(draft) => {
						draft.last = index;
						self.manifest_node(draft, &node, &tables);
					}
					None => self.misplaced(&node),
				},
			}
		}
		if let Some(draft) = current.take() {
			self.finish_manifest(draft, false, &mut list, &mut tables);
		}
		Some(list)
	}

	fn manifest_node(&mut self, draft: &mut ManifestDraft, node: &FileNode, tables: &HashMap<ExtendedGuid, GlobalIdTable>) {
		let dependency = tables.get(&draft.start.rid_dependent);
		if self.gid_node(&mut draft.gid, node, dependency) {
			return;
		}

		match &node.fnd {
			Fnd::ObjectGroupListReference { reference, object_group_id } => {
				if let Some(group) = self.object_group(*object_group_id, *reference) {
					draft.object_groups.push(group);
				}
			}
			Fnd::RootObjectReference2 { oid_root, root_role } => draft.compact_roots.push((*oid_root, *root_role)),
			Fnd::RootObjectReference3 { oid_root, root_role } => draft.root_objects.push(RootObject {
				oid: *oid_root,
				root_role: *root_role,
			}),
			Fnd::ObjectDeclarationWithRefCount(_)
			| Fnd::ObjectDeclarationWithRefCount2(_)
			| Fnd::ObjectRevisionWithRefCount(_)
			| Fnd::ObjectRevisionWithRefCount2(_)
			| Fnd::ObjectDeclaration2RefCount(_)
			| Fnd::ObjectDeclaration2LargeRefCount(_)
			| Fnd::ReadOnlyObjectDeclaration2RefCount(_)
			| Fnd::ReadOnlyObjectDeclaration2LargeRefCount(_)
			| Fnd::ObjectDeclarationFileData3RefCount(_)
			| Fnd::ObjectDeclarationFileData3LargeRefCount(_)
			| Fnd::ObjectInfoDependencyOverrides { .. }
			| Fnd::DataSignatureGroupDefinition { .. }
			| Fnd::HashedChunkDescriptor2 { .. } => {}
			_ => self.misplaced(node),
		}
	}

	fn finish_manifest(
		&mut self,
		mut draft: ManifestDraft,
		ended: bool,
		list: &mut RevisionManifestList,
		tables: &mut HashMap<ExtendedGuid, GlobalIdTable>,
	) {
		if !ended && self.profile == FileProfile::OneToc2 {
			self.diags.push(
				Rule::RevisionManifestShape,
				FormatError::MissingSentinel {
					what: "RevisionManifestEndFND",
					expected: 1,
					found: 0,
				},
			);
		}
		self.close_gid_run(&mut draft.gid);

		for (oid, root_role) in draft.compact_roots.drain(..) {
			let resolved = match &draft.gid.table {
				Some(table) => table.resolve(oid),
				None => Err(FormatError::UnresolvedIndex {
					what: "root object without global id table",
					index: oid.guid_index,
				}),
			};
			match resolved {
				Ok(oid) => draft.root_objects.push(RootObject { oid, root_role }),
				Err(err) => self.diags.push(Rule::GlobalIdTable, err),
			}
		}

		if let Some(table) = &draft.gid.table {
			tables.insert(draft.start.rid, table.clone());
		}
		tracing::trace!(target: "onestore::graph", rid = %draft.start.rid, ended, "revision manifest");
		list.manifests.push(RevisionManifest {
			at: draft.at,
			start_type: draft.start_type,
			start: draft.start,
			span: NodeSpan {
				start: draft.first,
				end: draft.last + 1,
			},
			ended,
			global_id_table: draft.gid.table,
			object_groups: draft.object_groups,
			root_objects: draft.root_objects,
		});
	}

	fn gid_node(&mut self, run: &mut GidRun, node: &FileNode, dependency: Option<&GlobalIdTable>) -> bool {
		if !node.fnd.is_global_id_table() {
			return false;
		}
		match node.fnd {
			Fnd::GlobalIdTableStart { .. } | Fnd::GlobalIdTableStart2 => {
				if run.open.is_some() || run.table.is_some() {
					self.misplaced(node);
				} else {
					run.open = Some(vec![node.clone()]);
				}
			}
			Fnd::GlobalIdTableEntry { .. } | Fnd::GlobalIdTableEntry2 { .. } | Fnd::GlobalIdTableEntry3 { .. } => match run.open.as_mut() {
				Some(nodes) => nodes.push(node.clone()),
				None => self.misplaced(node),
			},
			Fnd::GlobalIdTableEnd => match run.open.take() {
				Some(nodes) => run.table = Some(GlobalIdTable::from_nodes(&nodes, dependency, self.diags)),
				None => self.misplaced(node),
			},
			_ => {}
		}
		true
	}

	fn close_gid_run(&mut self, run: &mut GidRun) {
		if run.open.take().is_some() {
			self.diags.push(
				Rule::GlobalIdTable,
				FormatError::MissingSentinel {
					what: "GlobalIdTableEndFNDX",
					expected: 1,
					found: 0,
				},
			);
		}
	}

	fn object_group(&mut self, object_group_id: ExtendedGuid, reference: FileChunkReference) -> Option<ObjectGroup> {
		let span = self.read_list("object group list", reference, 3)?;
		let mut group = ObjectGroup {
			object_group_id,
			reference,
			span,
			start_oid: None,
			ended: false,
			global_id_table: None,
		};
		let mut gid = GidRun::default();

		for index in span.range() {
			let node = self.node(index);
			let last = index + 1 == span.end;
			match node.fnd {
				Fnd::ObjectGroupStart { oid } if index == span.start => group.start_oid = Some(oid),
				Fnd::ObjectGroupEnd if last && index > span.start => group.ended = true,
				Fnd::ObjectGroupStart { .. } | Fnd::ObjectGroupEnd => self.misplaced(&node),
				_ if index == span.start => self.misplaced(&node),
				_ => {
					if !self.gid_node(&mut gid, &node, None) && !is_object_data_node(&node.fnd) {
						self.misplaced(&node);
					}
				}
			}
		}

		if !group.ended {
			self.diags.push(
				Rule::ObjectGroupEnd,
				FormatError::MissingSentinel {
					what: "ObjectGroupEndFND",
					expected: 1,
					found: 0,
				},
			);
		}
		self.close_gid_run(&mut gid);
		group.global_id_table = gid.table;
		Some(group)
	}

	fn file_data_store(&mut self, reference: FileChunkReference) -> Option<FileDataStore> {
		let span = self.read_list("file data store list", reference, 1)?;
		let mut store = FileDataStore {
			reference,
			span,
			objects: Vec::new(),
		};

		for index in span.range() {
			let node = self.node(index);
			match node.fnd {
				Fnd::FileDataStoreObjectReference { reference, guid_reference } => {
					let data_len = match read_file_data_store_object(self.bytes, reference) {
						Ok(len) => Some(len),
						Err((rule, err)) => {
							self.diags.push(rule, err);
							None
						}
					};
					store.objects.push(FileDataStoreEntry {
						guid_reference,
						reference,
						data_len,
					});
				}
				_ => self.misplaced(&node),
			}
		}
		Some(store)
	}
}

fn is_object_data_node(fnd: &Fnd) -> bool {
	matches!(
		fnd,
		Fnd::ObjectDeclarationWithRefCount(_)
			| Fnd::ObjectDeclarationWithRefCount2(_)
			| Fnd::ObjectRevisionWithRefCount(_)
			| Fnd::ObjectRevisionWithRefCount2(_)
			| Fnd::ObjectDeclaration2RefCount(_)
			| Fnd::ObjectDeclaration2LargeRefCount(_)
			| Fnd::ReadOnlyObjectDeclaration2RefCount(_)
			| Fnd::ReadOnlyObjectDeclaration2LargeRefCount(_)
			| Fnd::ObjectDeclarationFileData3RefCount(_)
			| Fnd::ObjectDeclarationFileData3LargeRefCount(_)
			| Fnd::ObjectInfoDependencyOverrides { .. }
			| Fnd::DataSignatureGroupDefinition { .. }
			| Fnd::HashedChunkDescriptor2 { .. }
	)
}

/// Check the envelope of a `FileDataStoreObject` and return its `cbLength`.
fn read_file_data_store_object(bytes: &[u8], reference: FileChunkReference) -> std::result::Result<u64, (Rule, FormatError)> {
	let range = reference.byte_range("FileDataStoreObject", bytes.len()).map_err(|err| (Rule::ChunkRange, err))?;
	let mut c = Cursor::window(bytes, range.start, range.end);
	let eof = |err| (Rule::FileDataStoreObject, err);

	let header = c.read_guid().map_err(eof)?;
	if header != FILE_DATA_STORE_OBJECT_HEADER {
		return Err((
			Rule::FileDataStoreObject,
			FormatError::BadMagicGuid {
				what: "FileDataStoreObject header",
				at: range.start as u64,
				expected: FILE_DATA_STORE_OBJECT_HEADER,
				found: header,
			},
		));
	}
	let cb_length = c.read_u64_le().map_err(eof)?;
	c.skip(4 + 8).map_err(eof)?;

	let data_at = range.start as u64 + FILE_DATA_STORE_OBJECT_PREFIX as u64;
	let out_of_range = (
		Rule::FileDataStoreObject,
		FormatError::ChunkOutOfRange {
			what: "FileData",
			location: data_at,
			size: cb_length,
			file_len: range.end as u64,
		},
	);
	let footer_at = match cb_length
		.checked_add(7)
		.map(|len| len & !7)
		.and_then(|padded| data_at.checked_add(padded))
	{
		Some(footer_at) if footer_at.saturating_add(16) <= range.end as u64 => footer_at,
		_ => return Err(out_of_range),
	};

	let mut tail = Cursor::window(bytes, footer_at as usize, range.end);
	let footer = tail.read_guid().map_err(eof)?;
	if footer != FILE_DATA_STORE_OBJECT_FOOTER {
		return Err((
			Rule::FileDataStoreObject,
			FormatError::BadMagicGuid {
				what: "FileDataStoreObject footer",
				at: footer_at,
				expected: FILE_DATA_STORE_OBJECT_FOOTER,
				found: footer,
			},
		));
	}
	Ok(cb_length)
}

#[cfg(test)]
mod tests;
