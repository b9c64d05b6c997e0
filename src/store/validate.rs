use std::collections::{HashMap, HashSet};

use crate::store::{Diagnostics, FileMeta, FormatError, Header, ObjectGraph, ObjectSpace, RevisionManifestList, Rule, TransactionLog};

/// Check identity, cardinality, and cross-reference rules over a built graph.
///
/// Every violation is recorded in `diags`; nothing here stops early.
pub fn validate(graph: &ObjectGraph, header: &Header, txlog: &TransactionLog, meta: &FileMeta, diags: &mut Diagnostics) {
	let before = diags.len();
	root_rules(graph, diags);
	for space in &graph.object_spaces {
		object_space_rules(space, diags);
	}
	object_group_rules(graph, diags);
	transaction_rules(graph, header, txlog, diags);
	file_data_rules(graph, diags);
	if let Some(file_name) = meta.file_name.as_deref() {
		header.verify_name_crc(file_name, diags);
	}
	tracing::debug!(target: "onestore::validate", violations = diags.len() - before, "structure validated");
}

fn cardinality(diags: &mut Diagnostics, rule: Rule, what: &'static str, expected: &'static str, found: usize) {
	diags.push(rule, FormatError::CardinalityViolation { what, expected, found });
}

fn root_rules(graph: &ObjectGraph, diags: &mut Diagnostics) {
	let root = &graph.root;
	if root.manifest_roots.len() != 1 {
		cardinality(diags, Rule::RootManifestRoot, "ObjectSpaceManifestRootFND", "exactly 1", root.manifest_roots.len());
	}
	if root.manifest_list_refs.is_empty() {
		cardinality(diags, Rule::RootManifestListReferences, "ObjectSpaceManifestListReferenceFND", "at least 1", 0);
	}
	if root.file_data_store_refs.len() > 1 {
		cardinality(diags, Rule::RootFileDataStore, "FileDataStoreListReferenceFND", "at most 1", root.file_data_store_refs.len());
	}

	if let [gosid_root] = root.manifest_roots.as_slice() {
		let matching = root.manifest_list_refs.iter().filter(|r| r.gosid == *gosid_root).count();
		if matching != 1 {
			cardinality(diags, Rule::GosidRootTarget, "object spaces matching gosidRoot", "exactly 1", matching);
		}
	}

	let mut seen = HashSet::new();
	for list_ref in &root.manifest_list_refs {
		if !seen.insert(list_ref.gosid) {
			diags.push(
				Rule::GosidUnique,
				FormatError::IdentityMismatch {
					what: "object space gosid",
					expected: "an id not used by another object space".to_owned(),
					found: list_ref.gosid.to_string(),
				},
			);
		}
	}
}

fn object_space_rules(space: &ObjectSpace, diags: &mut Diagnostics) {
	match space.start_gosid {
		Some(gosid) if gosid != space.gosid => diags.push(
			Rule::ManifestListStart,
			FormatError::IdentityMismatch {
				what: "ObjectSpaceManifestListStartFND gosid",
				expected: space.gosid.to_string(),
				found: gosid.to_string(),
			},
		),
		Some(_) => {}
		None => cardinality(diags, Rule::ManifestListStart, "ObjectSpaceManifestListStartFND", "exactly 1", 0),
	}

	if space.revision_lists.is_empty() {
		cardinality(diags, Rule::ManifestListRevisionLists, "RevisionManifestListReferenceFND", "at least 1", 0);
	}
	for list in &space.revision_lists {
		revision_list_rules(space, list, diags);
	}
}

fn revision_list_rules(space: &ObjectSpace, list: &RevisionManifestList, diags: &mut Diagnostics) {
	match list.start_gosid {
		Some(gosid) if gosid != space.gosid => diags.push(
			Rule::RevisionListStart,
			FormatError::IdentityMismatch {
				what: "RevisionManifestListStartFND gosid",
				expected: space.gosid.to_string(),
				found: gosid.to_string(),
			},
		),
		Some(_) => {}
		None => cardinality(diags, Rule::RevisionListStart, "RevisionManifestListStartFND", "exactly 1", 0),
	}

	if list.manifests.is_empty() {
		cardinality(diags, Rule::RevisionListManifests, "revision manifests", "at least 1", 0);
	}

	let mut earlier = HashSet::new();
	for manifest in &list.manifests {
		let rid = manifest.start.rid;
		if rid.is_nil() {
			diags.push(
				Rule::RevisionIdentity,
				FormatError::IdentityMismatch {
					what: "revision id",
					expected: "a non-nil id".to_owned(),
					found: rid.to_string(),
				},
			);
		}

		let dependent = manifest.start.rid_dependent;
		if !dependent.is_nil() && !earlier.contains(&dependent) {
			diags.push(
				Rule::RevisionDependency,
				FormatError::IdentityMismatch {
					what: "ridDependent",
					expected: "an earlier revision in the same list".to_owned(),
					found: dependent.to_string(),
				},
			);
		}

		if !rid.is_nil() && !earlier.insert(rid) {
			diags.push(
				Rule::RevisionIdentity,
				FormatError::IdentityMismatch {
					what: "revision id",
					expected: "an id not used by another revision in the list".to_owned(),
					found: rid.to_string(),
				},
			);
		}
	}
}

fn object_group_rules(graph: &ObjectGraph, diags: &mut Diagnostics) {
	let mut references: HashMap<u64, usize> = HashMap::new();
	for group in graph.object_groups() {
		*references.entry(group.reference.location()).or_default() += 1;
		let Some(oid) = group.start_oid else { continue };
		if oid != group.object_group_id {
			diags.push(
				Rule::ObjectGroupStart,
				FormatError::IdentityMismatch {
					what: "ObjectGroupStartFND oid",
					expected: group.object_group_id.to_string(),
					found: oid.to_string(),
				},
			);
		}
	}

	let mut shared: Vec<_> = references.into_iter().filter(|(_, count)| *count > 1).collect();
	shared.sort_unstable();
	for (_, count) in shared {
		cardinality(diags, Rule::ObjectGroupReferenceCount, "references to one object group list", "exactly 1", count);
	}
}

fn transaction_rules(graph: &ObjectGraph, header: &Header, txlog: &TransactionLog, diags: &mut Diagnostics) {
	if !txlog.ends_with_sentinel() {
		diags.push(
			Rule::TransactionSentinel,
			FormatError::MissingSentinel {
				what: "final transaction log entry",
				expected: 1,
				found: 0,
			},
		);
	}
	if txlog.sentinels != header.c_transactions_in_log {
		diags.push(
			Rule::TransactionCount,
			FormatError::MissingSentinel {
				what: "transaction log sentinels",
				expected: u64::from(header.c_transactions_in_log),
				found: u64::from(txlog.sentinels),
			},
		);
	}

	for list in &graph.lists {
		let Some(list_id) = list.list_id else { continue };
		let Some(committed) = txlog.node_count(list_id) else { continue };
		if list.complete && list.nodes_seen != committed as usize {
			diags.push(
				Rule::ListNodeCount,
				FormatError::IdentityMismatch {
					what: "committed node count",
					expected: format!("{committed} nodes in list 0x{list_id:x}"),
					found: list.nodes_seen.to_string(),
				},
			);
		}
	}
}

fn file_data_rules(graph: &ObjectGraph, diags: &mut Diagnostics) {
	let known: HashSet<_> = graph
		.file_data_store
		.iter()
		.flat_map(|store| &store.objects)
		.map(|object| object.guid_reference)
		.collect();

	for (node, decl) in graph.file_data_declarations() {
		if !decl.file_data_reference.starts_with("<ifndf>") {
			continue;
		}
		let resolved = decl.ifndf_guid().is_some_and(|guid| known.contains(&guid));
		if !resolved {
			tracing::debug!(target: "onestore::validate", at = node.offset, reference = %decl.file_data_reference, "unresolved file data reference");
			diags.push(
				Rule::FileDataReferenceTarget,
				FormatError::IdentityMismatch {
					what: "<ifndf> file data reference",
					expected: "a FileDataStoreObjectReferenceFND guid".to_owned(),
					found: decl.file_data_reference.clone(),
				},
			);
		}
	}
}
