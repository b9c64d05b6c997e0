use crate::store::{FormatError, Result};

/// Stable identifier for one structural rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Rule {
	/// Header `guidFileFormat` is the revision store GUID.
	HeaderFileFormat,
	/// The four code-version fields match the profile.
	HeaderCodeVersion,
	/// Legacy header fields hold their required values.
	HeaderLegacyFields,
	/// `cTransactionsInLog` is non-zero.
	HeaderTransactionCount,
	/// Transaction log and root list references are populated.
	HeaderRequiredReferences,
	/// Debug-log fields are zero.
	HeaderDebugFields,
	/// `rgbReserved` is all zero.
	HeaderReserved,
	/// `crcName` matches the file name.
	HeaderNameCrc,
	/// A chunk reference lies inside the file.
	ChunkRange,
	/// Fragment header magic and footer constants.
	FragmentMagic,
	/// Fragment list id floor and consistency.
	FragmentListId,
	/// Fragment sequence numbering.
	FragmentSequence,
	/// Chunk terminator placement and chain shape.
	FragmentChain,
	/// Node type, base type, and profile agree with the node table.
	NodeContext,
	/// Node declared size matches its payload.
	NodeSize,
	/// Reserved bits inside node payloads are zero.
	NodeReserved,
	/// Extended GUIDs with a nil GUID carry `n == 0`.
	ExtendedGuidNil,
	/// JCID file-data flag excludes the other flags.
	JcidFileData,
	/// File data reference strings carry a known prefix.
	FileDataReferencePrefix,
	/// `<ifndf>` references name an existing file data store object.
	FileDataReferenceTarget,
	/// File data store object header and footer GUIDs.
	FileDataStoreObject,
	/// Transaction log ends with a sentinel entry.
	TransactionSentinel,
	/// Sentinel count equals `cTransactionsInLog`.
	TransactionCount,
	/// Committed node counts match the lists that were read.
	ListNodeCount,
	/// Exactly one object space manifest root in the root list.
	RootManifestRoot,
	/// At least one object space manifest list reference in the root list.
	RootManifestListReferences,
	/// At most one file data store list reference in the root list.
	RootFileDataStore,
	/// `gosidRoot` names exactly one object space.
	GosidRootTarget,
	/// Object space ids are unique file-wide.
	GosidUnique,
	/// Object space manifest list start matches its reference.
	ManifestListStart,
	/// Each object space has at least one revision manifest list.
	ManifestListRevisionLists,
	/// Revision manifest list start matches its object space.
	RevisionListStart,
	/// Revision manifest list contains at least one manifest.
	RevisionListManifests,
	/// Revision manifest start/end marker shape.
	RevisionManifestShape,
	/// Revision ids are non-nil and unique per list.
	RevisionIdentity,
	/// Dependency revision names an earlier revision.
	RevisionDependency,
	/// Object group start oid matches the referencing group id.
	ObjectGroupStart,
	/// Object group list ends with its end marker.
	ObjectGroupEnd,
	/// Each object group list is referenced exactly once.
	ObjectGroupReferenceCount,
	/// Global identification table entries are consistent.
	GlobalIdTable,
	/// Decode limits from `DecodeOptions`.
	DecodeLimit,
}

impl Rule {
	/// Render the rule as a stable kebab-case code.
	pub fn code(self) -> &'static str {
		match self {
			Self::HeaderFileFormat => "header-file-format",
			Self::HeaderCodeVersion => "header-code-version",
			Self::HeaderLegacyFields => "header-legacy-fields",
			Self::HeaderTransactionCount => "header-transaction-count",
			Self::HeaderRequiredReferences => "header-required-references",
			Self::HeaderDebugFields => "header-debug-fields",
			Self::HeaderReserved => "header-reserved",
			Self::HeaderNameCrc => "header-name-crc",
			Self::ChunkRange => "chunk-range",
			Self::FragmentMagic => "fragment-magic",
			Self::FragmentListId => "fragment-list-id",
			Self::FragmentSequence => "fragment-sequence",
			Self::FragmentChain => "fragment-chain",
			Self::NodeContext => "node-context",
			Self::NodeSize => "node-size",
			Self::NodeReserved => "node-reserved",
			Self::ExtendedGuidNil => "extended-guid-nil",
			Self::JcidFileData => "jcid-file-data",
			Self::FileDataReferencePrefix => "file-data-reference-prefix",
			Self::FileDataReferenceTarget => "file-data-reference-target",
			Self::FileDataStoreObject => "file-data-store-object",
			Self::TransactionSentinel => "transaction-sentinel",
			Self::TransactionCount => "transaction-count",
			Self::ListNodeCount => "list-node-count",
			Self::RootManifestRoot => "root-manifest-root",
			Self::RootManifestListReferences => "root-manifest-list-references",
			Self::RootFileDataStore => "root-file-data-store",
			Self::GosidRootTarget => "gosid-root-target",
			Self::GosidUnique => "gosid-unique",
			Self::ManifestListStart => "manifest-list-start",
			Self::ManifestListRevisionLists => "manifest-list-revision-lists",
			Self::RevisionListStart => "revision-list-start",
			Self::RevisionListManifests => "revision-list-manifests",
			Self::RevisionManifestShape => "revision-manifest-shape",
			Self::RevisionIdentity => "revision-identity",
			Self::RevisionDependency => "revision-dependency",
			Self::ObjectGroupStart => "object-group-start",
			Self::ObjectGroupEnd => "object-group-end",
			Self::ObjectGroupReferenceCount => "object-group-reference-count",
			Self::GlobalIdTable => "global-id-table",
			Self::DecodeLimit => "decode-limit",
		}
	}
}

/// One recorded rule violation.
#[derive(Debug)]
pub struct Diagnostic {
	/// Rule that was violated.
	pub rule: Rule,
	/// Typed violation with offset or field context.
	pub error: FormatError,
}

/// Ordered accumulator of rule violations for one decode session.
#[derive(Debug, Default)]
pub struct Diagnostics {
	items: Vec<Diagnostic>,
}

impl Diagnostics {
	/// Create an empty accumulator.
	pub fn new() -> Self {
		Self::default()
	}

	/// Record one violation.
	pub fn push(&mut self, rule: Rule, error: FormatError) {
		tracing::debug!(target: "onestore::diag", rule = rule.code(), %error, "violation");
		self.items.push(Diagnostic { rule, error });
	}

	/// Move every violation from `other` into this accumulator.
	pub fn extend(&mut self, other: Diagnostics) {
		self.items.extend(other.items);
	}

	/// Return recorded violations in detection order.
	pub fn items(&self) -> &[Diagnostic] {
		&self.items
	}

	/// Return number of recorded violations.
	pub fn len(&self) -> usize {
		self.items.len()
	}

	/// Return whether nothing was recorded.
	pub fn is_empty(&self) -> bool {
		self.items.is_empty()
	}

	/// Return whether any violation of `rule` was recorded.
	pub fn has(&self, rule: Rule) -> bool {
		self.items.iter().any(|item| item.rule == rule)
	}

	/// Iterate violations recorded for `rule`.
	pub fn for_rule(&self, rule: Rule) -> impl Iterator<Item = &Diagnostic> {
		self.items.iter().filter(move |item| item.rule == rule)
	}

	/// Consume the accumulator, returning the violations.
	pub fn into_vec(self) -> Vec<Diagnostic> {
		self.items
	}

	/// Fail-fast view: the first recorded violation, if any, as an error.
	pub fn into_result(self) -> Result<()> {
		match self.items.into_iter().next() {
			Some(first) => Err(first.error),
			None => Ok(()),
		}
	}
}

impl IntoIterator for Diagnostics {
	type Item = Diagnostic;
	type IntoIter = std::vec::IntoIter<Diagnostic>;

	fn into_iter(self) -> Self::IntoIter {
		self.items.into_iter()
	}
}
