use thiserror::Error;
use uuid::Uuid;

use crate::store::FileProfile;

/// Crate-local result type.
pub type Result<T> = std::result::Result<T, FormatError>;

/// Errors produced while decoding and validating revision store data.
#[derive(Debug, Error)]
pub enum FormatError {
	/// Filesystem or stream IO failure.
	#[error("io: {0}")]
	Io(#[from] std::io::Error),
	/// Not enough bytes remained for a requested read.
	#[error("unexpected eof at offset {at}, need {need} bytes, remaining {rem}")]
	UnexpectedEof {
		/// Byte offset where the read was attempted.
		at: u64,
		/// Requested bytes.
		need: usize,
		/// Bytes still available.
		rem: usize,
	},
	/// Header `guidFileType` is neither the `.one` nor the `.onetoc2` GUID.
	#[error("unknown file type {guid}")]
	UnknownFileType {
		/// Value read from the header.
		guid: Uuid,
	},
	/// Header `guidFileFormat` is not the revision store format GUID.
	#[error("unknown file format {guid}")]
	UnknownFileFormat {
		/// Value read from the header.
		guid: Uuid,
	},
	/// A code-version field does not match the resolved profile.
	#[error("{field} is 0x{found:08x}, expected 0x{expected:08x}")]
	VersionMismatch {
		/// Header field name.
		field: &'static str,
		/// Constant required by the profile.
		expected: u32,
		/// Value read from the header.
		found: u32,
	},
	/// A magic or footer constant did not match.
	#[error("bad {what} at offset {at}: expected 0x{expected:016x}, found 0x{found:016x}")]
	BadMagicOrFooter {
		/// Which constant was checked.
		what: &'static str,
		/// File offset of the constant.
		at: u64,
		/// Required value.
		expected: u64,
		/// Value read from the file.
		found: u64,
	},
	/// A GUID-valued magic did not match.
	#[error("bad {what} at offset {at}: expected {expected}, found {found}")]
	BadMagicGuid {
		/// Which constant was checked.
		what: &'static str,
		/// File offset of the constant.
		at: u64,
		/// Required value.
		expected: Uuid,
		/// Value read from the file.
		found: Uuid,
	},
	/// Node type is not allowed with this base type, profile, or position.
	#[error("node type 0x{type_id:03x} (base type {base_type}) is not valid here in a {profile} file (offset {at})")]
	InvalidNodeContext {
		/// Node type id.
		type_id: u16,
		/// Encoded base type.
		base_type: u8,
		/// File profile being decoded.
		profile: FileProfile,
		/// File offset of the node header.
		at: u64,
	},
	/// Node type id does not appear in the node table.
	#[error("unknown node type 0x{type_id:03x} at offset {at}")]
	UnknownNodeType {
		/// Node type id.
		type_id: u16,
		/// File offset of the node header.
		at: u64,
	},
	/// Node payload did not consume exactly the declared size.
	#[error("node 0x{type_id:03x} at offset {at} declares {declared} bytes but decodes {consumed}")]
	NodeSizeMismatch {
		/// Node type id.
		type_id: u16,
		/// File offset of the node header.
		at: u64,
		/// Size from the node header.
		declared: usize,
		/// Bytes consumed by header and payload.
		consumed: usize,
	},
	/// A required terminating sentinel is absent.
	#[error("missing sentinel in {what}: expected {expected}, found {found}")]
	MissingSentinel {
		/// Structure missing the sentinel.
		what: &'static str,
		/// Expected sentinel count.
		expected: u64,
		/// Observed sentinel count.
		found: u64,
	},
	/// A forward reference and its target disagree on identity.
	#[error("{what}: expected {expected}, found {found}")]
	IdentityMismatch {
		/// Cross-reference being checked.
		what: &'static str,
		/// Identity required by the referencing side.
		expected: String,
		/// Identity found on the target side.
		found: String,
	},
	/// A node kind occurred the wrong number of times.
	#[error("{what}: expected {expected}, found {found}")]
	CardinalityViolation {
		/// Node kind or structure being counted.
		what: &'static str,
		/// Allowed count, rendered for humans.
		expected: &'static str,
		/// Observed count.
		found: usize,
	},
	/// A reserved or legacy field holds a non-zero value.
	#[error("reserved field {field} is non-zero (offset {at})")]
	ReservedFieldNonZero {
		/// Field name.
		field: &'static str,
		/// File offset of the owning structure.
		at: u64,
	},
	/// A chunk reference does not hold the sentinel the format requires.
	#[error("{field} must be {sentinel}")]
	SentinelExpected {
		/// Field name.
		field: &'static str,
		/// Required sentinel label (`fcrNil`, `fcrZero`, or a negated form).
		sentinel: &'static str,
	},
	/// Stored name CRC differs from the computed one.
	#[error("crcName is 0x{stored:08x}, computed 0x{computed:08x} for {file_name:?}")]
	CrcMismatch {
		/// Value stored in the header.
		stored: u32,
		/// Value computed from the file name.
		computed: u32,
		/// Name the CRC was computed over.
		file_name: String,
	},
	/// File data reference string has no recognised prefix.
	#[error("file data reference {value:?} at offset {at} has no <file>, <ifndf>, or <invfdo> prefix")]
	StringPrefixViolation {
		/// File offset of the owning node.
		at: u64,
		/// Decoded string.
		value: String,
	},
	/// A chunk reference points outside the file.
	#[error("{what} chunk 0x{location:x}+{size} exceeds file length {file_len}")]
	ChunkOutOfRange {
		/// Structure the reference points to.
		what: &'static str,
		/// Effective location.
		location: u64,
		/// Effective size.
		size: u64,
		/// Length of the backing buffer.
		file_len: u64,
	},
	/// File node list id below the reserved floor.
	#[error("file node list id 0x{list_id:x} at offset {at} is below 0x10")]
	InvalidListId {
		/// Decoded list id.
		list_id: u32,
		/// File offset of the fragment.
		at: u64,
	},
	/// Fragment sequence did not continue from the previous fragment.
	#[error("list 0x{list_id:x} fragment at offset {at} has sequence {found}, expected {expected}")]
	FragmentSequence {
		/// List being read.
		list_id: u32,
		/// File offset of the fragment.
		at: u64,
		/// Expected sequence number.
		expected: u32,
		/// Decoded sequence number.
		found: u32,
	},
	/// A chunk terminator appeared in the final fragment of a list.
	#[error("chunk terminator at offset {at} in final fragment of list 0x{list_id:x}")]
	UnexpectedTerminator {
		/// List being read.
		list_id: u32,
		/// File offset of the terminator node.
		at: u64,
	},
	/// A fragment chain revisits a fragment.
	#[error("chunk chain revisits offset 0x{location:x}")]
	ChunkCycle {
		/// Revisited location.
		location: u64,
	},
	/// A configured decode limit was exceeded.
	#[error("{what} exceeded limit {limit}")]
	LimitExceeded {
		/// Limit being enforced.
		what: &'static str,
		/// Configured ceiling.
		limit: usize,
	},
	/// A global identification table lookup found no entry.
	#[error("{what}: no entry for index {index}")]
	UnresolvedIndex {
		/// Lookup being performed.
		what: &'static str,
		/// Missing index.
		index: u32,
	},
}
