mod bytes;
mod chunk;
mod diag;
mod error;
mod file;
mod gid;
mod graph;
mod header;
mod ids;
mod list;
mod node;
mod txlog;
mod validate;

/// Bounded little-endian reader over file bytes.
pub use bytes::Cursor;
/// Chunk reference codec.
pub use chunk::{ChunkLayout, FileChunkReference};
/// Rule identifiers and the violation accumulator.
pub use diag::{Diagnostic, Diagnostics, Rule};
/// Error and result aliases.
pub use error::{FormatError, Result};
/// Session entry points, options, and report.
pub use file::{DecodeOptions, FileMeta, OneStoreFile, Report, decode};
/// Global identification table.
pub use gid::GlobalIdTable;
/// Containment graph types.
pub use graph::{
	FILE_DATA_STORE_OBJECT_FOOTER, FILE_DATA_STORE_OBJECT_HEADER, FileDataStore, FileDataStoreEntry, ListSummary, ManifestListRef, NodeSpan,
	ObjectGraph, ObjectGroup, ObjectSpace, RevisionManifest, RevisionManifestList, RoleDeclaration, RootList, RootObject,
};
/// File header, profile, and name CRC.
pub use header::{FileProfile, Header, ONE_FILE_TYPE, ONETOC2_FILE_TYPE, REVISION_STORE_FORMAT, name_crc};
/// Identity types shared by node payloads.
pub use ids::{CompactId, ExtendedGuid, Jcid, guid_label};
/// File node list reader.
pub use list::{
	FRAGMENT_FOOTER_MAGIC, FRAGMENT_HEADER_MAGIC, FileNodeIter, FileNodeListReader, IterState, ListContents, MIN_LIST_ID, NodeCounts,
};
/// File node records and the node type table.
pub use node::{
	BaseType, DependencyOverrideData, FileDataDeclaration, FileNode, FileNodeHeader, Fnd, NODE_TYPES, NodeSpec, ObjectDeclaration,
	ObjectDeclaration2Body, ObjectDeclarationBody, ObjectDeclarationWithRefCountBody, ObjectRevision, Profiles, RevisionManifestStart,
	node_spec,
};
/// Transaction log.
pub use txlog::{SENTINEL_SRC_ID, TransactionEntry, TransactionLog};
/// Structural validator.
pub use validate::validate;
