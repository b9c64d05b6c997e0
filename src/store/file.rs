use std::fs;
use std::path::{Path, PathBuf};

use crate::store::validate::validate;
use crate::store::{Diagnostics, FileProfile, FormatError, Header, ObjectGraph, Result, TransactionLog};

/// Runtime limits and behavior switches for decoding.
#[derive(Debug, Clone)]
pub struct DecodeOptions {
	/// Maximum fragments followed in one list or in the transaction log.
	pub max_fragments_per_list: usize,
	/// Maximum nodes read from one list.
	pub max_nodes_per_list: usize,
	/// Maximum nesting of referenced lists below the root list.
	pub max_list_depth: usize,
	/// Stop each list at the node count committed by the transaction log.
	pub use_transaction_counts: bool,
	/// Check `crcName` when a file name is known.
	pub check_name_crc: bool,
}

impl Default for DecodeOptions {
	fn default() -> Self {
		Self {
			max_fragments_per_list: 4096,
			max_nodes_per_list: 1 << 20,
			max_list_depth: 8,
			use_transaction_counts: true,
			check_name_crc: true,
		}
	}
}

/// Facts about the input supplied by the caller.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileMeta {
	/// File name used for the `crcName` check.
	pub file_name: Option<String>,
}

impl FileMeta {
	/// Metadata for a named file.
	pub fn named(file_name: impl Into<String>) -> Self {
		Self {
			file_name: Some(file_name.into()),
		}
	}

	/// Derive metadata from the final component of `path`.
	pub fn from_path(path: &Path) -> Self {
		Self {
			file_name: path.file_name().map(|name| name.to_string_lossy().into_owned()),
		}
	}
}

/// Everything decoded from one file plus the violations found.
#[derive(Debug)]
pub struct Report {
	/// Decoded header.
	pub header: Header,
	/// Profile resolved from the header.
	pub profile: FileProfile,
	/// Transaction log.
	pub txlog: TransactionLog,
	/// Containment graph.
	pub graph: ObjectGraph,
	/// Violations in detection order.
	pub diagnostics: Diagnostics,
}

impl Report {
	/// Return whether no violation was recorded.
	pub fn is_clean(&self) -> bool {
		self.diagnostics.is_empty()
	}

	/// Fail-fast view: the first violation as an error, else the report.
	pub fn into_result(mut self) -> Result<Self> {
		let diagnostics = std::mem::take(&mut self.diagnostics);
		diagnostics.into_result()?;
		Ok(self)
	}
}

/// Decode and validate a whole revision store held in memory.
///
/// Only an unreadable header or an unknown file type is returned as an error;
/// every other violation is collected in [`Report::diagnostics`].
pub fn decode(bytes: &[u8], meta: &FileMeta, options: &DecodeOptions) -> Result<Report> {
	let header = Header::parse(bytes)?;
	let mut diagnostics = Diagnostics::new();
	let profile = header.verify(&mut diagnostics)?;

	let txlog = TransactionLog::read(bytes, &header, options, &mut diagnostics);
	let graph = ObjectGraph::build(bytes, &header, profile, &txlog, options, &mut diagnostics);

	let crc_meta = if options.check_name_crc { meta.clone() } else { FileMeta::default() };
	validate(&graph, &header, &txlog, &crc_meta, &mut diagnostics);

	tracing::debug!(
		target: "onestore::file",
		profile = profile.name(),
		len = bytes.len(),
		violations = diagnostics.len(),
		"decoded"
	);
	Ok(Report {
		header,
		profile,
		txlog,
		graph,
		diagnostics,
	})
}

/// A revision store file read into memory.
pub struct OneStoreFile {
	path: PathBuf,
	bytes: Vec<u8>,
	meta: FileMeta,
}

impl OneStoreFile {
	/// Read `path` and derive its metadata.
	pub fn open(path: impl AsRef<Path>) -> Result<Self> {
		let path = path.as_ref();
		let bytes = fs::read(path)?;
		if bytes.len() < Header::SIZE {
			return Err(FormatError::UnexpectedEof {
				at: 0,
				need: Header::SIZE,
				rem: bytes.len(),
			});
		}
		Ok(Self {
			path: path.to_path_buf(),
			bytes,
			meta: FileMeta::from_path(path),
		})
	}

	/// Path the file was read from.
	pub fn path(&self) -> &Path {
		&self.path
	}

	/// Raw file contents.
	pub fn bytes(&self) -> &[u8] {
		&self.bytes
	}

	/// Metadata derived from the path.
	pub fn meta(&self) -> &FileMeta {
		&self.meta
	}

	/// Parse the header without verifying it.
	pub fn header(&self) -> Result<Header> {
		Header::parse(&self.bytes)
	}

	/// Decode and validate the whole file.
	pub fn decode(&self, options: &DecodeOptions) -> Result<Report> {
		decode(&self.bytes, &self.meta, options)
	}
}

#[cfg(test)]
mod tests;
