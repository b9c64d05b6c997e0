use std::fmt;

use uuid::{Uuid, uuid};

use crate::store::bytes::Cursor;
use crate::store::{ChunkLayout, Diagnostics, FileChunkReference, FormatError, Result, Rule};

/// `guidFileType` of a `.one` section file.
pub const ONE_FILE_TYPE: Uuid = uuid!("7B5C52E4-D88C-4DA7-AEB1-5378D02996D3");
/// `guidFileType` of a `.onetoc2` table-of-contents file.
pub const ONETOC2_FILE_TYPE: Uuid = uuid!("43FF2FA1-EFD9-4C76-9EE2-10EA5722765F");
/// `guidFileFormat` of every revision store file.
pub const REVISION_STORE_FORMAT: Uuid = uuid!("109ADD3F-911B-49F5-A5D0-1791EDC8AED8");

/// File flavour resolved from `guidFileType`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileProfile {
	/// `.one` section file.
	One,
	/// `.onetoc2` table-of-contents file.
	OneToc2,
}

impl FileProfile {
	/// Resolve a profile from a `guidFileType` value.
	pub fn from_file_type(guid: Uuid) -> Option<Self> {
		[Self::One, Self::OneToc2].into_iter().find(|profile| profile.file_type() == guid)
	}

	/// Return the `guidFileType` for this profile.
	pub fn file_type(self) -> Uuid {
		match self {
			Self::One => ONE_FILE_TYPE,
			Self::OneToc2 => ONETOC2_FILE_TYPE,
		}
	}

	/// Value every `ffv*` header field must hold.
	pub fn code_version(self) -> u32 {
		match self {
			Self::One => 0x2A,
			Self::OneToc2 => 0x1B,
		}
	}

	/// Short lower-case name used in reports.
	pub fn name(self) -> &'static str {
		match self {
			Self::One => "one",
			Self::OneToc2 => "onetoc2",
		}
	}
}

impl fmt::Display for FileProfile {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, ".{}", self.name())
	}
}

const AT_GUID_LEGACY_FILE_VERSION: u64 = 32;
const AT_CB_LEGACY_EXPECTED_FILE_LENGTH: u64 = 100;
const AT_RGB_PLACEHOLDER: u64 = 104;
const AT_CB_LEGACY_FREE_SPACE: u64 = 120;
const AT_GRF_DEBUG_LOG_FLAGS: u64 = 252;
const AT_RGB_RESERVED: u64 = 296;

/// Revision store file header, every field retained for exact re-encoding.
///
/// Field names are the snake-case forms of the documented header field names.
#[allow(missing_docs)]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
	pub guid_file_type: Uuid,
	pub guid_file: Uuid,
	pub guid_legacy_file_version: Uuid,
	pub guid_file_format: Uuid,
	pub ffv_last_code_that_wrote_to_this_file: u32,
	pub ffv_oldest_code_that_has_written_to_this_file: u32,
	pub ffv_newest_code_that_has_written_to_this_file: u32,
	pub ffv_oldest_code_that_may_read_this_file: u32,
	pub fcr_legacy_free_chunk_list: FileChunkReference,
	pub fcr_legacy_transaction_log: FileChunkReference,
	pub c_transactions_in_log: u32,
	pub cb_legacy_expected_file_length: u32,
	pub rgb_placeholder: u64,
	pub fcr_legacy_file_node_list_root: FileChunkReference,
	pub cb_legacy_free_space_in_free_chunk_list: u32,
	pub f_needs_defrag: u8,
	pub f_repaired_file: u8,
	pub f_needs_garbage_collect: u8,
	pub f_has_no_embedded_file_objects: u8,
	pub guid_ancestor: Uuid,
	pub crc_name: u32,
	pub fcr_hashed_chunk_list: FileChunkReference,
	pub fcr_transaction_log: FileChunkReference,
	pub fcr_file_node_list_root: FileChunkReference,
	pub fcr_free_chunk_list: FileChunkReference,
	pub cb_expected_file_length: u64,
	pub cb_free_space_in_free_chunk_list: u64,
	pub guid_file_version: Uuid,
	pub n_file_version_generation: u64,
	pub guid_deny_read_file_version: Uuid,
	pub grf_debug_log_flags: u32,
	pub fcr_debug_log: FileChunkReference,
	pub fcr_alloc_verification_free_chunk_list: FileChunkReference,
	pub bn_created: u32,
	pub bn_last_wrote_to_this_file: u32,
	pub bn_oldest_written: u32,
	pub bn_newest_written: u32,
	pub rgb_reserved: [u8; Header::RESERVED_LEN],
}

impl Header {
	/// Encoded header size in bytes.
	pub const SIZE: usize = 1024;
	/// Length of the trailing reserved area.
	pub const RESERVED_LEN: usize = 728;

	/// Decode every header field without checking any of them.
	pub fn parse(bytes: &[u8]) -> Result<Self> {
		if bytes.len() < Self::SIZE {
			return Err(FormatError::UnexpectedEof {
				at: 0,
				need: Self::SIZE,
				rem: bytes.len(),
			});
		}

		let mut c = Cursor::window(bytes, 0, Self::SIZE);
		Ok(Self {
			guid_file_type: c.read_guid()?,
			guid_file: c.read_guid()?,
			guid_legacy_file_version: c.read_guid()?,
			guid_file_format: c.read_guid()?,
			ffv_last_code_that_wrote_to_this_file: c.read_u32_le()?,
			ffv_oldest_code_that_has_written_to_this_file: c.read_u32_le()?,
			ffv_newest_code_that_has_written_to_this_file: c.read_u32_le()?,
			ffv_oldest_code_that_may_read_this_file: c.read_u32_le()?,
			fcr_legacy_free_chunk_list: FileChunkReference::read(&mut c, ChunkLayout::FCR32)?,
			fcr_legacy_transaction_log: FileChunkReference::read(&mut c, ChunkLayout::FCR32)?,
			c_transactions_in_log: c.read_u32_le()?,
			cb_legacy_expected_file_length: c.read_u32_le()?,
			rgb_placeholder: c.read_u64_le()?,
			fcr_legacy_file_node_list_root: FileChunkReference::read(&mut c, ChunkLayout::FCR32)?,
			cb_legacy_free_space_in_free_chunk_list: c.read_u32_le()?,
			f_needs_defrag: c.read_u8()?,
			f_repaired_file: c.read_u8()?,
			f_needs_garbage_collect: c.read_u8()?,
			f_has_no_embedded_file_objects: c.read_u8()?,
			guid_ancestor: c.read_guid()?,
			crc_name: c.read_u32_le()?,
			fcr_hashed_chunk_list: FileChunkReference::read(&mut c, ChunkLayout::FCR64X32)?,
			fcr_transaction_log: FileChunkReference::read(&mut c, ChunkLayout::FCR64X32)?,
			fcr_file_node_list_root: FileChunkReference::read(&mut c, ChunkLayout::FCR64X32)?,
			fcr_free_chunk_list: FileChunkReference::read(&mut c, ChunkLayout::FCR64X32)?,
			cb_expected_file_length: c.read_u64_le()?,
			cb_free_space_in_free_chunk_list: c.read_u64_le()?,
			guid_file_version: c.read_guid()?,
			n_file_version_generation: c.read_u64_le()?,
			guid_deny_read_file_version: c.read_guid()?,
			grf_debug_log_flags: c.read_u32_le()?,
			fcr_debug_log: FileChunkReference::read(&mut c, ChunkLayout::FCR64X32)?,
			fcr_alloc_verification_free_chunk_list: FileChunkReference::read(&mut c, ChunkLayout::FCR64X32)?,
			bn_created: c.read_u32_le()?,
			bn_last_wrote_to_this_file: c.read_u32_le()?,
			bn_oldest_written: c.read_u32_le()?,
			bn_newest_written: c.read_u32_le()?,
			rgb_reserved: c.read_array()?,
		})
	}

	/// Parse and verify, returning the first violation as an error.
	pub fn decode(bytes: &[u8]) -> Result<(Self, FileProfile)> {
		let header = Self::parse(bytes)?;
		let mut diags = Diagnostics::new();
		let profile = header.verify(&mut diags)?;
		diags.into_result()?;
		Ok((header, profile))
	}

	/// Resolve the file profile from `guidFileType`.
	pub fn profile(&self) -> Result<FileProfile> {
		FileProfile::from_file_type(self.guid_file_type).ok_or(FormatError::UnknownFileType { guid: self.guid_file_type })
	}

	/// Check every header rule.
	///
	/// An unknown `guidFileType` is fatal because nothing after the header can be
	/// interpreted without a profile. Every other violation is recorded in `diags`.
	pub fn verify(&self, diags: &mut Diagnostics) -> Result<FileProfile> {
		let profile = self.profile()?;

		if self.guid_file_format != REVISION_STORE_FORMAT {
			diags.push(Rule::HeaderFileFormat, FormatError::UnknownFileFormat { guid: self.guid_file_format });
		}

		let expected = profile.code_version();
		let versions = [
			("ffvLastCodeThatWroteToThisFile", self.ffv_last_code_that_wrote_to_this_file),
			("ffvOldestCodeThatHasWrittenToThisFile", self.ffv_oldest_code_that_has_written_to_this_file),
			("ffvNewestCodeThatHasWrittenToThisFile", self.ffv_newest_code_that_has_written_to_this_file),
			("ffvOldestCodeThatMayReadThisFile", self.ffv_oldest_code_that_may_read_this_file),
		];
		for (field, found) in versions {
			if found != expected {
				diags.push(Rule::HeaderCodeVersion, FormatError::VersionMismatch { field, expected, found });
			}
		}

		self.verify_legacy(diags);

		if self.c_transactions_in_log == 0 {
			diags.push(
				Rule::HeaderTransactionCount,
				FormatError::CardinalityViolation {
					what: "cTransactionsInLog",
					expected: "at least 1",
					found: 0,
				},
			);
		}

		for (field, fcr) in [("fcrTransactionLog", &self.fcr_transaction_log), ("fcrFileNodeListRoot", &self.fcr_file_node_list_root)] {
			if !fcr.is_populated() {
				diags.push(
					Rule::HeaderRequiredReferences,
					FormatError::SentinelExpected {
						field,
						sentinel: "neither fcrNil nor fcrZero",
					},
				);
			}
		}

		if self.grf_debug_log_flags != 0 {
			diags.push(
				Rule::HeaderDebugFields,
				FormatError::ReservedFieldNonZero {
					field: "grfDebugLogFlags",
					at: AT_GRF_DEBUG_LOG_FLAGS,
				},
			);
		}
		for (field, fcr) in [
			("fcrDebugLog", &self.fcr_debug_log),
			("fcrAllocVerificationFreeChunkList", &self.fcr_alloc_verification_free_chunk_list),
		] {
			if !fcr.is_zero() {
				diags.push(Rule::HeaderDebugFields, FormatError::SentinelExpected { field, sentinel: "fcrZero" });
			}
		}

		if self.rgb_reserved.iter().any(|byte| *byte != 0) {
			diags.push(
				Rule::HeaderReserved,
				FormatError::ReservedFieldNonZero {
					field: "rgbReserved",
					at: AT_RGB_RESERVED,
				},
			);
		}

		tracing::debug!(
			target: "onestore::header",
			profile = profile.name(),
			transactions = self.c_transactions_in_log,
			violations = diags.len(),
			"header verified"
		);
		Ok(profile)
	}

	fn verify_legacy(&self, diags: &mut Diagnostics) {
		if !self.guid_legacy_file_version.is_nil() {
			diags.push(
				Rule::HeaderLegacyFields,
				FormatError::ReservedFieldNonZero {
					field: "guidLegacyFileVersion",
					at: AT_GUID_LEGACY_FILE_VERSION,
				},
			);
		}
		if !self.fcr_legacy_free_chunk_list.is_zero() {
			diags.push(
				Rule::HeaderLegacyFields,
				FormatError::SentinelExpected {
					field: "fcrLegacyFreeChunkList",
					sentinel: "fcrZero",
				},
			);
		}
		for (field, fcr) in [
			("fcrLegacyTransactionLog", &self.fcr_legacy_transaction_log),
			("fcrLegacyFileNodeListRoot", &self.fcr_legacy_file_node_list_root),
		] {
			if !fcr.is_nil() {
				diags.push(Rule::HeaderLegacyFields, FormatError::SentinelExpected { field, sentinel: "fcrNil" });
			}
		}

		let scalars = [
			("cbLegacyExpectedFileLength", u64::from(self.cb_legacy_expected_file_length), AT_CB_LEGACY_EXPECTED_FILE_LENGTH),
			("rgbPlaceholder", self.rgb_placeholder, AT_RGB_PLACEHOLDER),
			(
				"cbLegacyFreeSpaceInFreeChunkList",
				u64::from(self.cb_legacy_free_space_in_free_chunk_list),
				AT_CB_LEGACY_FREE_SPACE,
			),
		];
		for (field, value, at) in scalars {
			if value != 0 {
				diags.push(Rule::HeaderLegacyFields, FormatError::ReservedFieldNonZero { field, at });
			}
		}
	}

	/// Compare `crcName` against the CRC of `file_name`, recording a mismatch.
	pub fn verify_name_crc(&self, file_name: &str, diags: &mut Diagnostics) {
		let computed = name_crc(file_name);
		if computed != self.crc_name {
			diags.push(
				Rule::HeaderNameCrc,
				FormatError::CrcMismatch {
					stored: self.crc_name,
					computed,
					file_name: file_name.to_owned(),
				},
			);
		}
	}

	/// Re-encode the header; the inverse of [`Header::parse`].
	pub fn encode(&self) -> Vec<u8> {
		let mut out = Vec::with_capacity(Self::SIZE);
		out.extend_from_slice(&self.guid_file_type.to_bytes_le());
		out.extend_from_slice(&self.guid_file.to_bytes_le());
		out.extend_from_slice(&self.guid_legacy_file_version.to_bytes_le());
		out.extend_from_slice(&self.guid_file_format.to_bytes_le());
		for version in [
			self.ffv_last_code_that_wrote_to_this_file,
			self.ffv_oldest_code_that_has_written_to_this_file,
			self.ffv_newest_code_that_has_written_to_this_file,
			self.ffv_oldest_code_that_may_read_this_file,
		] {
			out.extend_from_slice(&version.to_le_bytes());
		}
		self.fcr_legacy_free_chunk_list.encode(&mut out);
		self.fcr_legacy_transaction_log.encode(&mut out);
		out.extend_from_slice(&self.c_transactions_in_log.to_le_bytes());
		out.extend_from_slice(&self.cb_legacy_expected_file_length.to_le_bytes());
		out.extend_from_slice(&self.rgb_placeholder.to_le_bytes());
		self.fcr_legacy_file_node_list_root.encode(&mut out);
		out.extend_from_slice(&self.cb_legacy_free_space_in_free_chunk_list.to_le_bytes());
		out.extend_from_slice(&[
			self.f_needs_defrag,
			self.f_repaired_file,
			self.f_needs_garbage_collect,
			self.f_has_no_embedded_file_objects,
		]);
		out.extend_from_slice(&self.guid_ancestor.to_bytes_le());
		out.extend_from_slice(&self.crc_name.to_le_bytes());
		self.fcr_hashed_chunk_list.encode(&mut out);
		self.fcr_transaction_log.encode(&mut out);
		self.fcr_file_node_list_root.encode(&mut out);
		self.fcr_free_chunk_list.encode(&mut out);
		out.extend_from_slice(&self.cb_expected_file_length.to_le_bytes());
		out.extend_from_slice(&self.cb_free_space_in_free_chunk_list.to_le_bytes());
		out.extend_from_slice(&self.guid_file_version.to_bytes_le());
		out.extend_from_slice(&self.n_file_version_generation.to_le_bytes());
		out.extend_from_slice(&self.guid_deny_read_file_version.to_bytes_le());
		out.extend_from_slice(&self.grf_debug_log_flags.to_le_bytes());
		self.fcr_debug_log.encode(&mut out);
		self.fcr_alloc_verification_free_chunk_list.encode(&mut out);
		for bn in [self.bn_created, self.bn_last_wrote_to_this_file, self.bn_oldest_written, self.bn_newest_written] {
			out.extend_from_slice(&bn.to_le_bytes());
		}
		out.extend_from_slice(&self.rgb_reserved);
		out
	}
}

/// CRC-32 of a file name as stored in `crcName`.
///
/// The name is hashed as UTF-16LE code units followed by a terminating NUL unit.
pub fn name_crc(file_name: &str) -> u32 {
	let mut hasher = crc32fast::Hasher::new();
	for unit in file_name.encode_utf16() {
		hasher.update(&unit.to_le_bytes());
	}
	hasher.update(&[0, 0]);
	hasher.finalize()
}
