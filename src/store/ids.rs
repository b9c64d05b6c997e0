use std::fmt;

use uuid::Uuid;

use crate::store::bytes::Cursor;
use crate::store::{Diagnostics, FormatError, Result, Rule};

/// Render a GUID in the braced upper-case form used by the format documentation.
pub fn guid_label(guid: &Uuid) -> String {
	format!("{{{}}}", guid.hyphenated().to_string().to_uppercase())
}

/// Durable identity of object spaces, revisions, object groups, and contexts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ExtendedGuid {
	/// Base GUID.
	pub guid: Uuid,
	/// Sequence number under `guid`.
	pub n: u32,
}

impl ExtendedGuid {
	/// Encoded size in bytes.
	pub const SIZE: usize = 20;

	/// The all-zero identity.
	pub const NIL: Self = Self { guid: Uuid::nil(), n: 0 };

	/// Construct from parts.
	pub const fn new(guid: Uuid, n: u32) -> Self {
		Self { guid, n }
	}

	/// Read a 20-byte extended GUID.
	pub fn read(cursor: &mut Cursor<'_>) -> Result<Self> {
		let guid = cursor.read_guid()?;
		let n = cursor.read_u32_le()?;
		Ok(Self { guid, n })
	}

	/// Read and record a violation when a nil GUID carries a non-zero `n`.
	pub fn read_checked(cursor: &mut Cursor<'_>, field: &'static str, diags: &mut Diagnostics) -> Result<Self> {
		let at = cursor.pos() as u64;
		let value = Self::read(cursor)?;
		if value.guid.is_nil() && value.n != 0 {
			diags.push(Rule::ExtendedGuidNil, FormatError::ReservedFieldNonZero { field, at });
		}
		Ok(value)
	}

	/// Return whether both parts are zero.
	pub fn is_nil(&self) -> bool {
		self.guid.is_nil() && self.n == 0
	}

	/// Append the on-disk encoding.
	pub fn encode(&self, out: &mut Vec<u8>) {
		out.extend_from_slice(&self.guid.to_bytes_le());
		out.extend_from_slice(&self.n.to_le_bytes());
	}
}

impl fmt::Display for ExtendedGuid {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}:{}", guid_label(&self.guid), self.n)
	}
}

/// Compact reference resolved through a global identification table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CompactId {
	/// Sequence number carried into the resolved [`ExtendedGuid`].
	pub n: u8,
	/// 24-bit index into the global identification table.
	pub guid_index: u32,
}

impl CompactId {
	/// Decode from the packed 32-bit form.
	pub fn from_u32(raw: u32) -> Self {
		Self {
			n: (raw & 0xFF) as u8,
			guid_index: raw >> 8,
		}
	}

	/// Read a 4-byte compact id.
	pub fn read(cursor: &mut Cursor<'_>) -> Result<Self> {
		Ok(Self::from_u32(cursor.read_u32_le()?))
	}

	/// Return whether the id is all zero.
	pub fn is_zero(&self) -> bool {
		self.n == 0 && self.guid_index == 0
	}
}

impl fmt::Display for CompactId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "#{}:{}", self.guid_index, self.n)
	}
}

/// Bit-packed object classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Jcid {
	/// Object type index.
	pub index: u16,
	/// Object holds binary data.
	pub is_binary: bool,
	/// Object holds a property set.
	pub is_property_set: bool,
	/// Object is a graph node.
	pub is_graph_node: bool,
	/// Object is a file data object.
	pub is_file_data: bool,
	/// Object data must not change on revision.
	pub is_read_only: bool,
	/// Upper 11 bits, required zero.
	pub reserved: u16,
}

impl Jcid {
	/// Decode from the packed 32-bit form.
	pub fn from_u32(raw: u32) -> Self {
		Self {
			index: (raw & 0xFFFF) as u16,
			is_binary: raw & (1 << 16) != 0,
			is_property_set: raw & (1 << 17) != 0,
			is_graph_node: raw & (1 << 18) != 0,
			is_file_data: raw & (1 << 19) != 0,
			is_read_only: raw & (1 << 20) != 0,
			reserved: (raw >> 21) as u16,
		}
	}

	/// Read a JCID and record reserved-bit and file-data flag violations.
	pub fn read_checked(cursor: &mut Cursor<'_>, diags: &mut Diagnostics) -> Result<Self> {
		let at = cursor.pos() as u64;
		let jcid = Self::from_u32(cursor.read_u32_le()?);
		if jcid.reserved != 0 {
			diags.push(Rule::NodeReserved, FormatError::ReservedFieldNonZero { field: "JCID.Reserved", at });
		}
		if jcid.is_file_data && (jcid.is_binary || jcid.is_property_set || jcid.is_graph_node || jcid.is_read_only) {
			diags.push(
				Rule::JcidFileData,
				FormatError::ReservedFieldNonZero {
					field: "JCID flags with IsFileData",
					at,
				},
			);
		}
		Ok(jcid)
	}
}
