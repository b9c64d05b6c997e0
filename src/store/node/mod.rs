mod fnd;
mod table;

pub use fnd::{
	DependencyOverrideData, FileDataDeclaration, Fnd, ObjectDeclaration, ObjectDeclaration2Body, ObjectDeclarationBody, ObjectDeclarationWithRefCountBody,
	ObjectRevision, RevisionManifestStart,
};
pub use table::{BaseType, NODE_TYPES, NodeSpec, Profiles, node_spec};

use crate::store::bytes::Cursor;
use crate::store::{ChunkLayout, Diagnostics, FileProfile, FormatError, Result};

use self::fnd::{PayloadContext, decode_payload};

/// Packed 4-byte file node header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileNodeHeader {
	/// 10-bit node type id.
	pub type_id: u16,
	/// 13-bit node size in bytes, header included.
	pub size: u16,
	/// 2-bit location format of the leading chunk reference.
	pub stp_format: u8,
	/// 2-bit size format of the leading chunk reference.
	pub cb_format: u8,
	/// 4-bit base type.
	pub base_type: u8,
	/// Top bit; written as 1 and ignored on read.
	pub reserved: bool,
}

impl FileNodeHeader {
	/// Encoded header size in bytes.
	pub const SIZE: usize = 4;

	/// Unpack from the little-endian 32-bit form.
	pub fn from_u32(raw: u32) -> Self {
		Self {
			type_id: (raw & 0x3FF) as u16,
			size: ((raw >> 10) & 0x1FFF) as u16,
			stp_format: ((raw >> 23) & 0b11) as u8,
			cb_format: ((raw >> 25) & 0b11) as u8,
			base_type: ((raw >> 27) & 0xF) as u8,
			reserved: raw >> 31 != 0,
		}
	}

	/// Pack into the 32-bit form.
	pub fn to_u32(self) -> u32 {
		u32::from(self.type_id & 0x3FF)
			| (u32::from(self.size & 0x1FFF) << 10)
			| (u32::from(self.stp_format & 0b11) << 23)
			| (u32::from(self.cb_format & 0b11) << 25)
			| (u32::from(self.base_type & 0xF) << 27)
			| (u32::from(self.reserved) << 31)
	}

	/// Chunk reference layout selected by the format bits.
	pub fn ref_layout(&self) -> ChunkLayout {
		ChunkLayout::from_node_formats(self.stp_format, self.cb_format)
	}
}

/// One decoded record from a file node list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileNode {
	/// Absolute file offset of the node header.
	pub offset: u64,
	/// Packed header fields.
	pub header: FileNodeHeader,
	/// Typed payload.
	pub fnd: Fnd,
}

impl FileNode {
	/// Decode the node at absolute offset `at`.
	///
	/// The payload window is bounded by the declared size. Violations of reserved
	/// fields are recorded in `diags`; structural failures are returned.
	pub fn parse(bytes: &[u8], at: usize, profile: FileProfile, diags: &mut Diagnostics) -> Result<Self> {
		let mut head = Cursor::window(bytes, at, bytes.len());
		if head.pos() != at {
			return Err(FormatError::UnexpectedEof {
				at: at as u64,
				need: FileNodeHeader::SIZE,
				rem: 0,
			});
		}
		let header = FileNodeHeader::from_u32(head.read_u32_le()?);
		let offset = at as u64;

		let spec = node_spec(header.type_id).ok_or(FormatError::UnknownNodeType {
			type_id: header.type_id,
			at: offset,
		})?;
		if BaseType::from_bits(header.base_type) != Some(spec.base_type) || !spec.profiles.allows(profile) {
			return Err(FormatError::InvalidNodeContext {
				type_id: header.type_id,
				base_type: header.base_type,
				profile,
				at: offset,
			});
		}

		let declared = usize::from(header.size);
		let size_mismatch = |consumed: usize| FormatError::NodeSizeMismatch {
			type_id: header.type_id,
			at: offset,
			declared,
			consumed,
		};
		if declared < FileNodeHeader::SIZE {
			return Err(size_mismatch(FileNodeHeader::SIZE));
		}

		let end = at + declared;
		let mut c = Cursor::window(bytes, at + FileNodeHeader::SIZE, end);
		let mut cx = PayloadContext {
			bytes,
			at: offset,
			layout: header.ref_layout(),
			diags,
		};
		let fnd = match decode_payload(header.type_id, &mut c, &mut cx) {
			Ok(fnd) => fnd,
			Err(FormatError::UnexpectedEof { at: eof_at, need, .. }) if end <= bytes.len() => {
				let consumed = (eof_at as usize + need).saturating_sub(at);
				return Err(size_mismatch(consumed));
			}
			Err(err) => return Err(err),
		};

		let consumed = c.pos() - at;
		if consumed != declared {
			return Err(size_mismatch(consumed));
		}

		tracing::trace!(target: "onestore::node", type_id = header.type_id, name = spec.name, offset, size = declared, "node");
		Ok(Self { offset, header, fnd })
	}

	/// Node type id.
	pub fn type_id(&self) -> u16 {
		self.header.type_id
	}

	/// Declared size in bytes, header included.
	pub fn size(&self) -> usize {
		usize::from(self.header.size)
	}

	/// Documented name of the node type.
	pub fn name(&self) -> &'static str {
		node_spec(self.header.type_id).map_or("unknown", |spec| spec.name)
	}
}

#[cfg(test)]
mod tests;
