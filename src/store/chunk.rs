use std::ops::Range;

use crate::store::bytes::Cursor;
use crate::store::{FormatError, Result};

/// Field widths and scaling for one chunk reference encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkLayout {
	/// Width of the location field in bytes (2, 4, or 8).
	pub location_width: u8,
	/// Width of the size field in bytes (1, 2, 4, or 8).
	pub size_width: u8,
	/// Stored location is the effective location divided by 8.
	pub location_scaled: bool,
	/// Stored size is the effective size divided by 8.
	pub size_scaled: bool,
}

impl ChunkLayout {
	/// `FileChunkReference32`: 32-bit location and size.
	pub const FCR32: Self = Self::plain(4, 4);
	/// `FileChunkReference64`: 64-bit location and size.
	pub const FCR64: Self = Self::plain(8, 8);
	/// `FileChunkReference64x32`: 64-bit location, 32-bit size.
	pub const FCR64X32: Self = Self::plain(8, 4);

	const fn plain(location_width: u8, size_width: u8) -> Self {
		Self {
			location_width,
			size_width,
			location_scaled: false,
			size_scaled: false,
		}
	}

	/// Layout selected by a file node header's `StpFormat` and `CbFormat` bits.
	pub fn from_node_formats(stp_format: u8, cb_format: u8) -> Self {
		let (location_width, location_scaled) = match stp_format & 0b11 {
			0 => (8, false),
			1 => (4, false),
			2 => (2, true),
			_ => (4, true),
		};
		let (size_width, size_scaled) = match cb_format & 0b11 {
			0 => (4, false),
			1 => (8, false),
			2 => (1, true),
			_ => (2, true),
		};
		Self {
			location_width,
			size_width,
			location_scaled,
			size_scaled,
		}
	}

	/// Encoded length in bytes.
	pub fn encoded_len(self) -> usize {
		usize::from(self.location_width) + usize::from(self.size_width)
	}

	fn location_mask(self) -> u64 {
		width_mask(self.location_width)
	}
}

fn width_mask(width: u8) -> u64 {
	if width >= 8 { u64::MAX } else { (1_u64 << (u32::from(width) * 8)) - 1 }
}

/// A `(location, size)` pointer into the file.
///
/// Raw stored values are kept alongside the layout so the `fcrNil` and `fcrZero`
/// sentinels are recognised by bit pattern rather than by effective value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileChunkReference {
	raw_location: u64,
	raw_size: u64,
	layout: ChunkLayout,
}

impl FileChunkReference {
	/// Build from raw stored values.
	pub fn from_raw(raw_location: u64, raw_size: u64, layout: ChunkLayout) -> Self {
		Self {
			raw_location: raw_location & layout.location_mask(),
			raw_size: raw_size & width_mask(layout.size_width),
			layout,
		}
	}

	/// The `fcrNil` sentinel for `layout`.
	pub fn nil(layout: ChunkLayout) -> Self {
		Self::from_raw(u64::MAX, 0, layout)
	}

	/// The `fcrZero` sentinel for `layout`.
	pub fn zero(layout: ChunkLayout) -> Self {
		Self::from_raw(0, 0, layout)
	}

	/// Decode a reference at `offset` of `bytes`.
	pub fn decode(bytes: &[u8], offset: usize, layout: ChunkLayout) -> Result<Self> {
		let mut cursor = Cursor::window(bytes, offset, bytes.len());
		if cursor.pos() != offset {
			return Err(FormatError::UnexpectedEof {
				at: offset as u64,
				need: layout.encoded_len(),
				rem: 0,
			});
		}
		Self::read(&mut cursor, layout)
	}

	/// Read a reference at the cursor position.
	pub fn read(cursor: &mut Cursor<'_>, layout: ChunkLayout) -> Result<Self> {
		let raw_location = cursor.read_uint(layout.location_width)?;
		let raw_size = cursor.read_uint(layout.size_width)?;
		Ok(Self {
			raw_location,
			raw_size,
			layout,
		})
	}

	/// Return the encoding layout.
	pub fn layout(&self) -> ChunkLayout {
		self.layout
	}

	/// Return the stored location value.
	pub fn raw_location(&self) -> u64 {
		self.raw_location
	}

	/// Return the stored size value.
	pub fn raw_size(&self) -> u64 {
		self.raw_size
	}

	/// Effective byte location.
	pub fn location(&self) -> u64 {
		if self.layout.location_scaled { self.raw_location.saturating_mul(8) } else { self.raw_location }
	}

	/// Effective byte size.
	pub fn size(&self) -> u64 {
		if self.layout.size_scaled { self.raw_size.saturating_mul(8) } else { self.raw_size }
	}

	/// Every location bit set and size zero.
	pub fn is_nil(&self) -> bool {
		self.raw_location == self.layout.location_mask() && self.raw_size == 0
	}

	/// Location and size both zero.
	pub fn is_zero(&self) -> bool {
		self.raw_location == 0 && self.raw_size == 0
	}

	/// Neither sentinel.
	pub fn is_populated(&self) -> bool {
		!self.is_nil() && !self.is_zero()
	}

	/// Validate against the file length and return the referenced byte range.
	pub fn byte_range(&self, what: &'static str, file_len: usize) -> Result<Range<usize>> {
		let out_of_range = || FormatError::ChunkOutOfRange {
			what,
			location: self.location(),
			size: self.size(),
			file_len: file_len as u64,
		};

		let end = self.location().checked_add(self.size()).ok_or_else(out_of_range)?;
		if end > file_len as u64 {
			return Err(out_of_range());
		}
		Ok(self.location() as usize..end as usize)
	}

	/// Append the raw stored encoding.
	pub fn encode(&self, out: &mut Vec<u8>) {
		let location = self.raw_location.to_le_bytes();
		let size = self.raw_size.to_le_bytes();
		out.extend_from_slice(&location[..usize::from(self.layout.location_width)]);
		out.extend_from_slice(&size[..usize::from(self.layout.size_width)]);
	}
}

#[cfg(test)]
mod tests;
