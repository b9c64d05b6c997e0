use uuid::Uuid;

use crate::store::{FormatError, Result};

/// Bounded little-endian cursor over a window of an immutable file buffer.
///
/// Positions are absolute file offsets so errors can report where a read failed.
#[derive(Debug, Clone)]
pub struct Cursor<'a> {
	bytes: &'a [u8],
	pos: usize,
	end: usize,
}

impl<'a> Cursor<'a> {
	/// Create a cursor over the whole buffer at position 0.
	pub fn new(bytes: &'a [u8]) -> Self {
		Self {
			bytes,
			pos: 0,
			end: bytes.len(),
		}
	}

	/// Create a cursor over `start..end`, clamped to the buffer.
	pub fn window(bytes: &'a [u8], start: usize, end: usize) -> Self {
		let end = end.min(bytes.len());
		Self {
			bytes,
			pos: start.min(end),
			end,
		}
	}

	/// Return current absolute offset.
	pub fn pos(&self) -> usize {
		self.pos
	}

	/// Return remaining unread bytes in the window.
	pub fn remaining(&self) -> usize {
		self.end.saturating_sub(self.pos)
	}

	/// Read exactly `n` bytes and advance.
	pub fn read_exact(&mut self, n: usize) -> Result<&'a [u8]> {
		if n > self.remaining() {
			return Err(FormatError::UnexpectedEof {
				at: self.pos as u64,
				need: n,
				rem: self.remaining(),
			});
		}

		let start = self.pos;
		self.pos += n;
		Ok(&self.bytes[start..self.pos])
	}

	/// Skip `n` bytes.
	pub fn skip(&mut self, n: usize) -> Result<()> {
		let _ = self.read_exact(n)?;
		Ok(())
	}

	/// Read a fixed-size byte array.
	pub fn read_array<const N: usize>(&mut self) -> Result<[u8; N]> {
		let raw = self.read_exact(N)?;
		let mut out = [0_u8; N];
		out.copy_from_slice(raw);
		Ok(out)
	}

	/// Read one byte.
	pub fn read_u8(&mut self) -> Result<u8> {
		Ok(self.read_array::<1>()?[0])
	}

	/// Read a little-endian `u16`.
	pub fn read_u16_le(&mut self) -> Result<u16> {
		Ok(u16::from_le_bytes(self.read_array()?))
	}

	/// Read a little-endian `u32`.
	pub fn read_u32_le(&mut self) -> Result<u32> {
		Ok(u32::from_le_bytes(self.read_array()?))
	}

	/// Read a little-endian `u64`.
	pub fn read_u64_le(&mut self) -> Result<u64> {
		Ok(u64::from_le_bytes(self.read_array()?))
	}

	/// Read a little-endian unsigned integer of `width` bytes (1, 2, 4, or 8) and widen to `u64`.
	pub fn read_uint(&mut self, width: u8) -> Result<u64> {
		let raw = self.read_exact(usize::from(width))?;
		let mut buf = [0_u8; 8];
		buf[..raw.len()].copy_from_slice(raw);
		Ok(u64::from_le_bytes(buf))
	}

	/// Read a GUID stored in its mixed-endian on-disk form.
	pub fn read_guid(&mut self) -> Result<Uuid> {
		Ok(Uuid::from_bytes_le(self.read_array()?))
	}
}
