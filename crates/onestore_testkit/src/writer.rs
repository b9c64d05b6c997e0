use uuid::{Uuid, uuid};

use crate::nodes::Chunk;

const HEADER_SIZE: usize = 1024;
const FRAGMENT_HEADER_MAGIC: u64 = 0xA4567AB1F5F7F4C4;
const FRAGMENT_FOOTER_MAGIC: u64 = 0x8BC215C38233BA4B;
const FILE_FORMAT: Uuid = uuid!("109ADD3F-911B-49F5-A5D0-1791EDC8AED8");
const FILE_DATA_HEADER: Uuid = uuid!("BDE316E7-2665-4511-A4C4-8D4D0B7A9EAC");
const FILE_DATA_FOOTER: Uuid = uuid!("71FBA722-0F79-4A0B-BB13-899256426B24");

/// Header field offsets used by tests that corrupt a built file.
pub mod offsets {
	/// `guidFileType`.
	pub const GUID_FILE_TYPE: usize = 0;
	/// `guidFileFormat`.
	pub const GUID_FILE_FORMAT: usize = 48;
	/// `ffvLastCodeThatWroteToThisFile`.
	pub const FFV_LAST_CODE_THAT_WROTE: usize = 64;
	/// `cTransactionsInLog`.
	pub const C_TRANSACTIONS_IN_LOG: usize = 96;
	/// `crcName`.
	pub const CRC_NAME: usize = 144;
	/// `fcrTransactionLog`.
	pub const FCR_TRANSACTION_LOG: usize = 160;
	/// `fcrFileNodeListRoot`.
	pub const FCR_FILE_NODE_LIST_ROOT: usize = 172;
	/// `grfDebugLogFlags`.
	pub const GRF_DEBUG_LOG_FLAGS: usize = 252;
	/// `rgbReserved`.
	pub const RGB_RESERVED: usize = 296;
}

/// Which file type to synthesize.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flavor {
	/// `.one` section.
	One,
	/// `.onetoc2` table of contents.
	OneToc2,
}

impl Flavor {
	/// `guidFileType` for this flavor.
	pub fn file_type(self) -> Uuid {
		match self {
			Self::One => uuid!("7B5C52E4-D88C-4DA7-AEB1-5378D02996D3"),
			Self::OneToc2 => uuid!("43FF2FA1-EFD9-4C76-9EE2-10EA5722765F"),
		}
	}

	/// Required value of the `ffv*` header fields.
	pub fn code_version(self) -> u32 {
		match self {
			Self::One => 0x2A,
			Self::OneToc2 => 0x1B,
		}
	}
}

/// CRC-32 of a file name as written to `crcName`.
pub fn name_crc(file_name: &str) -> u32 {
	let mut hasher = crc32fast::Hasher::new();
	for unit in file_name.encode_utf16() {
		hasher.update(&unit.to_le_bytes());
	}
	hasher.update(&[0, 0]);
	hasher.finalize()
}

/// Raw fragment description for tests that need malformed chains.
#[derive(Debug, Clone)]
pub struct FragmentSpec {
	/// List id written to the fragment header.
	pub list_id: u32,
	/// Fragment sequence number.
	pub sequence: u32,
	/// Encoded nodes.
	pub nodes: Vec<Vec<u8>>,
	/// Next fragment reference.
	pub next: Chunk,
	/// Zero bytes appended after the nodes.
	pub padding: usize,
	/// Header magic value.
	pub magic: u64,
	/// Footer magic value.
	pub footer: u64,
}

impl FragmentSpec {
	/// Well-formed final fragment.
	pub fn new(list_id: u32, sequence: u32, nodes: Vec<Vec<u8>>) -> Self {
		Self {
			list_id,
			sequence,
			nodes,
			next: Chunk::NIL,
			padding: 0,
			magic: FRAGMENT_HEADER_MAGIC,
			footer: FRAGMENT_FOOTER_MAGIC,
		}
	}
}

/// Append-only writer; children are written before the lists that reference them.
#[derive(Debug, Clone)]
pub struct StoreBuilder {
	flavor: Flavor,
	bytes: Vec<u8>,
	next_list_id: u32,
	pending: Vec<(u32, u32)>,
	transactions: Vec<Vec<(u32, u32)>>,
}

impl StoreBuilder {
	/// Start a file with a zeroed header area.
	pub fn new(flavor: Flavor) -> Self {
		Self {
			flavor,
			bytes: vec![0; HEADER_SIZE],
			next_list_id: 0x10,
			pending: Vec::new(),
			transactions: Vec::new(),
		}
	}

	/// Flavor being written.
	pub fn flavor(&self) -> Flavor {
		self.flavor
	}

	/// Bytes written so far.
	pub fn len(&self) -> usize {
		self.bytes.len()
	}

	/// Return whether only the header area exists.
	pub fn is_empty(&self) -> bool {
		self.bytes.len() == HEADER_SIZE
	}

	fn append(&mut self, data: &[u8]) -> Chunk {
		let location = self.bytes.len() as u64;
		self.bytes.extend_from_slice(data);
		Chunk {
			location,
			size: data.len() as u32,
		}
	}

	/// Write an opaque blob.
	pub fn blob(&mut self, data: &[u8]) -> Chunk {
		self.append(data)
	}

	/// Write a `FileDataStoreObject` envelope around `data`.
	pub fn file_data_store_object(&mut self, data: &[u8]) -> Chunk {
		let mut out = Vec::new();
		out.extend_from_slice(&FILE_DATA_HEADER.to_bytes_le());
		out.extend_from_slice(&(data.len() as u64).to_le_bytes());
		out.extend_from_slice(&0_u32.to_le_bytes());
		out.extend_from_slice(&0_u64.to_le_bytes());
		out.extend_from_slice(data);
		out.resize(out.len() + (8 - data.len() % 8) % 8, 0);
		out.extend_from_slice(&FILE_DATA_FOOTER.to_bytes_le());
		self.append(&out)
	}

	/// Reserve a fresh list id.
	pub fn alloc_list_id(&mut self) -> u32 {
		let id = self.next_list_id;
		self.next_list_id += 1;
		id
	}

	/// Write one fragment exactly as described.
	pub fn fragment(&mut self, spec: &FragmentSpec) -> Chunk {
		let mut out = Vec::new();
		out.extend_from_slice(&spec.magic.to_le_bytes());
		out.extend_from_slice(&spec.list_id.to_le_bytes());
		out.extend_from_slice(&spec.sequence.to_le_bytes());
		for node in &spec.nodes {
			out.extend_from_slice(node);
		}
		out.resize(out.len() + spec.padding, 0);
		spec.next.encode(&mut out);
		out.extend_from_slice(&spec.footer.to_le_bytes());
		self.append(&out)
	}

	/// Write a single-fragment list and record its node count.
	pub fn list(&mut self, nodes: &[Vec<u8>]) -> Chunk {
		self.list_in_fragments(&[nodes.to_vec()])
	}

	/// Write a list split across fragments, chained in order, and record its node count.
	pub fn list_in_fragments(&mut self, fragments: &[Vec<Vec<u8>>]) -> Chunk {
		let list_id = self.alloc_list_id();
		let mut next = Chunk::NIL;
		for (sequence, nodes) in fragments.iter().enumerate().rev() {
			let mut spec = FragmentSpec::new(list_id, sequence as u32, nodes.clone());
			spec.next = next;
			next = self.fragment(&spec);
		}
		let count = fragments.iter().map(Vec::len).sum::<usize>() as u32;
		self.record(list_id, count);
		next
	}

	/// Record a committed node count for `list_id` in the open transaction.
	pub fn record(&mut self, list_id: u32, count: u32) {
		self.pending.push((list_id, count));
	}

	/// Close the open transaction.
	pub fn commit(&mut self) {
		self.transactions.push(std::mem::take(&mut self.pending));
	}

	/// Write the transaction log and header; `root` is the root file node list.
	pub fn finish(mut self, root: Chunk, file_name: &str) -> Vec<u8> {
		if !self.pending.is_empty() || self.transactions.is_empty() {
			self.commit();
		}

		let mut log = Vec::new();
		for transaction in &self.transactions {
			for (list_id, count) in transaction {
				log.extend_from_slice(&list_id.to_le_bytes());
				log.extend_from_slice(&count.to_le_bytes());
			}
			log.extend_from_slice(&1_u32.to_le_bytes());
			log.extend_from_slice(&0_u32.to_le_bytes());
		}
		Chunk::NIL.encode(&mut log);
		let txlog = self.append(&log);

		let header = self.header(root, txlog, file_name);
		self.bytes[..HEADER_SIZE].copy_from_slice(&header);
		self.bytes
	}

	fn header(&self, root: Chunk, txlog: Chunk, file_name: &str) -> Vec<u8> {
		let version = self.flavor.code_version();
		let mut out = Vec::with_capacity(HEADER_SIZE);
		out.extend_from_slice(&self.flavor.file_type().to_bytes_le());
		out.extend_from_slice(&uuid!("6D0A5F9E-3F4B-4C39-9A0E-7A5B3C1D2E4F").to_bytes_le());
		out.extend_from_slice(&Uuid::nil().to_bytes_le());
		out.extend_from_slice(&FILE_FORMAT.to_bytes_le());
		for _ in 0..4 {
			out.extend_from_slice(&version.to_le_bytes());
		}
		out.extend_from_slice(&[0; 8]);
		out.extend_from_slice(&u32::MAX.to_le_bytes());
		out.extend_from_slice(&0_u32.to_le_bytes());
		out.extend_from_slice(&(self.transactions.len() as u32).to_le_bytes());
		out.extend_from_slice(&0_u32.to_le_bytes());
		out.extend_from_slice(&0_u64.to_le_bytes());
		out.extend_from_slice(&u32::MAX.to_le_bytes());
		out.extend_from_slice(&0_u32.to_le_bytes());
		out.extend_from_slice(&0_u32.to_le_bytes());
		out.extend_from_slice(&[0; 4]);
		out.extend_from_slice(&Uuid::nil().to_bytes_le());
		out.extend_from_slice(&name_crc(file_name).to_le_bytes());
		Chunk::ZERO.encode(&mut out);
		txlog.encode(&mut out);
		root.encode(&mut out);
		Chunk::ZERO.encode(&mut out);
		out.extend_from_slice(&(self.bytes.len() as u64).to_le_bytes());
		out.extend_from_slice(&0_u64.to_le_bytes());
		out.extend_from_slice(&uuid!("0F1E2D3C-4B5A-4968-8776-A5B4C3D2E1F0").to_bytes_le());
		out.extend_from_slice(&1_u64.to_le_bytes());
		out.extend_from_slice(&Uuid::nil().to_bytes_le());
		out.extend_from_slice(&0_u32.to_le_bytes());
		Chunk::ZERO.encode(&mut out);
		Chunk::ZERO.encode(&mut out);
		out.extend_from_slice(&[0; 16]);
		out.resize(HEADER_SIZE, 0);
		out
	}
}
