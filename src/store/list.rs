use std::collections::{BTreeMap, HashSet};

use crate::store::bytes::Cursor;
use crate::store::{
	ChunkLayout, DecodeOptions, Diagnostics, FileChunkReference, FileNode, FileNodeHeader, FileProfile, FormatError, Result, Rule,
};

/// Fragment header magic.
pub const FRAGMENT_HEADER_MAGIC: u64 = 0xA4567AB1F5F7F4C4;
/// Fragment footer magic.
pub const FRAGMENT_FOOTER_MAGIC: u64 = 0x8BC215C38233BA4B;
/// Smallest valid file node list id.
pub const MIN_LIST_ID: u32 = 0x10;

const FRAGMENT_HEADER_LEN: usize = 16;
const FRAGMENT_TAIL_LEN: usize = 12 + 8;
const CHUNK_TERMINATOR: u16 = 0x0FF;

/// Committed node count per list id, as recorded by the transaction log.
pub type NodeCounts = BTreeMap<u32, u32>;

/// Entry point for reading one file node list.
#[derive(Debug, Clone)]
pub struct FileNodeListReader<'a> {
	bytes: &'a [u8],
	start: FileChunkReference,
	profile: FileProfile,
	options: &'a DecodeOptions,
	expected_list_id: Option<u32>,
	node_counts: Option<&'a NodeCounts>,
}

impl<'a> FileNodeListReader<'a> {
	/// Create a reader for the list whose first fragment is `start`.
	pub fn new(bytes: &'a [u8], start: FileChunkReference, profile: FileProfile, options: &'a DecodeOptions) -> Self {
		Self {
			bytes,
			start,
			profile,
			options,
			expected_list_id: None,
			node_counts: None,
		}
	}

	/// Require every fragment to carry `list_id`.
	pub fn expect_list_id(mut self, list_id: u32) -> Self {
		self.expected_list_id = Some(list_id);
		self
	}

	/// Stop reading once the committed node count for the list is reached.
	pub fn with_node_counts(mut self, counts: &'a NodeCounts) -> Self {
		self.node_counts = Some(counts);
		self
	}

	/// Start a fresh pass over the list.
	pub fn nodes(&self) -> FileNodeIter<'a> {
		FileNodeIter {
			bytes: self.bytes,
			profile: self.profile,
			options: self.options,
			node_counts: self.node_counts.filter(|_| self.options.use_transaction_counts),
			list_id: self.expected_list_id,
			next: Some(self.start),
			state: IterState::Start,
			fragment: None,
			next_sequence: 0,
			visited: HashSet::new(),
			fragments: 0,
			nodes_seen: 0,
			diags: Diagnostics::new(),
		}
	}

	/// Read the whole list, moving diagnostics into `diags`.
	pub fn read_all(&self, diags: &mut Diagnostics) -> ListContents {
		let mut iter = self.nodes();
		let nodes: Vec<FileNode> = iter.by_ref().collect();
		let contents = ListContents {
			list_id: iter.list_id(),
			nodes,
			nodes_seen: iter.nodes_seen(),
			fragments: iter.fragment_count(),
			complete: iter.state() == IterState::Exhausted,
		};
		diags.extend(iter.into_diagnostics());
		contents
	}
}

/// Everything read from one list.
#[derive(Debug, Clone)]
pub struct ListContents {
	/// List id from the first fragment.
	pub list_id: Option<u32>,
	/// Nodes that decoded successfully, in order.
	pub nodes: Vec<FileNode>,
	/// Nodes found in the list bodies, including ones that failed to decode.
	pub nodes_seen: usize,
	/// Fragments visited.
	pub fragments: usize,
	/// The chain ended normally rather than failing.
	pub complete: bool,
}

/// Position of a [`FileNodeIter`] in its state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IterState {
	/// No fragment read yet.
	Start,
	/// Yielding nodes from a fragment body.
	ReadingFragment,
	/// The list ended normally.
	Exhausted,
	/// A structural error stopped the walk.
	Failed,
}

#[derive(Debug, Clone, Copy)]
struct Fragment {
	at: usize,
	pos: usize,
	body_end: usize,
	next: FileChunkReference,
}

/// Lazy node stream over a fragment chain.
#[derive(Debug)]
pub struct FileNodeIter<'a> {
	bytes: &'a [u8],
	profile: FileProfile,
	options: &'a DecodeOptions,
	node_counts: Option<&'a NodeCounts>,
	list_id: Option<u32>,
	next: Option<FileChunkReference>,
	state: IterState,
	fragment: Option<Fragment>,
	next_sequence: u32,
	visited: HashSet<u64>,
	fragments: usize,
	nodes_seen: usize,
	diags: Diagnostics,
}

impl FileNodeIter<'_> {
	/// Current state.
	pub fn state(&self) -> IterState {
		self.state
	}

	/// List id established by the first fragment.
	pub fn list_id(&self) -> Option<u32> {
		self.list_id
	}

	/// Fragments visited so far.
	pub fn fragment_count(&self) -> usize {
		self.fragments
	}

	/// Nodes encountered so far, including ones that failed to decode.
	pub fn nodes_seen(&self) -> usize {
		self.nodes_seen
	}

	/// Consume the iterator, returning accumulated violations.
	pub fn into_diagnostics(self) -> Diagnostics {
		self.diags
	}

	fn fail(&mut self, rule: Rule, error: FormatError) {
		tracing::warn!(target: "onestore::list", list_id = ?self.list_id, %error, "list abandoned");
		self.diags.push(rule, error);
		self.state = IterState::Failed;
	}

	fn committed_count(&self) -> Option<usize> {
		let list_id = self.list_id?;
		self.node_counts?.get(&list_id).map(|count| *count as usize)
	}

	fn advance_fragment(&mut self) {
		match self.next.take() {
			Some(next) if next.is_populated() => self.load_fragment(next),
			_ => {
				self.state = IterState::Exhausted;
				tracing::debug!(
					target: "onestore::list",
					list_id = ?self.list_id,
					fragments = self.fragments,
					nodes = self.nodes_seen,
					"list exhausted"
				);
			}
		}
	}

	fn load_fragment(&mut self, fcr: FileChunkReference) {
		self.fragments += 1;
		if self.fragments > self.options.max_fragments_per_list {
			let limit = self.options.max_fragments_per_list;
			self.fail(
				Rule::DecodeLimit,
				FormatError::LimitExceeded {
					what: "fragments per list",
					limit,
				},
			);
			return;
		}
		if !self.visited.insert(fcr.location()) {
			self.fail(Rule::FragmentChain, FormatError::ChunkCycle { location: fcr.location() });
			return;
		}

		match self.read_fragment(fcr) {
			Ok(fragment) => {
				tracing::debug!(
					target: "onestore::list",
					list_id = ?self.list_id,
					at = fragment.at,
					sequence = self.next_sequence.wrapping_sub(1),
					body = fragment.body_end - fragment.pos,
					"fragment"
				);
				self.next = Some(fragment.next);
				self.fragment = Some(fragment);
				self.state = IterState::ReadingFragment;
			}
			Err((rule, error)) => self.fail(rule, error),
		}
	}

	fn read_fragment(&mut self, fcr: FileChunkReference) -> std::result::Result<Fragment, (Rule, FormatError)> {
		let range = fcr.byte_range("FileNodeListFragment", self.bytes.len()).map_err(|err| (Rule::ChunkRange, err))?;
		let at = range.start;
		if range.len() < FRAGMENT_HEADER_LEN + FRAGMENT_TAIL_LEN {
			return Err((
				Rule::FragmentChain,
				FormatError::UnexpectedEof {
					at: at as u64,
					need: FRAGMENT_HEADER_LEN + FRAGMENT_TAIL_LEN,
					rem: range.len(),
				},
			));
		}

		let magic_at = |offset: usize, what: &'static str, expected: u64| -> std::result::Result<(), (Rule, FormatError)> {
			let found = read_u64_at(self.bytes, offset).map_err(|err| (Rule::FragmentMagic, err))?;
			if found != expected {
				return Err((
					Rule::FragmentMagic,
					FormatError::BadMagicOrFooter {
						what,
						at: offset as u64,
						expected,
						found,
					},
				));
			}
			Ok(())
		};
		magic_at(at, "fragment header magic", FRAGMENT_HEADER_MAGIC)?;
		magic_at(range.end - 8, "fragment footer", FRAGMENT_FOOTER_MAGIC)?;

		let mut c = Cursor::window(self.bytes, at + 8, range.end);
		let list_id = c.read_u32_le().map_err(|err| (Rule::FragmentChain, err))?;
		let sequence = c.read_u32_le().map_err(|err| (Rule::FragmentChain, err))?;

		if list_id < MIN_LIST_ID {
			self.diags.push(Rule::FragmentListId, FormatError::InvalidListId { list_id, at: at as u64 });
		}
		match self.list_id {
			Some(expected) if expected != list_id => self.diags.push(
				Rule::FragmentListId,
				FormatError::IdentityMismatch {
					what: "fragment list id",
					expected: format!("0x{expected:x}"),
					found: format!("0x{list_id:x}"),
				},
			),
			Some(_) => {}
			None => self.list_id = Some(list_id),
		}
		if sequence != self.next_sequence {
			self.diags.push(
				Rule::FragmentSequence,
				FormatError::FragmentSequence {
					list_id,
					at: at as u64,
					expected: self.next_sequence,
					found: sequence,
				},
			);
		}
		self.next_sequence = sequence.wrapping_add(1);

		let body_end = range.end - FRAGMENT_TAIL_LEN;
		let next = FileChunkReference::decode(self.bytes, body_end, ChunkLayout::FCR64X32).map_err(|err| (Rule::FragmentChain, err))?;
		Ok(Fragment {
			at,
			pos: at + FRAGMENT_HEADER_LEN,
			body_end,
			next,
		})
	}

	fn next_in_fragment(&mut self, mut fragment: Fragment) -> Option<FileNode> {
		loop {
			if self.committed_count().is_some_and(|count| self.nodes_seen >= count) {
				self.state = IterState::Exhausted;
				return None;
			}
			if fragment.body_end.saturating_sub(fragment.pos) < FileNodeHeader::SIZE {
				self.fragment = None;
				self.advance_fragment();
				return None;
			}

			let at = fragment.pos;
			let header = match read_u32_at(self.bytes, at) {
				Ok(raw) => FileNodeHeader::from_u32(raw),
				Err(err) => {
					self.fail(Rule::NodeSize, err);
					return None;
				}
			};

			if header.type_id == CHUNK_TERMINATOR {
				if !fragment.next.is_populated() {
					self.diags.push(
						Rule::FragmentChain,
						FormatError::UnexpectedTerminator {
							list_id: self.list_id.unwrap_or_default(),
							at: at as u64,
						},
					);
				}
				self.fragment = None;
				self.advance_fragment();
				return None;
			}

			let size = usize::from(header.size);
			if size < FileNodeHeader::SIZE || at + size > fragment.body_end {
				self.fail(
					Rule::NodeSize,
					FormatError::NodeSizeMismatch {
						type_id: header.type_id,
						at: at as u64,
						declared: size,
						consumed: fragment.body_end - at,
					},
				);
				return None;
			}

			fragment.pos += size;
			self.fragment = Some(fragment);
			self.nodes_seen += 1;
			if self.nodes_seen > self.options.max_nodes_per_list {
				let limit = self.options.max_nodes_per_list;
				self.fail(Rule::DecodeLimit, FormatError::LimitExceeded { what: "nodes per list", limit });
				return None;
			}

			match FileNode::parse(self.bytes, at, self.profile, &mut self.diags) {
				Ok(node) => return Some(node),
				Err(err) => {
					tracing::debug!(target: "onestore::list", at, type_id = header.type_id, %err, "node skipped");
					self.diags.push(node_rule(&err), err);
				}
			}
		}
	}
}

impl Iterator for FileNodeIter<'_> {
	type Item = FileNode;

	fn next(&mut self) -> Option<Self::Item> {
		loop {
			match self.state {
				IterState::Exhausted | IterState::Failed => return None,
				IterState::Start => {
					self.advance_fragment();
				}
				IterState::ReadingFragment => {
					let Some(fragment) = self.fragment else {
						self.state = IterState::Exhausted;
						return None;
					};
					if let Some(node) = self.next_in_fragment(fragment) {
						return Some(node);
					}
				}
			}
		}
	}
}

/// Rule recorded when a node fails to decode.
pub(crate) fn node_rule(err: &FormatError) -> Rule {
	match err {
		FormatError::UnknownNodeType { .. } | FormatError::InvalidNodeContext { .. } => Rule::NodeContext,
		FormatError::ChunkOutOfRange { .. } => Rule::ChunkRange,
		_ => Rule::NodeSize,
	}
}

fn read_u64_at(bytes: &[u8], at: usize) -> Result<u64> {
	Cursor::window(bytes, at, bytes.len()).read_u64_le()
}

fn read_u32_at(bytes: &[u8], at: usize) -> Result<u32> {
	Cursor::window(bytes, at, bytes.len()).read_u32_le()
}

#[cfg(test)]
mod tests;
