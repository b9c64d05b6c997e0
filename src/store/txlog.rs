use std::collections::HashSet;

use crate::store::bytes::Cursor;
use crate::store::list::NodeCounts;
use crate::store::{ChunkLayout, DecodeOptions, Diagnostics, FileChunkReference, FormatError, Header, Rule};

/// `srcID` value that closes a transaction.
pub const SENTINEL_SRC_ID: u32 = 1;

const ENTRY_LEN: usize = 8;
const NEXT_FRAGMENT_LEN: usize = 12;

/// One 8-byte transaction log slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransactionEntry {
	/// List id, or [`SENTINEL_SRC_ID`].
	pub src_id: u32,
	/// New node count of `src_id`, or a CRC for sentinel entries.
	pub switch: u32,
}

impl TransactionEntry {
	/// Return whether this entry closes a transaction.
	pub fn is_sentinel(&self) -> bool {
		self.src_id == SENTINEL_SRC_ID
	}
}

/// Decoded transaction log: entries read up to the committed transaction count.
#[derive(Debug, Clone, Default)]
pub struct TransactionLog {
	/// Entries in log order.
	pub entries: Vec<TransactionEntry>,
	/// Number of sentinel entries read.
	pub sentinels: u32,
	/// Fragments visited.
	pub fragments: usize,
	node_counts: NodeCounts,
}

impl TransactionLog {
	/// Walk the log from `fcrTransactionLog`.
	///
	/// Reading stops after `cTransactionsInLog` sentinels or at the end of the
	/// fragment chain. Structural problems are recorded and end the walk early.
	pub fn read(bytes: &[u8], header: &Header, options: &DecodeOptions, diags: &mut Diagnostics) -> Self {
		let mut log = Self::default();
		let wanted = header.c_transactions_in_log;
		let mut pending = NodeCounts::new();
		let mut visited = HashSet::new();
		let mut next = header.fcr_transaction_log;

		'chain: while next.is_populated() && log.sentinels < wanted {
			log.fragments += 1;
			if log.fragments > options.max_fragments_per_list {
				diags.push(
					Rule::DecodeLimit,
					FormatError::LimitExceeded {
						what: "transaction log fragments",
						limit: options.max_fragments_per_list,
					},
				);
				break;
			}
			if !visited.insert(next.location()) {
				diags.push(Rule::FragmentChain, FormatError::ChunkCycle { location: next.location() });
				break;
			}

			let range = match next.byte_range("TransactionLogFragment", bytes.len()) {
				Ok(range) => range,
				Err(err) => {
					diags.push(Rule::ChunkRange, err);
					break;
				}
			};
			if range.len() < NEXT_FRAGMENT_LEN {
				diags.push(
					Rule::FragmentChain,
					FormatError::UnexpectedEof {
						at: range.start as u64,
						need: NEXT_FRAGMENT_LEN,
						rem: range.len(),
					},
				);
				break;
			}

			let slots = (range.len() - NEXT_FRAGMENT_LEN) / ENTRY_LEN;
			let mut c = Cursor::window(bytes, range.start, range.end);
			tracing::debug!(target: "onestore::txlog", at = range.start, slots, "transaction log fragment");
			for _ in 0..slots {
				let entry = match (c.read_u32_le(), c.read_u32_le()) {
					(Ok(src_id), Ok(switch)) => TransactionEntry { src_id, switch },
					(Err(err), _) | (_, Err(err)) => {
						diags.push(Rule::FragmentChain, err);
						break 'chain;
					}
				};
				if entry.src_id == 0 {
					continue;
				}

				log.entries.push(entry);
				if entry.is_sentinel() {
					log.sentinels += 1;
					log.node_counts.append(&mut pending);
					if log.sentinels == wanted {
						break 'chain;
					}
				} else {
					pending.insert(entry.src_id, entry.switch);
				}
			}

			let tail_at = range.end - NEXT_FRAGMENT_LEN;
			next = match FileChunkReference::decode(bytes, tail_at, ChunkLayout::FCR64X32) {
				Ok(fcr) => fcr,
				Err(err) => {
					diags.push(Rule::FragmentChain, err);
					break;
				}
			};
		}

		tracing::debug!(
			target: "onestore::txlog",
			entries = log.entries.len(),
			sentinels = log.sentinels,
			lists = log.node_counts.len(),
			"transaction log read"
		);
		log
	}

	/// Committed node count per list id.
	pub fn node_counts(&self) -> &NodeCounts {
		&self.node_counts
	}

	/// Committed node count for `list_id`.
	pub fn node_count(&self, list_id: u32) -> Option<u32> {
		self.node_counts.get(&list_id).copied()
	}

	/// Return whether the final entry read is a sentinel.
	pub fn ends_with_sentinel(&self) -> bool {
		self.entries.last().is_some_and(TransactionEntry::is_sentinel)
	}
}
