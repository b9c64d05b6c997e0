use std::path::PathBuf;

use onestore::store::{DecodeOptions, FileNode, OneStoreFile, Result};

use crate::cmd::util::{chunk_label, emit_json, hex32};

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum ListSelector {
	/// Root file node list only.
	Root,
	/// Every list reachable from the root.
	All,
}

#[derive(clap::Args)]
pub struct Args {
	pub path: PathBuf,
	#[arg(long, value_enum, default_value = "root")]
	pub list: ListSelector,
	#[arg(long)]
	pub limit: Option<usize>,
	#[arg(long)]
	pub json: bool,
}

/// Dump decoded file nodes from the root list or from every list.
pub fn run(args: Args) -> Result<()> {
	let Args { path, list, limit, json } = args;

	let file = OneStoreFile::open(&path)?;
	let report = file.decode(&DecodeOptions::default())?;
	let graph = &report.graph;

	let nodes = match list {
		ListSelector::Root => graph.nodes(graph.root.span),
		ListSelector::All => graph.all_nodes(),
	};
	let limit = limit.unwrap_or(usize::MAX);

	if json {
		let payload = NodesJson {
			path: path.display().to_string(),
			profile: report.profile.name(),
			total: nodes.len(),
			nodes: nodes.iter().take(limit).map(node_json).collect(),
			lists: graph
				.lists
				.iter()
				.map(|summary| ListJson {
					what: summary.what,
					list_id: summary.list_id.map(hex32),
					at: summary.at,
					nodes_seen: summary.nodes_seen,
					complete: summary.complete,
				})
				.collect(),
		};
		emit_json(&payload);
		return Ok(());
	}

	println!("path: {}", path.display());
	println!("profile: {}", report.profile);
	println!("nodes: {}", nodes.len());
	for node in nodes.iter().take(limit) {
		let reference = node.fnd.reference().map(chunk_label).unwrap_or_else(|| "-".to_owned());
		println!(
			"  0x{:08x} 0x{:03x} {:<44} size={:<4} base={} ref={}",
			node.offset,
			node.type_id(),
			node.name(),
			node.size(),
			node.header.base_type,
			reference
		);
	}
	if nodes.len() > limit {
		println!("  ... {} more", nodes.len() - limit);
	}

	Ok(())
}

fn node_json(node: &FileNode) -> NodeJson {
	NodeJson {
		offset: node.offset,
		type_id: format!("0x{:03x}", node.type_id()),
		name: node.name(),
		size: node.size(),
		base_type: node.header.base_type,
		reference: node.fnd.reference().map(chunk_label),
	}
}

#[derive(serde::Serialize)]
struct NodeJson {
	offset: u64,
	type_id: String,
	name: &'static str,
	size: usize,
	base_type: u8,
	reference: Option<String>,
}

#[derive(serde::Serialize)]
struct ListJson {
	what: &'static str,
	list_id: Option<String>,
	at: u64,
	nodes_seen: usize,
	complete: bool,
}

#[derive(serde::Serialize)]
struct NodesJson {
	path: String,
	profile: &'static str,
	total: usize,
	nodes: Vec<NodeJson>,
	lists: Vec<ListJson>,
}

#[cfg(test)]
mod tests;
