use std::path::PathBuf;

use onestore::store::{DecodeOptions, Diagnostics, OneStoreFile, Result, TransactionLog, guid_label, name_crc};

use crate::cmd::util::{chunk_label, emit_json, hex32};

#[derive(clap::Args)]
pub struct Args {
	pub path: PathBuf,
	#[arg(long)]
	pub json: bool,
}

/// Print header fields, the resolved profile, and the committed transaction log.
pub fn run(args: Args) -> Result<()> {
	let Args { path, json } = args;

	let file = OneStoreFile::open(&path)?;
	let header = file.header()?;
	let mut diags = Diagnostics::new();
	let profile = header.verify(&mut diags)?;
	let header_violations = diags.len();
	let txlog = TransactionLog::read(file.bytes(), &header, &DecodeOptions::default(), &mut diags);
	let name_crc_matches = file.meta().file_name.as_deref().map(|name| name_crc(name) == header.crc_name);

	if json {
		let payload = InfoJson {
			path: path.display().to_string(),
			profile: profile.name(),
			file_len: file.bytes().len(),
			guid_file_type: guid_label(&header.guid_file_type),
			guid_file: guid_label(&header.guid_file),
			guid_file_format: guid_label(&header.guid_file_format),
			ffv_last_code_that_wrote_to_this_file: hex32(header.ffv_last_code_that_wrote_to_this_file),
			ffv_oldest_code_that_may_read_this_file: hex32(header.ffv_oldest_code_that_may_read_this_file),
			c_transactions_in_log: header.c_transactions_in_log,
			crc_name: hex32(header.crc_name),
			name_crc_matches,
			cb_expected_file_length: header.cb_expected_file_length,
			fcr_transaction_log: chunk_label(header.fcr_transaction_log),
			fcr_file_node_list_root: chunk_label(header.fcr_file_node_list_root),
			header_violations,
			transaction_log: TransactionLogJson {
				fragments: txlog.fragments,
				entries: txlog.entries.len(),
				sentinels: txlog.sentinels,
				ends_with_sentinel: txlog.ends_with_sentinel(),
				lists: txlog
					.node_counts()
					.iter()
					.map(|(list_id, nodes)| ListCountJson {
						list_id: hex32(*list_id),
						nodes: *nodes,
					})
					.collect(),
			},
		};
		emit_json(&payload);
		return Ok(());
	}

	println!("path: {}", path.display());
	println!("profile: {profile}");
	println!("file_len: {}", file.bytes().len());
	println!("guid_file_type: {}", guid_label(&header.guid_file_type));
	println!("guid_file: {}", guid_label(&header.guid_file));
	println!("guid_file_format: {}", guid_label(&header.guid_file_format));
	println!("ffv_last_code_that_wrote_to_this_file: {}", hex32(header.ffv_last_code_that_wrote_to_this_file));
	println!("ffv_oldest_code_that_may_read_this_file: {}", hex32(header.ffv_oldest_code_that_may_read_this_file));
	println!("c_transactions_in_log: {}", header.c_transactions_in_log);
	println!("crc_name: {}", hex32(header.crc_name));
	match name_crc_matches {
		Some(matches) => println!("name_crc_matches: {matches}"),
		None => println!("name_crc_matches: -"),
	}
	println!("cb_expected_file_length: {}", header.cb_expected_file_length);
	println!("fcr_transaction_log: {}", chunk_label(header.fcr_transaction_log));
	println!("fcr_file_node_list_root: {}", chunk_label(header.fcr_file_node_list_root));
	println!("header_violations: {header_violations}");
	println!("transaction_log:");
	println!("  fragments: {}", txlog.fragments);
	println!("  entries: {}", txlog.entries.len());
	println!("  sentinels: {}", txlog.sentinels);
	println!("  ends_with_sentinel: {}", txlog.ends_with_sentinel());
	for (list_id, nodes) in txlog.node_counts() {
		println!("  list {}: {nodes} nodes", hex32(*list_id));
	}

	Ok(())
}

#[derive(serde::Serialize)]
struct ListCountJson {
	list_id: String,
	nodes: u32,
}

#[derive(serde::Serialize)]
struct TransactionLogJson {
	fragments: usize,
	entries: usize,
	sentinels: u32,
	ends_with_sentinel: bool,
	lists: Vec<ListCountJson>,
}

#[derive(serde::Serialize)]
struct InfoJson {
	path: String,
	profile: &'static str,
	file_len: usize,
	guid_file_type: String,
	guid_file: String,
	guid_file_format: String,
	ffv_last_code_that_wrote_to_this_file: String,
	ffv_oldest_code_that_may_read_this_file: String,
	c_transactions_in_log: u32,
	crc_name: String,
	name_crc_matches: Option<bool>,
	cb_expected_file_length: u64,
	fcr_transaction_log: String,
	fcr_file_node_list_root: String,
	header_violations: usize,
	transaction_log: TransactionLogJson,
}
