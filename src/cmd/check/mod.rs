use std::path::PathBuf;

use onestore::store::{DecodeOptions, Diagnostic, FormatError, OneStoreFile, Result};

use crate::cmd::util::emit_json;

#[derive(clap::Args)]
pub struct Args {
	pub path: PathBuf,
	#[arg(long)]
	pub json: bool,
	/// Stop at the first violation.
	#[arg(long = "fail-fast")]
	pub fail_fast: bool,
	/// Skip the `crcName` check against the file name.
	#[arg(long = "no-name-crc")]
	pub no_name_crc: bool,
	/// Read every fragment instead of stopping at committed node counts.
	#[arg(long = "no-transaction-counts")]
	pub no_transaction_counts: bool,
	#[arg(long = "max-list-depth")]
	pub max_list_depth: Option<usize>,
}

/// Decode the whole file and report every structural violation.
pub fn run(args: Args) -> Result<()> {
	let Args {
		path,
		json,
		fail_fast,
		no_name_crc,
		no_transaction_counts,
		max_list_depth,
	} = args;

	let mut options = DecodeOptions {
		check_name_crc: !no_name_crc,
		use_transaction_counts: !no_transaction_counts,
		..DecodeOptions::default()
	};
	if let Some(max_list_depth) = max_list_depth {
		options.max_list_depth = max_list_depth;
	}

	let file = OneStoreFile::open(&path)?;
	let report = file.decode(&options)?;
	let profile = report.profile;
	let lists = report.graph.lists.len();
	let mut violations = report.diagnostics.into_vec();
	if fail_fast {
		violations.truncate(1);
	}

	if json {
		let payload = CheckJson {
			path: path.display().to_string(),
			profile: profile.name(),
			lists,
			clean: violations.is_empty(),
			violation_count: violations.len(),
			violations: violations.iter().map(violation_json).collect(),
		};
		emit_json(&payload);
	} else {
		println!("path: {}", path.display());
		println!("profile: {profile}");
		println!("lists: {lists}");
		println!("violations: {}", violations.len());
		for item in &violations {
			println!("  [{}] {}", item.rule.code(), item.error);
		}
	}

	if fail_fast {
		return match violations.into_iter().next() {
			Some(first) => Err(first.error),
			None => Ok(()),
		};
	}
	if violations.is_empty() {
		Ok(())
	} else {
		Err(FormatError::CardinalityViolation {
			what: "structural violations",
			expected: "0",
			found: violations.len(),
		})
	}
}

fn violation_json(item: &Diagnostic) -> ViolationJson {
	ViolationJson {
		rule: item.rule.code(),
		message: item.error.to_string(),
	}
}

#[derive(serde::Serialize)]
struct ViolationJson {
	rule: &'static str,
	message: String,
}

#[derive(serde::Serialize)]
struct CheckJson {
	path: String,
	profile: &'static str,
	lists: usize,
	clean: bool,
	violation_count: usize,
	violations: Vec<ViolationJson>,
}

#[cfg(test)]
mod tests;
