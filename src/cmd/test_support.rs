use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use std::sync::OnceLock;

use onestore_testkit::{target_dir as workspace_target_dir, workspace_root};

static ONESTORE_BIN: OnceLock<PathBuf> = OnceLock::new();

pub(crate) fn fixture_arg(path: &Path) -> String {
	path.to_string_lossy().into_owned()
}

pub(crate) fn run_onestore(args: &[&str]) -> Output {
	Command::new(onestore_bin()).args(args).output().expect("onestore command executes")
}

pub(crate) fn run_onestore_json(args: &[&str]) -> serde_json::Value {
	let output = run_onestore(args);
	assert!(
		output.status.success(),
		"onestore command failed with status={}: {}",
		output.status,
		String::from_utf8_lossy(&output.stderr)
	);
	serde_json::from_slice(&output.stdout).expect("stdout should be valid json")
}

/// Run a command expected to fail and parse its stdout as JSON.
pub(crate) fn run_onestore_json_failing(args: &[&str]) -> serde_json::Value {
	let output = run_onestore(args);
	assert_eq!(output.status.code(), Some(1), "stderr: {}", String::from_utf8_lossy(&output.stderr));
	serde_json::from_slice(&output.stdout).expect("stdout should be valid json")
}

fn onestore_bin() -> &'static PathBuf {
	ONESTORE_BIN.get_or_init(resolve_onestore_bin)
}

fn resolve_onestore_bin() -> PathBuf {
	if let Some(path) = option_env!("CARGO_BIN_EXE_onestore") {
		return PathBuf::from(path);
	}

	let mut bin = workspace_target_dir().join("debug");
	bin.push(if cfg!(windows) { "onestore.exe" } else { "onestore" });

	let status = Command::new("cargo")
		.current_dir(workspace_root())
		.args(["build", "--quiet", "--bin", "onestore"])
		.status()
		.expect("cargo build executes");
	assert!(status.success(), "failed to build onestore binary at {}", bin.display());

	bin
}
