//! Shared test helpers: synthetic revision store files and workspace paths.

use std::path::{Path, PathBuf};

mod nodes;
mod sample;
mod writer;

pub use nodes::*;
pub use sample::{GidEntry, RevisionSpec, SampleSpec};
pub use writer::{Flavor, FragmentSpec, StoreBuilder, name_crc, offsets};

/// Resolve the workspace root path.
pub fn workspace_root() -> PathBuf {
	let manifest_dir = Path::new(env!("CARGO_MANIFEST_DIR"));
	manifest_dir
		.join("..")
		.join("..")
		.canonicalize()
		.unwrap_or_else(|_| manifest_dir.join("..").join(".."))
}

/// Resolve the workspace target directory.
pub fn target_dir() -> PathBuf {
	std::env::var_os("CARGO_TARGET_DIR")
		.map(PathBuf::from)
		.unwrap_or_else(|| workspace_root().join("target"))
}

/// Write `bytes` to `<target>/onestore-fixtures/<name>` and return the path.
///
/// Each caller should pick a distinct name; tests run in parallel.
pub fn write_fixture(name: &str, bytes: &[u8]) -> PathBuf {
	let path = target_dir().join("onestore-fixtures").join(name);
	if let Some(dir) = path.parent() {
		std::fs::create_dir_all(dir).expect("fixture directory is creatable");
	}
	std::fs::write(&path, bytes).expect("fixture is writable");
	path
}
