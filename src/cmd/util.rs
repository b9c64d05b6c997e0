use onestore::store::FileChunkReference;

/// Print `value` as pretty JSON on stdout.
pub(crate) fn emit_json<T: serde::Serialize>(value: &T) {
	match serde_json::to_string_pretty(value) {
		Ok(text) => println!("{text}"),
		Err(err) => eprintln!("error: failed to encode json: {err}"),
	}
}

/// Render a chunk reference as `0x<location>+<size>`, or its sentinel name.
pub(crate) fn chunk_label(reference: FileChunkReference) -> String {
	if reference.is_nil() {
		"nil".to_owned()
	} else if reference.is_zero() {
		"zero".to_owned()
	} else {
		format!("0x{:x}+{}", reference.location(), reference.size())
	}
}

/// Render a 32-bit value as `0x`-prefixed hex.
pub(crate) fn hex32(value: u32) -> String {
	format!("0x{value:08x}")
}
