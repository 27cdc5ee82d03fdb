use std::fs;
use std::path::Path;

use nifdoc::nif::{LoadOptions, NifFile, Result};

/// Print `value` as pretty JSON on stdout.
pub(crate) fn emit_json<T: serde::Serialize>(value: &T) {
	match serde_json::to_string_pretty(value) {
		Ok(text) => println!("{text}"),
		Err(err) => eprintln!("error: failed to encode json: {err}"),
	}
}

/// Load `path`, flagging it as terrain when asked.
pub(crate) fn load(path: &Path, is_terrain: bool) -> Result<NifFile> {
	let bytes = fs::read(path)?;
	NifFile::from_bytes(&bytes, LoadOptions { is_terrain })
}

/// Render optional value or `-`.
pub(crate) fn or_dash<T: ToString>(value: Option<T>) -> String {
	value.map(|item| item.to_string()).unwrap_or_else(|| "-".to_owned())
}
