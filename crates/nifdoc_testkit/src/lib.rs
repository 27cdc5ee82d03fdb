//! Shared test helpers for workspace crates.

use std::path::{Path, PathBuf};

/// Resolve the workspace root path.
pub fn workspace_root() -> PathBuf {
	let manifest_dir = Path::new(env!("CARGO_MANIFEST_DIR"));
	manifest_dir
		.join("..")
		.join("..")
		.canonicalize()
		.unwrap_or_else(|_| manifest_dir.join("..").join(".."))
}

/// Resolve a fixture path under `<workspace>/fixtures`.
pub fn fixture_path(name: &str) -> PathBuf {
	workspace_root().join("fixtures").join(name)
}

/// Resolve the workspace target directory.
pub fn target_dir() -> PathBuf {
	std::env::var_os("CARGO_TARGET_DIR")
		.map(PathBuf::from)
		.unwrap_or_else(|| workspace_root().join("target"))
}

/// Resolve a unique scratch file path under the target directory.
pub fn scratch_path(name: &str) -> PathBuf {
	let dir = target_dir().join("nifdoc-scratch");
	std::fs::create_dir_all(&dir).expect("scratch directory is creatable");
	dir.join(format!("{}-{name}", std::process::id()))
}

/// Little-endian byte composer for hand-built expected file images.
#[derive(Debug, Default, Clone)]
pub struct ByteBuilder {
	bytes: Vec<u8>,
}

impl ByteBuilder {
	/// Create an empty builder.
	pub fn new() -> Self {
		Self::default()
	}

	/// Append raw bytes.
	pub fn raw(mut self, bytes: &[u8]) -> Self {
		self.bytes.extend_from_slice(bytes);
		self
	}

	/// Append one byte.
	pub fn u8(mut self, value: u8) -> Self {
		self.bytes.push(value);
		self
	}

	/// Append a little-endian `u16`.
	pub fn u16(mut self, value: u16) -> Self {
		self.bytes.extend_from_slice(&value.to_le_bytes());
		self
	}

	/// Append a little-endian `u32`.
	pub fn u32(mut self, value: u32) -> Self {
		self.bytes.extend_from_slice(&value.to_le_bytes());
		self
	}

	/// Append a little-endian `i32`.
	pub fn i32(mut self, value: i32) -> Self {
		self.bytes.extend_from_slice(&value.to_le_bytes());
		self
	}

	/// Append a little-endian `u64`.
	pub fn u64(mut self, value: u64) -> Self {
		self.bytes.extend_from_slice(&value.to_le_bytes());
		self
	}

	/// Append a little-endian `f32`.
	pub fn f32(mut self, value: f32) -> Self {
		self.bytes.extend_from_slice(&value.to_le_bytes());
		self
	}

	/// Append several little-endian `f32` values.
	pub fn f32s(mut self, values: &[f32]) -> Self {
		for value in values {
			self.bytes.extend_from_slice(&value.to_le_bytes());
		}
		self
	}

	/// Append a newline-terminated text line.
	pub fn line(self, text: &str) -> Self {
		self.raw(text.as_bytes()).u8(b'\n')
	}

	/// Append a `u32`-length-prefixed string without terminator.
	pub fn sized_str(self, text: &str) -> Self {
		self.u32(text.len() as u32).raw(text.as_bytes())
	}

	/// Append a `u8`-length-prefixed, NUL-terminated export string.
	pub fn export_str(self, text: &str) -> Self {
		self.u8(text.len() as u8 + 1).raw(text.as_bytes()).u8(0)
	}

	/// Finish and return the composed bytes.
	pub fn build(self) -> Vec<u8> {
		self.bytes
	}
}
