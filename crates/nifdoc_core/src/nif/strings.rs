use std::borrow::Cow;
use std::fmt;

use crate::nif::{NiFileVersion, NifError, NifStream, Result, Streamable};

/// Byte string with a `u32` length prefix and no terminator.
///
/// Bytes are kept verbatim; game data is not guaranteed to be UTF-8.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct NiString(Vec<u8>);

impl NiString {
	/// Wrap raw bytes.
	pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
		Self(bytes.into())
	}

	/// Raw bytes.
	pub fn as_bytes(&self) -> &[u8] {
		&self.0
	}

	/// Byte length.
	pub fn len(&self) -> usize {
		self.0.len()
	}

	/// Return `true` for the empty string.
	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	/// UTF-8 lossy view.
	pub fn to_string_lossy(&self) -> Cow<'_, str> {
		String::from_utf8_lossy(&self.0)
	}
}

impl From<&str> for NiString {
	fn from(value: &str) -> Self {
		Self(value.as_bytes().to_vec())
	}
}

impl From<String> for NiString {
	fn from(value: String) -> Self {
		Self(value.into_bytes())
	}
}

impl fmt::Display for NiString {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.to_string_lossy())
	}
}

impl Streamable for NiString {
	fn sync(&mut self, stream: &mut NifStream<'_>) -> Result<()> {
		let mut len = self.0.len();
		stream.sync_count::<u32>(&mut len)?;
		if stream.is_read() && len > stream.remaining() {
			return Err(NifError::UnexpectedEof {
				at: stream.pos(),
				need: len,
				rem: stream.remaining(),
			});
		}
		stream.sync_bytes(&mut self.0, len)
	}
}

/// Header string with a `u8` length (terminator included) and a trailing NUL.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExportString(pub NiString);

impl Streamable for ExportString {
	fn sync(&mut self, stream: &mut NifStream<'_>) -> Result<()> {
		let mut len = self.0.len() + 1;
		stream.sync_count::<u8>(&mut len)?;
		let body = len.saturating_sub(1);
		stream.sync_bytes(&mut self.0.0, body)?;
		if len > 0 {
			let mut terminator = 0_u8;
			stream.sync(&mut terminator)?;
		}
		Ok(())
	}
}

/// Indirect string: inline before 20.1.0.1, an index into the header string table after.
///
/// The text is authoritative in memory; the index is resolved after load and rebuilt before save.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StringRef {
	text: NiString,
	index: Option<u32>,
}

impl StringRef {
	/// Stored index meaning "no string".
	pub const NONE: u32 = u32::MAX;

	/// Create an unresolved reference holding `text`.
	pub fn new(text: impl Into<NiString>) -> Self {
		Self {
			text: text.into(),
			index: None,
		}
	}

	/// Current text.
	pub fn text(&self) -> &NiString {
		&self.text
	}

	/// Replace the text; the index is rebuilt on save.
	pub fn set_text(&mut self, text: impl Into<NiString>) {
		self.text = text.into();
	}

	/// Stored table index, `None` for "no string".
	pub fn index(&self) -> Option<u32> {
		self.index
	}

	pub(crate) fn set_index(&mut self, index: Option<u32>) {
		self.index = index;
	}

	pub(crate) fn set_resolved(&mut self, text: NiString, index: Option<u32>) {
		self.text = text;
		self.index = index;
	}
}

impl Streamable for StringRef {
	fn sync(&mut self, stream: &mut NifStream<'_>) -> Result<()> {
		if stream.version().file < NiFileVersion::V20_1_0_1 {
			return stream.sync(&mut self.text);
		}
		let mut raw = self.index.unwrap_or(Self::NONE);
		stream.sync(&mut raw)?;
		self.index = (raw != Self::NONE).then_some(raw);
		Ok(())
	}
}
