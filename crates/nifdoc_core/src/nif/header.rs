use tracing::warn;

use crate::nif::{Endianness, ExportString, NiFileVersion, NiString, NiVersion, NifError, NifStream, Result, Signature, Streamable, StringRef};

const VERSION_MARKER: &[u8] = b", Version ";

/// File header: versions, exporter strings, and the per-block parallel tables.
///
/// `block_type_indices` and `block_sizes` always hold exactly one entry per block.
#[derive(Debug, Clone, Default)]
pub struct NiHeader {
	version: NiVersion,
	endianness: Endianness,
	copyright: Vec<Vec<u8>>,
	declared_blocks: Option<usize>,
	creator: ExportString,
	export_info: [ExportString; 3],
	bs_unknown: u32,
	block_types: Vec<NiString>,
	block_type_indices: Vec<u16>,
	block_sizes: Vec<u32>,
	strings: Vec<NiString>,
	max_string_len: u32,
	groups: Vec<u32>,
	size_table_offset: Option<usize>,
}

impl NiHeader {
	/// Empty header for a fresh file of `version`.
	pub fn new(version: NiVersion) -> Self {
		Self {
			version,
			copyright: if version.file < NiFileVersion::V3_1 { vec![Vec::new(); 3] } else { Vec::new() },
			..Self::default()
		}
	}

	/// Layout version.
	pub fn version(&self) -> &NiVersion {
		&self.version
	}

	/// Replace the layout version; tables are left untouched.
	pub fn set_version(&mut self, version: NiVersion) {
		if version.file < NiFileVersion::V3_1 && self.copyright.len() != 3 {
			self.copyright.resize(3, Vec::new());
		}
		self.version = version;
	}

	/// Byte order declared by the header.
	pub fn endianness(&self) -> Endianness {
		self.endianness
	}

	/// Exporter name stored in the Bethesda header.
	pub fn creator(&self) -> &NiString {
		&self.creator.0
	}

	/// Replace the exporter name.
	pub fn set_creator(&mut self, creator: impl Into<NiString>) {
		self.creator = ExportString(creator.into());
	}

	/// Export info strings from the Bethesda header.
	pub fn export_info(&self) -> [&NiString; 3] {
		[&self.export_info[0].0, &self.export_info[1].0, &self.export_info[2].0]
	}

	/// Block count as recorded by the parallel tables.
	pub fn block_count(&self) -> usize {
		self.block_type_indices.len()
	}

	/// Block count read from disk, `None` before 3.1 where the list is marker-terminated.
	pub fn declared_block_count(&self) -> Option<usize> {
		self.declared_blocks
	}

	/// Deduplicated block type names.
	pub fn block_types(&self) -> &[NiString] {
		&self.block_types
	}

	/// Type index of each block.
	pub fn block_type_indices(&self) -> &[u16] {
		&self.block_type_indices
	}

	/// Type name of block `index`.
	pub fn block_type_name(&self, index: usize) -> Option<&NiString> {
		let type_index = *self.block_type_indices.get(index)?;
		self.block_types.get(usize::from(type_index))
	}

	/// Serialized size of each block, as of the last load or save.
	pub fn block_sizes(&self) -> &[u32] {
		&self.block_sizes
	}

	/// Group ids.
	pub fn groups(&self) -> &[u32] {
		&self.groups
	}

	/// Register `name` in the type table, returning its index; repeated names reuse their entry.
	pub fn add_or_find_type(&mut self, name: &str) -> Result<u16> {
		if let Some(found) = self.block_types.iter().position(|entry| entry.as_bytes() == name.as_bytes()) {
			return type_index_of(found);
		}
		let index = type_index_of(self.block_types.len())?;
		self.block_types.push(NiString::from(name));
		Ok(index)
	}

	/// Append table entries for a new last block of type `name`.
	pub fn push_block(&mut self, name: &str) -> Result<()> {
		let type_index = self.add_or_find_type(name)?;
		self.block_type_indices.push(type_index);
		self.block_sizes.push(0);
		Ok(())
	}

	/// Drop the table entries of block `index`, collapsing its type if this was the last use.
	pub fn remove_block(&mut self, index: usize) -> Result<()> {
		if index >= self.block_count() {
			return Err(NifError::BlockIndexOutOfRange {
				index,
				count: self.block_count(),
			});
		}
		let type_index = self.block_type_indices.remove(index);
		self.block_sizes.remove(index);
		self.collapse_type(type_index);
		Ok(())
	}

	/// Change the type of block `index` to `name`.
	pub fn set_block_type(&mut self, index: usize, name: &str) -> Result<()> {
		let count = self.block_count();
		let Some(&old) = self.block_type_indices.get(index) else {
			return Err(NifError::BlockIndexOutOfRange { index, count });
		};
		let new = self.add_or_find_type(name)?;
		self.block_type_indices[index] = new;
		if old != new {
			self.collapse_type(old);
		}
		Ok(())
	}

	fn collapse_type(&mut self, type_index: u16) {
		if self.block_type_indices.contains(&type_index) || usize::from(type_index) >= self.block_types.len() {
			return;
		}
		self.block_types.remove(usize::from(type_index));
		for entry in &mut self.block_type_indices {
			if *entry > type_index {
				*entry -= 1;
			}
		}
	}

	/// Reorder the per-block tables; `order[new] = old`.
	pub fn set_block_order(&mut self, order: &[usize]) -> Result<()> {
		let count = self.block_count();
		if !is_permutation(order, count) {
			return Err(NifError::InvalidBlockOrder { len: order.len(), count });
		}
		self.block_type_indices = order.iter().map(|&old| self.block_type_indices[old]).collect();
		self.block_sizes = order.iter().map(|&old| self.block_sizes[old]).collect();
		Ok(())
	}

	/// Header string table.
	pub fn strings(&self) -> &[NiString] {
		&self.strings
	}

	/// String at table `index`.
	pub fn string(&self, index: u32) -> Option<&NiString> {
		self.strings.get(usize::try_from(index).ok()?)
	}

	/// Longest string length, as of the last table update.
	pub fn max_string_len(&self) -> u32 {
		self.max_string_len
	}

	/// Return the table index of `text`, appending it when missing.
	///
	/// An empty `text` yields `None` ("no string") unless `allow_empty` asks for a real entry.
	pub fn add_or_find_string(&mut self, text: &NiString, allow_empty: bool) -> Option<u32> {
		if text.is_empty() && !allow_empty {
			return None;
		}
		let index = match self.strings.iter().position(|entry| entry == text) {
			Some(found) => found,
			None => {
				self.strings.push(text.clone());
				self.strings.len() - 1
			}
		};
		u32::try_from(index).ok()
	}

	/// Replace the whole string table.
	pub fn set_strings(&mut self, strings: Vec<NiString>) {
		self.strings = strings;
		self.update_max_string_len();
	}

	/// Recompute the cached longest string length.
	pub fn update_max_string_len(&mut self) {
		let longest = self.strings.iter().map(NiString::len).max().unwrap_or(0);
		self.max_string_len = u32::try_from(longest).unwrap_or(u32::MAX);
	}

	/// Fill `string` from the table using its stored index.
	///
	/// Some exporters write indices offset by the table length; such an index is corrected by
	/// subtracting the length once. The stored index is kept so the next save renumbers it.
	pub fn resolve_string_ref(&self, string: &mut StringRef) {
		let Some(index) = string.index() else {
			return;
		};
		let len = self.strings.len();
		let mut at = usize::try_from(index).unwrap_or(usize::MAX);
		if at >= len {
			let corrected = at - len;
			warn!(index, corrected, table_len = len, "string index past end of table");
			at = corrected;
		}
		match self.strings.get(at) {
			Some(text) => string.set_resolved(text.clone(), Some(index)),
			None => {
				warn!(index, table_len = len, "string index does not resolve");
				string.set_resolved(NiString::default(), Some(index));
			}
		}
	}

	/// Stream offset of the size table within the last written header.
	pub(crate) fn size_table_offset(&self) -> Option<usize> {
		self.size_table_offset
	}

	pub(crate) fn set_block_sizes(&mut self, sizes: Vec<u32>) {
		self.block_sizes = sizes;
	}
}

impl Streamable for NiHeader {
	fn sync(&mut self, stream: &mut NifStream<'_>) -> Result<()> {
		let mut line = self.version.magic_line().into_bytes();
		stream.sync_line(&mut line)?;
		if stream.is_read() {
			let (signature, file) = parse_magic(&line)?;
			self.version = NiVersion {
				file,
				user: 0,
				stream: 0,
				signature,
			};
		}
		stream.set_version(self.version);
		let file = self.version.file;

		if file < NiFileVersion::V3_1 {
			self.copyright.resize(3, Vec::new());
			for line in &mut self.copyright {
				stream.sync_line(line)?;
			}
		} else {
			let mut packed = file.0;
			stream.sync(&mut packed)?;
			if packed != file.0 {
				return Err(NifError::VersionMismatch { text: file.0, packed });
			}
		}

		if file >= NiFileVersion::V20_0_0_3 {
			let mut marker: u8 = match self.endianness {
				Endianness::Little => 1,
				Endianness::Big => 0,
			};
			stream.sync(&mut marker)?;
			self.endianness = if marker == 0 { Endianness::Big } else { Endianness::Little };
			stream.set_endianness(self.endianness);
		}

		if file >= NiFileVersion::V10_0_1_8 {
			stream.sync(&mut self.version.user)?;
			stream.set_version(self.version);
		}

		let mut count = self.block_type_indices.len();
		if file >= NiFileVersion::V3_1 {
			stream.sync_count::<u32>(&mut count)?;
			self.declared_blocks = Some(count);
		} else {
			self.declared_blocks = None;
		}

		if self.version.has_bs_header() {
			stream.sync(&mut self.version.stream)?;
			stream.set_version(self.version);
			stream.sync(&mut self.creator)?;
			if self.version.stream > 130 {
				stream.sync(&mut self.bs_unknown)?;
			}
			stream.sync(&mut self.export_info[0])?;
			stream.sync(&mut self.export_info[1])?;
			if self.version.stream == 130 {
				stream.sync(&mut self.export_info[2])?;
			}
		}

		if file >= NiFileVersion::V5_0_0_1 {
			stream.sync_list::<u16, _>(&mut self.block_types)?;
			stream.sync_fixed(&mut self.block_type_indices, count)?;
			for (index, &type_index) in self.block_type_indices.iter().enumerate() {
				if usize::from(type_index) >= self.block_types.len() {
					return Err(NifError::BadTypeIndex {
						index,
						type_index,
						type_count: self.block_types.len(),
					});
				}
			}
		} else if stream.is_read() {
			self.block_types.clear();
			self.block_type_indices.clear();
		}

		if file >= NiFileVersion::V20_2_0_5 {
			if !stream.is_read() {
				self.size_table_offset = Some(stream.pos());
			}
			stream.sync_fixed(&mut self.block_sizes, count)?;
		} else if stream.is_read() {
			self.block_sizes = vec![0; self.block_type_indices.len()];
		}

		if file >= NiFileVersion::V20_1_0_1 {
			let mut len = self.strings.len();
			stream.sync_count::<u32>(&mut len)?;
			stream.sync(&mut self.max_string_len)?;
			stream.sync_fixed(&mut self.strings, len)?;
		}

		if file >= NiFileVersion::V5_0_0_6 {
			stream.sync_list::<u32, _>(&mut self.groups)?;
		}
		Ok(())
	}
}

fn parse_magic(line: &[u8]) -> Result<(Signature, NiFileVersion)> {
	let invalid = || NifError::InvalidMagic {
		line: String::from_utf8_lossy(line).into_owned(),
	};
	let signature = Signature::ALL.into_iter().find(|signature| line.starts_with(signature.text().as_bytes())).ok_or_else(invalid)?;
	let rest = &line[signature.text().len()..];
	let text = rest.strip_prefix(VERSION_MARKER).ok_or_else(invalid)?;
	let text = std::str::from_utf8(text).map_err(|_| invalid())?;
	let unsupported = || NifError::UnsupportedVersion { version: text.to_owned() };
	let file = NiFileVersion::parse(text).ok_or_else(unsupported)?;
	if !file.is_supported() {
		return Err(unsupported());
	}
	Ok((signature, file))
}

fn type_index_of(index: usize) -> Result<u16> {
	u16::try_from(index).map_err(|_| NifError::CountOverflow { len: index + 1, width: 16 })
}

pub(crate) fn is_permutation(order: &[usize], count: usize) -> bool {
	if order.len() != count {
		return false;
	}
	let mut seen = vec![false; count];
	for &old in order {
		match seen.get_mut(old) {
			Some(slot) if !*slot => *slot = true,
			_ => return false,
		}
	}
	true
}
