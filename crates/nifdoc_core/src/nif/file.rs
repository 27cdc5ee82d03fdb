use std::fs;
use std::path::Path;

use tracing::{debug, warn};

use crate::nif::objects::{BsTriShape, NiNode, VertexFlags};
use crate::nif::{BlockRole, Endianness, NiFileVersion, NiHeader, NiObject, NiString, NiUnknown, NiVersion, NifError, NifStream, RawRef, Result, registry};

const TOP_LEVEL_OBJECT: &str = "Top Level Object";
const END_OF_FILE: &str = "End Of File";

/// Flags applied while loading.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadOptions {
	/// Terrain meshes keep full-precision vertex positions on save.
	pub is_terrain: bool,
}

/// Edits applied right before writing.
///
/// The default applies none of them, so a plain save reproduces the loaded bytes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SaveOptions {
	/// Delete blocks no reference reaches.
	pub remove_unreferenced: bool,
	/// Reorder blocks into the canonical layout.
	pub sort_blocks: bool,
	/// Refit geometry bounding spheres.
	pub update_bounds: bool,
}

impl SaveOptions {
	/// Every cleanup pass enabled.
	pub fn optimized() -> Self {
		Self {
			remove_unreferenced: true,
			sort_blocks: true,
			update_bounds: true,
		}
	}
}

/// A whole `.nif` document: header, ordered blocks, footer roots, and trailing bytes.
///
/// Block `i` always pairs with entry `i` of the header's type-index and size tables.
#[derive(Debug, Clone, Default)]
pub struct NifFile {
	pub(crate) header: NiHeader,
	pub(crate) blocks: Vec<Box<dyn NiObject>>,
	pub(crate) roots: Vec<RawRef>,
	pub(crate) legacy_ids: Vec<u32>,
	pub(crate) has_unknown: bool,
	pub(crate) is_terrain: bool,
	pub(crate) trailing: Vec<u8>,
}

impl NifFile {
	/// Fresh file of `version` holding one root node.
	pub fn create(version: NiVersion, root_type: &'static str, root_name: &str) -> Result<Self> {
		let mut file = Self {
			header: NiHeader::new(version),
			..Self::default()
		};
		let root = file.add_block(Box::new(NiNode::with_type(root_type, root_name)))?;
		file.roots.push(RawRef::new(root));
		Ok(file)
	}

	/// Load the file at `path` with default options.
	pub fn open(path: impl AsRef<Path>) -> Result<Self> {
		let bytes = fs::read(path)?;
		Self::from_bytes(&bytes, LoadOptions::default())
	}

	/// Parse a complete file image.
	pub fn from_bytes(bytes: &[u8], options: LoadOptions) -> Result<Self> {
		let mut file = Self::default();
		file.load(bytes, options)?;
		Ok(file)
	}

	/// Replace this document with the file in `bytes`; on failure the document is left empty.
	pub fn load(&mut self, bytes: &[u8], options: LoadOptions) -> Result<()> {
		let loaded = self.load_inner(bytes, options);
		if loaded.is_err() {
			*self = Self::default();
		}
		loaded
	}

	fn load_inner(&mut self, bytes: &[u8], options: LoadOptions) -> Result<()> {
		*self = Self {
			is_terrain: options.is_terrain,
			..Self::default()
		};
		let mut stream = NifStream::reader(bytes, NiVersion::default());
		stream.sync(&mut self.header)?;
		let version = *self.header.version();
		let file = version.file;
		let inline_types = file < NiFileVersion::V5_0_0_1;
		let declared = self.header.declared_block_count();

		let mut index = 0;
		loop {
			if declared.is_some_and(|count| index >= count) {
				break;
			}
			let name = if inline_types {
				let mut name = NiString::default();
				stream.sync(&mut name)?;
				let name = name.to_string_lossy().into_owned();
				if file < NiFileVersion::V3_1 {
					if name == END_OF_FILE {
						break;
					}
					if name == TOP_LEVEL_OBJECT {
						self.roots.push(RawRef::new(index));
						continue;
					}
				}
				name
			} else {
				let count = self.header.block_count();
				self.header.block_type_name(index).ok_or(NifError::BlockIndexOutOfRange { index, count })?.to_string_lossy().into_owned()
			};
			if file < NiFileVersion::V3_3_0_13 {
				let mut id = 0_u32;
				stream.sync(&mut id)?;
				self.legacy_ids.push(id);
			}
			let block = self.read_block(&mut stream, index, &name)?;
			if inline_types {
				self.header.push_block(&name)?;
			}
			self.blocks.push(block);
			index += 1;
		}

		if file >= NiFileVersion::V3_3_0_13 {
			stream.sync_list::<u32, _>(&mut self.roots)?;
		}
		stream.sync_rest(&mut self.trailing);

		if file < NiFileVersion::V3_3_0_13 {
			let unresolved = self.links_to_indices();
			if unresolved > 0 {
				warn!(unresolved, "links to unknown block ids cleared");
			}
		}
		if file >= NiFileVersion::V20_1_0_1 {
			self.resolve_strings();
		}
		self.prepare_skins_after_load();
		debug!(version = %file, user = version.user, stream = version.stream, blocks = self.blocks.len(), unknown = self.has_unknown, "loaded nif");
		Ok(())
	}

	fn read_block(&mut self, stream: &mut NifStream<'_>, index: usize, name: &str) -> Result<Box<dyn NiObject>> {
		let version = *self.header.version();
		let size = if version.file >= NiFileVersion::V20_2_0_5 { self.header.block_sizes().get(index).copied() } else { None };
		let created = registry::create(name, &version);
		let Some(size) = size else {
			let Some(mut block) = created else {
				return Err(NifError::UnknownBlockType { name: name.to_owned(), index });
			};
			stream.set_owner(name);
			block.sync(stream)?;
			return Ok(block);
		};

		let mut data = Vec::new();
		stream.sync_bytes(&mut data, size as usize)?;
		let Some(mut block) = created else {
			warn!(index, name, size, "unknown block type kept as raw bytes");
			self.has_unknown = true;
			return Ok(Box::new(NiUnknown::new(name, data)));
		};
		match parse_sized(&mut *block, &data, version, stream.endianness(), index) {
			Ok(()) => Ok(block),
			Err(err) => {
				warn!(index, name, %err, "block did not parse, kept as raw bytes");
				self.has_unknown = true;
				Ok(Box::new(NiUnknown::new(name, data)))
			}
		}
	}

	fn resolve_strings(&mut self) {
		for block in &mut self.blocks {
			let mut strings = Vec::new();
			block.string_refs(&mut strings);
			for string in strings {
				self.header.resolve_string_ref(string);
			}
		}
	}

	/// Write the file to `path`.
	pub fn save(&mut self, path: impl AsRef<Path>, options: SaveOptions) -> Result<()> {
		let bytes = self.to_bytes(options)?;
		fs::write(path, bytes)?;
		Ok(())
	}

	/// Serialize to a fresh byte vector.
	pub fn to_bytes(&mut self, options: SaveOptions) -> Result<Vec<u8>> {
		let mut out = Vec::new();
		self.write_to(&mut out, options)?;
		Ok(out)
	}

	/// Apply the requested save edits, then append the file image to `out`.
	pub fn write_to(&mut self, out: &mut Vec<u8>, options: SaveOptions) -> Result<()> {
		if options.remove_unreferenced {
			self.delete_unreferenced_blocks()?;
		}
		if options.sort_blocks {
			self.pretty_sort_blocks()?;
		}
		if options.update_bounds {
			self.update_bounds();
		}
		let version = *self.header.version();
		self.check_layouts(&version)?;
		self.finalize();

		let file = version.file;
		let mut stream = NifStream::writer(out, version);
		stream.sync(&mut self.header)?;

		let legacy_links = file < NiFileVersion::V3_3_0_13;
		if legacy_links {
			self.links_to_ids();
		}
		let written = self.write_blocks(&mut stream);
		if legacy_links {
			self.links_to_indices();
		}
		let sizes = written?;

		if file >= NiFileVersion::V3_3_0_13 {
			stream.sync_list::<u32, _>(&mut self.roots)?;
		} else if file < NiFileVersion::V3_1 {
			stream.sync(&mut NiString::from(END_OF_FILE))?;
		}
		stream.sync_rest(&mut self.trailing);

		if file >= NiFileVersion::V20_2_0_5 {
			if let Some(offset) = self.header.size_table_offset() {
				stream.patch_u32s(offset, &sizes)?;
			}
		}
		self.header.set_block_sizes(sizes);
		debug!(version = %file, blocks = self.blocks.len(), "saved nif");
		Ok(())
	}

	/// Write every block with its legacy framing; returns the serialized sizes.
	fn write_blocks(&mut self, stream: &mut NifStream<'_>) -> Result<Vec<u32>> {
		let file = stream.version().file;
		let mut sizes = Vec::with_capacity(self.blocks.len());
		for (index, block) in self.blocks.iter_mut().enumerate() {
			let name = block.block_name().to_owned();
			if file < NiFileVersion::V5_0_0_1 {
				if file < NiFileVersion::V3_1 && self.roots.iter().any(|root| root.index() == Some(index)) {
					stream.sync(&mut NiString::from(TOP_LEVEL_OBJECT))?;
				}
				stream.sync(&mut NiString::from(name.as_str()))?;
			}
			if file < NiFileVersion::V3_3_0_13 {
				let mut id = self.legacy_ids.get(index).copied().unwrap_or(index as u32 + 1);
				stream.sync(&mut id)?;
			}
			let start = stream.pos();
			stream.set_owner(&name);
			block.sync(stream)?;
			let len = stream.pos() - start;
			sizes.push(u32::try_from(len).map_err(|_| NifError::CountOverflow { len, width: 32 })?);
		}
		Ok(sizes)
	}

	/// Fail when a block could not be read back from a file of `version`.
	///
	/// Typed blocks need a catalog layout for `version`; opaque blocks need a size table to be skipped.
	fn check_layouts(&self, version: &NiVersion) -> Result<()> {
		for (index, block) in self.blocks.iter().enumerate() {
			let name = block.block_name();
			let readable = if block.is_opaque() { version.file >= NiFileVersion::V20_2_0_5 } else { registry::supports(name, version) };
			if !readable {
				return Err(NifError::UnsupportedBlockForVersion {
					index,
					name: name.to_owned(),
					version: version.file.to_string(),
				});
			}
		}
		Ok(())
	}

	/// Rewrite links from block indices to the stored block ids of files before 3.3.0.13, where `0` means none.
	fn links_to_ids(&mut self) {
		let ids = &self.legacy_ids;
		for block in &mut self.blocks {
			block.remap_refs(&mut |raw: &mut RawRef| {
				let id = raw.index().and_then(|index| ids.get(index)).and_then(|&id| i32::try_from(id).ok());
				*raw = RawRef(id.unwrap_or(0));
			});
		}
	}

	/// Resolve stored block ids back to indices; returns how many ids matched no block.
	fn links_to_indices(&mut self) -> usize {
		let ids = &self.legacy_ids;
		let mut unresolved = 0;
		for block in &mut self.blocks {
			block.remap_refs(&mut |raw: &mut RawRef| {
				let id = u32::try_from(raw.0).ok().filter(|&id| id != 0);
				let index = id.and_then(|id| ids.iter().position(|&known| known == id));
				if id.is_some() && index.is_none() {
					unresolved += 1;
				}
				raw.set(index);
			});
		}
		unresolved
	}

	fn finalize(&mut self) {
		let version = *self.header.version();
		self.prepare_skins_for_save();
		if self.is_terrain && version.stream >= 130 {
			for block in &mut self.blocks {
				if let Some(shape) = block.downcast_mut::<BsTriShape>() {
					let mut flags = shape.vertex_desc.flags();
					flags.set(VertexFlags::FULLPREC, true);
					shape.vertex_desc.set_flags(flags);
					if shape.data_size > 0 {
						shape.update_data_size();
					}
				}
			}
		}
		if version.file >= NiFileVersion::V20_1_0_1 {
			self.update_string_table();
		}
	}

	/// Refresh the header string table from the current string references.
	///
	/// When every reference still points at its own text and no table entry is unused, the
	/// table is left as loaded. Otherwise it is rebuilt in first-use order. Files holding
	/// opaque blocks only ever append, since those blocks carry raw indices into the table.
	pub fn update_string_table(&mut self) {
		let header = &mut self.header;
		if self.has_unknown {
			for block in &mut self.blocks {
				let mut strings = Vec::new();
				block.string_refs(&mut strings);
				for string in strings {
					let current = string.index().and_then(|index| header.string(index));
					if current == Some(string.text()) || (string.index().is_none() && string.text().is_empty()) {
						continue;
					}
					let index = header.add_or_find_string(string.text(), string.index().is_some());
					string.set_index(index);
				}
			}
			header.update_max_string_len();
			return;
		}

		let mut fresh: Vec<NiString> = Vec::new();
		let mut used = vec![false; header.strings().len()];
		let mut consistent = true;
		let mut planned = Vec::new();
		for block in &mut self.blocks {
			let mut strings = Vec::new();
			block.string_refs(&mut strings);
			for string in strings {
				planned.push(intern(&mut fresh, string.text(), string.index().is_some()));
				match string.index() {
					Some(index) => match header.string(index) {
						Some(text) if text == string.text() => used[index as usize] = true,
						_ => consistent = false,
					},
					None => consistent &= string.text().is_empty(),
				}
			}
		}

		if consistent && used.iter().all(|&used| used) {
			header.update_max_string_len();
			return;
		}
		let mut planned = planned.into_iter();
		for block in &mut self.blocks {
			let mut strings = Vec::new();
			block.string_refs(&mut strings);
			for string in strings {
				string.set_index(planned.next().flatten());
			}
		}
		header.set_strings(fresh);
	}

	/// Header.
	pub fn header(&self) -> &NiHeader {
		&self.header
	}

	/// Layout version.
	pub fn version(&self) -> &NiVersion {
		self.header.version()
	}

	/// Byte order.
	pub fn endianness(&self) -> Endianness {
		self.header.endianness()
	}

	/// Re-target the file to `version` and rebuild every skin partition for its engine.
	///
	/// Fails without touching the file when a block has no layout in `version`.
	pub fn set_version(&mut self, version: NiVersion) -> Result<usize> {
		self.check_layouts(&version)?;
		if self.has_unknown {
			warn!(to = %version.file, "opaque blocks keep their old layout after conversion");
		}
		if version.file < NiFileVersion::V3_3_0_13 && self.legacy_ids.len() != self.blocks.len() {
			self.legacy_ids = (1..=self.blocks.len()).map(|id| id as u32).collect();
		}
		self.header.set_version(version);
		let shapes: Vec<usize> = self.shapes().into_iter().filter(|&shape| self.skin_instance_of(shape).is_some()).collect();
		for &shape in &shapes {
			self.update_skin_partitions(shape)?;
		}
		debug!(to = %version.file, stream = version.stream, skinned = shapes.len(), "retargeted nif");
		Ok(shapes.len())
	}

	/// Every block in file order.
	pub fn blocks(&self) -> &[Box<dyn NiObject>] {
		&self.blocks
	}

	/// Number of blocks.
	pub fn block_count(&self) -> usize {
		self.blocks.len()
	}

	/// Block `index`.
	pub fn block(&self, index: usize) -> Option<&(dyn NiObject + 'static)> {
		self.blocks.get(index).map(|block| &**block)
	}

	/// Mutable block `index`.
	pub fn block_mut(&mut self, index: usize) -> Option<&mut (dyn NiObject + 'static)> {
		self.blocks.get_mut(index).map(|block| &mut **block)
	}

	/// Block `index` as a concrete type.
	pub fn get<T: NiObject + 'static>(&self, index: usize) -> Option<&T> {
		self.blocks.get(index)?.downcast_ref::<T>()
	}

	/// Block `index` as a mutable concrete type.
	pub fn get_mut<T: NiObject + 'static>(&mut self, index: usize) -> Option<&mut T> {
		self.blocks.get_mut(index)?.downcast_mut::<T>()
	}

	pub(crate) fn expect_mut<T: NiObject + 'static>(&mut self, index: usize, expected: &'static str) -> Result<&mut T> {
		let count = self.blocks.len();
		let block = self.blocks.get_mut(index).ok_or(NifError::BlockIndexOutOfRange { index, count })?;
		let got = block.block_name().to_owned();
		block.downcast_mut::<T>().ok_or(NifError::BlockTypeMismatch { index, expected, got })
	}

	/// On-disk type name of block `index`.
	pub fn block_type_name(&self, index: usize) -> Option<&str> {
		self.blocks.get(index).map(|block| block.block_name())
	}

	/// First block whose object name is `name`.
	pub fn find_block_by_name(&self, name: &str) -> Option<usize> {
		self.blocks.iter().position(|block| block.name().is_some_and(|found| found.as_bytes() == name.as_bytes()))
	}

	/// Footer roots.
	pub fn roots(&self) -> &[RawRef] {
		&self.roots
	}

	/// First footer root.
	pub fn root_index(&self) -> Option<usize> {
		self.roots.iter().find_map(|root| root.index())
	}

	/// First footer root when it is a node.
	pub fn root_node(&self) -> Option<&NiNode> {
		self.get::<NiNode>(self.root_index()?)
	}

	/// Indices of every shape block.
	pub fn shapes(&self) -> Vec<usize> {
		self.blocks.iter().enumerate().filter(|(_, block)| block.role() == BlockRole::Shape).map(|(index, _)| index).collect()
	}

	/// Children of node `index`; empty for non-nodes.
	pub fn child_indices(&self, index: usize) -> Vec<usize> {
		self.get::<NiNode>(index).map(|node| node.children.indices().collect()).unwrap_or_default()
	}

	/// First node listing `index` among its children.
	pub fn parent_node(&self, index: usize) -> Option<usize> {
		self.blocks.iter().position(|block| block.downcast_ref::<NiNode>().is_some_and(|node| node.children.contains(index)))
	}

	/// Return `true` when any block was kept as raw bytes.
	pub fn has_unknown_blocks(&self) -> bool {
		self.has_unknown
	}

	/// Return `true` when loaded as a terrain mesh.
	pub fn is_terrain(&self) -> bool {
		self.is_terrain
	}

	/// Bytes found after the footer.
	pub fn trailing(&self) -> &[u8] {
		&self.trailing
	}

	/// Append `block`, registering its type; returns its index.
	pub fn add_block(&mut self, block: Box<dyn NiObject>) -> Result<usize> {
		let index = self.blocks.len();
		self.header.push_block(block.block_name())?;
		if self.header.version().file < NiFileVersion::V3_3_0_13 {
			let next = self.legacy_ids.iter().max().map_or(1, |max| max + 1);
			self.legacy_ids.resize(index, 0);
			self.legacy_ids.push(next.max(index as u32 + 1));
		}
		if block.is_opaque() {
			self.has_unknown = true;
		}
		self.blocks.push(block);
		Ok(index)
	}

	/// Remove block `index`.
	///
	/// References to it are cleared (standalone) or dropped (array entries, footer roots);
	/// references past it shift down by one.
	pub fn remove_block(&mut self, index: usize) -> Result<()> {
		let count = self.blocks.len();
		if index >= count {
			return Err(NifError::BlockIndexOutOfRange { index, count });
		}
		self.header.remove_block(index)?;
		self.blocks.remove(index);
		if index < self.legacy_ids.len() {
			self.legacy_ids.remove(index);
		}
		let mut renumber = |raw: &mut RawRef| match raw.index() {
			Some(target) if target == index => raw.clear(),
			Some(target) if target > index => raw.set(Some(target - 1)),
			_ => {}
		};
		for block in &mut self.blocks {
			{
				let mut arrays = Vec::new();
				block.ref_arrays(&mut arrays);
				for array in arrays {
					array.detach(index);
				}
			}
			block.remap_refs(&mut renumber);
		}
		self.roots.retain(|root| root.index() != Some(index));
		for root in &mut self.roots {
			renumber(root);
		}
		self.has_unknown = self.blocks.iter().any(|block| block.is_opaque());
		Ok(())
	}

	/// Swap block `index` for `block`, keeping every reference to the slot; returns the old block.
	pub fn replace_block(&mut self, index: usize, block: Box<dyn NiObject>) -> Result<Box<dyn NiObject>> {
		let count = self.blocks.len();
		if index >= count {
			return Err(NifError::BlockIndexOutOfRange { index, count });
		}
		self.header.set_block_type(index, block.block_name())?;
		let old = std::mem::replace(&mut self.blocks[index], block);
		self.has_unknown = self.blocks.iter().any(|block| block.is_opaque());
		Ok(old)
	}

	/// Append a copy of block `index`; the copy keeps the original's references.
	pub fn duplicate_block(&mut self, index: usize) -> Result<usize> {
		let count = self.blocks.len();
		let copy = self.blocks.get(index).ok_or(NifError::BlockIndexOutOfRange { index, count })?.clone();
		self.add_block(copy)
	}

	/// Remove every block of type `name`; returns how many went.
	pub fn remove_blocks_of_type(&mut self, name: &str) -> Result<usize> {
		let doomed: Vec<usize> = self.blocks.iter().enumerate().filter(|(_, block)| block.block_name() == name).map(|(index, _)| index).collect();
		for &index in doomed.iter().rev() {
			self.remove_block(index)?;
		}
		Ok(doomed.len())
	}
}

fn parse_sized(block: &mut dyn NiObject, data: &[u8], version: NiVersion, endianness: Endianness, index: usize) -> Result<()> {
	let name = block.block_name().to_owned();
	let mut stream = NifStream::reader(data, version);
	stream.set_endianness(endianness);
	stream.set_owner(&name);
	block.sync(&mut stream)?;
	if stream.remaining() != 0 {
		return Err(NifError::BlockSizeMismatch {
			index,
			name,
			read: data.len() - stream.remaining(),
			expected: data.len(),
		});
	}
	Ok(())
}

fn intern(table: &mut Vec<NiString>, text: &NiString, allow_empty: bool) -> Option<u32> {
	if text.is_empty() && !allow_empty {
		return None;
	}
	let index = match table.iter().position(|entry| entry == text) {
		Some(found) => found,
		None => {
			table.push(text.clone());
			table.len() - 1
		}
	};
	u32::try_from(index).ok()
}

#[cfg(test)]
mod tests;
