use glam::{Vec2, Vec3, Vec4};

use crate::nif::objects::{BoundingSphere, NiAvObject};
use crate::nif::partition::strips_to_triangles;
use crate::nif::{BlockRole, NiBool, NiFileVersion, NiObject, NiString, NifError, NifStream, Presence, RawRef, Ref, ReferenceArray, Result, Streamable, StringRef};

/// Triangle as three vertex indices.
pub type Triangle = [u16; 3];

/// Material slots attached to a geometry.
#[derive(Debug, Clone, Default)]
pub struct MaterialData {
	/// Whether a named shader follows (10.0.1.0 through 20.1.0.3).
	pub has_shader: NiBool,
	/// Shader name.
	pub shader_name: StringRef,
	/// Shader extra data.
	pub shader_extra_data: i32,
	/// Material names.
	pub material_names: Vec<StringRef>,
	/// Material extra data, parallel to `material_names`.
	pub material_extra_data: Vec<u32>,
	/// Active material slot, `-1` for none.
	pub active_material: i32,
	/// Whether materials must be refreshed.
	pub needs_update: NiBool,
}

impl Streamable for MaterialData {
	fn sync(&mut self, stream: &mut NifStream<'_>) -> Result<()> {
		let file = stream.version().file;
		if (NiFileVersion::V10_0_1_0..=NiFileVersion::new(20, 1, 0, 3)).contains(&file) {
			stream.sync(&mut self.has_shader)?;
			if self.has_shader.is_true() {
				stream.sync(&mut self.shader_name)?;
				stream.sync(&mut self.shader_extra_data)?;
			}
		}
		if file >= NiFileVersion::V20_2_0_5 {
			let mut count = self.material_names.len();
			stream.sync_count::<u32>(&mut count)?;
			stream.sync_fixed(&mut self.material_names, count)?;
			stream.sync_fixed(&mut self.material_extra_data, count)?;
			stream.sync(&mut self.active_material)?;
		}
		stream.sync_if(Presence::always().since(NiFileVersion::V20_2_0_7), &mut self.needs_update)?;
		Ok(())
	}
}

/// Classic renderable shape: `NiTriShape` or `NiTriStrips`.
#[derive(Debug, Clone)]
pub struct NiGeometry {
	type_name: &'static str,
	/// Shared scene object fields.
	pub av: NiAvObject,
	/// Geometry data block.
	pub data: Ref<dyn NiObject>,
	/// Skin instance block.
	pub skin_instance: Ref<dyn NiObject>,
	/// Material slots.
	pub material: MaterialData,
	/// Shader property (Skyrim-era streams).
	pub shader_property: Ref<dyn NiObject>,
	/// Alpha property (Skyrim-era streams).
	pub alpha_property: Ref<dyn NiObject>,
}

impl NiGeometry {
	/// Type names sharing this layout.
	pub const TYPE_NAMES: [&'static str; 2] = ["NiTriShape", "NiTriStrips"];

	/// Shape stored under `type_name` called `name`.
	pub fn with_type(type_name: &'static str, name: &str) -> Self {
		Self {
			type_name,
			av: NiAvObject::named(name),
			data: Ref::none(),
			skin_instance: Ref::none(),
			material: MaterialData {
				active_material: -1,
				..MaterialData::default()
			},
			shader_property: Ref::none(),
			alpha_property: Ref::none(),
		}
	}
}

impl NiObject for NiGeometry {
	fn block_name(&self) -> &str {
		self.type_name
	}

	fn sync(&mut self, stream: &mut NifStream<'_>) -> Result<()> {
		stream.sync(&mut self.av)?;
		stream.sync(&mut self.data)?;
		stream.sync(&mut self.skin_instance)?;
		stream.sync(&mut self.material)?;
		let bs_stream = stream.version().stream;
		stream.sync_if(Presence::always().when(bs_stream > 34), &mut self.shader_property)?;
		stream.sync_if(Presence::always().when(bs_stream > 34), &mut self.alpha_property)?;
		Ok(())
	}

	fn refs<'a>(&'a mut self, out: &mut Vec<&'a mut RawRef>) {
		self.av.refs(out);
		out.push(self.data.raw_mut());
		out.push(self.skin_instance.raw_mut());
		out.push(self.shader_property.raw_mut());
		out.push(self.alpha_property.raw_mut());
	}

	fn ref_arrays<'a>(&'a mut self, out: &mut Vec<&'a mut dyn ReferenceArray>) {
		self.av.ref_arrays(out);
	}

	fn string_refs<'a>(&'a mut self, out: &mut Vec<&'a mut StringRef>) {
		self.av.string_refs(out);
		out.push(&mut self.material.shader_name);
		out.extend(self.material.material_names.iter_mut());
	}

	fn name(&self) -> Option<&NiString> {
		Some(self.av.net.name.text())
	}

	fn role(&self) -> BlockRole {
		BlockRole::Shape
	}
}

/// Vertex arrays shared by triangle and strip data.
#[derive(Debug, Clone, Default)]
pub struct NiGeometryData {
	/// Group id.
	pub group_id: i32,
	/// Vertex count; every per-vertex array present holds this many entries.
	pub num_vertices: u16,
	/// Keep flags.
	pub keep_flags: u8,
	/// Compress flags.
	pub compress_flags: u8,
	/// Whether positions are stored.
	pub has_vertices: NiBool,
	/// Positions.
	pub vertices: Vec<Vec3>,
	/// UV set count and tangent presence bits.
	pub data_flags: u16,
	/// Whether normals are stored.
	pub has_normals: NiBool,
	/// Normals.
	pub normals: Vec<Vec3>,
	/// Tangents, present with normals when data flags request them.
	pub tangents: Vec<Vec3>,
	/// Bitangents, parallel to `tangents`.
	pub bitangents: Vec<Vec3>,
	/// Bounding sphere.
	pub bound: BoundingSphere,
	/// Whether vertex colors are stored.
	pub has_vertex_colors: NiBool,
	/// Vertex colors.
	pub vertex_colors: Vec<Vec4>,
	/// Texture coordinate sets.
	pub uv_sets: Vec<Vec<Vec2>>,
	/// Consistency flags.
	pub consistency_flags: u16,
	/// Additional data block.
	pub additional_data: Ref<dyn NiObject>,
}

impl NiGeometryData {
	/// Data flag bit requesting tangents and bitangents.
	pub const HAS_TANGENTS: u16 = 0x1000;

	/// Replace positions, keeping every other per-vertex array consistent in length.
	pub fn set_vertices(&mut self, vertices: Vec<Vec3>) {
		let len = vertices.len();
		self.num_vertices = u16::try_from(len).unwrap_or(u16::MAX);
		self.has_vertices = NiBool::from(!vertices.is_empty());
		self.vertices = vertices;
		for list in [&mut self.normals, &mut self.tangents, &mut self.bitangents] {
			if !list.is_empty() {
				list.resize(len, Vec3::ZERO);
			}
		}
		if !self.vertex_colors.is_empty() {
			self.vertex_colors.resize(len, Vec4::ONE);
		}
		for set in &mut self.uv_sets {
			set.resize(len, Vec2::ZERO);
		}
	}

	fn uv_set_count(&self, bs_stream: u32) -> usize {
		if bs_stream > 0 { usize::from(self.data_flags & 1) } else { usize::from(self.data_flags & 63) }
	}
}

impl Streamable for NiGeometryData {
	fn sync(&mut self, stream: &mut NifStream<'_>) -> Result<()> {
		let version = *stream.version();
		stream.sync_if(Presence::always().since(NiFileVersion::V10_1_0_114), &mut self.group_id)?;
		stream.sync(&mut self.num_vertices)?;
		let count = usize::from(self.num_vertices);
		if version.file >= NiFileVersion::V10_1_0_0 {
			stream.sync(&mut self.keep_flags)?;
			stream.sync(&mut self.compress_flags)?;
		}
		stream.sync(&mut self.has_vertices)?;
		if self.has_vertices.is_true() {
			stream.sync_fixed(&mut self.vertices, count)?;
		}
		stream.sync_if(Presence::always().since(NiFileVersion::V10_0_1_0), &mut self.data_flags)?;
		stream.sync(&mut self.has_normals)?;
		if self.has_normals.is_true() {
			stream.sync_fixed(&mut self.normals, count)?;
			if version.file >= NiFileVersion::V10_1_0_0 && self.data_flags & Self::HAS_TANGENTS != 0 {
				stream.sync_fixed(&mut self.tangents, count)?;
				stream.sync_fixed(&mut self.bitangents, count)?;
			}
		}
		stream.sync(&mut self.bound)?;
		stream.sync(&mut self.has_vertex_colors)?;
		if self.has_vertex_colors.is_true() {
			stream.sync_fixed(&mut self.vertex_colors, count)?;
		}
		let sets = self.uv_set_count(version.stream);
		if stream.is_read() {
			self.uv_sets = vec![Vec::new(); sets];
		} else if self.uv_sets.len() != sets {
			return Err(NifError::FixedLengthMismatch {
				expected: sets,
				have: self.uv_sets.len(),
			});
		}
		for set in &mut self.uv_sets {
			stream.sync_fixed(set, count)?;
		}
		stream.sync_if(Presence::always().since(NiFileVersion::V10_0_1_0), &mut self.consistency_flags)?;
		stream.sync_if(Presence::always().since(NiFileVersion::V20_0_0_4), &mut self.additional_data)?;
		Ok(())
	}
}

/// Vertex-index pair groups sharing a position.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MatchGroup {
	/// Vertex indices in the group.
	pub vertex_indices: Vec<u16>,
}

impl Streamable for MatchGroup {
	fn sync(&mut self, stream: &mut NifStream<'_>) -> Result<()> {
		stream.sync_list::<u16, _>(&mut self.vertex_indices)
	}
}

/// Indexed triangle list geometry.
#[derive(Debug, Clone, Default)]
pub struct NiTriShapeData {
	/// Vertex arrays.
	pub geom: NiGeometryData,
	/// Triangle count.
	pub num_triangles: u16,
	/// Index count (three per triangle).
	pub num_triangle_points: u32,
	/// Whether triangles are stored.
	pub has_triangles: NiBool,
	/// Triangles.
	pub triangles: Vec<Triangle>,
	/// Match groups.
	pub match_groups: Vec<MatchGroup>,
}

impl NiTriShapeData {
	/// Replace the triangle list and its counters.
	pub fn set_triangles(&mut self, triangles: Vec<Triangle>) {
		self.num_triangles = u16::try_from(triangles.len()).unwrap_or(u16::MAX);
		self.num_triangle_points = u32::from(self.num_triangles) * 3;
		self.has_triangles = NiBool::from(!triangles.is_empty());
		self.triangles = triangles;
	}
}

impl NiObject for NiTriShapeData {
	fn block_name(&self) -> &str {
		"NiTriShapeData"
	}

	fn sync(&mut self, stream: &mut NifStream<'_>) -> Result<()> {
		stream.sync(&mut self.geom)?;
		stream.sync(&mut self.num_triangles)?;
		stream.sync(&mut self.num_triangle_points)?;
		if stream.version().file >= NiFileVersion::V10_0_1_0 {
			stream.sync(&mut self.has_triangles)?;
		} else {
			self.has_triangles = NiBool::TRUE;
		}
		if self.has_triangles.is_true() {
			stream.sync_fixed(&mut self.triangles, usize::from(self.num_triangles))?;
		}
		stream.sync_list::<u16, _>(&mut self.match_groups)
	}

	fn refs<'a>(&'a mut self, out: &mut Vec<&'a mut RawRef>) {
		out.push(self.geom.additional_data.raw_mut());
	}

	fn role(&self) -> BlockRole {
		BlockRole::Data
	}
}

/// Triangle strip geometry.
#[derive(Debug, Clone, Default)]
pub struct NiTriStripsData {
	/// Vertex arrays.
	pub geom: NiGeometryData,
	/// Triangle count implied by the strips.
	pub num_triangles: u16,
	/// Length of each strip.
	pub strip_lengths: Vec<u16>,
	/// Whether strip points are stored.
	pub has_points: NiBool,
	/// Strip vertex indices, parallel to `strip_lengths` when points are stored.
	pub strips: Vec<Vec<u16>>,
}

impl NiTriStripsData {
	/// Replace the strips and the implied triangle count.
	pub fn set_strips(&mut self, strips: Vec<Vec<u16>>) {
		self.num_triangles = u16::try_from(strips.iter().map(|strip| strip.len().saturating_sub(2)).sum::<usize>()).unwrap_or(u16::MAX);
		self.strip_lengths = strips.iter().map(|strip| u16::try_from(strip.len()).unwrap_or(u16::MAX)).collect();
		self.has_points = NiBool::from(!strips.is_empty());
		self.strips = strips;
	}

	/// Strips expanded to triangles.
	pub fn triangles(&self) -> Vec<Triangle> {
		strips_to_triangles(&self.strips)
	}
}

impl NiObject for NiTriStripsData {
	fn block_name(&self) -> &str {
		"NiTriStripsData"
	}

	fn sync(&mut self, stream: &mut NifStream<'_>) -> Result<()> {
		stream.sync(&mut self.geom)?;
		stream.sync(&mut self.num_triangles)?;
		stream.sync_list::<u16, _>(&mut self.strip_lengths)?;
		if stream.version().file >= NiFileVersion::V10_0_1_3 {
			stream.sync(&mut self.has_points)?;
		} else {
			self.has_points = NiBool::TRUE;
		}
		if !self.has_points.is_true() {
			return Ok(());
		}
		if stream.is_read() {
			self.strips = vec![Vec::new(); self.strip_lengths.len()];
		} else if self.strips.len() != self.strip_lengths.len() {
			return Err(NifError::FixedLengthMismatch {
				expected: self.strip_lengths.len(),
				have: self.strips.len(),
			});
		}
		for (strip, &len) in self.strips.iter_mut().zip(&self.strip_lengths) {
			stream.sync_fixed(strip, usize::from(len))?;
		}
		Ok(())
	}

	fn refs<'a>(&'a mut self, out: &mut Vec<&'a mut RawRef>) {
		out.push(self.geom.additional_data.raw_mut());
	}

	fn role(&self) -> BlockRole {
		BlockRole::Data
	}
}
