use glam::Vec3;
use half::f16;

use crate::nif::objects::{BoundingSphere, NiAvObject, Triangle};
use crate::nif::{BlockRole, NiObject, NiString, NifError, NifStream, RawRef, Ref, ReferenceArray, Result, Streamable, StreamableWith, StringRef};

/// Vertex attribute bits stored in the top of a [`VertexDesc`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct VertexFlags(pub u16);

impl VertexFlags {
	/// Position.
	pub const VERTEX: Self = Self(0x001);
	/// First texture coordinate.
	pub const UV: Self = Self(0x002);
	/// Second texture coordinate.
	pub const UV2: Self = Self(0x004);
	/// Normal and bitangent Y.
	pub const NORMAL: Self = Self(0x008);
	/// Tangent and bitangent Z.
	pub const TANGENT: Self = Self(0x010);
	/// Vertex color.
	pub const COLORS: Self = Self(0x020);
	/// Bone weights and indices.
	pub const SKINNED: Self = Self(0x040);
	/// Landscape data.
	pub const LANDDATA: Self = Self(0x080);
	/// Eye blend factor.
	pub const EYEDATA: Self = Self(0x100);
	/// Full-precision positions.
	pub const FULLPREC: Self = Self(0x400);

	/// Return `true` when every bit of `other` is set.
	pub fn contains(self, other: Self) -> bool {
		self.0 & other.0 == other.0
	}

	/// Set or clear the bits of `other`.
	pub fn set(&mut self, other: Self, on: bool) {
		if on {
			self.0 |= other.0;
		} else {
			self.0 &= !other.0;
		}
	}
}

impl std::ops::BitOr for VertexFlags {
	type Output = Self;

	fn bitor(self, rhs: Self) -> Self {
		Self(self.0 | rhs.0)
	}
}

/// Packed vertex layout descriptor: dword size and attribute offsets in the low bits, flags at bit 44.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct VertexDesc(pub u64);

impl VertexDesc {
	const FLAGS_SHIFT: u32 = 44;

	/// Layout computed for `flags`.
	pub fn from_flags(flags: VertexFlags) -> Self {
		let mut desc = Self::default();
		desc.set_flags(flags);
		desc
	}

	/// Attribute flags.
	pub fn flags(self) -> VertexFlags {
		VertexFlags((self.0 >> Self::FLAGS_SHIFT) as u16)
	}

	/// Replace the flags and recompute size and offsets.
	pub fn set_flags(&mut self, flags: VertexFlags) {
		let mut packed = u64::from(flags.0) << Self::FLAGS_SHIFT;
		let mut offset: u64 = match (flags.contains(VertexFlags::VERTEX), flags.contains(VertexFlags::FULLPREC)) {
			(false, _) => 0,
			(true, true) => 16,
			(true, false) => 8,
		};
		let attributes = [
			(2, VertexFlags::UV, 4),
			(3, VertexFlags::UV2, 4),
			(4, VertexFlags::NORMAL, 4),
			(5, VertexFlags::TANGENT, 4),
			(6, VertexFlags::COLORS, 4),
			(7, VertexFlags::SKINNED, 12),
			(8, VertexFlags::LANDDATA, 4),
			(9, VertexFlags::EYEDATA, 4),
		];
		for (slot, attribute, bytes) in attributes {
			if flags.contains(attribute) {
				packed |= ((offset / 4) & 0xF) << (slot * 4);
				offset += bytes;
			}
		}
		packed |= (offset / 4) & 0xF;
		self.0 = packed;
	}

	/// Bytes per vertex as recorded in the descriptor.
	pub fn vertex_size(self) -> u32 {
		((self.0 & 0xF) as u32) * 4
	}
}

impl Streamable for VertexDesc {
	fn sync(&mut self, stream: &mut NifStream<'_>) -> Result<()> {
		stream.sync(&mut self.0)
	}
}

/// Typed argument selecting which vertex sub-fields are physically present.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VertexArg {
	/// Attribute flags of the enclosing shape or partition.
	pub flags: VertexFlags,
	/// Positions are always 32-bit floats regardless of `FULLPREC` (Skyrim SE buffers).
	pub always_full_precision: bool,
}

impl VertexArg {
	/// Argument for a vertex buffer in the given stream.
	pub fn new(desc: VertexDesc, bs_stream: u32) -> Self {
		Self {
			flags: desc.flags(),
			always_full_precision: bs_stream == 100,
		}
	}
}

/// One packed vertex.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct BsVertex {
	/// Position.
	pub position: Vec3,
	/// Bitangent X, packed with the position when tangents are present.
	pub bitangent_x: f32,
	/// Padding word when tangents are absent.
	pub unused_w: u32,
	/// First texture coordinate.
	pub uv: [f16; 2],
	/// Normal, unsigned-normalized bytes.
	pub normal: [u8; 3],
	/// Bitangent Y.
	pub bitangent_y: u8,
	/// Tangent, unsigned-normalized bytes.
	pub tangent: [u8; 3],
	/// Bitangent Z.
	pub bitangent_z: u8,
	/// RGBA color.
	pub color: [u8; 4],
	/// Up to four bone weights.
	pub bone_weights: [f16; 4],
	/// Bone indices parallel to `bone_weights`.
	pub bone_indices: [u8; 4],
	/// Eye blend factor.
	pub eye_data: f32,
}

impl StreamableWith<VertexArg> for BsVertex {
	fn sync_with(&mut self, stream: &mut NifStream<'_>, arg: VertexArg) -> Result<()> {
		let flags = arg.flags;
		if flags.contains(VertexFlags::VERTEX) {
			let tangent = flags.contains(VertexFlags::TANGENT);
			if arg.always_full_precision || flags.contains(VertexFlags::FULLPREC) {
				stream.sync(&mut self.position)?;
				if tangent {
					stream.sync(&mut self.bitangent_x)?;
				} else {
					stream.sync(&mut self.unused_w)?;
				}
			} else {
				let mut half = self.position.to_array().map(f16::from_f32);
				stream.sync(&mut half)?;
				self.position = Vec3::from_array(half.map(f16::to_f32));
				if tangent {
					let mut bitangent = f16::from_f32(self.bitangent_x);
					stream.sync(&mut bitangent)?;
					self.bitangent_x = bitangent.to_f32();
				} else {
					let mut unused = self.unused_w as u16;
					stream.sync(&mut unused)?;
					self.unused_w = u32::from(unused);
				}
			}
		}
		if flags.contains(VertexFlags::UV) {
			stream.sync(&mut self.uv)?;
		}
		if flags.contains(VertexFlags::NORMAL) {
			stream.sync(&mut self.normal)?;
			stream.sync(&mut self.bitangent_y)?;
		}
		if flags.contains(VertexFlags::NORMAL | VertexFlags::TANGENT) {
			stream.sync(&mut self.tangent)?;
			stream.sync(&mut self.bitangent_z)?;
		}
		if flags.contains(VertexFlags::COLORS) {
			stream.sync(&mut self.color)?;
		}
		if flags.contains(VertexFlags::SKINNED) {
			stream.sync(&mut self.bone_weights)?;
			stream.sync(&mut self.bone_indices)?;
		}
		if flags.contains(VertexFlags::EYEDATA) {
			stream.sync(&mut self.eye_data)?;
		}
		Ok(())
	}
}

/// Half-precision particle arrays of Skyrim SE shapes.
#[derive(Debug, Clone, Default)]
pub struct ParticleData {
	/// Positions.
	pub vertices: Vec<[f16; 3]>,
	/// Normals.
	pub normals: Vec<[f16; 3]>,
	/// Triangles.
	pub triangles: Vec<Triangle>,
}

/// Packed-vertex shape of Skyrim SE and later.
#[derive(Debug, Clone)]
pub struct BsTriShape {
	/// Shared scene object fields.
	pub av: NiAvObject,
	/// Bounding sphere.
	pub bound: BoundingSphere,
	/// Axis-aligned bounds (Fallout 76).
	pub bound_min_max: [f32; 6],
	/// Skin instance block.
	pub skin: Ref<dyn NiObject>,
	/// Shader property block.
	pub shader_property: Ref<dyn NiObject>,
	/// Alpha property block.
	pub alpha_property: Ref<dyn NiObject>,
	/// Vertex layout.
	pub vertex_desc: VertexDesc,
	/// Triangle count as recorded on disk.
	pub num_triangles: u32,
	/// Vertex count as recorded on disk.
	pub num_vertices: u16,
	/// Size of the vertex and triangle payload; zero when the skin partition owns it.
	pub data_size: u32,
	/// Vertices.
	pub vertices: Vec<BsVertex>,
	/// Triangles.
	pub triangles: Vec<Triangle>,
	/// Particle data size (Skyrim SE only).
	pub particle_data_size: u32,
	/// Particle arrays, present when `particle_data_size` is non-zero.
	pub particles: ParticleData,
}

impl BsTriShape {
	/// Empty shape called `name` with position, UV, and normal attributes.
	pub fn new(name: &str) -> Self {
		Self {
			av: NiAvObject::named(name),
			bound: BoundingSphere::default(),
			bound_min_max: [0.0; 6],
			skin: Ref::none(),
			shader_property: Ref::none(),
			alpha_property: Ref::none(),
			vertex_desc: VertexDesc::from_flags(VertexFlags::VERTEX | VertexFlags::UV | VertexFlags::NORMAL),
			num_triangles: 0,
			num_vertices: 0,
			data_size: 0,
			vertices: Vec::new(),
			triangles: Vec::new(),
			particle_data_size: 0,
			particles: ParticleData::default(),
		}
	}

	/// Return `true` when vertices carry bone weights.
	pub fn is_skinned(&self) -> bool {
		self.vertex_desc.flags().contains(VertexFlags::SKINNED)
	}

	/// Replace geometry and refresh the counters and payload size.
	pub fn set_geometry(&mut self, vertices: Vec<BsVertex>, triangles: Vec<Triangle>) {
		self.num_vertices = u16::try_from(vertices.len()).unwrap_or(u16::MAX);
		self.num_triangles = u32::try_from(triangles.len()).unwrap_or(u32::MAX);
		self.vertices = vertices;
		self.triangles = triangles;
		self.update_data_size();
	}

	/// Recompute `data_size` from the current layout and counts.
	pub fn update_data_size(&mut self) {
		let payload = u64::from(self.vertex_desc.vertex_size()) * u64::from(self.num_vertices) + 6 * u64::from(self.num_triangles);
		self.data_size = u32::try_from(payload).unwrap_or(u32::MAX);
	}
}

impl NiObject for BsTriShape {
	fn block_name(&self) -> &str {
		"BSTriShape"
	}

	fn sync(&mut self, stream: &mut NifStream<'_>) -> Result<()> {
		let bs_stream = stream.version().stream;
		stream.sync(&mut self.av)?;
		stream.sync(&mut self.bound)?;
		if bs_stream == 155 {
			stream.sync(&mut self.bound_min_max)?;
		}
		stream.sync(&mut self.skin)?;
		stream.sync(&mut self.shader_property)?;
		stream.sync(&mut self.alpha_property)?;
		stream.sync(&mut self.vertex_desc)?;
		if bs_stream >= 130 {
			stream.sync(&mut self.num_triangles)?;
		} else {
			let mut short = u16::try_from(self.num_triangles).map_err(|_| NifError::CountOverflow {
				len: self.num_triangles as usize,
				width: 16,
			})?;
			stream.sync(&mut short)?;
			self.num_triangles = u32::from(short);
		}
		stream.sync(&mut self.num_vertices)?;
		stream.sync(&mut self.data_size)?;
		if self.data_size > 0 {
			let arg = VertexArg::new(self.vertex_desc, bs_stream);
			stream.sync_fixed_with(&mut self.vertices, usize::from(self.num_vertices), arg)?;
			stream.sync_fixed(&mut self.triangles, self.num_triangles as usize)?;
		}
		if bs_stream == 100 {
			stream.sync(&mut self.particle_data_size)?;
			if self.particle_data_size > 0 {
				stream.sync_fixed(&mut self.particles.vertices, usize::from(self.num_vertices))?;
				stream.sync_fixed(&mut self.particles.normals, usize::from(self.num_vertices))?;
				stream.sync_fixed(&mut self.particles.triangles, self.num_triangles as usize)?;
			}
		}
		Ok(())
	}

	fn refs<'a>(&'a mut self, out: &mut Vec<&'a mut RawRef>) {
		self.av.refs(out);
		out.push(self.skin.raw_mut());
		out.push(self.shader_property.raw_mut());
		out.push(self.alpha_property.raw_mut());
	}

	fn ref_arrays<'a>(&'a mut self, out: &mut Vec<&'a mut dyn ReferenceArray>) {
		self.av.ref_arrays(out);
	}

	fn string_refs<'a>(&'a mut self, out: &mut Vec<&'a mut StringRef>) {
		self.av.string_refs(out);
	}

	fn name(&self) -> Option<&NiString> {
		Some(self.av.net.name.text())
	}

	fn role(&self) -> BlockRole {
		BlockRole::Shape
	}
}
