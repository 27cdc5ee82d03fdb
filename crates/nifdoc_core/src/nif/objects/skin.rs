use crate::nif::objects::{BoundingSphere, BsVertex, Transform, Triangle, VertexArg, VertexDesc};
use crate::nif::{BlockRole, NiBool, NiFileVersion, NiObject, NifEnum, NifError, NifStream, Presence, Ptr, PtrArray, RawRef, Ref, ReferenceArray, Result, Streamable, StreamableWith};

/// Dismemberment body part id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BodyPart {
	/// Whole torso (Fallout 3).
	#[default]
	Torso,
	/// Head.
	Head,
	/// Hair.
	Hair,
	/// Body.
	Body,
	/// Hands.
	Hands,
	/// Forearms.
	Forearms,
	/// Amulet.
	Amulet,
	/// Feet.
	Feet,
	/// Calves.
	Calves,
	/// Any other id.
	Other(u16),
}

impl NifEnum for BodyPart {
	type Repr = u16;

	fn to_repr(self) -> u16 {
		match self {
			Self::Torso => 0,
			Self::Head => 30,
			Self::Hair => 31,
			Self::Body => 32,
			Self::Hands => 33,
			Self::Forearms => 34,
			Self::Amulet => 35,
			Self::Feet => 37,
			Self::Calves => 38,
			Self::Other(value) => value,
		}
	}

	fn from_repr(repr: u16) -> Self {
		match repr {
			0 => Self::Torso,
			30 => Self::Head,
			31 => Self::Hair,
			32 => Self::Body,
			33 => Self::Hands,
			34 => Self::Forearms,
			35 => Self::Amulet,
			37 => Self::Feet,
			38 => Self::Calves,
			value => Self::Other(value),
		}
	}
}

/// Per-partition dismemberment record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BodyPartInfo {
	/// Editor visibility and start-net-boneset flags.
	pub part_flag: u16,
	/// Body part id.
	pub body_part: BodyPart,
}

impl Streamable for BodyPartInfo {
	fn sync(&mut self, stream: &mut NifStream<'_>) -> Result<()> {
		stream.sync(&mut self.part_flag)?;
		stream.sync_enum(&mut self.body_part)
	}
}

/// Binds a shape to its bones; `BSDismemberSkinInstance` adds per-partition body parts.
#[derive(Debug, Clone)]
pub struct NiSkinInstance {
	type_name: &'static str,
	/// Skin data block.
	pub data: Ref<dyn NiObject>,
	/// Skin partition block.
	pub skin_partition: Ref<dyn NiObject>,
	/// Skeleton root node.
	pub skeleton_root: Ptr<dyn NiObject>,
	/// Bone nodes; partition bone ids index this list.
	pub bones: PtrArray<dyn NiObject>,
	/// Body part per skin partition (dismember variant only).
	pub partitions: Vec<BodyPartInfo>,
}

impl NiSkinInstance {
	/// Type names sharing this layout.
	pub const TYPE_NAMES: [&'static str; 2] = ["NiSkinInstance", "BSDismemberSkinInstance"];

	/// Empty skin instance stored under `type_name`.
	pub fn with_type(type_name: &'static str) -> Self {
		Self {
			type_name,
			data: Ref::none(),
			skin_partition: Ref::none(),
			skeleton_root: Ptr::none(),
			bones: PtrArray::new(),
			partitions: Vec::new(),
		}
	}

	/// Return `true` for the dismember variant.
	pub fn is_dismember(&self) -> bool {
		self.type_name == "BSDismemberSkinInstance"
	}
}

impl NiObject for NiSkinInstance {
	fn block_name(&self) -> &str {
		self.type_name
	}

	fn sync(&mut self, stream: &mut NifStream<'_>) -> Result<()> {
		stream.sync(&mut self.data)?;
		stream.sync_if(Presence::always().since(NiFileVersion::V10_1_0_101), &mut self.skin_partition)?;
		stream.sync(&mut self.skeleton_root)?;
		stream.sync(&mut self.bones)?;
		if self.is_dismember() {
			stream.sync_list::<u32, _>(&mut self.partitions)?;
		}
		Ok(())
	}

	fn refs<'a>(&'a mut self, out: &mut Vec<&'a mut RawRef>) {
		out.push(self.data.raw_mut());
		out.push(self.skin_partition.raw_mut());
	}

	fn ptrs<'a>(&'a mut self, out: &mut Vec<&'a mut RawRef>) {
		out.push(self.skeleton_root.raw_mut());
	}

	fn ref_arrays<'a>(&'a mut self, out: &mut Vec<&'a mut dyn ReferenceArray>) {
		out.push(&mut self.bones);
	}

	fn role(&self) -> BlockRole {
		BlockRole::Skin
	}
}

/// One vertex influenced by a bone.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct BoneVertData {
	/// Mesh vertex index.
	pub index: u16,
	/// Influence weight.
	pub weight: f32,
}

impl Streamable for BoneVertData {
	fn sync(&mut self, stream: &mut NifStream<'_>) -> Result<()> {
		stream.sync(&mut self.index)?;
		stream.sync(&mut self.weight)
	}
}

/// Per-bone bind data.
#[derive(Debug, Clone, Default)]
pub struct BoneData {
	/// Mesh space to bone space transform.
	pub skin_transform: Transform,
	/// Bounding sphere of influenced vertices.
	pub bound: BoundingSphere,
	/// Influenced vertex count as recorded on disk.
	pub num_vertices: u16,
	/// Influenced vertices, present when the skin data stores weights.
	pub vertex_weights: Vec<BoneVertData>,
}

impl BoneData {
	/// Replace the influenced vertices and their count.
	pub fn set_vertex_weights(&mut self, weights: Vec<BoneVertData>) {
		self.num_vertices = u16::try_from(weights.len()).unwrap_or(u16::MAX);
		self.vertex_weights = weights;
	}
}

/// The argument is the skin data's "has vertex weights" byte.
impl StreamableWith<u8> for BoneData {
	fn sync_with(&mut self, stream: &mut NifStream<'_>, has_weights: u8) -> Result<()> {
		stream.sync(&mut self.skin_transform)?;
		stream.sync(&mut self.bound)?;
		stream.sync(&mut self.num_vertices)?;
		let present = stream.version().file < NiFileVersion::V4_2_1_0 || has_weights != 0;
		if present {
			stream.sync_fixed(&mut self.vertex_weights, usize::from(self.num_vertices))?;
		}
		Ok(())
	}
}

/// Bind pose and per-bone vertex weights.
#[derive(Debug, Clone)]
pub struct NiSkinData {
	/// Overall skin transform.
	pub skin_transform: Transform,
	/// Partition link of old files.
	pub legacy_partition: Ref<dyn NiObject>,
	/// Whether bones carry vertex weights.
	pub has_vertex_weights: u8,
	/// Per-bone data, parallel to the skin instance bones.
	pub bones: Vec<BoneData>,
}

impl Default for NiSkinData {
	fn default() -> Self {
		Self {
			skin_transform: Transform::default(),
			legacy_partition: Ref::none(),
			has_vertex_weights: 1,
			bones: Vec::new(),
		}
	}
}

impl NiSkinData {
	/// Per-vertex `(bone, weight)` pairs, highest weight first, at most `limit` each.
	pub fn vertex_influences(&self, vertex_count: usize, limit: usize) -> Vec<Vec<(u16, f32)>> {
		let mut influences = vec![Vec::new(); vertex_count];
		for (bone, data) in self.bones.iter().enumerate() {
			let Ok(bone) = u16::try_from(bone) else {
				break;
			};
			for weight in &data.vertex_weights {
				if let Some(list) = influences.get_mut(usize::from(weight.index)) {
					list.push((bone, weight.weight));
				}
			}
		}
		for list in &mut influences {
			list.sort_by(|a: &(u16, f32), b: &(u16, f32)| b.1.total_cmp(&a.1));
			list.truncate(limit);
		}
		influences
	}
}

impl NiObject for NiSkinData {
	fn block_name(&self) -> &str {
		"NiSkinData"
	}

	fn sync(&mut self, stream: &mut NifStream<'_>) -> Result<()> {
		stream.sync(&mut self.skin_transform)?;
		let mut count = self.bones.len();
		stream.sync_count::<u32>(&mut count)?;
		let legacy = Presence::always().since(NiFileVersion::V4_0_0_2).until(NiFileVersion::V10_1_0_0);
		stream.sync_if(legacy, &mut self.legacy_partition)?;
		if stream.version().file >= NiFileVersion::V4_2_1_0 {
			stream.sync(&mut self.has_vertex_weights)?;
		}
		stream.sync_fixed_with(&mut self.bones, count, self.has_vertex_weights)
	}

	fn refs<'a>(&'a mut self, out: &mut Vec<&'a mut RawRef>) {
		out.push(self.legacy_partition.raw_mut());
	}

	fn role(&self) -> BlockRole {
		BlockRole::Skin
	}
}

/// One bone-bounded group of triangles and vertices.
///
/// `triangles` are partition-local ("mapped"); `true_triangles` index the whole mesh.
/// Either is derived from the other through `vertex_map`.
#[derive(Debug, Clone, Default)]
pub struct SkinPartition {
	/// Partition vertex count.
	pub num_vertices: u16,
	/// Partition triangle count.
	pub num_triangles: u16,
	/// Skin instance bone indices used by this partition.
	pub bones: Vec<u16>,
	/// Weights stored per vertex.
	pub num_weights_per_vertex: u16,
	/// Whether the vertex map is stored.
	pub has_vertex_map: NiBool,
	/// Local vertex to mesh vertex.
	pub vertex_map: Vec<u16>,
	/// Whether weights are stored.
	pub has_vertex_weights: NiBool,
	/// Weights, `num_weights_per_vertex` per vertex.
	pub vertex_weights: Vec<f32>,
	/// Strip lengths.
	pub strip_lengths: Vec<u16>,
	/// Whether strips or triangles are stored.
	pub has_faces: NiBool,
	/// Strips, partition-local.
	pub strips: Vec<Vec<u16>>,
	/// Triangles, partition-local.
	pub triangles: Vec<Triangle>,
	/// Whether bone indices are stored.
	pub has_bone_indices: NiBool,
	/// Local bone slots, `num_weights_per_vertex` per vertex.
	pub bone_indices: Vec<u8>,
	/// Level of detail.
	pub lod_level: u8,
	/// Whether the global vertex buffer is used.
	pub global_vb: NiBool,
	/// Vertex layout (Skyrim SE).
	pub vertex_desc: VertexDesc,
	/// Triangles in mesh vertex indices.
	pub true_triangles: Vec<Triangle>,
}

impl Streamable for SkinPartition {
	fn sync(&mut self, stream: &mut NifStream<'_>) -> Result<()> {
		let version = *stream.version();
		let modern = version.file >= NiFileVersion::V10_1_0_0;
		stream.sync(&mut self.num_vertices)?;
		stream.sync(&mut self.num_triangles)?;
		let mut num_bones = self.bones.len();
		stream.sync_count::<u16>(&mut num_bones)?;
		let mut num_strips = self.strip_lengths.len();
		stream.sync_count::<u16>(&mut num_strips)?;
		stream.sync(&mut self.num_weights_per_vertex)?;
		stream.sync_fixed(&mut self.bones, num_bones)?;

		let vertices = usize::from(self.num_vertices);
		let weights = vertices * usize::from(self.num_weights_per_vertex);
		sync_flagged(stream, modern, &mut self.has_vertex_map, &mut self.vertex_map, vertices)?;
		sync_flagged(stream, modern, &mut self.has_vertex_weights, &mut self.vertex_weights, weights)?;
		stream.sync_fixed(&mut self.strip_lengths, num_strips)?;

		if modern {
			stream.sync(&mut self.has_faces)?;
		} else {
			self.has_faces = NiBool::TRUE;
		}
		if self.has_faces.is_true() && num_strips != 0 {
			if stream.is_read() {
				self.strips = vec![Vec::new(); num_strips];
			} else if self.strips.len() != num_strips {
				return Err(NifError::FixedLengthMismatch {
					expected: num_strips,
					have: self.strips.len(),
				});
			}
			for (strip, &len) in self.strips.iter_mut().zip(&self.strip_lengths) {
				stream.sync_fixed(strip, usize::from(len))?;
			}
		} else if self.has_faces.is_true() {
			stream.sync_fixed(&mut self.triangles, usize::from(self.num_triangles))?;
		}

		stream.sync(&mut self.has_bone_indices)?;
		if self.has_bone_indices.is_true() {
			stream.sync_fixed(&mut self.bone_indices, weights)?;
		}
		if version.stream > 34 {
			stream.sync(&mut self.lod_level)?;
			stream.sync(&mut self.global_vb)?;
		}
		if version.stream == 100 {
			stream.sync(&mut self.vertex_desc)?;
			stream.sync_fixed(&mut self.true_triangles, usize::from(self.num_triangles))?;
		}
		Ok(())
	}
}

fn sync_flagged<T: Streamable + Default>(stream: &mut NifStream<'_>, modern: bool, flag: &mut NiBool, list: &mut Vec<T>, len: usize) -> Result<()> {
	if modern {
		stream.sync(flag)?;
	} else {
		*flag = NiBool::TRUE;
	}
	if flag.is_true() {
		stream.sync_fixed(list, len)?;
	}
	Ok(())
}

/// Bone-bounded partitions for hardware skinning, plus the Skyrim SE global vertex buffer.
#[derive(Debug, Clone, Default)]
pub struct NiSkinPartition {
	/// Partitions.
	pub partitions: Vec<SkinPartition>,
	/// Size of the global vertex buffer in bytes.
	pub data_size: u32,
	/// Bytes per global vertex.
	pub vertex_size: u32,
	/// Global vertex layout.
	pub vertex_desc: VertexDesc,
	/// Global vertices.
	pub vertex_data: Vec<BsVertex>,
}

impl NiSkinPartition {
	/// Refresh `data_size` and `vertex_size` from the global buffer.
	pub fn update_buffer_size(&mut self) {
		self.vertex_size = self.vertex_desc.vertex_size();
		let total = u64::from(self.vertex_size) * self.vertex_data.len() as u64;
		self.data_size = u32::try_from(total).unwrap_or(u32::MAX);
	}
}

impl NiObject for NiSkinPartition {
	fn block_name(&self) -> &str {
		"NiSkinPartition"
	}

	fn sync(&mut self, stream: &mut NifStream<'_>) -> Result<()> {
		let bs_stream = stream.version().stream;
		let mut count = self.partitions.len();
		stream.sync_count::<u32>(&mut count)?;
		if bs_stream == 100 {
			stream.sync(&mut self.data_size)?;
			stream.sync(&mut self.vertex_size)?;
			stream.sync(&mut self.vertex_desc)?;
			if self.data_size > 0 {
				if self.vertex_size == 0 {
					return Err(NifError::UnsupportedLayout {
						name: "NiSkinPartition".to_owned(),
						detail: "vertex buffer with zero vertex size",
					});
				}
				let vertices = (self.data_size / self.vertex_size) as usize;
				stream.sync_fixed_with(&mut self.vertex_data, vertices, VertexArg::new(self.vertex_desc, bs_stream))?;
			}
		}
		stream.sync_fixed(&mut self.partitions, count)
	}

	fn role(&self) -> BlockRole {
		BlockRole::Skin
	}
}
