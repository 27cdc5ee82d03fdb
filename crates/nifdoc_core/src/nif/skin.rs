use std::collections::HashMap;

use tracing::{debug, warn};

use crate::nif::objects::{BsTriShape, NiGeometry, NiSkinData, NiSkinInstance, NiSkinPartition, NiTriShapeData, NiTriStripsData, SkinPartition, Triangle};
use crate::nif::{NiBool, NiFileVersion, NifError, NifFile, Result, VertexInfluence, WEIGHTS_PER_VERTEX, build_partitions, map_to_global, plan_partitions};

/// Outcome of rebuilding one shape's skin partitions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkinUpdate {
	/// Skin partition block that received the partitions.
	pub partition_block: usize,
	/// Partitions written.
	pub partitions: usize,
	/// Partitions created by splitting.
	pub splits: usize,
	/// Bone ceiling applied, `None` when the engine has none.
	pub ceiling: Option<usize>,
}

impl NifFile {
	/// Skin instance bound to shape `shape`.
	pub fn skin_instance_of(&self, shape: usize) -> Option<usize> {
		let block = self.blocks.get(shape)?;
		let skin = match block.downcast_ref::<NiGeometry>() {
			Some(geometry) => geometry.skin_instance.index(),
			None => block.downcast_ref::<BsTriShape>()?.skin.index(),
		}?;
		self.get::<NiSkinInstance>(skin).map(|_| skin)
	}

	/// Skin partition block used by shape `shape`.
	pub fn skin_partition_of(&self, shape: usize) -> Option<usize> {
		let skin = self.get::<NiSkinInstance>(self.skin_instance_of(shape)?)?;
		let legacy = || self.get::<NiSkinData>(skin.data.index()?)?.legacy_partition.index();
		let partition = skin.skin_partition.index().or_else(legacy)?;
		self.get::<NiSkinPartition>(partition).map(|_| partition)
	}

	/// Rebuild the skin partitions of `shape` under the current engine's bone ceiling.
	///
	/// Triangles keep their current partition where one is known; a partition that would exceed
	/// the ceiling is split, and dismember body part records are duplicated to match.
	pub fn update_skin_partitions(&mut self, shape: usize) -> Result<SkinUpdate> {
		let not_skinned = NifError::NotSkinned { index: shape };
		let skin_index = self.skin_instance_of(shape).ok_or(not_skinned)?;
		let (triangles, vertex_count) = self.skin_mesh(shape).ok_or(NifError::NotSkinned { index: shape })?;
		let skin = self.get::<NiSkinInstance>(skin_index).cloned().ok_or(NifError::NotSkinned { index: shape })?;
		let influences = self.skin_influences(shape, &skin, vertex_count);

		let existing_block = self.skin_partition_of(shape);
		let existing = existing_block.and_then(|index| self.get::<NiSkinPartition>(index)).and_then(|block| existing_assignment(&block.partitions, &triangles));
		let starting_count = existing.as_ref().and_then(|assignment| assignment.iter().max()).map_or(1, |max| max + 1);

		let version = *self.version();
		let ceiling = version.target_engine().bones_per_partition();
		let plan = plan_partitions(&triangles, &influences, existing.as_deref(), ceiling);
		let mut partitions = build_partitions(&triangles, &influences, &plan)?;
		if version.is_skyrim_se() {
			let desc = self.get::<BsTriShape>(shape).map(|shape| shape.vertex_desc).unwrap_or_default();
			for partition in &mut partitions {
				partition.vertex_desc = desc;
				partition.global_vb = NiBool::TRUE;
			}
		}
		let true_triangles: Vec<Triangle> = partitions.iter().flat_map(|partition| partition.true_triangles.iter().copied()).collect();

		if skin.is_dismember() {
			let mut infos = skin.partitions.clone();
			let filler = infos.first().copied().unwrap_or_default();
			infos.resize(starting_count, filler);
			for &(source, inserted) in &plan.splits {
				let info = infos.get(source).copied().unwrap_or(filler);
				infos.insert(inserted.min(infos.len()), info);
			}
			self.expect_mut::<NiSkinInstance>(skin_index, "BSDismemberSkinInstance")?.partitions = infos;
		}

		let partition_block = match existing_block {
			Some(index) => index,
			None => self.attach_skin_partition(skin_index, &skin)?,
		};
		let count = partitions.len();
		self.expect_mut::<NiSkinPartition>(partition_block, "NiSkinPartition")?.partitions = partitions;

		if version.is_skyrim_se() {
			if let Some(shape) = self.get_mut::<BsTriShape>(shape) {
				shape.num_triangles = u32::try_from(true_triangles.len()).unwrap_or(u32::MAX);
				shape.triangles = true_triangles;
			}
		}

		debug!(shape, partitions = count, splits = plan.splits.len(), ?ceiling, "rebuilt skin partitions");
		Ok(SkinUpdate {
			partition_block,
			partitions: count,
			splits: plan.splits.len(),
			ceiling,
		})
	}

	fn attach_skin_partition(&mut self, skin_index: usize, skin: &NiSkinInstance) -> Result<usize> {
		let index = self.add_block(Box::new(NiSkinPartition::default()))?;
		let legacy = self.version().file < NiFileVersion::V10_1_0_101;
		match skin.data.index() {
			Some(data) if legacy => self.expect_mut::<NiSkinData>(data, "NiSkinData")?.legacy_partition.set(Some(index)),
			_ => self.expect_mut::<NiSkinInstance>(skin_index, "NiSkinInstance")?.skin_partition.set(Some(index)),
		}
		Ok(index)
	}

	fn skin_mesh(&self, shape: usize) -> Option<(Vec<Triangle>, usize)> {
		let block = self.blocks.get(shape)?;
		if let Some(shape) = block.downcast_ref::<BsTriShape>() {
			return Some((shape.triangles.clone(), usize::from(shape.num_vertices)));
		}
		let data = block.downcast_ref::<NiGeometry>()?.data.index()?;
		if let Some(data) = self.get::<NiTriShapeData>(data) {
			return Some((data.triangles.clone(), usize::from(data.geom.num_vertices)));
		}
		let data = self.get::<NiTriStripsData>(data)?;
		Some((data.triangles(), usize::from(data.geom.num_vertices)))
	}

	fn skin_influences(&self, shape: usize, skin: &NiSkinInstance, vertex_count: usize) -> Vec<VertexInfluence> {
		let data = skin.data.index().and_then(|index| self.get::<NiSkinData>(index));
		if let Some(data) = data.filter(|data| data.has_vertex_weights != 0 && data.bones.iter().any(|bone| !bone.vertex_weights.is_empty())) {
			return data.vertex_influences(vertex_count, WEIGHTS_PER_VERTEX);
		}
		let Some(shape) = self.get::<BsTriShape>(shape) else {
			return vec![Vec::new(); vertex_count];
		};
		let mut influences: Vec<VertexInfluence> = shape
			.vertices
			.iter()
			.map(|vertex| {
				let mut list: VertexInfluence = vertex.bone_indices.iter().zip(vertex.bone_weights).map(|(&bone, weight)| (u16::from(bone), weight.to_f32())).filter(|&(_, weight)| weight > 0.0).collect();
				list.sort_by(|a, b| b.1.total_cmp(&a.1));
				list
			})
			.collect();
		influences.resize(vertex_count, Vec::new());
		influences
	}

	pub(crate) fn prepare_skins_after_load(&mut self) {
		for block in &mut self.blocks {
			let Some(skin) = block.downcast_mut::<NiSkinPartition>() else {
				continue;
			};
			for partition in &mut skin.partitions {
				if partition.true_triangles.is_empty() {
					let dropped = partition.regenerate_true_triangles();
					if !dropped.is_empty() {
						warn!(dropped = dropped.len(), "partition triangles reach past the vertex map");
					}
				}
			}
		}

		if !self.version().is_skyrim_se() {
			return;
		}
		for shape in self.shapes() {
			let Some(partition) = self.skin_partition_of(shape) else {
				continue;
			};
			let Some(block) = self.get::<NiSkinPartition>(partition) else {
				continue;
			};
			if block.vertex_data.is_empty() {
				continue;
			}
			let vertices = block.vertex_data.clone();
			let triangles: Vec<Triangle> = block.partitions.iter().flat_map(|partition| partition.true_triangles.iter().copied()).collect();
			if let Some(shape) = self.get_mut::<BsTriShape>(shape) {
				if shape.data_size == 0 {
					shape.vertices = vertices;
					shape.triangles = triangles;
				}
			}
		}
	}

	pub(crate) fn prepare_skins_for_save(&mut self) {
		for block in &mut self.blocks {
			let Some(skin) = block.downcast_mut::<NiSkinPartition>() else {
				continue;
			};
			for partition in &mut skin.partitions {
				let (current, _) = map_to_global(&partition.local_triangles(), &partition.vertex_map);
				if current != partition.true_triangles {
					partition.regenerate_mapped_triangles();
				}
			}
		}

		if !self.version().is_skyrim_se() {
			return;
		}
		for shape in self.shapes() {
			let Some(partition) = self.skin_partition_of(shape) else {
				continue;
			};
			let Some(shape) = self.get::<BsTriShape>(shape) else {
				continue;
			};
			if shape.data_size != 0 || shape.vertices.is_empty() {
				continue;
			}
			let (vertices, desc) = (shape.vertices.clone(), shape.vertex_desc);
			if let Some(block) = self.get_mut::<NiSkinPartition>(partition) {
				if block.vertex_data != vertices {
					block.vertex_data = vertices;
					block.vertex_desc = desc;
					block.update_buffer_size();
				}
			}
		}
	}
}

fn existing_assignment(partitions: &[SkinPartition], triangles: &[Triangle]) -> Option<Vec<usize>> {
	if partitions.is_empty() {
		return None;
	}
	let mut owners: HashMap<Triangle, usize> = HashMap::new();
	for (slot, partition) in partitions.iter().enumerate() {
		let (global, _) = map_to_global(&partition.local_triangles(), &partition.vertex_map);
		for triangle in global {
			owners.entry(unordered(triangle)).or_insert(slot);
		}
	}
	triangles.iter().map(|&triangle| owners.get(&unordered(triangle)).copied()).collect()
}

fn unordered(mut triangle: Triangle) -> Triangle {
	triangle.sort_unstable();
	triangle
}
