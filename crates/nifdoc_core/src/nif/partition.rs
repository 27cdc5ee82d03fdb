use std::collections::{HashMap, HashSet};

use crate::nif::{NiBool, NifError, Result};
use crate::nif::objects::{SkinPartition, Triangle};

/// Weights kept per partition vertex.
pub const WEIGHTS_PER_VERTEX: usize = 4;

/// Bones one partition can address through its one-byte bone slots.
pub const MAX_PARTITION_BONES: usize = 256;

/// Bone influences of one mesh vertex as `(bone, weight)`, highest weight first.
pub type VertexInfluence = Vec<(u16, f32)>;

/// Expand triangle strips into triangles, flipping winding on odd positions.
///
/// A strip of `n >= 3` indices yields `n - 2` triangles, degenerate stitches included; shorter strips yield none.
pub fn strips_to_triangles(strips: &[Vec<u16>]) -> Vec<Triangle> {
	let mut triangles = Vec::with_capacity(strips.iter().map(|strip| strip.len().saturating_sub(2)).sum());
	for strip in strips {
		for (i, window) in strip.windows(3).enumerate() {
			let (a, b, c) = (window[0], window[1], window[2]);
			if i % 2 == 0 {
				triangles.push([a, b, c]);
			} else {
				triangles.push([a, c, b]);
			}
		}
	}
	triangles
}

/// Summary of one partitioning run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartitionPlan {
	/// Partition index per mesh triangle.
	pub assignment: Vec<usize>,
	/// Number of partitions.
	pub count: usize,
	/// Partitions inserted by splitting, as `(source, inserted)` pairs in split order.
	pub splits: Vec<(usize, usize)>,
}

/// Assign triangles to partitions whose distinct bone count stays within `ceiling`.
///
/// `existing` is the current triangle to partition assignment; it is ignored unless it has one
/// entry per triangle. When a triangle would push its partition over the ceiling, a partition is
/// inserted right after it and that triangle plus every later triangle of the same partition
/// moves there. A `None` ceiling never splits.
pub fn plan_partitions(triangles: &[Triangle], influences: &[VertexInfluence], existing: Option<&[usize]>, ceiling: Option<usize>) -> PartitionPlan {
	let mut assignment = match existing {
		Some(existing) if existing.len() == triangles.len() => existing.to_vec(),
		_ => vec![0; triangles.len()],
	};
	let mut bone_sets: Vec<HashSet<u16>> = vec![HashSet::new(); assignment.iter().max().map_or(1, |max| max + 1)];
	let mut splits = Vec::new();

	for t in 0..triangles.len() {
		let p = assignment[t];
		let triangle_bones = triangle_bones(&triangles[t], influences);
		let merged = bone_sets[p].union(&triangle_bones).count();
		let over = ceiling.is_some_and(|ceiling| merged > ceiling);
		if over && !bone_sets[p].is_empty() {
			for slot in assignment.iter_mut() {
				if *slot > p {
					*slot += 1;
				}
			}
			for slot in assignment[t..].iter_mut() {
				if *slot == p {
					*slot = p + 1;
				}
			}
			bone_sets.insert(p + 1, triangle_bones);
			splits.push((p, p + 1));
		} else {
			bone_sets[p].extend(triangle_bones);
		}
	}

	PartitionPlan {
		assignment,
		count: bone_sets.len(),
		splits,
	}
}

fn triangle_bones(triangle: &Triangle, influences: &[VertexInfluence]) -> HashSet<u16> {
	triangle
		.iter()
		.filter_map(|&vertex| influences.get(usize::from(vertex)))
		.flat_map(|influence| influence.iter().take(WEIGHTS_PER_VERTEX).map(|&(bone, _)| bone))
		.collect()
}

/// Build partition records from a plan.
///
/// Bones get local slots in first-use order, vertices are mapped in first-appearance order, and
/// each vertex keeps four weight slots, zero-filled and normalized unless every weight is zero.
/// Fails when a partition needs more bones than its one-byte slots address.
pub fn build_partitions(triangles: &[Triangle], influences: &[VertexInfluence], plan: &PartitionPlan) -> Result<Vec<SkinPartition>> {
	(0..plan.count)
		.map(|p| {
			let members: Vec<Triangle> = triangles.iter().zip(&plan.assignment).filter(|&(_, &slot)| slot == p).map(|(triangle, _)| *triangle).collect();
			build_partition(&members, influences)
		})
		.collect()
}

fn build_partition(true_triangles: &[Triangle], influences: &[VertexInfluence]) -> Result<SkinPartition> {
	let mut bones: Vec<u16> = Vec::new();
	let mut bone_slots: HashMap<u16, u8> = HashMap::new();
	let mut vertex_map: Vec<u16> = Vec::new();
	let mut vertex_slots: HashMap<u16, u16> = HashMap::new();

	for &vertex in true_triangles.iter().flatten() {
		if vertex_slots.contains_key(&vertex) {
			continue;
		}
		vertex_slots.insert(vertex, u16::try_from(vertex_map.len()).unwrap_or(u16::MAX));
		vertex_map.push(vertex);
		for &(bone, _) in influences.get(usize::from(vertex)).map_or(&[][..], |influence| influence.as_slice()).iter().take(WEIGHTS_PER_VERTEX) {
			if !bone_slots.contains_key(&bone) {
				let slot = u8::try_from(bones.len()).map_err(|_| NifError::TooManyPartitionBones {
					bones: bones.len() + 1,
					max: MAX_PARTITION_BONES,
				})?;
				bone_slots.insert(bone, slot);
				bones.push(bone);
			}
		}
	}

	let mut vertex_weights = Vec::with_capacity(vertex_map.len() * WEIGHTS_PER_VERTEX);
	let mut bone_indices = Vec::with_capacity(vertex_map.len() * WEIGHTS_PER_VERTEX);
	for vertex in &vertex_map {
		let mut weights = [0.0_f32; WEIGHTS_PER_VERTEX];
		let mut slots = [0_u8; WEIGHTS_PER_VERTEX];
		if let Some(influence) = influences.get(usize::from(*vertex)) {
			for (i, &(bone, weight)) in influence.iter().take(WEIGHTS_PER_VERTEX).enumerate() {
				weights[i] = weight;
				slots[i] = bone_slots.get(&bone).copied().unwrap_or(0);
			}
		}
		let total: f32 = weights.iter().sum();
		if total != 0.0 {
			for weight in &mut weights {
				*weight /= total;
			}
		}
		vertex_weights.extend(weights);
		bone_indices.extend(slots);
	}

	let (triangles, _) = map_to_local(true_triangles, &vertex_map);
	Ok(SkinPartition {
		num_vertices: u16::try_from(vertex_map.len()).unwrap_or(u16::MAX),
		num_triangles: u16::try_from(triangles.len()).unwrap_or(u16::MAX),
		bones,
		num_weights_per_vertex: WEIGHTS_PER_VERTEX as u16,
		has_vertex_map: NiBool::TRUE,
		vertex_map,
		has_vertex_weights: NiBool::TRUE,
		vertex_weights,
		has_faces: NiBool::TRUE,
		triangles,
		has_bone_indices: NiBool::TRUE,
		bone_indices,
		true_triangles: true_triangles.to_vec(),
		..SkinPartition::default()
	})
}

/// Map mesh triangles to partition-local indices through `vertex_map`.
///
/// Triangles touching a vertex outside the map are dropped; their positions are returned as the second value.
pub fn map_to_local(true_triangles: &[Triangle], vertex_map: &[u16]) -> (Vec<Triangle>, Vec<usize>) {
	let lookup: HashMap<u16, u16> = vertex_map.iter().enumerate().filter_map(|(local, &global)| Some((global, u16::try_from(local).ok()?))).collect();
	remap(true_triangles, |vertex| lookup.get(&vertex).copied())
}

/// Map partition-local triangles back to mesh indices through `vertex_map`.
///
/// Triangles touching a local index past the map are dropped; their positions are returned as the second value.
pub fn map_to_global(triangles: &[Triangle], vertex_map: &[u16]) -> (Vec<Triangle>, Vec<usize>) {
	remap(triangles, |vertex| vertex_map.get(usize::from(vertex)).copied())
}

fn remap(triangles: &[Triangle], lookup: impl Fn(u16) -> Option<u16>) -> (Vec<Triangle>, Vec<usize>) {
	let mut mapped = Vec::with_capacity(triangles.len());
	let mut deleted = Vec::new();
	for (i, triangle) in triangles.iter().enumerate() {
		match (lookup(triangle[0]), lookup(triangle[1]), lookup(triangle[2])) {
			(Some(a), Some(b), Some(c)) => mapped.push([a, b, c]),
			_ => deleted.push(i),
		}
	}
	(mapped, deleted)
}

impl SkinPartition {
	/// Partition-local triangles, expanding strips when present.
	pub fn local_triangles(&self) -> Vec<Triangle> {
		if self.strips.is_empty() { self.triangles.clone() } else { strips_to_triangles(&self.strips) }
	}

	/// Rebuild `true_triangles` from the local triangles and the vertex map.
	pub fn regenerate_true_triangles(&mut self) -> Vec<usize> {
		let (true_triangles, deleted) = map_to_global(&self.local_triangles(), &self.vertex_map);
		self.true_triangles = true_triangles;
		deleted
	}

	/// Rebuild the stored local triangles from `true_triangles`, dropping strips.
	pub fn regenerate_mapped_triangles(&mut self) -> Vec<usize> {
		let (triangles, deleted) = map_to_local(&self.true_triangles, &self.vertex_map);
		self.num_triangles = u16::try_from(triangles.len()).unwrap_or(u16::MAX);
		self.triangles = triangles;
		self.strips.clear();
		self.strip_lengths.clear();
		self.has_faces = NiBool::TRUE;
		deleted
	}
}

#[cfg(test)]
mod tests;
