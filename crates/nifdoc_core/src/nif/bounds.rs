use glam::Vec3;
use tracing::debug;

use crate::nif::{NiObject, NifFile};
use crate::nif::objects::{BoundingSphere, BsTriShape, NiTriShapeData, NiTriStripsData};

/// Sphere centered on the bounding box of `points`, reaching the farthest point.
pub fn bounding_sphere(points: &[Vec3]) -> BoundingSphere {
	let Some(first) = points.first() else {
		return BoundingSphere::default();
	};
	let (min, max) = points.iter().fold((*first, *first), |(min, max), point| (min.min(*point), max.max(*point)));
	let center = (min + max) * 0.5;
	let radius = points.iter().map(|point| point.distance(center)).fold(0.0_f32, f32::max);
	BoundingSphere { center, radius }
}

impl NifFile {
	/// Refit the bounding sphere of every geometry block from its vertices; returns how many changed.
	pub fn update_bounds(&mut self) -> usize {
		let updated = self.blocks.iter_mut().map(|block| refit(&mut **block)).filter(|&changed| changed).count();
		debug!(updated, "refit bounding spheres");
		updated
	}
}

fn refit(block: &mut (dyn NiObject + 'static)) -> bool {
	if let Some(data) = block.downcast_mut::<NiTriShapeData>() {
		return store(&mut data.geom.bound, bounding_sphere(&data.geom.vertices));
	}
	if let Some(data) = block.downcast_mut::<NiTriStripsData>() {
		return store(&mut data.geom.bound, bounding_sphere(&data.geom.vertices));
	}
	if let Some(shape) = block.downcast_mut::<BsTriShape>() {
		let points: Vec<Vec3> = shape.vertices.iter().map(|vertex| vertex.position).collect();
		return store(&mut shape.bound, bounding_sphere(&points));
	}
	false
}

fn store(bound: &mut BoundingSphere, fitted: BoundingSphere) -> bool {
	let changed = *bound != fitted;
	*bound = fitted;
	changed
}

#[cfg(test)]
mod tests {
	use glam::Vec3;

	use crate::nif::bounding_sphere;

	#[test]
	fn empty_point_set_has_zero_sphere() {
		let sphere = bounding_sphere(&[]);
		assert_eq!(sphere.center, Vec3::ZERO);
		assert_eq!(sphere.radius, 0.0);
	}

	#[test]
	fn sphere_centers_on_the_box() {
		let sphere = bounding_sphere(&[Vec3::new(-1.0, 0.0, 0.0), Vec3::new(3.0, 0.0, 0.0), Vec3::new(0.0, 2.0, 0.0)]);
		assert_eq!(sphere.center, Vec3::new(1.0, 1.0, 0.0));
		assert!((sphere.radius - 5.0_f32.sqrt()).abs() < 1e-6);
	}
}
