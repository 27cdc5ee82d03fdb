use glam::{Vec3, Vec4};

use crate::nif::objects::base::sync_short_flags;
use crate::nif::{BlockRole, NiObject, NifStream, Ptr, PtrArray, RawRef, Ref, RefArray, ReferenceArray, Result, Streamable};

/// Links a scene object to its physics body.
#[derive(Debug, Clone)]
pub struct BhkCollisionObject {
	/// Owning scene object.
	pub target: Ptr<dyn NiObject>,
	/// Collision flags.
	pub flags: u16,
	/// Physics body.
	pub body: Ref<dyn NiObject>,
}

impl Default for BhkCollisionObject {
	fn default() -> Self {
		Self {
			target: Ptr::none(),
			flags: 1,
			body: Ref::none(),
		}
	}
}

impl NiObject for BhkCollisionObject {
	fn block_name(&self) -> &str {
		"bhkCollisionObject"
	}

	fn sync(&mut self, stream: &mut NifStream<'_>) -> Result<()> {
		stream.sync(&mut self.target)?;
		stream.sync(&mut self.flags)?;
		stream.sync(&mut self.body)
	}

	fn refs<'a>(&'a mut self, out: &mut Vec<&'a mut RawRef>) {
		out.push(self.body.raw_mut());
	}

	fn ptrs<'a>(&'a mut self, out: &mut Vec<&'a mut RawRef>) {
		out.push(self.target.raw_mut());
	}

	fn role(&self) -> BlockRole {
		BlockRole::Collision
	}
}

/// Collision layer, flags, and group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HavokFilter {
	/// Collision layer.
	pub layer: u8,
	/// Flags and body part.
	pub flags_and_part: u8,
	/// Collision group.
	pub group: u16,
}

impl Streamable for HavokFilter {
	fn sync(&mut self, stream: &mut NifStream<'_>) -> Result<()> {
		stream.sync(&mut self.layer)?;
		stream.sync(&mut self.flags_and_part)?;
		stream.sync(&mut self.group)
	}
}

/// World object construction info.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WorldObjectInfo {
	/// Padding.
	pub unused1: [u8; 4],
	/// Broad phase type.
	pub broad_phase: u8,
	/// Padding.
	pub unused2: [u8; 3],
	/// Property data.
	pub property_data: u32,
	/// Property size.
	pub property_size: u32,
	/// Property capacity and flags.
	pub property_capacity: u32,
}

impl Streamable for WorldObjectInfo {
	fn sync(&mut self, stream: &mut NifStream<'_>) -> Result<()> {
		stream.sync(&mut self.unused1)?;
		stream.sync(&mut self.broad_phase)?;
		stream.sync(&mut self.unused2)?;
		stream.sync(&mut self.property_data)?;
		stream.sync(&mut self.property_size)?;
		stream.sync(&mut self.property_capacity)
	}
}

/// Rigid body construction info.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RigidBodyInfo {
	/// Padding.
	pub unused1: [u8; 4],
	/// Filter copy.
	pub filter: HavokFilter,
	/// Padding.
	pub unused2: [u8; 4],
	/// Collision response.
	pub collision_response: u8,
	/// Padding.
	pub unused3: u8,
	/// Contact callback delay.
	pub callback_delay: u16,
	/// Padding.
	pub unused4: [u8; 4],
	/// Translation.
	pub translation: Vec4,
	/// Rotation quaternion `(x, y, z, w)`.
	pub rotation: Vec4,
	/// Linear velocity.
	pub linear_velocity: Vec4,
	/// Angular velocity.
	pub angular_velocity: Vec4,
	/// Inertia tensor rows, padded to four columns.
	pub inertia: [f32; 12],
	/// Center of mass.
	pub center: Vec4,
	/// Mass.
	pub mass: f32,
	/// Linear damping.
	pub linear_damping: f32,
	/// Angular damping.
	pub angular_damping: f32,
	/// Time factor.
	pub time_factor: f32,
	/// Gravity factor.
	pub gravity_factor: f32,
	/// Friction.
	pub friction: f32,
	/// Rolling friction multiplier.
	pub rolling_friction: f32,
	/// Restitution.
	pub restitution: f32,
	/// Max linear velocity.
	pub max_linear_velocity: f32,
	/// Max angular velocity.
	pub max_angular_velocity: f32,
	/// Penetration depth.
	pub penetration_depth: f32,
	/// Motion system.
	pub motion_system: u8,
	/// Deactivator type.
	pub deactivator: u8,
	/// Solver deactivation.
	pub solver_deactivation: u8,
	/// Quality type.
	pub quality: u8,
	/// Auto remove level.
	pub auto_remove_level: u8,
	/// Response modifier flags.
	pub response_modifier_flags: u8,
	/// Shape keys in contact point.
	pub num_shape_keys: u8,
	/// Force collided onto PPU.
	pub force_collided_onto_ppu: u8,
	/// Padding.
	pub unused5: [u8; 12],
}

impl Streamable for RigidBodyInfo {
	fn sync(&mut self, stream: &mut NifStream<'_>) -> Result<()> {
		stream.sync(&mut self.unused1)?;
		stream.sync(&mut self.filter)?;
		stream.sync(&mut self.unused2)?;
		stream.sync(&mut self.collision_response)?;
		stream.sync(&mut self.unused3)?;
		stream.sync(&mut self.callback_delay)?;
		stream.sync(&mut self.unused4)?;
		stream.sync(&mut self.translation)?;
		stream.sync(&mut self.rotation)?;
		stream.sync(&mut self.linear_velocity)?;
		stream.sync(&mut self.angular_velocity)?;
		stream.sync(&mut self.inertia)?;
		stream.sync(&mut self.center)?;
		for value in [
			&mut self.mass,
			&mut self.linear_damping,
			&mut self.angular_damping,
			&mut self.time_factor,
			&mut self.gravity_factor,
			&mut self.friction,
			&mut self.rolling_friction,
			&mut self.restitution,
			&mut self.max_linear_velocity,
			&mut self.max_angular_velocity,
			&mut self.penetration_depth,
		] {
			stream.sync(value)?;
		}
		for value in [
			&mut self.motion_system,
			&mut self.deactivator,
			&mut self.solver_deactivation,
			&mut self.quality,
			&mut self.auto_remove_level,
			&mut self.response_modifier_flags,
			&mut self.num_shape_keys,
			&mut self.force_collided_onto_ppu,
		] {
			stream.sync(value)?;
		}
		stream.sync(&mut self.unused5)
	}
}

/// Havok rigid body; `bhkRigidBodyT` shares the layout.
#[derive(Debug, Clone)]
pub struct BhkRigidBody {
	type_name: &'static str,
	/// Collision shape.
	pub shape: Ref<dyn NiObject>,
	/// Collision filter.
	pub filter: HavokFilter,
	/// World object info.
	pub world_info: WorldObjectInfo,
	/// Body construction info.
	pub info: RigidBodyInfo,
	/// Constraints owned by this body.
	pub constraints: RefArray<dyn NiObject>,
	/// Body flags; 16 bits on disk from stream 76.
	pub body_flags: u32,
}

impl BhkRigidBody {
	/// Type names sharing this layout.
	pub const TYPE_NAMES: [&'static str; 2] = ["bhkRigidBody", "bhkRigidBodyT"];

	/// Empty body stored under `type_name`.
	pub fn with_type(type_name: &'static str) -> Self {
		Self {
			type_name,
			shape: Ref::none(),
			filter: HavokFilter::default(),
			world_info: WorldObjectInfo::default(),
			info: RigidBodyInfo::default(),
			constraints: RefArray::new(),
			body_flags: 0,
		}
	}
}

impl NiObject for BhkRigidBody {
	fn block_name(&self) -> &str {
		self.type_name
	}

	fn sync(&mut self, stream: &mut NifStream<'_>) -> Result<()> {
		stream.sync(&mut self.shape)?;
		stream.sync(&mut self.filter)?;
		stream.sync(&mut self.world_info)?;
		stream.sync(&mut self.info)?;
		stream.sync(&mut self.constraints)?;
		if stream.version().stream >= 76 {
			self.body_flags = sync_short_flags(stream, self.body_flags)?;
			Ok(())
		} else {
			stream.sync(&mut self.body_flags)
		}
	}

	fn refs<'a>(&'a mut self, out: &mut Vec<&'a mut RawRef>) {
		out.push(self.shape.raw_mut());
	}

	fn ref_arrays<'a>(&'a mut self, out: &mut Vec<&'a mut dyn ReferenceArray>) {
		out.push(&mut self.constraints);
	}

	fn role(&self) -> BlockRole {
		BlockRole::PhysicsEntity
	}
}

/// Axis-aligned box collision shape.
#[derive(Debug, Clone, Default)]
pub struct BhkBoxShape {
	/// Havok material id.
	pub material: u32,
	/// Convex radius.
	pub radius: f32,
	/// Padding.
	pub unused1: [u8; 8],
	/// Half extents.
	pub dimensions: Vec3,
	/// Padding.
	pub unused2: f32,
}

impl NiObject for BhkBoxShape {
	fn block_name(&self) -> &str {
		"bhkBoxShape"
	}

	fn sync(&mut self, stream: &mut NifStream<'_>) -> Result<()> {
		stream.sync(&mut self.material)?;
		stream.sync(&mut self.radius)?;
		stream.sync(&mut self.unused1)?;
		stream.sync(&mut self.dimensions)?;
		stream.sync(&mut self.unused2)
	}

	fn role(&self) -> BlockRole {
		BlockRole::Collision
	}
}

/// Entities a constraint binds, plus its solver priority.
#[derive(Debug, Clone, Default)]
pub struct ConstraintInfo {
	/// Constrained rigid bodies.
	pub entities: PtrArray<dyn NiObject>,
	/// Solver priority.
	pub priority: u32,
}

impl Streamable for ConstraintInfo {
	fn sync(&mut self, stream: &mut NifStream<'_>) -> Result<()> {
		stream.sync(&mut self.entities)?;
		stream.sync(&mut self.priority)
	}
}

/// Ball and socket joint between two bodies.
#[derive(Debug, Clone, Default)]
pub struct BhkBallAndSocketConstraint {
	/// Bound entities.
	pub info: ConstraintInfo,
	/// Pivot in body A space.
	pub pivot_a: Vec4,
	/// Pivot in body B space.
	pub pivot_b: Vec4,
}

impl NiObject for BhkBallAndSocketConstraint {
	fn block_name(&self) -> &str {
		"bhkBallAndSocketConstraint"
	}

	fn sync(&mut self, stream: &mut NifStream<'_>) -> Result<()> {
		stream.sync(&mut self.info)?;
		stream.sync(&mut self.pivot_a)?;
		stream.sync(&mut self.pivot_b)
	}

	fn ref_arrays<'a>(&'a mut self, out: &mut Vec<&'a mut dyn ReferenceArray>) {
		out.push(&mut self.info.entities);
	}

	fn role(&self) -> BlockRole {
		BlockRole::Constraint
	}
}

/// Chain of ball and socket joints.
#[derive(Debug, Clone, Default)]
pub struct BhkBallSocketConstraintChain {
	/// Pivot pairs.
	pub pivots: Vec<Vec4>,
	/// Tau.
	pub tau: f32,
	/// Damping.
	pub damping: f32,
	/// Constraint force mixing.
	pub cfm: f32,
	/// Max error distance.
	pub max_error: f32,
	/// Chained bodies in order.
	pub chained_entities: PtrArray<dyn NiObject>,
	/// Chain anchor entities.
	pub info: ConstraintInfo,
}

impl NiObject for BhkBallSocketConstraintChain {
	fn block_name(&self) -> &str {
		"bhkBallSocketConstraintChain"
	}

	fn sync(&mut self, stream: &mut NifStream<'_>) -> Result<()> {
		stream.sync_list::<u32, _>(&mut self.pivots)?;
		stream.sync(&mut self.tau)?;
		stream.sync(&mut self.damping)?;
		stream.sync(&mut self.cfm)?;
		stream.sync(&mut self.max_error)?;
		stream.sync(&mut self.chained_entities)?;
		stream.sync(&mut self.info)
	}

	fn ref_arrays<'a>(&'a mut self, out: &mut Vec<&'a mut dyn ReferenceArray>) {
		out.push(&mut self.chained_entities);
		out.push(&mut self.info.entities);
	}

	fn role(&self) -> BlockRole {
		BlockRole::ConstraintChain
	}
}
