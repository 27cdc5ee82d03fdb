use crate::nif::objects::{
	BhkBallAndSocketConstraint, BhkBallSocketConstraintChain, BhkBoxShape, BhkCollisionObject, BhkRigidBody, BsLightingShaderProperty, BsShaderTextureSet, BsTriShape, NiAlphaProperty, NiGeometry, NiIntegerExtraData, NiNode, NiSkinData, NiSkinInstance, NiSkinPartition,
	NiStringExtraData, NiTriShapeData, NiTriStripsData,
};
use crate::nif::{NiFileVersion, NiObject, NiVersion};

/// One catalog entry: on-disk type name, constructor, and supported layouts.
#[derive(Clone, Copy)]
pub struct BlockType {
	/// On-disk type name.
	pub name: &'static str,
	create: fn() -> Box<dyn NiObject>,
	supports: fn(&NiVersion) -> bool,
}

impl BlockType {
	/// Return `true` when this type's layout is known for `version`.
	pub fn supports(&self, version: &NiVersion) -> bool {
		(self.supports)(version)
	}

	/// Fresh default instance.
	pub fn instantiate(&self) -> Box<dyn NiObject> {
		(self.create)()
	}
}

impl std::fmt::Debug for BlockType {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("BlockType").field("name", &self.name).finish_non_exhaustive()
	}
}

fn scene_object(version: &NiVersion) -> bool {
	version.file >= NiFileVersion::V3_0
}

fn generic(version: &NiVersion) -> bool {
	version.file >= NiFileVersion::V10_0_1_0
}

fn packed_vertices(version: &NiVersion) -> bool {
	version.file == NiFileVersion::V20_2_0_7 && version.stream >= 100
}

fn skyrim_lighting(version: &NiVersion) -> bool {
	version.file == NiFileVersion::V20_2_0_7 && (83..=100).contains(&version.stream)
}

fn bethesda_texture_set(version: &NiVersion) -> bool {
	version.file == NiFileVersion::V20_2_0_7 && version.stream >= 34
}

fn skyrim_havok(version: &NiVersion) -> bool {
	version.is_skyrim()
}

macro_rules! entry {
	($name:literal, $supports:expr, $create:expr) => {
		BlockType {
			name: $name,
			create: || -> Box<dyn NiObject> { Box::new($create) },
			supports: $supports,
		}
	};
}

static CATALOG: &[BlockType] = &[
	entry!("NiNode", scene_object, NiNode::with_type("NiNode", "")),
	entry!("BSFadeNode", scene_object, NiNode::with_type("BSFadeNode", "")),
	entry!("BSLeafAnimNode", scene_object, NiNode::with_type("BSLeafAnimNode", "")),
	entry!("RootCollisionNode", scene_object, NiNode::with_type("RootCollisionNode", "")),
	entry!("NiTriShape", generic, NiGeometry::with_type("NiTriShape", "")),
	entry!("NiTriStrips", generic, NiGeometry::with_type("NiTriStrips", "")),
	entry!("NiTriShapeData", generic, NiTriShapeData::default()),
	entry!("NiTriStripsData", generic, NiTriStripsData::default()),
	entry!("BSTriShape", packed_vertices, BsTriShape::new("")),
	entry!("NiSkinInstance", generic, NiSkinInstance::with_type("NiSkinInstance")),
	entry!("BSDismemberSkinInstance", generic, NiSkinInstance::with_type("BSDismemberSkinInstance")),
	entry!("NiSkinData", generic, NiSkinData::default()),
	entry!("NiSkinPartition", generic, NiSkinPartition::default()),
	entry!("BSLightingShaderProperty", skyrim_lighting, BsLightingShaderProperty::new()),
	entry!("BSShaderTextureSet", bethesda_texture_set, BsShaderTextureSet::default()),
	entry!("NiAlphaProperty", generic, NiAlphaProperty::default()),
	entry!("NiStringExtraData", scene_object, NiStringExtraData::default()),
	entry!("NiIntegerExtraData", scene_object, NiIntegerExtraData::with_type("NiIntegerExtraData", "", 0)),
	entry!("BSXFlags", generic, NiIntegerExtraData::with_type("BSXFlags", "", 0)),
	entry!("bhkCollisionObject", generic, BhkCollisionObject::default()),
	entry!("bhkRigidBody", skyrim_havok, BhkRigidBody::with_type("bhkRigidBody")),
	entry!("bhkRigidBodyT", skyrim_havok, BhkRigidBody::with_type("bhkRigidBodyT")),
	entry!("bhkBoxShape", skyrim_havok, BhkBoxShape::default()),
	entry!("bhkBallAndSocketConstraint", skyrim_havok, BhkBallAndSocketConstraint::default()),
	entry!("bhkBallSocketConstraintChain", skyrim_havok, BhkBallSocketConstraintChain::default()),
];

/// Every catalog entry in registration order.
pub fn block_types() -> &'static [BlockType] {
	CATALOG
}

/// Catalog entry for `name`, regardless of version.
pub fn lookup(name: &str) -> Option<&'static BlockType> {
	CATALOG.iter().find(|entry| entry.name == name)
}

/// Instantiate `name` when the catalog knows its layout for `version`.
pub fn create(name: &str, version: &NiVersion) -> Option<Box<dyn NiObject>> {
	lookup(name).filter(|entry| entry.supports(version)).map(BlockType::instantiate)
}

/// Return `true` when `name` has a catalog layout for `version`.
pub fn supports(name: &str, version: &NiVersion) -> bool {
	lookup(name).is_some_and(|entry| entry.supports(version))
}

#[cfg(test)]
mod tests {
	use crate::nif::registry::{block_types, create, lookup, supports};
	use crate::nif::{BlockRole, NiVersion};

	#[test]
	fn creates_registered_types_under_their_own_name() {
		for entry in block_types() {
			let block = entry.instantiate();
			assert_eq!(block.block_name(), entry.name);
		}
	}

	#[test]
	fn version_predicates_gate_creation() {
		assert!(create("BSTriShape", &NiVersion::skyrim_se()).is_some());
		assert!(create("BSTriShape", &NiVersion::skyrim()).is_none());
		assert!(create("BSLightingShaderProperty", &NiVersion::fallout4()).is_none());
		assert!(create("bhkRigidBody", &NiVersion::skyrim_se()).is_some());
		assert!(create("bhkRigidBody", &NiVersion::fallout3()).is_none());
		assert!(create("NiNode", &NiVersion::morrowind()).is_some());
		assert!(create("NiTriShape", &NiVersion::morrowind()).is_none());
		assert!(create("NiParticleSystem", &NiVersion::skyrim()).is_none());
	}

	#[test]
	fn collision_objects_span_every_havok_layout() {
		assert!(supports("bhkCollisionObject", &NiVersion::oblivion()));
		assert!(supports("bhkCollisionObject", &NiVersion::fallout4()));
		assert!(!supports("bhkCollisionObject", &NiVersion::morrowind()));
		assert!(!supports("bhkRigidBody", &NiVersion::oblivion()));
	}

	#[test]
	fn roles_come_from_the_concrete_type() {
		let node = create("BSFadeNode", &NiVersion::skyrim()).expect("BSFadeNode is registered");
		assert_eq!(node.role(), BlockRole::Node);
		assert!(lookup("bhkBallSocketConstraintChain").is_some());
	}
}
