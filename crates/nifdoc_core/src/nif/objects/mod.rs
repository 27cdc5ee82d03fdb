mod base;
mod bstrishape;
mod collision;
mod extra;
mod geometry;
mod node;
mod shader;
mod skin;

/// Records shared by named and placed objects.
pub use base::{BoundingSphere, DEFAULT_AV_FLAGS, NiAvObject, NiObjectNet, Transform};
/// Packed-vertex shapes and their vertex layout.
pub use bstrishape::{BsTriShape, BsVertex, ParticleData, VertexArg, VertexDesc, VertexFlags};
/// Havok collision objects, bodies, shapes, and constraints.
pub use collision::{BhkBallAndSocketConstraint, BhkBallSocketConstraintChain, BhkBoxShape, BhkCollisionObject, BhkRigidBody, ConstraintInfo, HavokFilter, RigidBodyInfo, WorldObjectInfo};
/// Named extra data blocks.
pub use extra::{NiIntegerExtraData, NiStringExtraData};
/// Legacy triangle and strip geometry.
pub use geometry::{MatchGroup, MaterialData, NiGeometry, NiGeometryData, NiTriShapeData, NiTriStripsData, Triangle};
/// Scene graph node.
pub use node::NiNode;
/// Shader and render properties.
pub use shader::{BsLightingShaderProperty, BsShaderTextureSet, NiAlphaProperty, ShaderTypeData, shader_type};
/// Skin binding, weights, and partitions.
pub use skin::{BodyPart, BodyPartInfo, BoneData, BoneVertData, NiSkinData, NiSkinInstance, NiSkinPartition, SkinPartition};
