mod bounds;
mod bytes;
mod error;
mod file;
mod graph;
mod header;
mod object;
/// Block catalog: concrete block types and their shared records.
pub mod objects;
mod partition;
mod refs;
/// Name to constructor table used when loading blocks.
pub mod registry;
mod skin;
mod sort;
mod stream;
mod strings;
mod version;

/// Bounding sphere fitting.
pub use bounds::bounding_sphere;
/// Error and result aliases.
pub use error::{NifError, Result};
/// File controller and load/save options.
pub use file::{LoadOptions, NifFile, SaveOptions};
/// File header and its parallel tables.
pub use header::NiHeader;
/// Block contract and opaque fallback block.
pub use object::{BlockRole, NiObject, NiObjectAny, NiUnknown};
/// Skin partition planning and triangle remapping.
pub use partition::{MAX_PARTITION_BONES, PartitionPlan, VertexInfluence, WEIGHTS_PER_VERTEX, build_partitions, map_to_global, map_to_local, plan_partitions, strips_to_triangles};
/// Block references and reference arrays.
pub use refs::{Ptr, PtrArray, RawRef, Ref, RefArray, ReferenceArray};
/// Skin partition rebuild summary.
pub use skin::SkinUpdate;
/// Bidirectional codec stream and its traits.
pub use stream::{CountPrefix, Mode, NiBool, NifEnum, NifStream, Presence, Primitive, Streamable, StreamableWith};
/// Length-prefixed, export, and indexed strings.
pub use strings::{ExportString, NiString, StringRef};
/// Version numbers, signatures, and engine presets.
pub use version::{Endianness, NiFileVersion, NiVersion, Signature, TargetEngine};
