use std::any::Any;
use std::fmt;

use crate::nif::{NiString, NifStream, RawRef, ReferenceArray, Result, StringRef};

/// Semantic role of a block, used by canonical sorting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockRole {
	/// Scene graph node with children.
	Node,
	/// Renderable shape.
	Shape,
	/// Geometry data owned by a shape.
	Data,
	/// Shader, material, texture set, or render property.
	Shader,
	/// Skin instance, skin data, or skin partition.
	Skin,
	/// Collision object or collision shape.
	Collision,
	/// Physics body that constraints attach to.
	PhysicsEntity,
	/// Constraint between physics entities.
	Constraint,
	/// Constraint chain over several physics entities.
	ConstraintChain,
	/// Anything else.
	Other,
}

/// Object-safe helpers every block gets for free.
pub trait NiObjectAny {
	/// Borrow as `Any` for downcasting.
	fn as_any(&self) -> &dyn Any;
	/// Mutably borrow as `Any` for downcasting.
	fn as_any_mut(&mut self) -> &mut dyn Any;
	/// Clone into a fresh box.
	fn clone_box(&self) -> Box<dyn NiObject>;
}

impl<T: NiObject + Clone + 'static> NiObjectAny for T {
	fn as_any(&self) -> &dyn Any {
		self
	}

	fn as_any_mut(&mut self) -> &mut dyn Any {
		self
	}

	fn clone_box(&self) -> Box<dyn NiObject> {
		Box::new(self.clone())
	}
}

/// Contract every block type fulfils.
///
/// The graph layer only ever needs these views: the field traversal, and the outgoing edges
/// split into standalone strong references, standalone weak pointers, reference arrays, and
/// string references. Collectors push in declaration order.
pub trait NiObject: NiObjectAny + fmt::Debug {
	/// On-disk type name.
	fn block_name(&self) -> &str;

	/// Read or write every field against `stream`.
	fn sync(&mut self, stream: &mut NifStream<'_>) -> Result<()>;

	/// Standalone strong references.
	fn refs<'a>(&'a mut self, _out: &mut Vec<&'a mut RawRef>) {}

	/// Standalone weak pointers.
	fn ptrs<'a>(&'a mut self, _out: &mut Vec<&'a mut RawRef>) {}

	/// Reference arrays, strong and weak.
	fn ref_arrays<'a>(&'a mut self, _out: &mut Vec<&'a mut dyn ReferenceArray>) {}

	/// String references.
	fn string_refs<'a>(&'a mut self, _out: &mut Vec<&'a mut StringRef>) {}

	/// Object name for named block families.
	fn name(&self) -> Option<&NiString> {
		None
	}

	/// Semantic role for canonical sorting.
	fn role(&self) -> BlockRole {
		BlockRole::Other
	}

	/// Return `true` for opaque blocks whose edges are unknown.
	fn is_opaque(&self) -> bool {
		false
	}
}

impl Clone for Box<dyn NiObject> {
	fn clone(&self) -> Self {
		self.clone_box()
	}
}

impl dyn NiObject {
	/// Downcast to a concrete block type.
	pub fn downcast_ref<T: NiObject + 'static>(&self) -> Option<&T> {
		self.as_any().downcast_ref::<T>()
	}

	/// Mutably downcast to a concrete block type.
	pub fn downcast_mut<T: NiObject + 'static>(&mut self) -> Option<&mut T> {
		self.as_any_mut().downcast_mut::<T>()
	}

	/// Every outgoing edge as `(strong, target)` pairs: standalone refs, then pointers, then arrays.
	pub fn links(&mut self) -> Vec<(bool, usize)> {
		let mut links = Vec::new();
		{
			let mut raws = Vec::new();
			self.refs(&mut raws);
			links.extend(raws.iter().filter_map(|raw| raw.index()).map(|index| (true, index)));
		}
		{
			let mut raws = Vec::new();
			self.ptrs(&mut raws);
			links.extend(raws.iter().filter_map(|raw| raw.index()).map(|index| (false, index)));
		}
		let mut arrays = Vec::new();
		self.ref_arrays(&mut arrays);
		for array in arrays {
			let strong = array.is_strong();
			links.extend(array.raw_refs().iter().filter_map(|raw| raw.index()).map(|index| (strong, index)));
		}
		links
	}

	/// Strong targets only, in the same order as [`links`](Self::links).
	pub fn strong_targets(&mut self) -> Vec<usize> {
		self.links().into_iter().filter_map(|(strong, index)| strong.then_some(index)).collect()
	}

	/// Apply `f` to every stored reference, standalone and in arrays.
	pub fn remap_refs(&mut self, f: &mut dyn FnMut(&mut RawRef)) {
		{
			let mut raws = Vec::new();
			self.refs(&mut raws);
			for raw in raws {
				f(raw);
			}
		}
		{
			let mut raws = Vec::new();
			self.ptrs(&mut raws);
			for raw in raws {
				f(raw);
			}
		}
		let mut arrays = Vec::new();
		self.ref_arrays(&mut arrays);
		for array in arrays {
			for raw in array.raw_refs_mut().iter_mut() {
				f(raw);
			}
		}
	}

	/// Every string reference's current text, in declaration order.
	pub fn string_texts(&mut self) -> Vec<NiString> {
		let mut strings = Vec::new();
		self.string_refs(&mut strings);
		strings.into_iter().map(|string| string.text().clone()).collect()
	}
}

/// Block whose type is not in the catalog, kept as an opaque byte blob.
#[derive(Debug, Clone, Default)]
pub struct NiUnknown {
	name: String,
	/// Raw payload bytes.
	pub data: Vec<u8>,
}

impl NiUnknown {
	/// Opaque block of type `name` holding `data`.
	pub fn new(name: impl Into<String>, data: Vec<u8>) -> Self {
		Self { name: name.into(), data }
	}
}

impl NiObject for NiUnknown {
	fn block_name(&self) -> &str {
		&self.name
	}

	fn sync(&mut self, stream: &mut NifStream<'_>) -> Result<()> {
		let len = self.data.len();
		stream.sync_bytes(&mut self.data, len)
	}

	fn is_opaque(&self) -> bool {
		true
	}
}
