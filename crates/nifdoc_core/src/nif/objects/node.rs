use crate::nif::objects::NiAvObject;
use crate::nif::{BlockRole, NiObject, NiString, NifStream, Presence, RawRef, RefArray, ReferenceArray, Result, StringRef};

/// Scene graph node; also stands in for its Bethesda subclasses that add no fields.
#[derive(Debug, Clone)]
pub struct NiNode {
	type_name: &'static str,
	/// Shared scene object fields.
	pub av: NiAvObject,
	/// Child scene objects.
	pub children: RefArray<dyn NiObject>,
	/// Dynamic effects (lights) affecting the subtree.
	pub effects: RefArray<dyn NiObject>,
}

impl NiNode {
	/// Type names sharing this layout.
	pub const TYPE_NAMES: [&'static str; 4] = ["NiNode", "BSFadeNode", "BSLeafAnimNode", "RootCollisionNode"];

	/// Plain `NiNode` called `name`.
	pub fn new(name: &str) -> Self {
		Self::with_type("NiNode", name)
	}

	/// Node stored under `type_name`, which should be one of [`Self::TYPE_NAMES`].
	pub fn with_type(type_name: &'static str, name: &str) -> Self {
		Self {
			type_name,
			av: NiAvObject::named(name),
			children: RefArray::new(),
			effects: RefArray::new(),
		}
	}
}

impl NiObject for NiNode {
	fn block_name(&self) -> &str {
		self.type_name
	}

	fn sync(&mut self, stream: &mut NifStream<'_>) -> Result<()> {
		stream.sync(&mut self.av)?;
		stream.sync(&mut self.children)?;
		let has_effects = stream.version().stream < 130;
		stream.sync_if(Presence::always().when(has_effects), &mut self.effects)?;
		Ok(())
	}

	fn refs<'a>(&'a mut self, out: &mut Vec<&'a mut RawRef>) {
		self.av.refs(out);
	}

	fn ref_arrays<'a>(&'a mut self, out: &mut Vec<&'a mut dyn ReferenceArray>) {
		self.av.ref_arrays(out);
		out.push(&mut self.children);
		out.push(&mut self.effects);
	}

	fn string_refs<'a>(&'a mut self, out: &mut Vec<&'a mut StringRef>) {
		self.av.string_refs(out);
	}

	fn name(&self) -> Option<&NiString> {
		Some(self.av.net.name.text())
	}

	fn role(&self) -> BlockRole {
		BlockRole::Node
	}
}
