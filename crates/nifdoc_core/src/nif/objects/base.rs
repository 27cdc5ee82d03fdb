use glam::{Mat3, Vec3};
use tracing::debug;

use crate::nif::{NiBool, NiFileVersion, NiObject, NifError, NifStream, Presence, RawRef, Ref, RefArray, ReferenceArray, Result, Streamable, StringRef};

/// Default flags of a freshly created scene object.
pub const DEFAULT_AV_FLAGS: u32 = 524_302;

/// Rotation, translation, and uniform scale.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
	/// Translation.
	pub translation: Vec3,
	/// Rotation matrix.
	pub rotation: Mat3,
	/// Uniform scale.
	pub scale: f32,
}

impl Default for Transform {
	fn default() -> Self {
		Self {
			translation: Vec3::ZERO,
			rotation: Mat3::IDENTITY,
			scale: 1.0,
		}
	}
}

/// Stored as rotation, translation, scale.
impl Streamable for Transform {
	fn sync(&mut self, stream: &mut NifStream<'_>) -> Result<()> {
		stream.sync(&mut self.rotation)?;
		stream.sync(&mut self.translation)?;
		stream.sync(&mut self.scale)
	}
}

/// Center and radius.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct BoundingSphere {
	/// Sphere center.
	pub center: Vec3,
	/// Sphere radius.
	pub radius: f32,
}

impl Streamable for BoundingSphere {
	fn sync(&mut self, stream: &mut NifStream<'_>) -> Result<()> {
		stream.sync(&mut self.center)?;
		stream.sync(&mut self.radius)
	}
}

/// Fields shared by every named, extensible object.
#[derive(Debug, Clone, Default)]
pub struct NiObjectNet {
	/// Lighting shader type, stored here only by `BSLightingShaderProperty` in Skyrim-era streams.
	pub shader_type: u32,
	/// Object name.
	pub name: StringRef,
	/// Single extra data link of old files.
	pub legacy_extra_data: Ref<dyn NiObject>,
	/// Extra data blocks.
	pub extra_data: RefArray<dyn NiObject>,
	/// First time controller.
	pub controller: Ref<dyn NiObject>,
}

impl NiObjectNet {
	/// Named object.
	pub fn named(name: &str) -> Self {
		Self {
			name: StringRef::new(name),
			..Self::default()
		}
	}

	pub(crate) fn refs<'a>(&'a mut self, out: &mut Vec<&'a mut RawRef>) {
		out.push(self.legacy_extra_data.raw_mut());
		out.push(self.controller.raw_mut());
	}

	pub(crate) fn ref_arrays<'a>(&'a mut self, out: &mut Vec<&'a mut dyn ReferenceArray>) {
		out.push(&mut self.extra_data);
	}

	pub(crate) fn string_refs<'a>(&'a mut self, out: &mut Vec<&'a mut StringRef>) {
		out.push(&mut self.name);
	}
}

impl Streamable for NiObjectNet {
	fn sync(&mut self, stream: &mut NifStream<'_>) -> Result<()> {
		let bs_stream = stream.version().stream;
		let shader_type = Presence::always().only_for("BSLightingShaderProperty").when((83..=130).contains(&bs_stream));
		stream.sync_if(shader_type, &mut self.shader_type)?;
		stream.sync(&mut self.name)?;
		stream.sync_if(Presence::always().until(NiFileVersion::V4_2_2_0), &mut self.legacy_extra_data)?;
		stream.sync_if(Presence::always().since(NiFileVersion::V10_0_1_0), &mut self.extra_data)?;
		stream.sync(&mut self.controller)
	}
}

/// Sync 32-bit `flags` through a 16-bit field, keeping the low half.
pub(crate) fn sync_short_flags(stream: &mut NifStream<'_>, flags: u32) -> Result<u32> {
	let mut short = (flags & u32::from(u16::MAX)) as u16;
	if !stream.is_read() && u32::from(short) != flags {
		debug!(owner = stream.owner(), flags, kept = short, "high flag bits dropped for 16-bit flags");
	}
	stream.sync(&mut short)?;
	Ok(u32::from(short))
}

/// Fields shared by every object placed in the scene.
#[derive(Debug, Clone)]
pub struct NiAvObject {
	/// Name, extra data, and controller.
	pub net: NiObjectNet,
	/// Object flags.
	///
	/// Streams up to 26 store only the low 16 bits; writing such a stream drops the high bits
	/// here too, so the block matches what a reload yields.
	pub flags: u32,
	/// Local transform.
	pub transform: Transform,
	/// Linear velocity of old files.
	pub velocity: Vec3,
	/// Attached properties (pre-Skyrim streams).
	pub properties: RefArray<dyn NiObject>,
	/// Collision object.
	pub collision_object: Ref<dyn NiObject>,
}

impl Default for NiAvObject {
	fn default() -> Self {
		Self {
			net: NiObjectNet::default(),
			flags: DEFAULT_AV_FLAGS,
			transform: Transform::default(),
			velocity: Vec3::ZERO,
			properties: RefArray::new(),
			collision_object: Ref::none(),
		}
	}
}

impl NiAvObject {
	/// Named scene object with default flags and identity transform.
	pub fn named(name: &str) -> Self {
		Self {
			net: NiObjectNet::named(name),
			..Self::default()
		}
	}

	pub(crate) fn refs<'a>(&'a mut self, out: &mut Vec<&'a mut RawRef>) {
		self.net.refs(out);
		out.push(self.collision_object.raw_mut());
	}

	pub(crate) fn ref_arrays<'a>(&'a mut self, out: &mut Vec<&'a mut dyn ReferenceArray>) {
		self.net.ref_arrays(out);
		out.push(&mut self.properties);
	}

	pub(crate) fn string_refs<'a>(&'a mut self, out: &mut Vec<&'a mut StringRef>) {
		self.net.string_refs(out);
	}
}

impl Streamable for NiAvObject {
	fn sync(&mut self, stream: &mut NifStream<'_>) -> Result<()> {
		stream.sync(&mut self.net)?;
		let version = *stream.version();
		if version.stream > 26 {
			stream.sync(&mut self.flags)?;
		} else {
			self.flags = sync_short_flags(stream, self.flags)?;
		}
		stream.sync(&mut self.transform.translation)?;
		stream.sync(&mut self.transform.rotation)?;
		stream.sync(&mut self.transform.scale)?;
		if version.file <= NiFileVersion::V4_2_2_0 {
			stream.sync(&mut self.velocity)?;
		}
		stream.sync_if(Presence::always().when(version.stream <= 34), &mut self.properties)?;
		if version.file <= NiFileVersion::V4_2_2_0 {
			let mut has_bounding_volume = NiBool::FALSE;
			stream.sync(&mut has_bounding_volume)?;
			if has_bounding_volume.is_true() {
				return Err(NifError::UnsupportedLayout {
					name: stream.owner().to_owned(),
					detail: "legacy bounding volume",
				});
			}
		}
		stream.sync_if(Presence::always().since(NiFileVersion::V10_0_1_0), &mut self.collision_object)?;
		Ok(())
	}
}
