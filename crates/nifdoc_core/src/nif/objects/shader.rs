use glam::{Vec2, Vec3, Vec4};

use crate::nif::objects::NiObjectNet;
use crate::nif::{BlockRole, NiObject, NiString, NifStream, RawRef, Ref, ReferenceArray, Result, StringRef};

/// Lighting shader types whose trailing fields differ.
pub mod shader_type {
	/// Environment map.
	pub const ENVIRONMENT_MAP: u32 = 1;
	/// Skin tint.
	pub const SKIN_TINT: u32 = 5;
	/// Hair tint.
	pub const HAIR_TINT: u32 = 6;
	/// Parallax occlusion.
	pub const PARALLAX_OCCLUSION: u32 = 7;
	/// Multi-layer parallax.
	pub const MULTI_LAYER_PARALLAX: u32 = 11;
	/// Sparkle snow.
	pub const SPARKLE_SNOW: u32 = 14;
	/// Eye environment map.
	pub const EYE_ENVMAP: u32 = 16;
}

/// Skyrim lighting shader.
#[derive(Debug, Clone)]
pub struct BsLightingShaderProperty {
	/// Name, extra data, controller, and shader type.
	pub net: NiObjectNet,
	/// Shader flags 1.
	pub shader_flags1: u32,
	/// Shader flags 2.
	pub shader_flags2: u32,
	/// UV offset.
	pub uv_offset: Vec2,
	/// UV scale.
	pub uv_scale: Vec2,
	/// Texture set block.
	pub texture_set: Ref<dyn NiObject>,
	/// Emissive color.
	pub emissive_color: Vec3,
	/// Emissive multiple.
	pub emissive_multiple: f32,
	/// Texture clamp mode.
	pub texture_clamp_mode: u32,
	/// Alpha.
	pub alpha: f32,
	/// Refraction strength.
	pub refraction_strength: f32,
	/// Glossiness.
	pub glossiness: f32,
	/// Specular color.
	pub specular_color: Vec3,
	/// Specular strength.
	pub specular_strength: f32,
	/// Lighting effect 1.
	pub lighting_effect1: f32,
	/// Lighting effect 2.
	pub lighting_effect2: f32,
	/// Fields selected by `net.shader_type`.
	pub type_data: ShaderTypeData,
}

/// Trailing shader fields that depend on the shader type.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ShaderTypeData {
	/// Environment map scale.
	pub environment_map_scale: f32,
	/// Skin or hair tint color.
	pub tint_color: Vec3,
	/// Parallax max passes.
	pub max_passes: f32,
	/// Parallax scale.
	pub scale: f32,
	/// Parallax inner layer thickness.
	pub inner_layer_thickness: f32,
	/// Parallax refraction scale.
	pub refraction_scale: f32,
	/// Parallax inner layer texture scale.
	pub inner_layer_texture_scale: Vec2,
	/// Parallax envmap strength.
	pub envmap_strength: f32,
	/// Sparkle parameters.
	pub sparkle_parameters: Vec4,
	/// Eye cubemap scale.
	pub eye_cubemap_scale: f32,
	/// Left eye reflection center.
	pub left_eye_reflection_center: Vec3,
	/// Right eye reflection center.
	pub right_eye_reflection_center: Vec3,
}

impl ShaderTypeData {
	fn sync(&mut self, stream: &mut NifStream<'_>, shader: u32) -> Result<()> {
		match shader {
			shader_type::ENVIRONMENT_MAP => stream.sync(&mut self.environment_map_scale),
			shader_type::SKIN_TINT | shader_type::HAIR_TINT => stream.sync(&mut self.tint_color),
			shader_type::PARALLAX_OCCLUSION => {
				stream.sync(&mut self.max_passes)?;
				stream.sync(&mut self.scale)
			}
			shader_type::MULTI_LAYER_PARALLAX => {
				stream.sync(&mut self.inner_layer_thickness)?;
				stream.sync(&mut self.refraction_scale)?;
				stream.sync(&mut self.inner_layer_texture_scale)?;
				stream.sync(&mut self.envmap_strength)
			}
			shader_type::SPARKLE_SNOW => stream.sync(&mut self.sparkle_parameters),
			shader_type::EYE_ENVMAP => {
				stream.sync(&mut self.eye_cubemap_scale)?;
				stream.sync(&mut self.left_eye_reflection_center)?;
				stream.sync(&mut self.right_eye_reflection_center)
			}
			_ => Ok(()),
		}
	}
}

impl BsLightingShaderProperty {
	/// Default shader with an empty name.
	pub fn new() -> Self {
		Self {
			net: NiObjectNet::default(),
			shader_flags1: 0x8240_0301,
			shader_flags2: 0x8021,
			uv_offset: Vec2::ZERO,
			uv_scale: Vec2::ONE,
			texture_set: Ref::none(),
			emissive_color: Vec3::ZERO,
			emissive_multiple: 1.0,
			texture_clamp_mode: 3,
			alpha: 1.0,
			refraction_strength: 0.0,
			glossiness: 80.0,
			specular_color: Vec3::ONE,
			specular_strength: 1.0,
			lighting_effect1: 0.3,
			lighting_effect2: 2.0,
			type_data: ShaderTypeData::default(),
		}
	}
}

impl Default for BsLightingShaderProperty {
	fn default() -> Self {
		Self::new()
	}
}

impl NiObject for BsLightingShaderProperty {
	fn block_name(&self) -> &str {
		"BSLightingShaderProperty"
	}

	fn sync(&mut self, stream: &mut NifStream<'_>) -> Result<()> {
		stream.sync(&mut self.net)?;
		stream.sync(&mut self.shader_flags1)?;
		stream.sync(&mut self.shader_flags2)?;
		stream.sync(&mut self.uv_offset)?;
		stream.sync(&mut self.uv_scale)?;
		stream.sync(&mut self.texture_set)?;
		stream.sync(&mut self.emissive_color)?;
		stream.sync(&mut self.emissive_multiple)?;
		stream.sync(&mut self.texture_clamp_mode)?;
		stream.sync(&mut self.alpha)?;
		stream.sync(&mut self.refraction_strength)?;
		stream.sync(&mut self.glossiness)?;
		stream.sync(&mut self.specular_color)?;
		stream.sync(&mut self.specular_strength)?;
		stream.sync(&mut self.lighting_effect1)?;
		stream.sync(&mut self.lighting_effect2)?;
		let shader = self.net.shader_type;
		self.type_data.sync(stream, shader)
	}

	fn refs<'a>(&'a mut self, out: &mut Vec<&'a mut RawRef>) {
		self.net.refs(out);
		out.push(self.texture_set.raw_mut());
	}

	fn ref_arrays<'a>(&'a mut self, out: &mut Vec<&'a mut dyn ReferenceArray>) {
		self.net.ref_arrays(out);
	}

	fn string_refs<'a>(&'a mut self, out: &mut Vec<&'a mut StringRef>) {
		self.net.string_refs(out);
	}

	fn name(&self) -> Option<&NiString> {
		Some(self.net.name.text())
	}

	fn role(&self) -> BlockRole {
		BlockRole::Shader
	}
}

/// Texture paths used by a lighting shader.
#[derive(Debug, Clone, Default)]
pub struct BsShaderTextureSet {
	/// Texture file paths, empty slots included.
	pub textures: Vec<NiString>,
}

impl BsShaderTextureSet {
	/// Texture set with `slots` empty paths.
	pub fn with_slots(slots: usize) -> Self {
		Self {
			textures: vec![NiString::default(); slots],
		}
	}
}

impl NiObject for BsShaderTextureSet {
	fn block_name(&self) -> &str {
		"BSShaderTextureSet"
	}

	fn sync(&mut self, stream: &mut NifStream<'_>) -> Result<()> {
		stream.sync_list::<u32, _>(&mut self.textures)
	}

	fn role(&self) -> BlockRole {
		BlockRole::Shader
	}
}

/// Alpha blending and testing property.
#[derive(Debug, Clone)]
pub struct NiAlphaProperty {
	/// Name, extra data, and controller.
	pub net: NiObjectNet,
	/// Blend and test flags.
	pub flags: u16,
	/// Alpha test threshold.
	pub threshold: u8,
}

impl Default for NiAlphaProperty {
	fn default() -> Self {
		Self {
			net: NiObjectNet::default(),
			flags: 4844,
			threshold: 128,
		}
	}
}

impl NiObject for NiAlphaProperty {
	fn block_name(&self) -> &str {
		"NiAlphaProperty"
	}

	fn sync(&mut self, stream: &mut NifStream<'_>) -> Result<()> {
		stream.sync(&mut self.net)?;
		stream.sync(&mut self.flags)?;
		stream.sync(&mut self.threshold)
	}

	fn refs<'a>(&'a mut self, out: &mut Vec<&'a mut RawRef>) {
		self.net.refs(out);
	}

	fn ref_arrays<'a>(&'a mut self, out: &mut Vec<&'a mut dyn ReferenceArray>) {
		self.net.ref_arrays(out);
	}

	fn string_refs<'a>(&'a mut self, out: &mut Vec<&'a mut StringRef>) {
		self.net.string_refs(out);
	}

	fn name(&self) -> Option<&NiString> {
		Some(self.net.name.text())
	}

	fn role(&self) -> BlockRole {
		BlockRole::Shader
	}
}
