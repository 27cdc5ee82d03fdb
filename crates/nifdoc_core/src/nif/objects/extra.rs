use crate::nif::{NiFileVersion, NiObject, NiString, NifError, NifStream, Presence, RawRef, Ref, Result, StringRef};

/// Name (10.0.1.0 on) and the chained next extra data link (through 4.2.2.0).
fn sync_extra_base(stream: &mut NifStream<'_>, name: &mut StringRef, next: &mut Ref<dyn NiObject>) -> Result<()> {
	stream.sync_if(Presence::always().since(NiFileVersion::V10_0_1_0), name)?;
	stream.sync_if(Presence::always().until(NiFileVersion::V4_2_2_0), next)?;
	Ok(())
}

/// Named string attached to an object.
#[derive(Debug, Clone, Default)]
pub struct NiStringExtraData {
	/// Extra data name; not stored before 10.0.1.0.
	pub name: StringRef,
	/// Next extra data in the chain of old files.
	pub next_extra_data: Ref<dyn NiObject>,
	/// Payload string.
	pub data: StringRef,
}

impl NiStringExtraData {
	/// Extra data `name` holding `data`.
	pub fn new(name: &str, data: &str) -> Self {
		Self {
			name: StringRef::new(name),
			next_extra_data: Ref::none(),
			data: StringRef::new(data),
		}
	}
}

impl NiObject for NiStringExtraData {
	fn block_name(&self) -> &str {
		"NiStringExtraData"
	}

	fn sync(&mut self, stream: &mut NifStream<'_>) -> Result<()> {
		sync_extra_base(stream, &mut self.name, &mut self.next_extra_data)?;
		if stream.version().file <= NiFileVersion::V4_2_2_0 {
			// payload length plus its own length prefix
			let len = self.data.text().len() + 4;
			let mut remaining = u32::try_from(len).map_err(|_| NifError::CountOverflow { len, width: 32 })?;
			stream.sync(&mut remaining)?;
		}
		stream.sync(&mut self.data)
	}

	fn refs<'a>(&'a mut self, out: &mut Vec<&'a mut RawRef>) {
		out.push(self.next_extra_data.raw_mut());
	}

	fn string_refs<'a>(&'a mut self, out: &mut Vec<&'a mut StringRef>) {
		out.push(&mut self.name);
		out.push(&mut self.data);
	}

	fn name(&self) -> Option<&NiString> {
		Some(self.name.text())
	}
}

/// Named integer attached to an object; `BSXFlags` shares the layout.
#[derive(Debug, Clone)]
pub struct NiIntegerExtraData {
	type_name: &'static str,
	/// Extra data name; not stored before 10.0.1.0.
	pub name: StringRef,
	/// Next extra data in the chain of old files.
	pub next_extra_data: Ref<dyn NiObject>,
	/// Payload integer.
	pub data: u32,
}

impl NiIntegerExtraData {
	/// Type names sharing this layout.
	pub const TYPE_NAMES: [&'static str; 2] = ["NiIntegerExtraData", "BSXFlags"];

	/// Integer extra data stored under `type_name`.
	pub fn with_type(type_name: &'static str, name: &str, data: u32) -> Self {
		Self {
			type_name,
			name: StringRef::new(name),
			next_extra_data: Ref::none(),
			data,
		}
	}

	/// `BSXFlags` block named `BSX`.
	pub fn bsx_flags(flags: u32) -> Self {
		Self::with_type("BSXFlags", "BSX", flags)
	}
}

impl NiObject for NiIntegerExtraData {
	fn block_name(&self) -> &str {
		self.type_name
	}

	fn sync(&mut self, stream: &mut NifStream<'_>) -> Result<()> {
		sync_extra_base(stream, &mut self.name, &mut self.next_extra_data)?;
		stream.sync(&mut self.data)
	}

	fn refs<'a>(&'a mut self, out: &mut Vec<&'a mut RawRef>) {
		out.push(self.next_extra_data.raw_mut());
	}

	fn string_refs<'a>(&'a mut self, out: &mut Vec<&'a mut StringRef>) {
		out.push(&mut self.name);
	}

	fn name(&self) -> Option<&NiString> {
		Some(self.name.text())
	}
}
