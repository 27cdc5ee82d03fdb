use std::fmt;

/// Byte order of multi-byte values in a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Endianness {
	/// Little-endian byte order (header marker `1`).
	#[default]
	Little,
	/// Big-endian byte order (header marker `0`).
	Big,
}

impl Endianness {
	/// Stable lowercase label.
	pub fn as_str(self) -> &'static str {
		match self {
			Self::Little => "little",
			Self::Big => "big",
		}
	}
}

/// Packed file format version, `a.b.c.d` stored as `a<<24 | b<<16 | c<<8 | d`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct NiFileVersion(pub u32);

impl NiFileVersion {
	/// First version with scene object flags.
	pub const V3_0: Self = Self::new(3, 0, 0, 0);
	/// First version with a packed version field and block count.
	pub const V3_1: Self = Self::new(3, 1, 0, 0);
	/// First version with a footer and without legacy block ids.
	pub const V3_3_0_13: Self = Self::new(3, 3, 0, 13);
	/// Morrowind.
	pub const V4_0_0_2: Self = Self::new(4, 0, 0, 2);
	/// First version with one-byte booleans.
	pub const V4_1_0_1: Self = Self::new(4, 1, 0, 1);
	/// First version with optional skin vertex weights.
	pub const V4_2_1_0: Self = Self::new(4, 2, 1, 0);
	/// Last version with legacy bounding volumes and velocities.
	pub const V4_2_2_0: Self = Self::new(4, 2, 2, 0);
	/// First version with a block type table.
	pub const V5_0_0_1: Self = Self::new(5, 0, 0, 1);
	/// First version with header groups.
	pub const V5_0_0_6: Self = Self::new(5, 0, 0, 6);
	/// First version with extra-data arrays and collision references.
	pub const V10_0_1_0: Self = Self::new(10, 0, 1, 0);
	/// First version with optional strip points.
	pub const V10_0_1_3: Self = Self::new(10, 0, 1, 3);
	/// First version with a user version field.
	pub const V10_0_1_8: Self = Self::new(10, 0, 1, 8);
	/// First `Gamebryo` version; optional vertex maps and geometry flags.
	pub const V10_1_0_0: Self = Self::new(10, 1, 0, 0);
	/// First version with skin partition references on skin instances.
	pub const V10_1_0_101: Self = Self::new(10, 1, 0, 101);
	/// First version with geometry group ids.
	pub const V10_1_0_114: Self = Self::new(10, 1, 0, 114);
	/// First version with an endianness byte.
	pub const V20_0_0_3: Self = Self::new(20, 0, 0, 3);
	/// Oblivion.
	pub const V20_0_0_4: Self = Self::new(20, 0, 0, 4);
	/// Oblivion.
	pub const V20_0_0_5: Self = Self::new(20, 0, 0, 5);
	/// First version with a header string table.
	pub const V20_1_0_1: Self = Self::new(20, 1, 0, 1);
	/// First version with a block size table.
	pub const V20_2_0_5: Self = Self::new(20, 2, 0, 5);
	/// Fallout 3 and later Bethesda titles.
	pub const V20_2_0_7: Self = Self::new(20, 2, 0, 7);

	/// Build from four components.
	pub const fn new(a: u8, b: u8, c: u8, d: u8) -> Self {
		Self(((a as u32) << 24) | ((b as u32) << 16) | ((c as u32) << 8) | d as u32)
	}

	/// Split into `[a, b, c, d]`.
	pub fn parts(self) -> [u8; 4] {
		self.0.to_be_bytes()
	}

	/// Parse dotted text such as `20.2.0.7`, `4.0.0.2`, or `3.03`.
	///
	/// A two-digit component with a leading zero is read as two components, so `3.03` is `3.0.3`.
	pub fn parse(text: &str) -> Option<Self> {
		let mut parts = Vec::with_capacity(4);
		for item in text.trim().split('.') {
			if item.is_empty() || !item.bytes().all(|byte| byte.is_ascii_digit()) {
				return None;
			}
			if item.len() == 2 && item.starts_with('0') {
				parts.push(0);
				parts.push(item[1..].parse::<u8>().ok()?);
			} else {
				parts.push(item.parse::<u8>().ok()?);
			}
		}
		if parts.is_empty() || parts.len() > 4 {
			return None;
		}
		parts.resize(4, 0);
		Some(Self::new(parts[0], parts[1], parts[2], parts[3]))
	}

	/// Whether the header layout of this version is understood.
	pub fn is_supported(self) -> bool {
		self >= Self::new(2, 3, 0, 0) && self <= Self::V20_2_0_7
	}
}

impl fmt::Display for NiFileVersion {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let [a, b, c, d] = self.parts();
		if *self < Self::V3_1 {
			if c == 0 {
				return write!(f, "{a}.{b}");
			}
			return write!(f, "{a}.{b}{c}");
		}
		write!(f, "{a}.{b}.{c}.{d}")
	}
}

/// Engine family signature opening the magic line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Signature {
	/// `NetImmerse File Format`.
	NetImmerse,
	/// `Gamebryo File Format`.
	#[default]
	Gamebryo,
	/// `NDSNIF....@....@....`.
	Ndsnif,
}

impl Signature {
	/// All known signatures.
	pub const ALL: [Self; 3] = [Self::NetImmerse, Self::Gamebryo, Self::Ndsnif];

	/// Magic text preceding `, Version`.
	pub fn text(self) -> &'static str {
		match self {
			Self::NetImmerse => "NetImmerse File Format",
			Self::Gamebryo => "Gamebryo File Format",
			Self::Ndsnif => "NDSNIF....@....@....",
		}
	}

	/// Default signature for a fresh file of `file` version.
	pub fn for_version(file: NiFileVersion) -> Self {
		if file < NiFileVersion::V10_1_0_0 { Self::NetImmerse } else { Self::Gamebryo }
	}
}

/// Target engine class that decides skin partition limits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetEngine {
	/// Oblivion-era hardware skinning.
	Oblivion,
	/// Skyrim Special Edition 64-bit renderer.
	SkyrimSe,
	/// Anything else.
	Other,
}

impl TargetEngine {
	/// Maximum distinct bones per skin partition, `None` when unbounded.
	pub fn bones_per_partition(self) -> Option<usize> {
		match self {
			Self::Oblivion => Some(18),
			Self::SkyrimSe => Some(80),
			Self::Other => None,
		}
	}
}

/// Version triple plus signature describing one on-disk layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct NiVersion {
	/// File format version.
	pub file: NiFileVersion,
	/// User (licensee) version.
	pub user: u32,
	/// Bethesda stream version, `0` outside Bethesda headers.
	pub stream: u32,
	/// Magic line signature.
	pub signature: Signature,
}

impl NiVersion {
	/// Build a version with the default signature for `file`.
	pub fn new(file: NiFileVersion, user: u32, stream: u32) -> Self {
		Self {
			file,
			user,
			stream,
			signature: Signature::for_version(file),
		}
	}

	/// Morrowind layout.
	pub fn morrowind() -> Self {
		Self::new(NiFileVersion::V4_0_0_2, 0, 0)
	}

	/// Oblivion layout.
	pub fn oblivion() -> Self {
		Self::new(NiFileVersion::V20_0_0_5, 11, 11)
	}

	/// Fallout 3 / New Vegas layout.
	pub fn fallout3() -> Self {
		Self::new(NiFileVersion::V20_2_0_7, 11, 34)
	}

	/// Skyrim layout.
	pub fn skyrim() -> Self {
		Self::new(NiFileVersion::V20_2_0_7, 12, 83)
	}

	/// Skyrim Special Edition layout.
	pub fn skyrim_se() -> Self {
		Self::new(NiFileVersion::V20_2_0_7, 12, 100)
	}

	/// Fallout 4 layout.
	pub fn fallout4() -> Self {
		Self::new(NiFileVersion::V20_2_0_7, 12, 130)
	}

	/// Fallout 76 layout.
	pub fn fallout76() -> Self {
		Self::new(NiFileVersion::V20_2_0_7, 12, 155)
	}

	/// Whether the header carries the Bethesda stream version and export strings.
	pub fn has_bs_header(&self) -> bool {
		if self.user < 3 {
			return false;
		}
		self.file == NiFileVersion::V20_2_0_7
			|| self.file == NiFileVersion::V20_0_0_5
			|| (self.file >= NiFileVersion::V10_1_0_0 && self.file <= NiFileVersion::V20_0_0_4 && self.user <= 11)
	}

	/// Oblivion-family layout.
	pub fn is_oblivion(&self) -> bool {
		(self.file == NiFileVersion::V20_0_0_4 || self.file == NiFileVersion::V20_0_0_5) && self.user >= 10
	}

	/// Skyrim or Skyrim SE layout (`20.2.0.7`, user 12, stream below 130).
	pub fn is_skyrim(&self) -> bool {
		self.file == NiFileVersion::V20_2_0_7 && self.user == 12 && self.stream < 130
	}

	/// Skyrim SE layout.
	pub fn is_skyrim_se(&self) -> bool {
		self.file == NiFileVersion::V20_2_0_7 && self.user == 12 && self.stream == 100
	}

	/// Fallout 4 or later layout.
	pub fn is_fo4_or_later(&self) -> bool {
		self.file == NiFileVersion::V20_2_0_7 && self.user == 12 && self.stream >= 130
	}

	/// Engine class used for skin partition limits.
	pub fn target_engine(&self) -> TargetEngine {
		if self.is_oblivion() {
			TargetEngine::Oblivion
		} else if self.is_skyrim_se() {
			TargetEngine::SkyrimSe
		} else {
			TargetEngine::Other
		}
	}

	/// Magic line without the trailing newline.
	pub fn magic_line(&self) -> String {
		format!("{}, Version {}", self.signature.text(), self.file)
	}
}
