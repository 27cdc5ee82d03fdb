use glam::{Mat3, Vec2, Vec3, Vec4};
use half::f16;

use crate::nif::bytes::Cursor;
use crate::nif::{Endianness, NiFileVersion, NiVersion, NifError, Result};

/// Direction of one traversal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
	/// Fill values from bytes.
	Read,
	/// Emit bytes from values.
	Write,
}

enum Io<'a> {
	Read(Cursor<'a>),
	Write(&'a mut Vec<u8>),
}

/// Bidirectional codec stream.
///
/// Every value is visited through the same `sync` path in both directions, so field order and
/// presence conditions cannot diverge between reading and writing.
pub struct NifStream<'a> {
	io: Io<'a>,
	version: NiVersion,
	endianness: Endianness,
	owner: String,
}

impl<'a> NifStream<'a> {
	/// Create a reading stream over `bytes`.
	pub fn reader(bytes: &'a [u8], version: NiVersion) -> Self {
		Self {
			io: Io::Read(Cursor::new(bytes)),
			version,
			endianness: Endianness::Little,
			owner: String::new(),
		}
	}

	/// Create a writing stream appending to `out`.
	pub fn writer(out: &'a mut Vec<u8>, version: NiVersion) -> Self {
		Self {
			io: Io::Write(out),
			version,
			endianness: Endianness::Little,
			owner: String::new(),
		}
	}

	/// Current traversal direction.
	pub fn mode(&self) -> Mode {
		match self.io {
			Io::Read(_) => Mode::Read,
			Io::Write(_) => Mode::Write,
		}
	}

	/// Return `true` when reading.
	pub fn is_read(&self) -> bool {
		self.mode() == Mode::Read
	}

	/// Layout version used for presence decisions.
	pub fn version(&self) -> &NiVersion {
		&self.version
	}

	/// Replace the layout version (the header establishes it mid-stream).
	pub fn set_version(&mut self, version: NiVersion) {
		self.version = version;
	}

	/// Byte order of multi-byte values.
	pub fn endianness(&self) -> Endianness {
		self.endianness
	}

	/// Replace the byte order.
	pub fn set_endianness(&mut self, endianness: Endianness) {
		self.endianness = endianness;
	}

	/// Type name of the block currently being synced.
	pub fn owner(&self) -> &str {
		&self.owner
	}

	/// Set the type name of the block about to be synced.
	pub fn set_owner(&mut self, name: &str) {
		self.owner.clear();
		self.owner.push_str(name);
	}

	/// Byte offset: read position, or bytes written so far.
	pub fn pos(&self) -> usize {
		match &self.io {
			Io::Read(cursor) => cursor.pos(),
			Io::Write(out) => out.len(),
		}
	}

	/// Unread bytes when reading; zero when writing.
	pub fn remaining(&self) -> usize {
		match &self.io {
			Io::Read(cursor) => cursor.remaining(),
			Io::Write(_) => 0,
		}
	}

	/// Sync one streamable value.
	pub fn sync<T: Streamable>(&mut self, value: &mut T) -> Result<()> {
		value.sync(self)
	}

	/// Sync one value whose layout depends on `arg`.
	pub fn sync_with<A, T: StreamableWith<A>>(&mut self, value: &mut T, arg: A) -> Result<()> {
		value.sync_with(self, arg)
	}

	/// Sync `value` only when `presence` holds for the current version and owner.
	///
	/// Returns whether the field was present.
	pub fn sync_if<T: Streamable>(&mut self, presence: Presence<'_>, value: &mut T) -> Result<bool> {
		if !presence.holds(&self.version, &self.owner) {
			return Ok(false);
		}
		value.sync(self)?;
		Ok(true)
	}

	/// Sync one fixed-width primitive.
	pub fn sync_primitive<P: Primitive>(&mut self, value: &mut P) -> Result<()> {
		let endianness = self.endianness;
		match &mut self.io {
			Io::Read(cursor) => {
				let raw = cursor.read_exact(P::SIZE)?;
				*value = P::decode(raw, endianness);
			}
			Io::Write(out) => value.encode(endianness, out),
		}
		Ok(())
	}

	/// Sync a standalone element count with a `C`-sized prefix.
	pub fn sync_count<C: CountPrefix>(&mut self, len: &mut usize) -> Result<()> {
		let mut raw = match self.mode() {
			Mode::Read => C::default(),
			Mode::Write => C::from_len(*len).ok_or(NifError::CountOverflow { len: *len, width: C::BITS })?,
		};
		self.sync_primitive(&mut raw)?;
		*len = raw.to_len();
		Ok(())
	}

	/// Sync a `C`-prefixed list.
	pub fn sync_list<C: CountPrefix, T: Streamable + Default>(&mut self, list: &mut Vec<T>) -> Result<()> {
		let mut len = list.len();
		self.sync_count::<C>(&mut len)?;
		self.sync_fixed(list, len)
	}

	/// Sync a `C`-prefixed list whose elements take `arg`.
	pub fn sync_list_with<C: CountPrefix, A: Copy, T: StreamableWith<A> + Default>(&mut self, list: &mut Vec<T>, arg: A) -> Result<()> {
		let mut len = list.len();
		self.sync_count::<C>(&mut len)?;
		self.sync_fixed_with(list, len, arg)
	}

	/// Sync exactly `len` elements without a prefix.
	pub fn sync_fixed<T: Streamable + Default>(&mut self, list: &mut Vec<T>, len: usize) -> Result<()> {
		self.prepare_fixed(list, len)?;
		for item in list.iter_mut() {
			item.sync(self)?;
		}
		Ok(())
	}

	/// Sync exactly `len` argument-carrying elements without a prefix.
	pub fn sync_fixed_with<A: Copy, T: StreamableWith<A> + Default>(&mut self, list: &mut Vec<T>, len: usize, arg: A) -> Result<()> {
		self.prepare_fixed(list, len)?;
		for item in list.iter_mut() {
			item.sync_with(self, arg)?;
		}
		Ok(())
	}

	/// Sync an enum through its declared storage type.
	pub fn sync_enum<E: NifEnum>(&mut self, value: &mut E) -> Result<()> {
		let mut raw = value.to_repr();
		self.sync_primitive(&mut raw)?;
		*value = E::from_repr(raw);
		Ok(())
	}

	/// Sync a `C`-prefixed list of enums.
	pub fn sync_enum_list<C: CountPrefix, E: NifEnum + Default>(&mut self, list: &mut Vec<E>) -> Result<()> {
		let mut len = list.len();
		self.sync_count::<C>(&mut len)?;
		self.prepare_fixed(list, len)?;
		for item in list.iter_mut() {
			self.sync_enum(item)?;
		}
		Ok(())
	}

	/// Sync `len` raw bytes.
	pub fn sync_bytes(&mut self, bytes: &mut Vec<u8>, len: usize) -> Result<()> {
		match &mut self.io {
			Io::Read(cursor) => {
				bytes.clear();
				bytes.extend_from_slice(cursor.read_exact(len)?);
			}
			Io::Write(out) => {
				if bytes.len() != len {
					return Err(NifError::FixedLengthMismatch {
						expected: len,
						have: bytes.len(),
					});
				}
				out.extend_from_slice(bytes);
			}
		}
		Ok(())
	}

	/// Sync a newline-terminated text line (newline not included in `line`).
	pub fn sync_line(&mut self, line: &mut Vec<u8>) -> Result<()> {
		match &mut self.io {
			Io::Read(cursor) => {
				line.clear();
				line.extend_from_slice(cursor.read_line()?);
			}
			Io::Write(out) => {
				out.extend_from_slice(line);
				out.push(b'\n');
			}
		}
		Ok(())
	}

	/// Sync whatever bytes remain after the last structured field.
	pub fn sync_rest(&mut self, bytes: &mut Vec<u8>) {
		match &mut self.io {
			Io::Read(cursor) => {
				bytes.clear();
				bytes.extend_from_slice(cursor.read_rest());
			}
			Io::Write(out) => out.extend_from_slice(bytes),
		}
	}

	/// Overwrite already-written `u32` values starting at `offset`.
	///
	/// Only meaningful when writing; a reading stream ignores the call.
	pub fn patch_u32s(&mut self, offset: usize, values: &[u32]) -> Result<()> {
		let endianness = self.endianness;
		let Io::Write(out) = &mut self.io else {
			return Ok(());
		};
		let end = offset + values.len() * 4;
		if end > out.len() {
			return Err(NifError::UnexpectedEof {
				at: offset,
				need: values.len() * 4,
				rem: out.len().saturating_sub(offset),
			});
		}
		for (slot, value) in out[offset..end].chunks_exact_mut(4).zip(values) {
			let mut encoded = Vec::with_capacity(4);
			value.encode(endianness, &mut encoded);
			slot.copy_from_slice(&encoded);
		}
		Ok(())
	}

	fn prepare_fixed<T: Default>(&self, list: &mut Vec<T>, len: usize) -> Result<()> {
		match &self.io {
			Io::Read(cursor) => {
				if len > cursor.remaining() {
					return Err(NifError::UnexpectedEof {
						at: cursor.pos(),
						need: len,
						rem: cursor.remaining(),
					});
				}
				list.clear();
				list.resize_with(len, T::default);
			}
			Io::Write(_) => {
				if list.len() != len {
					return Err(NifError::FixedLengthMismatch {
						expected: len,
						have: list.len(),
					});
				}
			}
		}
		Ok(())
	}
}

/// A value with one traversal path shared by reading and writing.
pub trait Streamable {
	/// Read into or write out of `self`, depending on the stream mode.
	fn sync(&mut self, stream: &mut NifStream<'_>) -> Result<()>;
}

/// A value whose binary shape depends on a context argument from an enclosing field.
pub trait StreamableWith<A> {
	/// Read into or write out of `self` under `arg`.
	fn sync_with(&mut self, stream: &mut NifStream<'_>, arg: A) -> Result<()>;
}

/// Fixed-width scalar with a byte encoding.
pub trait Primitive: Copy + Default {
	/// Encoded byte width.
	const SIZE: usize;
	/// Decode from exactly `SIZE` bytes.
	fn decode(bytes: &[u8], endianness: Endianness) -> Self;
	/// Append the encoding to `out`.
	fn encode(self, endianness: Endianness, out: &mut Vec<u8>);
}

macro_rules! primitive {
	($($ty:ty),* $(,)?) => {
		$(
			impl Primitive for $ty {
				const SIZE: usize = std::mem::size_of::<$ty>();

				fn decode(bytes: &[u8], endianness: Endianness) -> Self {
					let mut buf = [0_u8; std::mem::size_of::<$ty>()];
					buf.copy_from_slice(bytes);
					match endianness {
						Endianness::Little => <$ty>::from_le_bytes(buf),
						Endianness::Big => <$ty>::from_be_bytes(buf),
					}
				}

				fn encode(self, endianness: Endianness, out: &mut Vec<u8>) {
					match endianness {
						Endianness::Little => out.extend_from_slice(&self.to_le_bytes()),
						Endianness::Big => out.extend_from_slice(&self.to_be_bytes()),
					}
				}
			}

			impl Streamable for $ty {
				fn sync(&mut self, stream: &mut NifStream<'_>) -> Result<()> {
					stream.sync_primitive(self)
				}
			}
		)*
	};
}

primitive!(u8, i8, u16, i16, u32, i32, u64, i64, f32, f64);

impl Primitive for f16 {
	const SIZE: usize = 2;

	fn decode(bytes: &[u8], endianness: Endianness) -> Self {
		f16::from_bits(u16::decode(bytes, endianness))
	}

	fn encode(self, endianness: Endianness, out: &mut Vec<u8>) {
		self.to_bits().encode(endianness, out);
	}
}

impl Streamable for f16 {
	fn sync(&mut self, stream: &mut NifStream<'_>) -> Result<()> {
		stream.sync_primitive(self)
	}
}

/// Unsigned integer usable as a list count prefix.
pub trait CountPrefix: Primitive {
	/// Prefix width in bits.
	const BITS: u32;
	/// Convert a stored count to `usize`, saturating.
	fn to_len(self) -> usize;
	/// Convert a length to a stored count, `None` on overflow.
	fn from_len(len: usize) -> Option<Self>;
}

macro_rules! count_prefix {
	($($ty:ty),* $(,)?) => {
		$(
			impl CountPrefix for $ty {
				const BITS: u32 = <$ty>::BITS;

				fn to_len(self) -> usize {
					usize::try_from(self).unwrap_or(usize::MAX)
				}

				fn from_len(len: usize) -> Option<Self> {
					<$ty>::try_from(len).ok()
				}
			}
		)*
	};
}

count_prefix!(u8, u16, u32, u64);

/// Enumeration stored through a declared integer type.
///
/// `from_repr` must be total so unknown values survive a round trip.
pub trait NifEnum: Copy {
	/// On-disk storage type.
	type Repr: Primitive;
	/// Convert to the stored value.
	fn to_repr(self) -> Self::Repr;
	/// Convert from the stored value.
	fn from_repr(repr: Self::Repr) -> Self;
}

/// Tri-state boolean: 4 bytes before 4.1.0.1, one byte after; `0/1/2` are false/true/null.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NiBool(pub Option<bool>);

impl NiBool {
	/// Stored `1`.
	pub const TRUE: Self = Self(Some(true));
	/// Stored `0`.
	pub const FALSE: Self = Self(Some(false));
	/// Stored `2`.
	pub const NULL: Self = Self(None);

	/// Return `true` only for the stored value `1`.
	pub fn is_true(self) -> bool {
		self.0 == Some(true)
	}
}

impl Default for NiBool {
	fn default() -> Self {
		Self::FALSE
	}
}

impl From<bool> for NiBool {
	fn from(value: bool) -> Self {
		Self(Some(value))
	}
}

impl Streamable for NiBool {
	fn sync(&mut self, stream: &mut NifStream<'_>) -> Result<()> {
		let at = stream.pos();
		let mut raw: u32 = match self.0 {
			Some(false) => 0,
			Some(true) => 1,
			None => 2,
		};
		if stream.version().file < NiFileVersion::V4_1_0_1 {
			stream.sync_primitive(&mut raw)?;
		} else {
			let mut byte = raw as u8;
			stream.sync_primitive(&mut byte)?;
			raw = u32::from(byte);
		}
		self.0 = match raw {
			0 => Some(false),
			1 => Some(true),
			2 => None,
			value => return Err(NifError::InvalidBool { value, at }),
		};
		Ok(())
	}
}

impl<T: Streamable, const N: usize> Streamable for [T; N] {
	fn sync(&mut self, stream: &mut NifStream<'_>) -> Result<()> {
		for item in self.iter_mut() {
			item.sync(stream)?;
		}
		Ok(())
	}
}

impl Streamable for Vec2 {
	fn sync(&mut self, stream: &mut NifStream<'_>) -> Result<()> {
		stream.sync(&mut self.x)?;
		stream.sync(&mut self.y)
	}
}

impl Streamable for Vec3 {
	fn sync(&mut self, stream: &mut NifStream<'_>) -> Result<()> {
		stream.sync(&mut self.x)?;
		stream.sync(&mut self.y)?;
		stream.sync(&mut self.z)
	}
}

impl Streamable for Vec4 {
	fn sync(&mut self, stream: &mut NifStream<'_>) -> Result<()> {
		stream.sync(&mut self.x)?;
		stream.sync(&mut self.y)?;
		stream.sync(&mut self.z)?;
		stream.sync(&mut self.w)
	}
}

/// Rows are stored in order; `Mat3` keeps columns, hence the transposes.
impl Streamable for Mat3 {
	fn sync(&mut self, stream: &mut NifStream<'_>) -> Result<()> {
		let mut rows = self.transpose().to_cols_array();
		stream.sync(&mut rows)?;
		*self = Mat3::from_cols_array(&rows).transpose();
		Ok(())
	}
}

/// Field presence predicate evaluated identically when reading and writing.
#[derive(Debug, Clone, Copy)]
pub struct Presence<'a> {
	since: Option<NiFileVersion>,
	until: Option<NiFileVersion>,
	when: bool,
	only: Option<&'a str>,
	except: Option<&'a str>,
}

impl Default for Presence<'_> {
	fn default() -> Self {
		Self::always()
	}
}

impl<'a> Presence<'a> {
	/// Unconditionally present.
	pub fn always() -> Self {
		Self {
			since: None,
			until: None,
			when: true,
			only: None,
			except: None,
		}
	}

	/// Present from `version` onward (inclusive).
	pub fn since(mut self, version: NiFileVersion) -> Self {
		self.since = Some(version);
		self
	}

	/// Present up to `version` (inclusive).
	pub fn until(mut self, version: NiFileVersion) -> Self {
		self.until = Some(version);
		self
	}

	/// Additionally require `cond` (an expression over siblings and versions).
	pub fn when(mut self, cond: bool) -> Self {
		self.when &= cond;
		self
	}

	/// Present only when the owning block is exactly `type_name`.
	pub fn only_for(mut self, type_name: &'a str) -> Self {
		self.only = Some(type_name);
		self
	}

	/// Present unless the owning block is exactly `type_name`.
	pub fn except_for(mut self, type_name: &'a str) -> Self {
		self.except = Some(type_name);
		self
	}

	/// Evaluate against a version and owning block type.
	pub fn holds(&self, version: &NiVersion, owner: &str) -> bool {
		if !self.when {
			return false;
		}
		if self.since.is_some_and(|since| version.file < since) {
			return false;
		}
		if self.until.is_some_and(|until| version.file > until) {
			return false;
		}
		if self.only.is_some_and(|only| only != owner) {
			return false;
		}
		if self.except.is_some_and(|except| except == owner) {
			return false;
		}
		true
	}
}
