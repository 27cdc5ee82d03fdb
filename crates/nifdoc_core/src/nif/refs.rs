use std::fmt;
use std::marker::PhantomData;

use crate::nif::{NifStream, Result, Streamable};

/// Untyped block index with `-1` as the empty sentinel.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct RawRef(pub i32);

impl RawRef {
	/// Stored value meaning "no block".
	pub const NONE: Self = Self(-1);

	/// Reference to block `index`.
	///
	/// Indices beyond `i32::MAX` cannot be stored and become the sentinel.
	pub fn new(index: usize) -> Self {
		i32::try_from(index).map_or(Self::NONE, Self)
	}

	/// Target index, `None` for the sentinel or any negative value.
	pub fn index(self) -> Option<usize> {
		usize::try_from(self.0).ok()
	}

	/// Return `true` when no block is targeted.
	pub fn is_none(self) -> bool {
		self.index().is_none()
	}

	/// Point at `index`, or clear with `None`.
	pub fn set(&mut self, index: Option<usize>) {
		*self = index.map_or(Self::NONE, Self::new);
	}

	/// Reset to the sentinel.
	pub fn clear(&mut self) {
		*self = Self::NONE;
	}
}

impl Default for RawRef {
	fn default() -> Self {
		Self::NONE
	}
}

impl fmt::Debug for RawRef {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self.index() {
			Some(index) => write!(f, "#{index}"),
			None => f.write_str("#none"),
		}
	}
}

impl Streamable for RawRef {
	fn sync(&mut self, stream: &mut NifStream<'_>) -> Result<()> {
		stream.sync(&mut self.0)
	}
}

macro_rules! typed_ref {
	($(#[$meta:meta])* $name:ident) => {
		$(#[$meta])*
		pub struct $name<T: ?Sized> {
			raw: RawRef,
			_target: PhantomData<fn(&T)>,
		}

		impl<T: ?Sized> $name<T> {
			/// Reference to block `index`.
			pub fn new(index: usize) -> Self {
				Self::from_raw(RawRef::new(index))
			}

			/// Empty reference.
			pub fn none() -> Self {
				Self::from_raw(RawRef::NONE)
			}

			/// Wrap an untyped index.
			pub fn from_raw(raw: RawRef) -> Self {
				Self { raw, _target: PhantomData }
			}

			/// Untyped index.
			pub fn raw(&self) -> RawRef {
				self.raw
			}

			/// Mutable untyped index, used by graph-wide renumbering.
			pub fn raw_mut(&mut self) -> &mut RawRef {
				&mut self.raw
			}

			/// Target index, `None` when empty.
			pub fn index(&self) -> Option<usize> {
				self.raw.index()
			}

			/// Return `true` when empty.
			pub fn is_none(&self) -> bool {
				self.raw.is_none()
			}

			/// Point at `index`, or clear with `None`.
			pub fn set(&mut self, index: Option<usize>) {
				self.raw.set(index);
			}

			/// Reset to empty.
			pub fn clear(&mut self) {
				self.raw.clear();
			}
		}

		impl<T: ?Sized> Clone for $name<T> {
			fn clone(&self) -> Self {
				*self
			}
		}

		impl<T: ?Sized> Copy for $name<T> {}

		impl<T: ?Sized> Default for $name<T> {
			fn default() -> Self {
				Self::none()
			}
		}

		impl<T: ?Sized> PartialEq for $name<T> {
			fn eq(&self, other: &Self) -> bool {
				self.raw == other.raw
			}
		}

		impl<T: ?Sized> Eq for $name<T> {}

		impl<T: ?Sized> fmt::Debug for $name<T> {
			fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
				write!(f, "{}({:?})", stringify!($name), self.raw)
			}
		}

		impl<T: ?Sized> Streamable for $name<T> {
			fn sync(&mut self, stream: &mut NifStream<'_>) -> Result<()> {
				stream.sync(&mut self.raw)
			}
		}
	};
}

typed_ref! {
	/// Strong (owning) reference; counts toward reachability.
	Ref
}

typed_ref! {
	/// Weak back-pointer; never keeps its target alive.
	Ptr
}

/// A homogeneous, count-prefixed collection of references.
///
/// Graph-wide edits (removal, renumbering, sorting) see every array through this trait.
pub trait ReferenceArray {
	/// Return `true` for owning arrays.
	fn is_strong(&self) -> bool;
	/// Stored indices in order.
	fn raw_refs(&self) -> &[RawRef];
	/// Mutable stored indices.
	fn raw_refs_mut(&mut self) -> &mut Vec<RawRef>;

	/// Drop every entry pointing at `index`.
	fn detach(&mut self, index: usize) {
		self.raw_refs_mut().retain(|raw| raw.index() != Some(index));
	}
}

macro_rules! ref_array {
	($(#[$meta:meta])* $name:ident, $item:ident, $strong:expr) => {
		$(#[$meta])*
		pub struct $name<T: ?Sized> {
			refs: Vec<RawRef>,
			_target: PhantomData<fn(&T)>,
		}

		impl<T: ?Sized> $name<T> {
			/// Empty array.
			pub fn new() -> Self {
				Self {
					refs: Vec::new(),
					_target: PhantomData,
				}
			}

			/// Number of entries, empty ones included.
			pub fn len(&self) -> usize {
				self.refs.len()
			}

			/// Return `true` when there are no entries.
			pub fn is_empty(&self) -> bool {
				self.refs.is_empty()
			}

			/// Grow with empty entries or truncate.
			pub fn resize(&mut self, len: usize) {
				self.refs.resize(len, RawRef::NONE);
			}

			/// Entry at `slot`.
			pub fn get(&self, slot: usize) -> Option<$item<T>> {
				self.refs.get(slot).copied().map($item::from_raw)
			}

			/// Overwrite entry at `slot`; returns `false` when out of range.
			pub fn set(&mut self, slot: usize, index: Option<usize>) -> bool {
				match self.refs.get_mut(slot) {
					Some(raw) => {
						raw.set(index);
						true
					}
					None => false,
				}
			}

			/// Append a reference to `index`.
			pub fn push(&mut self, index: usize) {
				self.refs.push(RawRef::new(index));
			}

			/// Remove and return the entry at `slot`.
			pub fn remove(&mut self, slot: usize) -> Option<$item<T>> {
				(slot < self.refs.len()).then(|| $item::from_raw(self.refs.remove(slot)))
			}

			/// Drop every entry.
			pub fn clear(&mut self) {
				self.refs.clear();
			}

			/// Return `true` when some entry targets `index`.
			pub fn contains(&self, index: usize) -> bool {
				self.refs.iter().any(|raw| raw.index() == Some(index))
			}

			/// Target indices in order, empty entries skipped.
			pub fn indices(&self) -> impl Iterator<Item = usize> + '_ {
				self.refs.iter().filter_map(|raw| raw.index())
			}

			/// Entries in order.
			pub fn iter(&self) -> impl Iterator<Item = $item<T>> + '_ {
				self.refs.iter().copied().map($item::from_raw)
			}
		}

		impl<T: ?Sized> ReferenceArray for $name<T> {
			fn is_strong(&self) -> bool {
				$strong
			}

			fn raw_refs(&self) -> &[RawRef] {
				&self.refs
			}

			fn raw_refs_mut(&mut self) -> &mut Vec<RawRef> {
				&mut self.refs
			}
		}

		impl<T: ?Sized> Clone for $name<T> {
			fn clone(&self) -> Self {
				Self {
					refs: self.refs.clone(),
					_target: PhantomData,
				}
			}
		}

		impl<T: ?Sized> Default for $name<T> {
			fn default() -> Self {
				Self::new()
			}
		}

		impl<T: ?Sized> PartialEq for $name<T> {
			fn eq(&self, other: &Self) -> bool {
				self.refs == other.refs
			}
		}

		impl<T: ?Sized> fmt::Debug for $name<T> {
			fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
				f.debug_list().entries(&self.refs).finish()
			}
		}

		impl<T: ?Sized> FromIterator<usize> for $name<T> {
			fn from_iter<I: IntoIterator<Item = usize>>(iter: I) -> Self {
				Self {
					refs: iter.into_iter().map(RawRef::new).collect(),
					_target: PhantomData,
				}
			}
		}

		/// Synced as a `u32` count followed by `i32` indices.
		impl<T: ?Sized> Streamable for $name<T> {
			fn sync(&mut self, stream: &mut NifStream<'_>) -> Result<()> {
				stream.sync_list::<u32, _>(&mut self.refs)
			}
		}
	};
}

ref_array! {
	/// Count-prefixed array of strong references.
	RefArray, Ref, true
}

ref_array! {
	/// Count-prefixed array of weak pointers.
	PtrArray, Ptr, false
}
