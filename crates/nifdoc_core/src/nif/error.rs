use thiserror::Error;

/// Crate-local result type.
pub type Result<T> = std::result::Result<T, NifError>;

/// Errors produced while reading, editing, and writing `.nif` data.
#[derive(Debug, Error)]
pub enum NifError {
	/// Filesystem or stream IO failure.
	#[error("io: {0}")]
	Io(#[from] std::io::Error),
	/// Leading magic line does not name a known engine family.
	#[error("not a nif file (magic line {line:?})")]
	InvalidMagic {
		/// Magic line text, lossily decoded.
		line: String,
	},
	/// Version text or packed version could not be understood.
	#[error("unsupported nif version {version}")]
	UnsupportedVersion {
		/// Version as printed in the magic line.
		version: String,
	},
	/// Packed version after the magic line disagrees with the text form.
	#[error("version mismatch: magic line says 0x{text:08x}, header says 0x{packed:08x}")]
	VersionMismatch {
		/// Version parsed from the magic line.
		text: u32,
		/// Version stored as packed integer.
		packed: u32,
	},
	/// Not enough bytes remained for a requested read.
	#[error("unexpected eof at offset {at}, need {need} bytes, remaining {rem}")]
	UnexpectedEof {
		/// Byte offset where the read was attempted.
		at: usize,
		/// Requested bytes.
		need: usize,
		/// Bytes still available.
		rem: usize,
	},
	/// Boolean byte outside `0..=2`.
	#[error("invalid bool value {value} at offset {at}")]
	InvalidBool {
		/// Offending raw value.
		value: u32,
		/// Byte offset of the value.
		at: usize,
	},
	/// List length does not fit the declared count prefix.
	#[error("list of {len} elements does not fit a {width}-bit count prefix")]
	CountOverflow {
		/// Element count being written.
		len: usize,
		/// Prefix width in bits.
		width: u32,
	},
	/// Fixed-length array holds a different element count than its length field.
	#[error("fixed array length mismatch: expected {expected}, have {have}")]
	FixedLengthMismatch {
		/// Length required by the schema or sibling field.
		expected: usize,
		/// Elements actually present.
		have: usize,
	},
	/// Block type cannot be parsed and no size table allows skipping it.
	#[error("unknown block type {name:?} at block {index} and no block size table to skip it")]
	UnknownBlockType {
		/// On-disk type name.
		name: String,
		/// Block index in file order.
		index: usize,
	},
	/// Block type index in the header points past the type table.
	#[error("block {index} has type index {type_index} but only {type_count} types exist")]
	BadTypeIndex {
		/// Block index in file order.
		index: usize,
		/// Stored type index.
		type_index: u16,
		/// Length of the type table.
		type_count: usize,
	},
	/// Parsed block consumed a different byte count than the size table records.
	#[error("block {index} ({name}) read {read} bytes but size table says {expected}")]
	BlockSizeMismatch {
		/// Block index in file order.
		index: usize,
		/// Block type name.
		name: String,
		/// Bytes consumed by the parser.
		read: usize,
		/// Bytes recorded in the size table.
		expected: usize,
	},
	/// Requested block index does not exist.
	#[error("block index {index} out of range (block count {count})")]
	BlockIndexOutOfRange {
		/// Requested index.
		index: usize,
		/// Current block count.
		count: usize,
	},
	/// Block exists but has a different concrete type.
	#[error("block {index} is {got}, expected {expected}")]
	BlockTypeMismatch {
		/// Block index.
		index: usize,
		/// Expected type name.
		expected: &'static str,
		/// Actual type name.
		got: String,
	},
	/// Block order permutation is not a permutation of the block indices.
	#[error("invalid block order of length {len} for {count} blocks")]
	InvalidBlockOrder {
		/// Permutation length.
		len: usize,
		/// Block count.
		count: usize,
	},
	/// A block layout feature this reader cannot express.
	#[error("unsupported layout in {name}: {detail}")]
	UnsupportedLayout {
		/// Owning block type name.
		name: String,
		/// Short description of the unsupported feature.
		detail: &'static str,
	},
	/// Block has no known layout in the version being written, so the result could not be read back.
	#[error("block {index} ({name}) has no layout for nif version {version}")]
	UnsupportedBlockForVersion {
		/// Block index.
		index: usize,
		/// Block type name.
		name: String,
		/// Target version.
		version: String,
	},
	/// Skin partition needs more bone slots than a partition can address.
	#[error("skin partition needs {bones} bone slots, at most {max} fit")]
	TooManyPartitionBones {
		/// Bones the partition would hold.
		bones: usize,
		/// Addressable slot count.
		max: usize,
	},
	/// Shape has no skin instance, skin data, or partition to rebuild.
	#[error("shape block {index} is not skinned")]
	NotSkinned {
		/// Shape block index.
		index: usize,
	},
}
