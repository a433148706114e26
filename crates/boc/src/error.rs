//! Error types for the cell codec
//!
//! Four independent families, one per failure surface:
//! - `CellBuildError`: writing past a cell's structural limits
//! - `CellError`: reading a malformed or exhausted cell payload
//! - `BocError`: decoding a bag-of-cells byte stream
//! - `TextError`: decoding an embedded text chain

use thiserror::Error;

/// Errors from assembling a cell.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CellBuildError {
    /// The payload would exceed the per-cell bit limit.
    #[error("cell payload capacity exceeded: {bits} bits, limit {max}")]
    CapacityExceeded {
        /// Total bits the cell would need.
        bits: usize,
        /// Per-cell payload limit.
        max: usize,
    },

    /// The cell already carries the maximum number of references.
    #[error("cell reference capacity exceeded: limit {max}")]
    TooManyRefs {
        /// Per-cell reference limit.
        max: usize,
    },

    /// The cell tree would exceed the depth limit.
    #[error("cell depth limit {max} exceeded")]
    DepthExceeded {
        /// Tree depth limit.
        max: u16,
    },

    /// A value does not fit in the requested bit width.
    #[error("value {value} does not fit in {bits} bits")]
    ValueOutOfRange {
        /// The value being stored.
        value: u64,
        /// The requested width.
        bits: usize,
    },

    /// A requested integer width exceeds 64 bits.
    #[error("bit width {bits} exceeds 64")]
    WidthTooLarge {
        /// The requested width.
        bits: usize,
    },

    /// More bits were requested than the source buffer holds.
    #[error("bit count {bits} exceeds source buffer of {available} bits")]
    SourceUnderrun {
        /// Bits requested.
        bits: usize,
        /// Bits the buffer holds.
        available: usize,
    },
}

/// Errors from reading a cell's payload.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CellError {
    /// A read wanted more payload bits than remain.
    #[error("cell payload underrun: wanted {wanted} bits, {available} remain")]
    DataUnderrun {
        /// Bits the read wanted.
        wanted: usize,
        /// Bits remaining in the payload.
        available: usize,
    },

    /// A read wanted a reference past the last one.
    #[error("cell reference underrun: wanted reference {index}, cell has {available}")]
    RefUnderrun {
        /// Zero-based reference index wanted.
        index: usize,
        /// References the cell has.
        available: usize,
    },

    /// A requested integer width exceeds 64 bits.
    #[error("bit width {bits} exceeds 64")]
    WidthTooLarge {
        /// The requested width.
        bits: usize,
    },

    /// An address field carries a tag other than the standard one.
    #[error("unsupported address tag {tag:#04b}")]
    UnsupportedAddressTag {
        /// The 2-bit tag that was read.
        tag: u8,
    },

    /// An address field carries anycast routing data.
    #[error("anycast addresses are not supported")]
    UnsupportedAnycast,

    /// Data remains after a structure that must consume its whole cell.
    #[error("cell has {bits} unread payload bits and {refs} unread references")]
    TrailingData {
        /// Unread payload bits.
        bits: usize,
        /// Unread references.
        refs: usize,
    },
}

/// Errors from decoding a bag-of-cells byte stream.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BocError {
    /// The stream does not start with the bag-of-cells magic.
    #[error("invalid magic: expected {expected:#010x}, got {actual:#010x}")]
    InvalidMagic {
        /// The required magic value.
        expected: u32,
        /// The value found in the stream.
        actual: u32,
    },

    /// The stream ended in the middle of a field.
    #[error("unexpected end of stream at byte {offset}")]
    UnexpectedEof {
        /// Byte offset where the read failed.
        offset: usize,
    },

    /// A declared field width is outside the supported range.
    #[error("unsupported field width of {width} bytes")]
    UnsupportedWidth {
        /// The declared width.
        width: u8,
    },

    /// Reserved bits are set in the header flags byte.
    #[error("reserved flag bits set in header byte {flags:#04x}")]
    ReservedFlags {
        /// The offending flags byte.
        flags: u8,
    },

    /// The stream holds a number of roots other than one.
    #[error("expected exactly one root cell, got {roots}")]
    RootCountNotOne {
        /// Declared root count.
        roots: usize,
    },

    /// The stream declares absent cells, which this codec does not use.
    #[error("absent cells are not supported ({count} declared)")]
    AbsentCells {
        /// Declared absent-cell count.
        count: usize,
    },

    /// The root index points past the cell table.
    #[error("root index {index} out of range for {cells} cells")]
    RootOutOfRange {
        /// Declared root index.
        index: usize,
        /// Number of cells in the stream.
        cells: usize,
    },

    /// A cell references an index that does not strictly follow it.
    ///
    /// Topological order is mandatory: every reference must point forward,
    /// which also rules out cycles.
    #[error("cell {cell} references index {reference}, which does not follow it")]
    BackwardReference {
        /// Index of the referencing cell.
        cell: usize,
        /// Index it referenced.
        reference: usize,
    },

    /// A cell references an index past the cell table.
    #[error("cell {cell} references index {reference} out of range for {cells} cells")]
    ReferenceOutOfRange {
        /// Index of the referencing cell.
        cell: usize,
        /// Index it referenced.
        reference: usize,
        /// Number of cells in the stream.
        cells: usize,
    },

    /// A cell descriptor declares an exotic type, embedded hashes, or a
    /// nonzero level, none of which this codec uses.
    #[error("cell {cell} has unsupported descriptor {d1:#04x}")]
    UnsupportedCell {
        /// Index of the cell.
        cell: usize,
        /// Its first descriptor byte.
        d1: u8,
    },

    /// A cell descriptor declares more references than the limit.
    #[error("cell {cell} declares {refs} references, limit is {max}")]
    TooManyRefs {
        /// Index of the cell.
        cell: usize,
        /// Declared reference count.
        refs: usize,
        /// Per-cell reference limit.
        max: usize,
    },

    /// A cell with a partial last byte is missing its completion tag.
    #[error("cell {cell} has no completion tag in its last byte")]
    MissingCompletionTag {
        /// Index of the cell.
        cell: usize,
    },

    /// The declared total cell-data size does not match the stream.
    #[error("declared cell data size {declared} does not match actual {actual}")]
    CellDataSizeMismatch {
        /// Size declared in the header.
        declared: usize,
        /// Size actually consumed.
        actual: usize,
    },

    /// The stream checksum does not match its content.
    #[error("checksum mismatch: computed {computed:#010x}, stored {stored:#010x}")]
    ChecksumMismatch {
        /// Checksum computed over the stream.
        computed: u32,
        /// Checksum stored in the stream.
        stored: u32,
    },

    /// Bytes remain after the end of the bag of cells.
    #[error("{trailing} trailing bytes after bag of cells")]
    TrailingBytes {
        /// Number of extra bytes.
        trailing: usize,
    },

    /// A decoded cell violates structural limits (e.g. tree depth).
    #[error(transparent)]
    InvalidCell(#[from] CellBuildError),
}

/// Errors from decoding an embedded text chain.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TextError {
    /// A chunk's payload is not a whole number of bytes.
    #[error("text payload is not byte-aligned: chunk holds {bits} bits")]
    NotByteAligned {
        /// Bit length of the offending chunk.
        bits: usize,
    },

    /// A chunk has more than one reference, so the chain forks.
    #[error("text chain branches: chunk has {refs} references")]
    Branching {
        /// Reference count of the offending chunk.
        refs: usize,
    },

    /// The assembled bytes are not valid UTF-8.
    #[error("text is not valid UTF-8 (valid up to byte {valid_up_to})")]
    InvalidUtf8 {
        /// Length of the longest valid prefix.
        valid_up_to: usize,
    },
}
