//! Immutable tree cells
//!
//! A cell is the unit of on-chain data: up to 1023 payload bits plus up to 4
//! ordered references to child cells. Cells are immutable and content
//! addressed: the representation hash is computed once at construction and
//! serves as the cell's identity for equality and address derivation.
//!
//! # Representation Hash
//!
//! SHA-256 over the canonical representation:
//!
//! ```text
//! +------------------+
//! | d1               | 1 byte: reference count
//! +------------------+
//! | d2               | 1 byte: floor(bits/8) + ceil(bits/8)
//! +------------------+
//! | augmented data   | payload, padded to a byte with `1` then zeros
//! +------------------+
//! | child depths     | 2 bytes big-endian each, in reference order
//! +------------------+
//! | child hashes     | 32 bytes each, in reference order
//! +------------------+
//! ```
//!
//! Child hashes recurse, so any bit change anywhere in a tree changes the
//! root hash.

use std::fmt;
use std::sync::Arc;

use once_cell::sync::Lazy;
use sha2::{Digest, Sha256};
use tonwork_core::{MAX_CELL_BITS, MAX_CELL_DEPTH, MAX_CELL_REFS};

use crate::error::CellBuildError;
use crate::slice::CellSlice;

/// The canonical empty cell: no payload, no references.
static EMPTY: Lazy<Arc<Cell>> = Lazy::new(|| Arc::new(Cell::assemble(Vec::new(), 0, Vec::new())));

/// An immutable tree cell with a content hash.
///
/// Construct cells through [`CellBuilder`](crate::CellBuilder); equality and
/// hashing go through the representation hash, so two cells compare equal
/// exactly when their full trees are bit-identical.
#[derive(Clone)]
pub struct Cell {
    /// Payload bits, packed most-significant-first, zero-padded to a byte.
    data: Vec<u8>,
    /// Number of payload bits actually used.
    bit_len: usize,
    /// Ordered child references.
    refs: Vec<Arc<Cell>>,
    /// Tree depth: 0 for a leaf, 1 + max child depth otherwise.
    depth: u16,
    /// Representation hash, computed at construction.
    hash: [u8; 32],
}

impl Cell {
    /// Assemble a cell without validation.
    ///
    /// The data vector is normalized: resized to `ceil(bit_len / 8)` bytes
    /// and masked so bits past `bit_len` are zero. Callers must have checked
    /// the structural limits already.
    pub(crate) fn assemble(mut data: Vec<u8>, bit_len: usize, refs: Vec<Arc<Cell>>) -> Self {
        let byte_len = (bit_len + 7) / 8;
        data.resize(byte_len, 0);
        if bit_len % 8 != 0 {
            data[byte_len - 1] &= 0xFFu8 << (8 - bit_len % 8);
        }
        let depth = refs.iter().map(|c| c.depth + 1).max().unwrap_or(0);

        let mut cell = Cell {
            data,
            bit_len,
            refs,
            depth,
            hash: [0; 32],
        };
        cell.hash = cell.compute_hash();
        cell
    }

    /// Assemble a cell, validating the structural limits first.
    pub(crate) fn from_raw_parts(
        data: Vec<u8>,
        bit_len: usize,
        refs: Vec<Arc<Cell>>,
    ) -> Result<Self, CellBuildError> {
        if bit_len > MAX_CELL_BITS {
            return Err(CellBuildError::CapacityExceeded {
                bits: bit_len,
                max: MAX_CELL_BITS,
            });
        }
        if refs.len() > MAX_CELL_REFS {
            return Err(CellBuildError::TooManyRefs { max: MAX_CELL_REFS });
        }
        if refs.iter().any(|c| c.depth >= MAX_CELL_DEPTH) {
            return Err(CellBuildError::DepthExceeded {
                max: MAX_CELL_DEPTH,
            });
        }
        Ok(Cell::assemble(data, bit_len, refs))
    }

    /// The canonical empty cell.
    pub fn empty() -> Arc<Cell> {
        EMPTY.clone()
    }

    /// Number of payload bits.
    pub fn bit_len(&self) -> usize {
        self.bit_len
    }

    /// Payload bytes, zero-padded to the byte boundary.
    ///
    /// Exactly `ceil(bit_len / 8)` bytes; bits past [`bit_len`](Self::bit_len)
    /// are zero.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Ordered child references.
    pub fn refs(&self) -> &[Arc<Cell>] {
        &self.refs
    }

    /// Tree depth: 0 for a leaf, 1 + the maximum child depth otherwise.
    pub fn depth(&self) -> u16 {
        self.depth
    }

    /// The representation hash identifying this cell's full tree.
    pub fn repr_hash(&self) -> [u8; 32] {
        self.hash
    }

    /// Start reading this cell's payload and references in order.
    pub fn begin_parse(&self) -> CellSlice<'_> {
        CellSlice::new(self)
    }

    /// First descriptor byte: the reference count.
    pub(crate) fn d1(&self) -> u8 {
        self.refs.len() as u8
    }

    /// Second descriptor byte: `floor(bits / 8) + ceil(bits / 8)`.
    ///
    /// Odd exactly when the last payload byte is partial, which is how a
    /// reader knows to look for the completion tag.
    pub(crate) fn d2(&self) -> u8 {
        ((self.bit_len / 8) + ((self.bit_len + 7) / 8)) as u8
    }

    /// Payload padded to a byte boundary with a completion tag.
    ///
    /// When `bit_len` is not a multiple of 8, a single `1` bit follows the
    /// payload and zeros fill the rest of the byte. Otherwise this is the
    /// payload verbatim.
    pub(crate) fn augmented_data(&self) -> Vec<u8> {
        let mut out = self.data.clone();
        if self.bit_len % 8 != 0 {
            let last = out.len() - 1;
            out[last] |= 0x80 >> (self.bit_len % 8);
        }
        out
    }

    fn compute_hash(&self) -> [u8; 32] {
        let mut hasher = Sha256::new();
        hasher.update([self.d1(), self.d2()]);
        hasher.update(self.augmented_data());
        for child in &self.refs {
            hasher.update(child.depth.to_be_bytes());
        }
        for child in &self.refs {
            hasher.update(child.hash);
        }
        hasher.finalize().into()
    }
}

impl PartialEq for Cell {
    fn eq(&self, other: &Self) -> bool {
        self.hash == other.hash
    }
}

impl Eq for Cell {}

impl std::hash::Hash for Cell {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        state.write(&self.hash);
    }
}

impl fmt::Debug for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let hex: String = self.hash.iter().map(|b| format!("{b:02x}")).collect();
        write!(
            f,
            "Cell {{ bits: {}, refs: {}, hash: {} }}",
            self.bit_len,
            self.refs.len(),
            hex
        )
    }
}
