//! Sequential cell construction
//!
//! `CellBuilder` appends typed fields most-significant-bit first; append
//! order is part of the encoded identity, so two builders fed the same
//! fields in the same order always produce hash-identical cells. Every
//! `store_*` method checks capacity before writing, so a failed call leaves
//! the builder unchanged.

use std::sync::Arc;

use tonwork_core::{Address, MAX_CELL_BITS, MAX_CELL_DEPTH, MAX_CELL_REFS};

use crate::cell::Cell;
use crate::error::CellBuildError;

/// Bits in a standard serialized address: 2 tag + 1 anycast + 8 workchain
/// + 256 hash.
const ADDR_STD_BITS: usize = 267;

/// Incremental builder for one cell.
#[derive(Debug, Default, Clone)]
pub struct CellBuilder {
    data: Vec<u8>,
    bit_len: usize,
    refs: Vec<Arc<Cell>>,
}

impl CellBuilder {
    /// Create an empty builder.
    pub fn new() -> Self {
        CellBuilder::default()
    }

    /// Payload bits stored so far.
    pub fn bit_len(&self) -> usize {
        self.bit_len
    }

    /// References stored so far.
    pub fn ref_count(&self) -> usize {
        self.refs.len()
    }

    /// Append a single bit.
    pub fn store_bit(&mut self, bit: bool) -> Result<&mut Self, CellBuildError> {
        self.ensure_capacity(1)?;
        self.push_bit(bit);
        Ok(self)
    }

    /// Append the low `bits` bits of `value`, most significant first.
    ///
    /// # Errors
    /// Fails if `bits` exceeds 64, if `value` does not fit in `bits` bits,
    /// or if the cell would overflow.
    pub fn store_uint(&mut self, value: u64, bits: usize) -> Result<&mut Self, CellBuildError> {
        if bits > 64 {
            return Err(CellBuildError::WidthTooLarge { bits });
        }
        if bits < 64 && value >> bits != 0 {
            return Err(CellBuildError::ValueOutOfRange { value, bits });
        }
        self.ensure_capacity(bits)?;
        for i in (0..bits).rev() {
            self.push_bit((value >> i) & 1 == 1);
        }
        Ok(self)
    }

    /// Append a 256-bit unsigned value given as big-endian bytes.
    pub fn store_uint256(&mut self, value: &[u8; 32]) -> Result<&mut Self, CellBuildError> {
        self.store_bits(value, 256)
    }

    /// Append the first `bits` bits of `bytes`, most significant first.
    pub fn store_bits(&mut self, bytes: &[u8], bits: usize) -> Result<&mut Self, CellBuildError> {
        if bits > bytes.len() * 8 {
            return Err(CellBuildError::SourceUnderrun {
                bits,
                available: bytes.len() * 8,
            });
        }
        self.ensure_capacity(bits)?;
        for i in 0..bits {
            self.push_bit(bytes[i / 8] & (0x80 >> (i % 8)) != 0);
        }
        Ok(self)
    }

    /// Append whole bytes.
    pub fn store_bytes(&mut self, bytes: &[u8]) -> Result<&mut Self, CellBuildError> {
        self.store_bits(bytes, bytes.len() * 8)
    }

    /// Append an address in the standard 267-bit encoding:
    /// tag `10`, no anycast, signed 8-bit workchain, 256-bit hash.
    pub fn store_address(&mut self, address: &Address) -> Result<&mut Self, CellBuildError> {
        // One capacity check up front keeps the write atomic.
        self.ensure_capacity(ADDR_STD_BITS)?;
        self.store_uint(0b10, 2)?;
        self.store_bit(false)?;
        self.store_uint(address.workchain() as u8 as u64, 8)?;
        self.store_uint256(address.hash())?;
        Ok(self)
    }

    /// Append a reference to a child cell.
    ///
    /// # Errors
    /// Fails if the cell already holds the maximum number of references or
    /// if the child would push the tree past the depth limit.
    pub fn store_ref(&mut self, child: Arc<Cell>) -> Result<&mut Self, CellBuildError> {
        if self.refs.len() >= MAX_CELL_REFS {
            return Err(CellBuildError::TooManyRefs { max: MAX_CELL_REFS });
        }
        if child.depth() >= MAX_CELL_DEPTH {
            return Err(CellBuildError::DepthExceeded {
                max: MAX_CELL_DEPTH,
            });
        }
        self.refs.push(child);
        Ok(self)
    }

    /// Finalize into an immutable cell.
    ///
    /// Cannot fail: every limit was enforced when the field was stored.
    pub fn build(self) -> Cell {
        Cell::assemble(self.data, self.bit_len, self.refs)
    }

    fn ensure_capacity(&self, extra: usize) -> Result<(), CellBuildError> {
        let bits = self.bit_len + extra;
        if bits > MAX_CELL_BITS {
            return Err(CellBuildError::CapacityExceeded {
                bits,
                max: MAX_CELL_BITS,
            });
        }
        Ok(())
    }

    fn push_bit(&mut self, bit: bool) {
        if self.bit_len / 8 == self.data.len() {
            self.data.push(0);
        }
        if bit {
            self.data[self.bit_len / 8] |= 0x80 >> (self.bit_len % 8);
        }
        self.bit_len += 1;
    }
}
