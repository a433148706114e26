//! Sequential cell reading
//!
//! `CellSlice` is a cursor over one cell: payload bits and references are
//! consumed in the order they were stored. Reads never look into child
//! cells; callers follow references explicitly.

use std::sync::Arc;

use tonwork_core::Address;

use crate::cell::Cell;
use crate::error::CellError;

/// Read cursor over a cell's payload and references.
#[derive(Debug, Clone)]
pub struct CellSlice<'a> {
    cell: &'a Cell,
    bit_pos: usize,
    ref_pos: usize,
}

impl<'a> CellSlice<'a> {
    pub(crate) fn new(cell: &'a Cell) -> Self {
        CellSlice {
            cell,
            bit_pos: 0,
            ref_pos: 0,
        }
    }

    /// Payload bits not yet read.
    pub fn remaining_bits(&self) -> usize {
        self.cell.bit_len() - self.bit_pos
    }

    /// References not yet read.
    pub fn remaining_refs(&self) -> usize {
        self.cell.refs().len() - self.ref_pos
    }

    /// Read a single bit.
    pub fn load_bit(&mut self) -> Result<bool, CellError> {
        self.ensure_bits(1)?;
        Ok(self.take_bit())
    }

    /// Read an unsigned integer of the given width, most significant bit
    /// first.
    ///
    /// # Errors
    /// Fails if `bits` exceeds 64 or fewer than `bits` payload bits remain.
    pub fn load_uint(&mut self, bits: usize) -> Result<u64, CellError> {
        if bits > 64 {
            return Err(CellError::WidthTooLarge { bits });
        }
        self.ensure_bits(bits)?;
        let mut value = 0u64;
        for _ in 0..bits {
            value = (value << 1) | u64::from(self.take_bit());
        }
        Ok(value)
    }

    /// Read a 256-bit unsigned value as big-endian bytes.
    pub fn load_uint256(&mut self) -> Result<[u8; 32], CellError> {
        self.ensure_bits(256)?;
        let mut out = [0u8; 32];
        for byte in out.iter_mut() {
            for _ in 0..8 {
                *byte = (*byte << 1) | u8::from(self.take_bit());
            }
        }
        Ok(out)
    }

    /// Read `len` whole bytes.
    pub fn load_bytes(&mut self, len: usize) -> Result<Vec<u8>, CellError> {
        self.ensure_bits(len * 8)?;
        let mut out = Vec::with_capacity(len);
        for _ in 0..len {
            let mut byte = 0u8;
            for _ in 0..8 {
                byte = (byte << 1) | u8::from(self.take_bit());
            }
            out.push(byte);
        }
        Ok(out)
    }

    /// Read an address in the standard 267-bit encoding.
    ///
    /// # Errors
    /// Fails on any tag other than the standard one (empty, external and
    /// variable-length addresses are not part of this protocol) and on
    /// anycast routing data.
    pub fn load_address(&mut self) -> Result<Address, CellError> {
        let tag = self.load_uint(2)? as u8;
        if tag != 0b10 {
            return Err(CellError::UnsupportedAddressTag { tag });
        }
        if self.load_bit()? {
            return Err(CellError::UnsupportedAnycast);
        }
        let workchain = self.load_uint(8)? as u8 as i8;
        let hash = self.load_uint256()?;
        Ok(Address::new(workchain, hash))
    }

    /// Read the next child reference.
    pub fn load_ref(&mut self) -> Result<&'a Arc<Cell>, CellError> {
        let refs = self.cell.refs();
        if self.ref_pos >= refs.len() {
            return Err(CellError::RefUnderrun {
                index: self.ref_pos,
                available: refs.len(),
            });
        }
        let child = &refs[self.ref_pos];
        self.ref_pos += 1;
        Ok(child)
    }

    /// Require that every payload bit and reference has been read.
    ///
    /// Structures with a fixed schema call this after their last field, so
    /// trailing garbage is rejected instead of silently ignored.
    pub fn ensure_empty(&self) -> Result<(), CellError> {
        let bits = self.remaining_bits();
        let refs = self.remaining_refs();
        if bits != 0 || refs != 0 {
            return Err(CellError::TrailingData { bits, refs });
        }
        Ok(())
    }

    fn ensure_bits(&self, wanted: usize) -> Result<(), CellError> {
        let available = self.remaining_bits();
        if wanted > available {
            return Err(CellError::DataUnderrun { wanted, available });
        }
        Ok(())
    }

    fn take_bit(&mut self) -> bool {
        let bit = self.cell.data()[self.bit_pos / 8] & (0x80 >> (self.bit_pos % 8)) != 0;
        self.bit_pos += 1;
        bit
    }
}
