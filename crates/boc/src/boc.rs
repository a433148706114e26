//! Bag-of-cells transport codec
//!
//! A bag of cells is the byte-stream form of a cell tree. Serialization
//! emits the canonical form: cells in topological order with structural
//! deduplication, no index table, no checksum. Parsing is liberal and
//! accepts any well-formed single-root stream, including ones carrying an
//! index table and a CRC-32C trailer (verified when present).
//!
//! # Stream Structure
//!
//! ```text
//! +------------------+
//! | Magic            | 4 bytes: 0xB5EE9C72
//! +------------------+
//! | Flags/size byte  | index? crc? cache? (2 reserved bits) size_bytes
//! +------------------+
//! | off_bytes        | 1 byte: width of offset/size fields
//! +------------------+
//! | cells            | size_bytes: number of cells
//! | roots            | size_bytes: number of roots (must be 1)
//! | absent           | size_bytes: must be 0
//! | tot_cells_size   | off_bytes: total size of the cell records
//! +------------------+
//! | Root index list  | roots x size_bytes
//! +------------------+
//! | Index table      | cells x off_bytes (optional, skipped)
//! +------------------+
//! | Cell records     | d1, d2, augmented data, ref indices
//! +------------------+
//! | CRC-32C          | 4 bytes little-endian (optional, verified)
//! +------------------+
//! ```
//!
//! Every reference points to a strictly larger cell index, so the root is
//! cell 0 and the stream is cycle-free by construction. All multi-byte
//! header fields are big-endian; the checksum is little-endian.

use std::collections::{HashMap, HashSet};
use std::io::{Cursor, Read};
use std::sync::Arc;

use byteorder::{BigEndian, LittleEndian, ReadBytesExt};
use once_cell::sync::Lazy;
use tonwork_core::MAX_CELL_REFS;

use crate::cell::Cell;
use crate::error::BocError;

/// Magic prefix of every bag-of-cells stream.
pub const BOC_MAGIC: u32 = 0xB5EE_9C72;

const FLAG_HAS_INDEX: u8 = 0x80;
const FLAG_HAS_CRC: u8 = 0x40;
const FLAG_HAS_CACHE_BITS: u8 = 0x20;
const FLAG_RESERVED: u8 = 0x18;
const FLAG_SIZE_MASK: u8 = 0x07;

/// Serialize a cell tree into the canonical bag-of-cells form.
///
/// Shared subtrees are emitted once: cells are deduplicated by
/// representation hash and ordered so every reference points forward.
/// The output is deterministic, so equal trees always serialize to equal
/// bytes.
pub fn serialize_boc(root: &Arc<Cell>) -> Vec<u8> {
    let cells = ordered_cells(root);
    let mut index: HashMap<[u8; 32], usize> = HashMap::with_capacity(cells.len());
    for (i, cell) in cells.iter().enumerate() {
        index.insert(cell.repr_hash(), i);
    }

    let size_bytes = width_for(cells.len() as u64);
    let mut records: Vec<Vec<u8>> = Vec::with_capacity(cells.len());
    let mut tot_cells_size = 0usize;
    for cell in &cells {
        let record = serialize_cell(cell, &index, size_bytes);
        tot_cells_size += record.len();
        records.push(record);
    }
    let off_bytes = width_for(tot_cells_size as u64);

    let mut out = Vec::with_capacity(16 + tot_cells_size);
    out.extend_from_slice(&BOC_MAGIC.to_be_bytes());
    // Canonical form: no index, no checksum, reserved bits zero.
    out.push(size_bytes);
    out.push(off_bytes);
    push_uint(&mut out, cells.len() as u64, size_bytes);
    push_uint(&mut out, 1, size_bytes);
    push_uint(&mut out, 0, size_bytes);
    push_uint(&mut out, tot_cells_size as u64, off_bytes);
    push_uint(&mut out, 0, size_bytes);
    for record in &records {
        out.extend_from_slice(record);
    }
    out
}

/// Parse a bag-of-cells stream into its single root cell.
///
/// # Errors
/// Fails on structural violations: bad magic, truncation, root count other
/// than one, absent cells, reference indices that do not point strictly
/// forward, unsupported cell descriptors, size or checksum mismatches, and
/// trailing bytes.
pub fn parse_boc(bytes: &[u8]) -> Result<Arc<Cell>, BocError> {
    let mut cursor = Cursor::new(bytes);

    let magic = read_u32_be(&mut cursor)?;
    if magic != BOC_MAGIC {
        return Err(BocError::InvalidMagic {
            expected: BOC_MAGIC,
            actual: magic,
        });
    }

    let flags = read_u8(&mut cursor)?;
    let has_index = flags & FLAG_HAS_INDEX != 0;
    let has_crc = flags & FLAG_HAS_CRC != 0;
    if flags & FLAG_RESERVED != 0 {
        return Err(BocError::ReservedFlags { flags });
    }
    if flags & FLAG_HAS_CACHE_BITS != 0 && !has_index {
        // Cache bits annotate index entries; without an index they are
        // meaningless.
        return Err(BocError::ReservedFlags { flags });
    }
    let size_bytes = flags & FLAG_SIZE_MASK;
    if size_bytes == 0 || size_bytes > 4 {
        return Err(BocError::UnsupportedWidth { width: size_bytes });
    }
    let off_bytes = read_u8(&mut cursor)?;
    if off_bytes == 0 || off_bytes > 8 {
        return Err(BocError::UnsupportedWidth { width: off_bytes });
    }

    let cell_count = read_uint(&mut cursor, size_bytes)? as usize;
    let root_count = read_uint(&mut cursor, size_bytes)? as usize;
    let absent_count = read_uint(&mut cursor, size_bytes)? as usize;
    let tot_cells_size = read_uint(&mut cursor, off_bytes)? as usize;
    if root_count != 1 {
        return Err(BocError::RootCountNotOne { roots: root_count });
    }
    if absent_count != 0 {
        return Err(BocError::AbsentCells {
            count: absent_count,
        });
    }
    let root_index = read_uint(&mut cursor, size_bytes)? as usize;
    if root_index >= cell_count {
        return Err(BocError::RootOutOfRange {
            index: root_index,
            cells: cell_count,
        });
    }

    if has_index {
        // Offsets are redundant when reading sequentially.
        let index_len = cell_count.saturating_mul(off_bytes as usize);
        let remaining = bytes.len().saturating_sub(cursor.position() as usize);
        if index_len > remaining {
            return Err(BocError::UnexpectedEof {
                offset: bytes.len(),
            });
        }
        cursor.set_position(cursor.position() + index_len as u64);
    }

    // Pass 1: raw records, with reference ordering enforced.
    let cells_start = cursor.position() as usize;
    let mut raw_cells: Vec<RawCell> = Vec::new();
    for i in 0..cell_count {
        let d1 = read_u8(&mut cursor)?;
        if d1 & 0xF8 != 0 {
            // Exotic bit, embedded-hashes bit, or a nonzero level.
            return Err(BocError::UnsupportedCell { cell: i, d1 });
        }
        let refs_count = (d1 & 0x07) as usize;
        if refs_count > MAX_CELL_REFS {
            return Err(BocError::TooManyRefs {
                cell: i,
                refs: refs_count,
                max: MAX_CELL_REFS,
            });
        }
        let d2 = read_u8(&mut cursor)?;
        let data_len = ((d2 >> 1) + (d2 & 1)) as usize;
        let mut data = vec![0u8; data_len];
        read_exact(&mut cursor, &mut data)?;
        let mut refs = Vec::with_capacity(refs_count);
        for _ in 0..refs_count {
            let reference = read_uint(&mut cursor, size_bytes)? as usize;
            if reference >= cell_count {
                return Err(BocError::ReferenceOutOfRange {
                    cell: i,
                    reference,
                    cells: cell_count,
                });
            }
            if reference <= i {
                return Err(BocError::BackwardReference { cell: i, reference });
            }
            refs.push(reference);
        }
        raw_cells.push(RawCell {
            data,
            partial: d2 & 1 == 1,
            refs,
        });
    }
    let actual = cursor.position() as usize - cells_start;
    if actual != tot_cells_size {
        return Err(BocError::CellDataSizeMismatch {
            declared: tot_cells_size,
            actual,
        });
    }

    if has_crc {
        let covered = cursor.position() as usize;
        let stored = read_u32_le(&mut cursor)?;
        let computed = crc32c(&bytes[..covered]);
        if stored != computed {
            return Err(BocError::ChecksumMismatch { computed, stored });
        }
    }
    let trailing = bytes.len() - cursor.position() as usize;
    if trailing != 0 {
        return Err(BocError::TrailingBytes { trailing });
    }

    // Pass 2: build bottom-up. References point forward, so walking the
    // table backwards has every child ready when its parent is built.
    let mut built_rev: Vec<Arc<Cell>> = Vec::with_capacity(cell_count);
    for i in (0..cell_count).rev() {
        let bit_len = {
            let raw = &raw_cells[i];
            if raw.partial {
                partial_bit_len(&raw.data).ok_or(BocError::MissingCompletionTag { cell: i })?
            } else {
                raw.data.len() * 8
            }
        };
        let refs: Vec<Arc<Cell>> = raw_cells[i]
            .refs
            .iter()
            .map(|&r| built_rev[cell_count - 1 - r].clone())
            .collect();
        let data = std::mem::take(&mut raw_cells[i].data);
        built_rev.push(Arc::new(Cell::from_raw_parts(data, bit_len, refs)?));
    }
    built_rev.reverse();
    Ok(built_rev[root_index].clone())
}

/// One wire record before cell reconstruction.
struct RawCell {
    data: Vec<u8>,
    partial: bool,
    refs: Vec<usize>,
}

/// Cells in serialization order: root first, every reference pointing to a
/// strictly larger index, shared subtrees included once.
fn ordered_cells(root: &Arc<Cell>) -> Vec<Arc<Cell>> {
    let mut order: Vec<Arc<Cell>> = Vec::new();
    let mut seen: HashSet<[u8; 32]> = HashSet::new();
    let mut stack: Vec<(Arc<Cell>, usize)> = vec![(root.clone(), 0)];
    // Post-order walk puts children before parents; reversing the result
    // puts every parent before everything it references.
    while let Some((cell, child)) = stack.pop() {
        if child < cell.refs().len() {
            let next = cell.refs()[child].clone();
            stack.push((cell, child + 1));
            if !seen.contains(&next.repr_hash()) {
                stack.push((next, 0));
            }
        } else {
            seen.insert(cell.repr_hash());
            order.push(cell);
        }
    }
    order.reverse();
    order
}

fn serialize_cell(cell: &Cell, index: &HashMap<[u8; 32], usize>, size_bytes: u8) -> Vec<u8> {
    let mut out = vec![cell.d1(), cell.d2()];
    out.extend_from_slice(&cell.augmented_data());
    for child in cell.refs() {
        push_uint(&mut out, index[&child.repr_hash()] as u64, size_bytes);
    }
    out
}

/// Bit length of an augmented payload: everything before the completion
/// tag in the last byte. `None` when the last byte carries no tag.
fn partial_bit_len(data: &[u8]) -> Option<usize> {
    let last = *data.last()?;
    if last == 0 {
        return None;
    }
    Some(data.len() * 8 - 1 - last.trailing_zeros() as usize)
}

/// Smallest big-endian byte width that holds `value`, at least one.
fn width_for(value: u64) -> u8 {
    let mut width = 1u8;
    while width < 8 && value >= 1u64 << (8 * u32::from(width)) {
        width += 1;
    }
    width
}

fn push_uint(out: &mut Vec<u8>, value: u64, width: u8) {
    out.extend_from_slice(&value.to_be_bytes()[8 - width as usize..]);
}

fn read_u8(cursor: &mut Cursor<&[u8]>) -> Result<u8, BocError> {
    let offset = cursor.position() as usize;
    cursor
        .read_u8()
        .map_err(|_| BocError::UnexpectedEof { offset })
}

fn read_u32_be(cursor: &mut Cursor<&[u8]>) -> Result<u32, BocError> {
    let offset = cursor.position() as usize;
    cursor
        .read_u32::<BigEndian>()
        .map_err(|_| BocError::UnexpectedEof { offset })
}

fn read_u32_le(cursor: &mut Cursor<&[u8]>) -> Result<u32, BocError> {
    let offset = cursor.position() as usize;
    cursor
        .read_u32::<LittleEndian>()
        .map_err(|_| BocError::UnexpectedEof { offset })
}

fn read_uint(cursor: &mut Cursor<&[u8]>, width: u8) -> Result<u64, BocError> {
    let offset = cursor.position() as usize;
    cursor
        .read_uint::<BigEndian>(width as usize)
        .map_err(|_| BocError::UnexpectedEof { offset })
}

fn read_exact(cursor: &mut Cursor<&[u8]>, buf: &mut [u8]) -> Result<(), BocError> {
    let offset = cursor.position() as usize;
    cursor
        .read_exact(buf)
        .map_err(|_| BocError::UnexpectedEof { offset })
}

static CRC32C_TABLE: Lazy<[u32; 256]> = Lazy::new(|| {
    let mut table = [0u32; 256];
    for (i, entry) in table.iter_mut().enumerate() {
        let mut crc = i as u32;
        for _ in 0..8 {
            crc = if crc & 1 != 0 {
                (crc >> 1) ^ 0x82F6_3B78
            } else {
                crc >> 1
            };
        }
        *entry = crc;
    }
    table
});

/// CRC-32C (Castagnoli), the checksum variant carried by checksummed
/// streams.
fn crc32c(data: &[u8]) -> u32 {
    let mut crc = 0xFFFF_FFFFu32;
    for &byte in data {
        let index = ((crc ^ u32::from(byte)) & 0xFF) as usize;
        crc = (crc >> 8) ^ CRC32C_TABLE[index];
    }
    !crc
}
