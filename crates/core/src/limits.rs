//! Protocol limits
//!
//! Hard structural limits of the cell data model. These values are part of
//! the wire format and MUST NOT change: every peer derives the same content
//! hashes only because every peer enforces the same bounds.

/// Maximum number of payload bits a single cell may carry.
pub const MAX_CELL_BITS: usize = 1023;

/// Maximum number of child references a single cell may carry.
pub const MAX_CELL_REFS: usize = 4;

/// Maximum depth of a cell tree (a leaf has depth 0).
///
/// Depth is stored as a 16-bit value in the canonical cell representation;
/// this bound keeps chained structures (e.g. long text chains) well inside
/// that encoding.
pub const MAX_CELL_DEPTH: u16 = 1024;

/// Maximum number of text bytes stored in one cell of a text chain.
///
/// Longer text continues in a child cell, forming a chain of single-child
/// cells read head to tail.
pub const MAX_TEXT_CHUNK_BYTES: usize = 127;
