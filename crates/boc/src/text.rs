//! Embedded text chains
//!
//! Text longer than one cell's payload is stored as a chain: each cell
//! carries up to 127 whole bytes and at most one reference to the next
//! chunk. Decoding walks the chain, concatenates the bytes, and validates
//! UTF-8 over the whole result, so multi-byte characters may split across
//! chunk boundaries.

use std::sync::Arc;

use tonwork_core::MAX_TEXT_CHUNK_BYTES;

use crate::builder::CellBuilder;
use crate::cell::Cell;
use crate::error::{CellBuildError, TextError};

/// Encode text into a chunked cell chain.
///
/// Empty text encodes as the empty cell.
///
/// # Errors
/// Fails only when the chain would exceed the cell-tree depth limit, which
/// bounds the text at roughly 130 KiB.
pub fn encode_text(text: &str) -> Result<Arc<Cell>, CellBuildError> {
    let mut tail: Option<Arc<Cell>> = None;
    // Build tail first so each chunk can reference its continuation.
    for chunk in text.as_bytes().chunks(MAX_TEXT_CHUNK_BYTES).rev() {
        let mut builder = CellBuilder::new();
        builder.store_bytes(chunk)?;
        if let Some(next) = tail.take() {
            builder.store_ref(next)?;
        }
        tail = Some(Arc::new(builder.build()));
    }
    Ok(tail.unwrap_or_else(Cell::empty))
}

/// Decode a chunked text chain back into a string.
///
/// # Errors
/// Fails if any chunk is not byte-aligned, if any chunk has more than one
/// reference, or if the concatenated bytes are not valid UTF-8.
pub fn decode_text(cell: &Cell) -> Result<String, TextError> {
    let mut bytes = Vec::new();
    let mut current = cell;
    loop {
        if current.bit_len() % 8 != 0 {
            return Err(TextError::NotByteAligned {
                bits: current.bit_len(),
            });
        }
        bytes.extend_from_slice(current.data());
        match current.refs() {
            [] => break,
            [next] => current = next.as_ref(),
            refs => {
                return Err(TextError::Branching { refs: refs.len() });
            }
        }
    }
    String::from_utf8(bytes).map_err(|e| TextError::InvalidUtf8 {
        valid_up_to: e.utf8_error().valid_up_to(),
    })
}
