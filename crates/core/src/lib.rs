//! Core types for Tonwork
//!
//! This crate defines the foundational types shared by the cell codec and
//! the job-board protocol:
//! - Address: workchain + 256-bit account hash, with friendly/raw text forms
//! - Protocol limits: MAX_CELL_BITS, MAX_CELL_REFS, MAX_CELL_DEPTH,
//!   MAX_TEXT_CHUNK_BYTES

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod address;
pub mod limits;

pub use address::{Address, AddressParseError};
pub use limits::{MAX_CELL_BITS, MAX_CELL_DEPTH, MAX_CELL_REFS, MAX_TEXT_CHUNK_BYTES};
