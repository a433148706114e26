//! Cell tree codec for Tonwork
//!
//! Everything on the ledger is a tree of cells: bounded bit-string payloads
//! with up to four ordered references. This crate implements the codec
//! triangle the rest of the system stands on:
//! - Cell / CellBuilder / CellSlice: build and read cells field by field
//! - repr_hash: the canonical content hash that doubles as an account
//!   address
//! - serialize_boc / parse_boc: the bag-of-cells byte-stream transport
//! - encode_text / decode_text: chunked text chains embedded in cells

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod boc;
pub mod builder;
pub mod cell;
pub mod error;
pub mod slice;
pub mod text;

pub use boc::{parse_boc, serialize_boc, BOC_MAGIC};
pub use builder::CellBuilder;
pub use cell::Cell;
pub use error::{BocError, CellBuildError, CellError, TextError};
pub use slice::CellSlice;
pub use text::{decode_text, encode_text};
