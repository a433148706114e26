//! Contract code loading
//!
//! Job contract code ships as a compiled blob in bag-of-cells form.
//! Derivation only needs the cell tree, so loading is deserialization
//! plus nothing; no virtual machine is involved.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use thiserror::Error;
use tonwork_boc::{parse_boc, BocError, Cell};

/// Why a code blob could not be loaded.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CodeError {
    /// The file could not be read.
    #[error("failed to read code file {}: {detail}", path.display())]
    Io {
        /// Path that failed.
        path: PathBuf,
        /// Operating system error text.
        detail: String,
    },

    /// The bytes were not a well-formed bag of cells.
    #[error("invalid code blob: {0}")]
    Boc(#[from] BocError),
}

/// Deserializes a code cell from an in-memory blob.
pub fn code_from_bytes(bytes: &[u8]) -> Result<Arc<Cell>, CodeError> {
    Ok(parse_boc(bytes)?)
}

/// Reads and deserializes a code cell from a file.
pub fn load_code_cell(path: &Path) -> Result<Arc<Cell>, CodeError> {
    let bytes = std::fs::read(path).map_err(|e| CodeError::Io {
        path: path.to_path_buf(),
        detail: e.to_string(),
    })?;
    code_from_bytes(&bytes)
}
