//! Custom error types for the tagcache-sync crate.

use std::path::PathBuf;
use thiserror::Error;

use super::field::Field;

/// The primary error type for all operations in this crate.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// A database or ledger file could not be read or written.
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A read or write reached past the end of a store's buffer.
    #[error("Out of bounds: {len} bytes at offset {offset} exceed buffer of {size} bytes")]
    OutOfBounds { offset: usize, len: usize, size: usize },

    /// The index header disagrees with the file it describes.
    #[error("Malformed header: {0}")]
    MalformedHeader(String),

    /// A string-table payload is not valid UTF-8 text.
    #[error("Undecodable {field} string at table offset {offset:#x}")]
    Decode { field: Field, offset: u32 },

    /// A numeric accessor was asked to touch a string-table offset.
    #[error("Field {0} is stored in a string table and cannot be written")]
    IndirectField(Field),

    /// A string-table file changed in memory; only the index file may be flushed.
    #[error("Refusing to flush modified read-only store {}", path.display())]
    ReadOnlyStoreModified { path: PathBuf },

    /// The ledger input is structurally unusable (e.g. a required column is missing).
    #[error("Invalid ledger: {0}")]
    Ledger(String),

    /// The delimited ledger text could not be parsed.
    #[error("Ledger parse error: {0}")]
    Csv(#[from] csv::Error),
}

impl CatalogError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        CatalogError::Io { path: path.into(), source }
    }
}

/// A convenience `Result` type alias using the crate's `CatalogError` type.
pub type Result<T> = std::result::Result<T, CatalogError>;
