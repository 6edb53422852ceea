//! String-table files.
//!
//! # Record Structure
//! ```text
//! [4 bytes] payload length (little-endian u32)
//! [4 bytes] sequence id    (little-endian u32, not used here)
//! [N bytes] payload, UTF-8, optionally zero-terminated before N
//! ```
//!
//! Records sit at arbitrary offsets; index entries address them directly.

use encoding_rs::UTF_8;
use log::trace;

use super::raw::RawStore;
use crate::tagcache::types::error::{CatalogError, Result};
use crate::tagcache::types::field::Field;

const RECORD_PREFIX: usize = 8;

/// Read-only view over one indirect field's string file.
#[derive(Debug)]
pub struct StringTable {
    field: Field,
    store: RawStore,
}

impl StringTable {
    pub fn new(field: Field, store: RawStore) -> Self {
        Self { field, store }
    }

    pub fn field(&self) -> Field {
        self.field
    }

    /// The backing store. String tables are never written.
    pub fn store(&self) -> &RawStore {
        &self.store
    }

    /// Decodes the record at `offset`.
    ///
    /// # Errors
    /// - [`CatalogError::OutOfBounds`] if the prefix or payload run past the file
    /// - [`CatalogError::Decode`] if the payload is not UTF-8
    pub fn resolve(&self, offset: u32) -> Result<String> {
        let start = offset as usize;
        let len = self.store.read_u32_le(start)? as usize;
        let payload_start = start
            .checked_add(RECORD_PREFIX)
            .ok_or(CatalogError::OutOfBounds {
                offset: start,
                len: RECORD_PREFIX,
                size: self.store.len(),
            })?;
        let payload = self.store.slice(payload_start, len)?;

        let text = match payload.iter().position(|&b| b == 0) {
            Some(nul) => &payload[..nul],
            None => payload,
        };
        trace!("{} @ {:#x}: {} of {} payload bytes", self.field, offset, text.len(), len);

        UTF_8
            .decode_without_bom_handling_and_without_replacement(text)
            .map(|s| s.into_owned())
            .ok_or(CatalogError::Decode {
                field: self.field,
                offset,
            })
    }
}
