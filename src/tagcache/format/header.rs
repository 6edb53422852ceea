//! Index file header parsing and validation.

use std::io::Cursor;

use byteorder::{LittleEndian, ReadBytesExt};
use log::{trace, warn};

use crate::tagcache::types::error::{CatalogError, Result};
use crate::tagcache::types::models::{CatalogHeader, ENTRY_SIZE, HEADER_SIZE};

/// Parses the header from the start of the index file.
///
/// # Header Structure
/// ```text
/// [0..4]   format_version
/// [4..8]   declared_size
/// [8..12]  entry_count
/// [12..16] serial
/// [16..20] commit_id
/// [20..24] dirty_flag
/// ```
/// All fields are little-endian `u32`.
pub fn parse(index: &[u8]) -> Result<CatalogHeader> {
    if index.len() < HEADER_SIZE {
        return Err(CatalogError::MalformedHeader(format!(
            "index file is {} bytes, shorter than the {}-byte header",
            index.len(),
            HEADER_SIZE
        )));
    }

    let mut cursor = Cursor::new(&index[..HEADER_SIZE]);
    let mut next = || {
        cursor
            .read_u32::<LittleEndian>()
            .map_err(|e| CatalogError::MalformedHeader(e.to_string()))
    };
    let header = CatalogHeader {
        format_version: next()?,
        declared_size: next()?,
        entry_count: next()?,
        serial: next()?,
        commit_id: next()?,
        dirty_flag: next()?,
    };
    trace!("Index header: {:?}", header);
    Ok(header)
}

/// Checks the header against the actual index length.
///
/// The declared size may or may not include the header itself depending on
/// the writer, so it is only required to fit within the file. The entry
/// count must fit within the bytes that follow the header.
pub fn validate(header: &CatalogHeader, actual_len: usize) -> Result<()> {
    let declared = header.declared_size as usize;
    if declared > actual_len {
        return Err(CatalogError::MalformedHeader(format!(
            "declared size {} exceeds index file length {}",
            declared, actual_len
        )));
    }

    let body = actual_len.saturating_sub(HEADER_SIZE);
    let needed = (header.entry_count as usize).checked_mul(ENTRY_SIZE);
    match needed {
        Some(needed) if needed <= body => {}
        _ => {
            return Err(CatalogError::MalformedHeader(format!(
                "{} entries need {} bytes, index has {}",
                header.entry_count,
                needed.map_or_else(|| "overflowing".to_string(), |n| n.to_string()),
                body
            )));
        }
    }

    if body % ENTRY_SIZE != 0 {
        warn!(
            "Index body of {} bytes is not a multiple of {}; the last entry is truncated",
            body, ENTRY_SIZE
        );
    }
    Ok(())
}
