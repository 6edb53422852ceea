//! In-memory image of one database file.
//!
//! A [`RawStore`] owns the complete contents of a single `.tcd` file and
//! remembers an MD5 fingerprint of what was on disk at load time. Dirty
//! detection compares against that fingerprint, so writing a value that is
//! already present does not make the store dirty.

use std::fmt;
use std::fs;
use std::ops::Range;
use std::path::{Path, PathBuf};

use byteorder::{ByteOrder, LittleEndian};
use log::{debug, trace};

use crate::tagcache::types::error::{CatalogError, Result};

/// 128-bit content digest of a store's bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Fingerprint([u8; 16]);

impl Fingerprint {
    pub fn of(bytes: &[u8]) -> Self {
        Fingerprint(md5::compute(bytes).0)
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for b in &self.0 {
            write!(f, "{:02x}", b)?;
        }
        Ok(())
    }
}

/// The byte buffer of one physical file plus its load-time fingerprint.
#[derive(Debug)]
pub struct RawStore {
    path: PathBuf,
    bytes: Vec<u8>,
    original_fingerprint: Fingerprint,
}

impl RawStore {
    /// Reads the whole file into memory.
    ///
    /// # Errors
    /// Returns [`CatalogError::Io`] if the file is missing or unreadable.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let bytes = fs::read(path).map_err(|e| CatalogError::io(path, e))?;
        let original_fingerprint = Fingerprint::of(&bytes);
        debug!("Loaded {} ({} bytes, md5 {})", path.display(), bytes.len(), original_fingerprint);
        Ok(Self::from_parts(path.to_path_buf(), bytes, original_fingerprint))
    }

    fn from_parts(path: PathBuf, bytes: Vec<u8>, original_fingerprint: Fingerprint) -> Self {
        Self {
            path,
            bytes,
            original_fingerprint,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// The full current buffer.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Validates `[offset, offset + len)` against the buffer.
    fn range(&self, offset: usize, len: usize) -> Result<Range<usize>> {
        let out_of_bounds = || CatalogError::OutOfBounds {
            offset,
            len,
            size: self.bytes.len(),
        };
        let end = offset.checked_add(len).ok_or_else(out_of_bounds)?;
        if end > self.bytes.len() {
            return Err(out_of_bounds());
        }
        Ok(offset..end)
    }

    /// Reads the little-endian `u32` at `offset`.
    pub fn read_u32_le(&self, offset: usize) -> Result<u32> {
        let range = self.range(offset, 4)?;
        Ok(LittleEndian::read_u32(&self.bytes[range]))
    }

    /// Overwrites the 4 bytes at `offset`. The buffer never grows.
    pub(crate) fn write_u32_le(&mut self, offset: usize, value: u32) -> Result<()> {
        let range = self.range(offset, 4)?;
        trace!("{}: write {:#010x} at {:#x}", self.path.display(), value, offset);
        LittleEndian::write_u32(&mut self.bytes[range], value);
        Ok(())
    }

    /// Read-only view of `len` bytes at `offset`.
    pub fn slice(&self, offset: usize, len: usize) -> Result<&[u8]> {
        let range = self.range(offset, len)?;
        Ok(&self.bytes[range])
    }

    pub fn original_fingerprint(&self) -> Fingerprint {
        self.original_fingerprint
    }

    /// Digest of the current buffer contents.
    pub fn fingerprint(&self) -> Fingerprint {
        Fingerprint::of(&self.bytes)
    }

    /// True iff the buffer no longer hashes to the load-time fingerprint.
    pub fn is_dirty(&self) -> bool {
        self.fingerprint() != self.original_fingerprint
    }

    /// Overwrites the backing file with the current buffer.
    pub(crate) fn flush(&self) -> Result<()> {
        debug!("Writing {} ({} bytes)", self.path.display(), self.bytes.len());
        fs::write(&self.path, &self.bytes).map_err(|e| CatalogError::io(&self.path, e))
    }
}

#[cfg(test)]
impl RawStore {
    pub(crate) fn from_bytes(path: impl Into<PathBuf>, bytes: Vec<u8>) -> Self {
        let fingerprint = Fingerprint::of(&bytes);
        Self::from_parts(path.into(), bytes, fingerprint)
    }
}
