//! Core data structures for tagcache database components.
//!
//! - The fixed index header
//! - Decoded entries and their field values
//! - Change-log records returned by mutating calls

use std::fmt;

use super::field::{Field, FIELD_COUNT};

/// Size of the index file header in bytes.
pub const HEADER_SIZE: usize = 24;

/// Size of one index entry in bytes.
pub const ENTRY_SIZE: usize = FIELD_COUNT * 4;

/// The 24-byte header at the start of `database_idx.tcd`.
///
/// Read once at open and never written back by this crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CatalogHeader {
    pub format_version: u32,
    pub declared_size: u32,
    pub entry_count: u32,
    pub serial: u32,
    pub commit_id: u32,
    pub dirty_flag: u32,
}

impl fmt::Display for CatalogHeader {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "Version: {}, Size: {}, Count: {}, Serial: {}, Commit: {}, Dirty: {}",
            self.format_version,
            self.declared_size,
            self.entry_count,
            self.serial,
            self.commit_id,
            self.dirty_flag
        )
    }
}

/// Semantic value of one entry slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    /// Resolved through the field's string table.
    Text(String),
    /// Stored literally in the index file.
    Number(u32),
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            FieldValue::Text(s) => f.write_str(s),
            FieldValue::Number(n) => write!(f, "{}", n),
        }
    }
}

/// A decoded view of one index entry.
///
/// Materialized on demand from the index buffer and never cached. The byte
/// offset is the entry's identity for later field updates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    offset: usize,
    raw: [u32; FIELD_COUNT],
    values: Vec<FieldValue>,
}

impl Entry {
    pub(crate) fn new(offset: usize, raw: [u32; FIELD_COUNT], values: Vec<FieldValue>) -> Self {
        debug_assert_eq!(values.len(), FIELD_COUNT);
        Self { offset, raw, values }
    }

    /// Byte offset of this entry inside the index file.
    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn get(&self, field: Field) -> &FieldValue {
        &self.values[field.position()]
    }

    /// The decoded text of an indirect field; `None` for literal fields.
    pub fn text(&self, field: Field) -> Option<&str> {
        match self.get(field) {
            FieldValue::Text(s) => Some(s),
            FieldValue::Number(_) => None,
        }
    }

    /// The value of a literal field; `None` for indirect fields.
    pub fn number(&self, field: Field) -> Option<u32> {
        match self.get(field) {
            FieldValue::Number(n) => Some(*n),
            FieldValue::Text(_) => None,
        }
    }

    /// The raw slot value, which is a table offset for indirect fields.
    pub fn raw(&self, field: Field) -> u32 {
        self.raw[field.position()]
    }

    /// Iterates `(field, value)` pairs in positional order.
    pub fn fields(&self) -> impl Iterator<Item = (Field, &FieldValue)> {
        Field::ALL.iter().copied().zip(self.values.iter())
    }
}

/// One 4-byte write applied to the index buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldChange {
    pub entry_offset: usize,
    pub field: Field,
    pub old: u32,
    pub new: u32,
}

impl fmt::Display for FieldChange {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "Update {} for index {}: {} -> {}",
            self.field, self.entry_offset, self.old, self.new
        )
    }
}

/// Requested modifications for [`CatalogStore::update_entry`](crate::CatalogStore::update_entry).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EntryUpdate {
    /// Overwrite PLAYCOUNT with this value.
    pub play_count: Option<u32>,
    /// Set PLAYTIME to PLAYCOUNT x LEN, using the play count already in the buffer.
    pub recompute_playtime: bool,
}

/// Knobs for opening a catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OpenOptions {
    /// Reject headers whose declared size or count cannot fit in the index file.
    pub validate_header: bool,
}

impl Default for OpenOptions {
    fn default() -> Self {
        Self { validate_header: true }
    }
}
