use std::path::{Path, PathBuf};

use byteorder::{ByteOrder, LittleEndian};
use log::{debug, info};

use crate::matching::Track;

use super::commit::{self, CommitReport, StoreRole};
use super::format::{header, raw::RawStore, strings::StringTable};
use super::iter::Entries;
use super::types::error::{CatalogError, Result};
use super::types::field::{Field, FIELD_COUNT};
use super::types::models::*;

/// File name of the master index inside a database directory.
pub const INDEX_FILE_NAME: &str = "database_idx.tcd";

/// An open tagcache database: the index file plus one string table per
/// indirect field.
///
/// Only the index buffer is ever mutated, and only through the numeric
/// field accessors on this type.
#[derive(Debug)]
pub struct CatalogStore {
    root: PathBuf,
    pub header: CatalogHeader,
    index: RawStore,
    tables: Vec<StringTable>,
}

impl CatalogStore {
    /// Opens the database in `root` with default [`OpenOptions`].
    ///
    /// # Errors
    /// Returns an error if:
    /// - The index or any string-table file is missing or unreadable
    /// - The header is shorter than 24 bytes or inconsistent with the file length
    pub fn open(root: impl AsRef<Path>) -> Result<Self> {
        Self::open_with(root, OpenOptions::default())
    }

    pub fn open_with(root: impl AsRef<Path>, options: OpenOptions) -> Result<Self> {
        let root = root.as_ref();
        info!("Opening tagcache database: {}", root.display());

        let index = RawStore::load(root.join(INDEX_FILE_NAME))?;
        let header = header::parse(index.as_bytes())?;
        if options.validate_header {
            header::validate(&header, index.len())?;
        }

        let tables = Field::INDIRECT
            .iter()
            .filter_map(|&field| field.table_file_name().map(|name| (field, name)))
            .map(|(field, name)| Ok(StringTable::new(field, RawStore::load(root.join(name))?)))
            .collect::<Result<Vec<_>>>()?;

        info!(
            "Database opened: {} entries declared, {} index bytes, {} string tables",
            header.entry_count,
            index.len(),
            tables.len()
        );

        Ok(Self {
            root: root.to_path_buf(),
            header,
            index,
            tables,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn index_path(&self) -> &Path {
        self.index.path()
    }

    /// Read-only access to the index buffer.
    pub fn index_store(&self) -> &RawStore {
        &self.index
    }

    /// The header's declared entry count. Iteration does not rely on it.
    pub fn entry_count(&self) -> u32 {
        self.header.entry_count
    }

    fn table(&self, field: Field) -> Option<&StringTable> {
        self.tables.iter().find(|t| t.field() == field)
    }

    fn field_offset(&self, entry_offset: usize, field: Field) -> Result<usize> {
        entry_offset
            .checked_add(field.position() * 4)
            .ok_or(CatalogError::OutOfBounds {
                offset: entry_offset,
                len: ENTRY_SIZE,
                size: self.index.len(),
            })
    }

    /// Decodes the 96-byte entry starting at `entry_offset`.
    ///
    /// Indirect slots are resolved through their string tables.
    ///
    /// # Errors
    /// [`CatalogError::OutOfBounds`] if a full entry is not available, plus
    /// any string-table resolution error.
    pub fn decode_entry(&self, entry_offset: usize) -> Result<Entry> {
        let bytes = self.index.slice(entry_offset, ENTRY_SIZE)?;

        let mut raw = [0u32; FIELD_COUNT];
        LittleEndian::read_u32_into(bytes, &mut raw);

        let values = Field::ALL
            .iter()
            .map(|&field| {
                let value = raw[field.position()];
                match self.table(field) {
                    Some(table) => table.resolve(value).map(FieldValue::Text),
                    None => Ok(FieldValue::Number(value)),
                }
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Entry::new(entry_offset, raw, values))
    }

    /// Reads the raw slot of `field` in the entry at `entry_offset`.
    ///
    /// For indirect fields this is the string-table offset, not the text.
    pub fn get_numeric_field(&self, entry_offset: usize, field: Field) -> Result<u32> {
        self.index.read_u32_le(self.field_offset(entry_offset, field)?)
    }

    /// Overwrites the literal value of `field` in the entry at `entry_offset`.
    ///
    /// # Errors
    /// - [`CatalogError::IndirectField`] for string-table backed fields
    /// - [`CatalogError::OutOfBounds`] if the slot lies outside the index, or
    ///   `entry_offset` points into the header
    pub fn update_numeric_field(
        &mut self,
        entry_offset: usize,
        field: Field,
        new_value: u32,
    ) -> Result<FieldChange> {
        if field.is_indirect() {
            return Err(CatalogError::IndirectField(field));
        }
        if entry_offset < HEADER_SIZE {
            return Err(CatalogError::OutOfBounds {
                offset: entry_offset,
                len: ENTRY_SIZE,
                size: self.index.len(),
            });
        }
        let offset = self.field_offset(entry_offset, field)?;
        let old = self.index.read_u32_le(offset)?;
        self.index.write_u32_le(offset, new_value)?;

        let change = FieldChange {
            entry_offset,
            field,
            old,
            new: new_value,
        };
        debug!("{}", change);
        Ok(change)
    }

    /// Applies PLAYCOUNT / PLAYTIME updates to one entry.
    ///
    /// A new play count is written first; PLAYTIME is then derived from the
    /// play count currently in the buffer. Returns the applied changes in order.
    pub fn update_entry(&mut self, entry_offset: usize, update: EntryUpdate) -> Result<Vec<FieldChange>> {
        let mut changes = Vec::with_capacity(2);

        if let Some(play_count) = update.play_count {
            changes.push(self.update_numeric_field(entry_offset, Field::PlayCount, play_count)?);
        }

        if update.recompute_playtime {
            let play_count = self.get_numeric_field(entry_offset, Field::PlayCount)?;
            let len = self.get_numeric_field(entry_offset, Field::Len)?;
            let play_time = play_count.saturating_mul(len);
            changes.push(self.update_numeric_field(entry_offset, Field::PlayTime, play_time)?);
        }

        Ok(changes)
    }

    /// Byte offsets of every entry slot, from just after the header to the
    /// end of the index buffer.
    pub fn entry_offsets(&self) -> impl Iterator<Item = usize> {
        (HEADER_SIZE..self.index.len()).step_by(ENTRY_SIZE)
    }

    /// Sequential cursor over all entries.
    pub fn entries(&self) -> Entries<'_> {
        Entries::new(self)
    }

    /// Decodes every entry.
    pub fn list(&self) -> Result<Vec<Entry>> {
        self.entries().collect()
    }

    /// Tracks whose match key contains `query` (case-insensitive).
    pub fn find(&self, query: &str) -> Result<Vec<Track>> {
        let needle = query.to_lowercase();
        let mut found = Vec::new();
        for entry in self.entries() {
            let track = Track::from_entry(&entry?);
            if track.key().contains(&needle) {
                found.push(track);
            }
        }
        Ok(found)
    }

    /// Flushes every store whose content differs from what was loaded.
    pub fn commit(&self) -> CommitReport {
        let stores = std::iter::once((&self.index, StoreRole::Index)).chain(
            self.tables
                .iter()
                .map(|t| (t.store(), StoreRole::StringTable(t.field()))),
        );
        commit::commit(stores)
    }

    /// True if any store would be written by [`commit`](Self::commit).
    pub fn is_dirty(&self) -> bool {
        self.index.is_dirty() || self.tables.iter().any(|t| t.store().is_dirty())
    }
}
