//! Sequential access to index entries.
//!
//! # Example
//! ```no_run
//! # use tagcache_sync::CatalogStore;
//! let store = CatalogStore::open("/mnt/player/.rockbox").unwrap();
//! for entry in store.entries() {
//!     let entry = entry.unwrap();
//!     println!("{:?}", entry.text(tagcache_sync::Field::Title));
//! }
//! ```

use super::store::CatalogStore;
use super::types::error::Result;
use super::types::models::{Entry, ENTRY_SIZE, HEADER_SIZE};

/// Cursor over the index, one 96-byte entry per step.
///
/// Bounds come from the index buffer's actual length, not the header's
/// declared count. A trailing partial entry yields an `OutOfBounds` error
/// rather than a partially decoded record.
///
/// Created by [`CatalogStore::entries()`](crate::CatalogStore::entries).
pub struct Entries<'a> {
    store: &'a CatalogStore,
    offset: usize,
}

impl<'a> Entries<'a> {
    pub(super) fn new(store: &'a CatalogStore) -> Self {
        Self {
            store,
            offset: HEADER_SIZE,
        }
    }

    /// Byte offset of the next entry to decode.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// True once the cursor has reached or passed the end of the index.
    pub fn at_end(&self) -> bool {
        self.offset >= self.store.index_store().len()
    }
}

impl<'a> Iterator for Entries<'a> {
    type Item = Result<Entry>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.at_end() {
            return None;
        }
        let entry = self.store.decode_entry(self.offset);
        self.offset += ENTRY_SIZE;
        Some(entry)
    }
}
