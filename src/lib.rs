//! # tagcache-sync
//!
//! Reader/writer for the multi-file tagcache database kept by Rockbox-style
//! portable players, plus a fuzzy matcher that imports play counts from a
//! scrobble export.
//!
//! Only literal numeric fields of the index file are ever written; string
//! tables are read-only.
pub mod import;
pub mod ledger;
pub mod matching;
pub mod tagcache;

// Re-export the main types for convenience
pub use import::{import, ImportOptions, ImportReport};
pub use ledger::{Ledger, LedgerRecord, LedgerRow};
pub use matching::{canonicalize, normalize_title, Track};
pub use tagcache::{
    format::raw::{Fingerprint, RawStore},
    format::strings::StringTable,
    iter::Entries,
    types::field::{Field, FIELD_COUNT},
    types::models::{
        CatalogHeader, Entry, EntryUpdate, FieldChange, FieldValue, OpenOptions, ENTRY_SIZE,
        HEADER_SIZE,
    },
    CatalogError, CatalogStore, CommitReport, Result, StoreRole, INDEX_FILE_NAME,
};
