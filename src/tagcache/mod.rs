//! Core tagcache database module

pub mod commit;
pub mod format;
pub mod iter;
pub mod store;
pub mod types;

pub use commit::{CommitReport, StoreRole};
pub use store::{CatalogStore, INDEX_FILE_NAME};
pub use types::error::{CatalogError, Result};
