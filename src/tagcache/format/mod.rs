//! File format layer for tagcache databases.
//!
//! This module sits between raw file I/O and the high-level
//! [`CatalogStore`](crate::tagcache::store::CatalogStore).
//!
//! # Module Organization
//!
//! - [`raw`]: Whole-file byte buffers with bounds-checked LE access and fingerprints
//! - [`header`]: Parses and validates the 24-byte index header
//! - [`strings`]: Resolves string-table records for indirect fields
//!
//! # Architecture
//!
//! ```text
//! database_idx.tcd                    database_<n>.tcd
//! ┌─────────────────┐                ┌──────────────────────┐
//! │  Header (24 B)  │ ← header       │ len | seq | payload  │ ← strings
//! ├─────────────────┤                │ len | seq | payload  │
//! │  Entry (96 B)   │ ─ offset ────▶ │ ...                  │
//! │  Entry (96 B)   │                └──────────────────────┘
//! │  ...            │
//! └─────────────────┘
//! ```

pub mod header;
pub mod raw;
pub mod strings;
