//! Checksum-gated persistence.
//!
//! Each store is compared against the fingerprint taken when it was loaded
//! and only changed files are rewritten. There is no cross-file
//! transaction; each flush succeeds or fails on its own.

use std::path::PathBuf;

use log::{debug, error, info};

use super::format::raw::RawStore;
use super::types::error::CatalogError;
use super::types::field::Field;

/// What a store holds, which decides whether it may be flushed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreRole {
    Index,
    StringTable(Field),
}

impl StoreRole {
    pub fn is_writable(self) -> bool {
        matches!(self, StoreRole::Index)
    }
}

/// Per-file outcome of a commit.
#[derive(Debug, Default)]
pub struct CommitReport {
    /// Files rewritten successfully.
    pub written: Vec<PathBuf>,
    /// Files that were dirty but could not be written.
    pub failed: Vec<(PathBuf, CatalogError)>,
}

impl CommitReport {
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Flushes every dirty store, refusing to write read-only ones.
pub fn commit<'a>(stores: impl IntoIterator<Item = (&'a RawStore, StoreRole)>) -> CommitReport {
    let mut report = CommitReport::default();

    for (store, role) in stores {
        if !store.is_dirty() {
            continue;
        }
        let path = store.path().to_path_buf();
        info!(
            "{} changed {} != {}",
            path.display(),
            store.original_fingerprint(),
            store.fingerprint()
        );

        if !role.is_writable() {
            error!("{:?} store {} was modified; not writing it", role, path.display());
            report
                .failed
                .push((path.clone(), CatalogError::ReadOnlyStoreModified { path }));
            continue;
        }

        match store.flush() {
            Ok(()) => report.written.push(path),
            Err(e) => {
                error!("Failed to write {}: {}", path.display(), e);
                report.failed.push((path, e));
            }
        }
    }

    debug!(
        "Commit finished: {} written, {} failed",
        report.written.len(),
        report.failed.len()
    );
    report
}
