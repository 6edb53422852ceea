//! Merging ledger play counts into the catalog.
//!
//! For each catalog entry:
//! 1. Build its [`Track`] and look it up in the [`Ledger`].
//! 2. Unmatched entries are counted as missing and left untouched.
//! 3. A ledger count larger than PLAYCOUNT replaces it. PLAYCOUNT never decreases.
//! 4. If the resulting PLAYCOUNT is non-zero and PLAYTIME is zero,
//!    PLAYTIME is recomputed as PLAYCOUNT x LEN.

use log::{debug, info};

use crate::ledger::Ledger;
use crate::matching::Track;
use crate::tagcache::types::error::Result;
use crate::tagcache::types::field::Field;
use crate::tagcache::types::models::{EntryUpdate, FieldChange};
use crate::tagcache::CatalogStore;

/// Knobs for [`import`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImportOptions {
    /// Fill in PLAYTIME for played entries that have none.
    pub recompute_playtime: bool,
}

impl Default for ImportOptions {
    fn default() -> Self {
        Self {
            recompute_playtime: true,
        }
    }
}

/// Outcome of an import pass.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ImportReport {
    /// Entries found in the ledger.
    pub done: usize,
    /// Entries with no ledger counterpart.
    pub missing: usize,
    /// Every field write, in the order applied.
    pub changes: Vec<FieldChange>,
}

/// Applies `ledger` to every entry of `store`.
///
/// Changes stay in memory until [`CatalogStore::commit`] is called.
pub fn import(store: &mut CatalogStore, ledger: &Ledger, options: ImportOptions) -> Result<ImportReport> {
    let mut report = ImportReport::default();
    let offsets: Vec<usize> = store.entry_offsets().collect();

    for offset in offsets {
        let entry = store.decode_entry(offset)?;
        let track = Track::from_entry(&entry);

        let Some(record) = ledger.lookup(&track) else {
            report.missing += 1;
            continue;
        };

        let current = store.get_numeric_field(offset, Field::PlayCount)?;
        let play_time = store.get_numeric_field(offset, Field::PlayTime)?;

        let mut update = EntryUpdate::default();
        if record.count > current {
            update.play_count = Some(record.count);
        }
        let play_count = update.play_count.unwrap_or(current);
        update.recompute_playtime = options.recompute_playtime && play_count > 0 && play_time == 0;

        if update != EntryUpdate::default() {
            debug!("{}: ledger {} plays, catalog {}", track, record.count, current);
            report.changes.extend(store.update_entry(offset, update)?);
        }
        report.done += 1;
    }

    info!(
        "Import: done {}, missing {}, {} field updates",
        report.done,
        report.missing,
        report.changes.len()
    );
    Ok(report)
}
