//! Play-count ledger built from a scrobble export.
//!
//! The export is `;`-delimited text with a header row containing at least
//! `Artist`, `Album` and `Track` columns. Every row is one play; rows that
//! reduce to the same match key are folded into a single record whose
//! count is the number of plays.

use std::collections::{HashMap, HashSet};
use std::fs;
use std::io::Read;
use std::path::Path;

use encoding_rs::UTF_8;
use log::{debug, info, warn};

use crate::matching::Track;
use crate::tagcache::types::error::{CatalogError, Result};

/// One play as read from the export, before normalization.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LedgerRow {
    pub artist: String,
    pub album: String,
    pub title: String,
}

impl LedgerRow {
    pub fn new(artist: impl Into<String>, album: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            artist: artist.into(),
            album: album.into(),
            title: title.into(),
        }
    }
}

/// Aggregated plays for one match key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerRecord {
    /// The first row seen for this key.
    pub track: Track,
    pub count: u32,
}

/// Read-only mapping from match key to aggregated plays.
#[derive(Debug, Default)]
pub struct Ledger {
    records: HashMap<String, LedgerRecord>,
}

impl Ledger {
    /// Aggregates rows by match key.
    ///
    /// Each field is trimmed and lowercased before the track is built.
    pub fn build(rows: impl IntoIterator<Item = LedgerRow>) -> Self {
        let mut records: HashMap<String, LedgerRecord> = HashMap::new();
        let mut plays = 0usize;

        for row in rows {
            plays += 1;
            let track = Track::new(
                row.artist.trim().to_lowercase(),
                row.album.trim().to_lowercase(),
                row.title.trim().to_lowercase(),
            );
            records
                .entry(track.key().to_owned())
                .and_modify(|r| r.count += 1)
                .or_insert(LedgerRecord { track, count: 1 });
        }

        debug!("Ledger aggregated {} plays into {} tracks", plays, records.len());
        Self { records }
    }

    /// Reads and aggregates a ledger file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        info!("Reading ledger: {}", path.display());
        let bytes = fs::read(path).map_err(|e| CatalogError::io(path, e))?;
        Self::from_bytes(&bytes)
    }

    /// Reads and aggregates a ledger from any reader.
    pub fn from_reader<R: Read>(mut reader: R) -> Result<Self> {
        let mut bytes = Vec::new();
        reader
            .read_to_end(&mut bytes)
            .map_err(|e| CatalogError::io("<ledger>", e))?;
        Self::from_bytes(&bytes)
    }

    fn from_bytes(bytes: &[u8]) -> Result<Self> {
        Ok(Self::build(parse_rows(bytes)?))
    }

    pub fn lookup(&self, track: &Track) -> Option<&LedgerRecord> {
        self.records.get(track.key())
    }

    /// Number of distinct tracks.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn artist_count(&self) -> usize {
        self.distinct(|t| t.artist())
    }

    pub fn album_count(&self) -> usize {
        self.distinct(|t| t.album())
    }

    fn distinct<'a>(&'a self, part: impl Fn(&'a Track) -> &'a str) -> usize {
        self.records
            .values()
            .map(|r| part(&r.track).to_lowercase())
            .collect::<HashSet<_>>()
            .len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &LedgerRecord> {
        self.records.values()
    }
}

/// Parses export text into rows, stripping a leading byte-order mark.
pub fn parse_rows(bytes: &[u8]) -> Result<Vec<LedgerRow>> {
    let (text, had_errors) = UTF_8.decode_with_bom_removal(bytes);
    if had_errors {
        warn!("Ledger contains invalid UTF-8; offending bytes were replaced");
    }

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b';')
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(text.as_bytes());

    let headers = reader.headers()?.clone();
    let column = |name: &str| {
        headers
            .iter()
            .position(|h| h.eq_ignore_ascii_case(name))
            .ok_or_else(|| CatalogError::Ledger(format!("missing '{}' column", name)))
    };
    let (artist, album, title) = (column("Artist")?, column("Album")?, column("Track")?);

    let mut rows = Vec::new();
    for (line, record) in reader.records().enumerate() {
        let record = record?;
        if record.iter().all(str::is_empty) {
            continue;
        }
        if record.len() <= artist.max(album).max(title) {
            warn!("Skipping ledger row {}: too few columns", line + 2);
            continue;
        }
        let field = |i: usize| record.get(i).unwrap_or_default().to_owned();
        rows.push(LedgerRow {
            artist: field(artist),
            album: field(album),
            title: field(title),
        });
    }
    Ok(rows)
}
