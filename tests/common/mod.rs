#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use tagcache_sync::{Field, FIELD_COUNT, HEADER_SIZE, INDEX_FILE_NAME};
use tempfile::TempDir;

pub const FORMAT_VERSION: u32 = 0x5443_480F;

/// One catalog row to lay down in a synthetic database.
#[derive(Debug, Clone)]
pub struct TrackSpec {
    pub artist: &'static str,
    pub album: &'static str,
    pub title: &'static str,
    pub year: u32,
    pub track_no: u32,
    pub len: u32,
    pub play_count: u32,
    pub play_time: u32,
}

impl TrackSpec {
    pub fn new(artist: &'static str, album: &'static str, title: &'static str) -> Self {
        Self {
            artist,
            album,
            title,
            year: 1975,
            track_no: 1,
            len: 200,
            play_count: 0,
            play_time: 0,
        }
    }

    pub fn plays(mut self, play_count: u32, play_time: u32) -> Self {
        self.play_count = play_count;
        self.play_time = play_time;
        self
    }

    pub fn with_len(mut self, len: u32) -> Self {
        self.len = len;
        self
    }

    fn text(&self, field: Field) -> String {
        match field {
            Field::Artist | Field::AlbumArtist | Field::CanonicalArtist => self.artist.to_string(),
            Field::Album => self.album.to_string(),
            Field::Title => self.title.to_string(),
            Field::File => format!("/Music/{}/{}/{}.flac", self.artist, self.album, self.title),
            _ => String::new(),
        }
    }

    fn number(&self, field: Field) -> u32 {
        match field {
            Field::Year => self.year,
            Field::TrackNo => self.track_no,
            Field::Len => self.len,
            Field::PlayCount => self.play_count,
            Field::PlayTime => self.play_time,
            Field::Bitrate => 320,
            _ => 0,
        }
    }
}

/// Appends a string-table record and returns its offset.
///
/// Payloads are zero-terminated and padded to a 4-byte boundary, like the
/// player writes them.
pub fn push_string(table: &mut Vec<u8>, text: &str) -> u32 {
    let offset = table.len() as u32;
    let mut payload = text.as_bytes().to_vec();
    payload.push(0);
    while payload.len() % 4 != 0 {
        payload.push(0);
    }
    table.extend_from_slice(&(payload.len() as u32).to_le_bytes());
    table.extend_from_slice(&offset.to_le_bytes());
    table.extend_from_slice(&payload);
    offset
}

pub fn header_bytes(declared_size: u32, entry_count: u32) -> Vec<u8> {
    [FORMAT_VERSION, declared_size, entry_count, 3, 11, 0]
        .iter()
        .flat_map(|v| v.to_le_bytes())
        .collect()
}

/// Lays down a complete database for `tracks` in a fresh temp directory.
pub fn build_db(tracks: &[TrackSpec]) -> TempDir {
    let dir = tempfile::tempdir().expect("create temp dir");
    write_db(dir.path(), tracks);
    dir
}

pub fn write_db(root: &Path, tracks: &[TrackSpec]) {
    let mut tables: Vec<(Field, Vec<u8>)> = Field::INDIRECT.iter().map(|&f| (f, Vec::new())).collect();

    let body_len = tracks.len() * FIELD_COUNT * 4;
    let mut index = header_bytes(body_len as u32, tracks.len() as u32);
    for track in tracks {
        for field in Field::ALL {
            let value = match tables.iter_mut().find(|(f, _)| *f == field) {
                Some((_, table)) => push_string(table, &track.text(field)),
                None => track.number(field),
            };
            index.extend_from_slice(&value.to_le_bytes());
        }
    }
    assert_eq!(index.len(), HEADER_SIZE + body_len);

    fs::write(root.join(INDEX_FILE_NAME), &index).expect("write index");
    for (field, table) in tables {
        let name = field.table_file_name().expect("indirect field has a table");
        fs::write(root.join(name), table).expect("write string table");
    }
}

/// Snapshot of every file in the database directory.
pub fn snapshot(root: &Path) -> Vec<(PathBuf, Vec<u8>)> {
    let mut files: Vec<(PathBuf, Vec<u8>)> = fs::read_dir(root)
        .expect("read db dir")
        .map(|e| {
            let path = e.expect("dir entry").path();
            let bytes = fs::read(&path).expect("read db file");
            (path, bytes)
        })
        .collect();
    files.sort();
    files
}

pub fn entry_offset(n: usize) -> usize {
    HEADER_SIZE + n * FIELD_COUNT * 4
}
