use std::fmt;

use super::normalize::{canonicalize, normalize_title};
use crate::tagcache::types::field::Field;
use crate::tagcache::types::models::Entry;

/// An (artist, album, title) identity with its precomputed match key.
///
/// The key is `canonicalize(artist + album + normalize_title(title))`. The
/// parts are joined without a separator, so different splits of the same
/// characters collide; matching accepts that.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Track {
    artist: String,
    album: String,
    title: String,
    key: String,
}

impl Track {
    pub fn new(artist: impl Into<String>, album: impl Into<String>, title: impl Into<String>) -> Self {
        let artist = artist.into();
        let album = album.into();
        let title = title.into();
        let key = canonicalize(&format!("{}{}{}", artist, album, normalize_title(&title)));
        Self {
            artist,
            album,
            title,
            key,
        }
    }

    /// Builds a track from a decoded catalog entry's ARTIST, ALBUM and TITLE.
    pub fn from_entry(entry: &Entry) -> Self {
        let text = |field| entry.text(field).unwrap_or_default().to_owned();
        Self::new(text(Field::Artist), text(Field::Album), text(Field::Title))
    }

    pub fn artist(&self) -> &str {
        &self.artist
    }

    pub fn album(&self) -> &str {
        &self.album
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Loose equality: same match key.
    pub fn matches(&self, other: &Track) -> bool {
        self.key == other.key
    }

    /// Strict equality: identical raw artist, album and title.
    pub fn eq_strict(&self, other: &Track) -> bool {
        self.artist == other.artist && self.album == other.album && self.title == other.title
    }
}

impl fmt::Display for Track {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} - {} - {} -- {}", self.artist, self.album, self.title, self.key)
    }
}
