//! The closed set of entry fields and their on-disk positions.
//!
//! Every index entry is 24 little-endian `u32` slots. Nine of them are
//! *indirect*: the slot holds an offset into that field's own string-table
//! file (`database_<position>.tcd`) instead of a literal value.

use std::fmt;

/// Number of `u32` slots in one index entry.
pub const FIELD_COUNT: usize = 24;

/// A named slot of an index entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Field {
    Artist,
    Album,
    Genre,
    Title,
    File,
    Composer,
    Comment,
    AlbumArtist,
    Grouping,
    Year,
    DiscNo,
    TrackNo,
    CanonicalArtist,
    Bitrate,
    Len,
    PlayCount,
    Rating,
    PlayTime,
    LastPlayed,
    CommitId,
    MTime,
    LastElapsed,
    LastOffset,
    Flags,
}

impl Field {
    /// All fields in positional order.
    pub const ALL: [Field; FIELD_COUNT] = [
        Field::Artist,
        Field::Album,
        Field::Genre,
        Field::Title,
        Field::File,
        Field::Composer,
        Field::Comment,
        Field::AlbumArtist,
        Field::Grouping,
        Field::Year,
        Field::DiscNo,
        Field::TrackNo,
        Field::CanonicalArtist,
        Field::Bitrate,
        Field::Len,
        Field::PlayCount,
        Field::Rating,
        Field::PlayTime,
        Field::LastPlayed,
        Field::CommitId,
        Field::MTime,
        Field::LastElapsed,
        Field::LastOffset,
        Field::Flags,
    ];

    /// Fields whose slot is an offset into a dedicated string table.
    pub const INDIRECT: [Field; 9] = [
        Field::Artist,
        Field::Album,
        Field::Title,
        Field::File,
        Field::Composer,
        Field::Comment,
        Field::AlbumArtist,
        Field::Grouping,
        Field::CanonicalArtist,
    ];

    /// Slot index within the entry; the byte offset is `position() * 4`.
    pub fn position(self) -> usize {
        self as usize
    }

    /// Upper-case name as used by the player's own tooling.
    pub fn name(self) -> &'static str {
        match self {
            Field::Artist => "ARTIST",
            Field::Album => "ALBUM",
            Field::Genre => "GENRE",
            Field::Title => "TITLE",
            Field::File => "FILE",
            Field::Composer => "COMPOSER",
            Field::Comment => "COMMENT",
            Field::AlbumArtist => "ALBUMARTIST",
            Field::Grouping => "GROUPING",
            Field::Year => "YEAR",
            Field::DiscNo => "DISCNO",
            Field::TrackNo => "TRACKNO",
            Field::CanonicalArtist => "CANONICALARTIST",
            Field::Bitrate => "BITRATE",
            Field::Len => "LEN",
            Field::PlayCount => "PLAYCOUNT",
            Field::Rating => "RATING",
            Field::PlayTime => "PLAYTIME",
            Field::LastPlayed => "LASTPLAYED",
            Field::CommitId => "COMMITID",
            Field::MTime => "MTIME",
            Field::LastElapsed => "LASTELAPSED",
            Field::LastOffset => "LASTOFFSET",
            Field::Flags => "FLAGS",
        }
    }

    pub fn is_indirect(self) -> bool {
        Self::INDIRECT.contains(&self)
    }

    /// File name of this field's string table, or `None` for literal fields.
    pub fn table_file_name(self) -> Option<String> {
        self.is_indirect()
            .then(|| format!("database_{}.tcd", self.position()))
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}
