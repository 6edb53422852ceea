mod common;

use std::fs;

use common::{build_db, entry_offset, header_bytes, snapshot, TrackSpec, FORMAT_VERSION};
use tagcache_sync::{
    CatalogError, CatalogStore, EntryUpdate, Field, FieldValue, OpenOptions, ENTRY_SIZE, HEADER_SIZE,
    INDEX_FILE_NAME,
};

fn queen_and_abba() -> Vec<TrackSpec> {
    vec![
        TrackSpec::new("Queen", "A Night at the Opera", "39").plays(3, 600),
        TrackSpec::new("ABBA", "Arrival", "03 - Dancing Queen").plays(0, 0),
    ]
}

#[test]
fn open_reads_header_fields() {
    let dir = build_db(&queen_and_abba());
    let store = CatalogStore::open(dir.path()).expect("open db");

    assert_eq!(store.header.format_version, FORMAT_VERSION);
    assert_eq!(store.header.declared_size, 2 * ENTRY_SIZE as u32);
    assert_eq!(store.header.serial, 3);
    assert_eq!(store.header.commit_id, 11);
    assert_eq!(store.entry_count(), 2);
    assert_eq!(
        store.header.to_string(),
        format!(
            "Version: {}, Size: 192, Count: 2, Serial: 3, Commit: 11, Dirty: 0",
            FORMAT_VERSION
        )
    );
}

#[test]
fn list_resolves_indirect_fields() {
    let dir = build_db(&queen_and_abba());
    let store = CatalogStore::open(dir.path()).expect("open db");

    let entries = store.list().expect("list entries");
    assert_eq!(entries.len(), 2);

    let first = &entries[0];
    assert_eq!(first.offset(), entry_offset(0));
    assert_eq!(first.text(Field::Artist), Some("Queen"));
    assert_eq!(first.text(Field::Album), Some("A Night at the Opera"));
    assert_eq!(first.text(Field::Title), Some("39"));
    assert_eq!(
        first.get(Field::File),
        &FieldValue::Text("/Music/Queen/A Night at the Opera/39.flac".to_string())
    );
    assert_eq!(first.number(Field::Year), Some(1975));
    assert_eq!(first.number(Field::PlayCount), Some(3));
    assert_eq!(first.number(Field::Artist), None, "indirect fields have no numeric value");
    assert_eq!(first.raw(Field::Artist), 0, "first string lives at table offset 0");

    let second = &entries[1];
    assert_eq!(second.offset(), entry_offset(1));
    assert_eq!(second.text(Field::Title), Some("03 - Dancing Queen"));
    assert_eq!(second.fields().count(), Field::ALL.len());
}

#[test]
fn iteration_follows_buffer_length_not_declared_count() {
    let dir = build_db(&queen_and_abba());
    let index_path = dir.path().join(INDEX_FILE_NAME);
    let mut index = fs::read(&index_path).unwrap();
    index[8..12].copy_from_slice(&1u32.to_le_bytes());
    fs::write(&index_path, &index).unwrap();

    let store = CatalogStore::open(dir.path()).expect("open db");
    assert_eq!(store.entry_count(), 1);
    assert_eq!(store.list().expect("list").len(), 2);
}

#[test]
fn truncated_entry_is_out_of_bounds() {
    let dir = build_db(&queen_and_abba());
    let index_path = dir.path().join(INDEX_FILE_NAME);
    let mut index = fs::read(&index_path).unwrap();
    index.truncate(index.len() - 10);
    fs::write(&index_path, &index).unwrap();

    let store = CatalogStore::open_with(dir.path(), OpenOptions { validate_header: false })
        .expect("open without header validation");
    let mut entries = store.entries();
    assert!(entries.next().expect("first entry").is_ok());
    assert!(!entries.at_end());
    assert!(matches!(
        entries.next().expect("second entry"),
        Err(CatalogError::OutOfBounds { .. })
    ));
    assert!(entries.at_end());
    assert!(entries.next().is_none());
}

#[test]
fn inconsistent_header_is_malformed() {
    let dir = build_db(&queen_and_abba());
    let index_path = dir.path().join(INDEX_FILE_NAME);
    let mut index = fs::read(&index_path).unwrap();
    index[..24].copy_from_slice(&header_bytes(10_000, 2));
    fs::write(&index_path, &index).unwrap();

    assert!(matches!(
        CatalogStore::open(dir.path()),
        Err(CatalogError::MalformedHeader(_))
    ));
    assert!(CatalogStore::open_with(dir.path(), OpenOptions { validate_header: false }).is_ok());
}

#[test]
fn missing_string_table_is_io_error() {
    let dir = build_db(&queen_and_abba());
    fs::remove_file(dir.path().join("database_3.tcd")).unwrap();

    match CatalogStore::open(dir.path()) {
        Err(CatalogError::Io { path, .. }) => assert!(path.ends_with("database_3.tcd")),
        other => panic!("expected I/O error, got {:?}", other),
    }
}

#[test]
fn undecodable_string_surfaces_offset() {
    let dir = build_db(&queen_and_abba());
    let artist_path = dir.path().join("database_0.tcd");
    let mut table = fs::read(&artist_path).unwrap();
    table[8] = 0xFF;
    fs::write(&artist_path, &table).unwrap();

    let store = CatalogStore::open(dir.path()).expect("open db");
    match store.decode_entry(entry_offset(0)) {
        Err(CatalogError::Decode { field, offset }) => {
            assert_eq!(field, Field::Artist);
            assert_eq!(offset, 0);
        }
        other => panic!("expected decode error, got {:?}", other),
    }
}

#[test]
fn commit_without_changes_writes_nothing() {
    let dir = build_db(&queen_and_abba());
    let before = snapshot(dir.path());

    let store = CatalogStore::open(dir.path()).expect("open db");
    assert!(!store.is_dirty());
    let report = store.commit();

    assert!(report.written.is_empty(), "unexpected writes: {:?}", report.written);
    assert!(report.is_clean());
    assert_eq!(before, snapshot(dir.path()));
}

#[test]
fn numeric_update_touches_exactly_four_bytes() {
    let dir = build_db(&queen_and_abba());
    let mut store = CatalogStore::open(dir.path()).expect("open db");
    let before = store.index_store().as_bytes().to_vec();

    let offset = entry_offset(1);
    let change = store
        .update_numeric_field(offset, Field::Rating, 0x0A0B_0C0D)
        .expect("update rating");
    assert_eq!(change.old, 0);
    assert_eq!(change.new, 0x0A0B_0C0D);
    assert_eq!(change.entry_offset, offset);

    let after = store.index_store().as_bytes();
    let slot = offset + Field::Rating.position() * 4;
    let differing: Vec<usize> = (0..before.len()).filter(|&i| before[i] != after[i]).collect();
    assert_eq!(differing, (slot..slot + 4).collect::<Vec<_>>());
    assert_eq!(&after[slot..slot + 4], &[0x0D, 0x0C, 0x0B, 0x0A]);
    assert_eq!(store.get_numeric_field(offset, Field::Rating).unwrap(), 0x0A0B_0C0D);
    assert!(store.is_dirty());
}

#[test]
fn indirect_fields_cannot_be_written() {
    let dir = build_db(&queen_and_abba());
    let mut store = CatalogStore::open(dir.path()).expect("open db");

    assert!(matches!(
        store.update_numeric_field(entry_offset(0), Field::Title, 5),
        Err(CatalogError::IndirectField(Field::Title))
    ));
    assert!(!store.is_dirty());
}

#[test]
fn update_entry_writes_play_count_before_play_time() {
    let dir = build_db(&[TrackSpec::new("Queen", "Jazz", "Mustapha").with_len(180).plays(1, 0)]);
    let mut store = CatalogStore::open(dir.path()).expect("open db");
    let offset = entry_offset(0);

    let changes = store
        .update_entry(
            offset,
            EntryUpdate {
                play_count: Some(4),
                recompute_playtime: true,
            },
        )
        .expect("update entry");

    assert_eq!(changes.len(), 2);
    assert_eq!((changes[0].field, changes[0].old, changes[0].new), (Field::PlayCount, 1, 4));
    assert_eq!((changes[1].field, changes[1].old, changes[1].new), (Field::PlayTime, 0, 720));
    assert_eq!(store.get_numeric_field(offset, Field::PlayTime).unwrap(), 720);
}

#[test]
fn commit_rewrites_only_the_index() {
    let dir = build_db(&queen_and_abba());
    let before = snapshot(dir.path());

    let mut store = CatalogStore::open(dir.path()).expect("open db");
    store
        .update_numeric_field(entry_offset(0), Field::PlayCount, 9)
        .expect("update play count");
    let report = store.commit();

    assert_eq!(report.written, vec![dir.path().join(INDEX_FILE_NAME)]);
    let after = snapshot(dir.path());
    for ((path, old), (_, new)) in before.iter().zip(after.iter()) {
        if path.ends_with(INDEX_FILE_NAME) {
            assert_ne!(old, new, "index should have been rewritten");
        } else {
            assert_eq!(old, new, "{} should be untouched", path.display());
        }
    }

    let reopened = CatalogStore::open(dir.path()).expect("reopen db");
    assert_eq!(reopened.get_numeric_field(entry_offset(0), Field::PlayCount).unwrap(), 9);
}

#[test]
fn find_matches_substrings_of_the_key() {
    let dir = build_db(&queen_and_abba());
    let store = CatalogStore::open(dir.path()).expect("open db");

    let found = store.find("Dancing").expect("find");
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].artist(), "ABBA");
    assert_eq!(found[0].key(), "abbaarrivaldancingqueen");

    assert_eq!(store.find("queen").expect("find").len(), 2);
    assert!(store.find("metallica").expect("find").is_empty());
}

#[test]
fn header_cannot_be_written_through_field_updates() {
    let dir = build_db(&queen_and_abba());
    let mut store = CatalogStore::open(dir.path()).expect("open db");
    let before = store.index_store().as_bytes().to_vec();

    for offset in [0, 8, HEADER_SIZE - 1] {
        assert!(
            matches!(
                store.update_numeric_field(offset, Field::Genre, 99),
                Err(CatalogError::OutOfBounds { .. })
            ),
            "offset {} lies inside the header",
            offset
        );
    }
    assert_eq!(store.index_store().as_bytes(), &before[..]);
    assert!(!store.is_dirty());
    assert_eq!(store.entry_count(), 2);
}

#[test]
fn decoded_slots_are_little_endian() {
    let dir = build_db(&queen_and_abba());
    let mut store = CatalogStore::open(dir.path()).expect("open db");
    let offset = entry_offset(1);
    store
        .update_numeric_field(offset, Field::Rating, 0x0A0B_0C0D)
        .expect("update rating");

    let entry = store.decode_entry(offset).expect("decode");
    assert_eq!(entry.raw(Field::Rating), 0x0A0B_0C0D);
    assert_eq!(entry.number(Field::Rating), Some(0x0A0B_0C0D));
    assert_eq!(entry.raw(Field::Len), 200);
    assert_eq!(entry.raw(Field::Bitrate), 320);
}
