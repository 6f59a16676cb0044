use super::*;
use tempfile::tempdir;

fn sequential_ids() -> impl FnMut() -> Uuid + Send + 'static {
    let mut next = 0u128;
    move || {
        next += 1;
        Uuid::from_u128(next)
    }
}

fn library_with(titles: &[&str]) -> SongLibrary {
    let mut library = SongLibrary::new().with_id_source(sequential_ids());
    for title in titles {
        let id = library.add_song();
        library.rename(id, *title);
    }
    library
}

fn titles(library: &SongLibrary) -> Vec<&str> {
    library.songs().iter().map(|s| s.title.as_str()).collect()
}

#[test]
fn test_add_song_uses_id_source() {
    let mut library = SongLibrary::new().with_id_source(sequential_ids());
    let first = library.add_song();
    let second = library.add_song();

    assert_eq!(first, Uuid::from_u128(1));
    assert_eq!(second, Uuid::from_u128(2));
    assert_eq!(library.len(), 2);
    assert_eq!(library.get(first), Some(&Song::new(first)));
}

#[test]
fn test_remove_ignores_out_of_range() {
    let mut library = library_with(&["a", "b", "c", "d"]);
    library.remove(&[3, 1, 9, 1]);
    assert_eq!(titles(&library), ["a", "c"]);
}

#[test]
fn test_move_items_forward_and_back() {
    let mut library = library_with(&["a", "b", "c", "d", "e"]);
    library.move_items(&[0], 3);
    assert_eq!(titles(&library), ["b", "c", "a", "d", "e"]);

    library.move_items(&[3, 4], 1);
    assert_eq!(titles(&library), ["b", "d", "e", "c", "a"]);

    library.move_items(&[0, 2], 99);
    assert_eq!(titles(&library), ["d", "c", "a", "b", "e"]);

    library.move_items(&[], 0);
    assert_eq!(library.len(), 5);
}

#[test]
fn test_bpm_text_is_limited_to_three_chars() {
    let mut library = library_with(&["song"]);
    let id = library.songs()[0].id;

    assert!(library.set_bpm_text(id, "110"));
    assert!(!library.set_bpm_text(id, "1100"));
    assert_eq!(library.get(id).unwrap().bpm, "110");
    assert!(!library.set_bpm_text(Uuid::from_u128(42), "90"));
}

#[test]
fn test_song_tempo_parsing() {
    let mut song = Song::new(Uuid::nil());
    assert_eq!(song.tempo(), None);
    song.bpm = "110".into();
    assert_eq!(song.tempo(), Some(110.0));
    song.bpm = "abc".into();
    assert_eq!(song.tempo(), None);
    song.bpm = "0".into();
    assert_eq!(song.tempo(), None);
}

#[test]
fn test_json_store_round_trip() {
    let dir = tempdir().expect("create tempdir");
    let store = JsonFileStore::new(dir.path().join("lists").join(SONG_LIST_FILE));

    let mut library = library_with(&["I Fought the Law", ""]);
    let id = library.songs()[0].id;
    library.set_bpm_text(id, "110");
    library.save_to(&store).expect("save library");

    let loaded = SongLibrary::load_from(&store).expect("load library");
    assert_eq!(loaded.songs(), library.songs());
}

#[test]
fn test_json_store_reports_errors() {
    let dir = tempdir().expect("create tempdir");
    let store = JsonFileStore::new(dir.path().join("missing.json"));
    assert!(matches!(store.load(), Err(LibraryError::Io { .. })));

    std::fs::write(store.path(), "{ not json").unwrap();
    assert!(matches!(store.load(), Err(LibraryError::Json { .. })));
}
