/// Song library - a reorderable list of songs with a title and a tempo
pub mod store;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub use store::{JsonFileStore, LibraryError, SONG_LIST_FILE, SongStore};

/// Longest BPM text a song accepts, e.g. "140".
pub const MAX_BPM_CHARS: usize = 3;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Song {
    pub id: Uuid,
    pub title: String,
    pub bpm: String,
}

impl Song {
    pub fn new(id: Uuid) -> Self {
        Self {
            id,
            title: String::new(),
            bpm: String::new(),
        }
    }

    /// The tempo typed for this song, if it is a usable number.
    pub fn tempo(&self) -> Option<f64> {
        let value: f64 = self.bpm.trim().parse().ok()?;
        (value.is_finite() && value > 0.0).then_some(value)
    }
}

pub struct SongLibrary {
    songs: Vec<Song>,
    next_id: Box<dyn FnMut() -> Uuid + Send>,
}

impl SongLibrary {
    pub fn new() -> Self {
        Self::with_songs(Vec::new())
    }

    pub fn with_songs(songs: Vec<Song>) -> Self {
        Self {
            songs,
            next_id: Box::new(Uuid::new_v4),
        }
    }

    /// Replaces the id generator, e.g. with a deterministic one.
    pub fn with_id_source(mut self, source: impl FnMut() -> Uuid + Send + 'static) -> Self {
        self.next_id = Box::new(source);
        self
    }

    pub fn songs(&self) -> &[Song] {
        &self.songs
    }

    pub fn len(&self) -> usize {
        self.songs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.songs.is_empty()
    }

    pub fn get(&self, id: Uuid) -> Option<&Song> {
        self.songs.iter().find(|song| song.id == id)
    }

    pub fn get_at(&self, index: usize) -> Option<&Song> {
        self.songs.get(index)
    }

    /// Appends an empty song and returns its id.
    pub fn add_song(&mut self) -> Uuid {
        let id = (self.next_id)();
        self.songs.push(Song::new(id));
        id
    }

    /// Removes the songs at `offsets`. Offsets past the end are ignored.
    pub fn remove(&mut self, offsets: &[usize]) {
        let mut offsets: Vec<usize> = offsets
            .iter()
            .copied()
            .filter(|&i| i < self.songs.len())
            .collect();
        offsets.sort_unstable();
        offsets.dedup();
        for index in offsets.into_iter().rev() {
            self.songs.remove(index);
        }
    }

    /// Moves the songs at `offsets` so they sit, in their original order,
    /// right before the song that was at `to_offset` (or at the end).
    pub fn move_items(&mut self, offsets: &[usize], to_offset: usize) {
        let mut offsets: Vec<usize> = offsets
            .iter()
            .copied()
            .filter(|&i| i < self.songs.len())
            .collect();
        offsets.sort_unstable();
        offsets.dedup();
        if offsets.is_empty() {
            return;
        }

        let to_offset = to_offset.min(self.songs.len());
        let before_target = offsets.iter().filter(|&&i| i < to_offset).count();
        let mut moved = Vec::with_capacity(offsets.len());
        for &index in offsets.iter().rev() {
            moved.push(self.songs.remove(index));
        }
        moved.reverse();

        let insert_at = to_offset - before_target;
        self.songs.splice(insert_at..insert_at, moved);
    }

    pub fn rename(&mut self, id: Uuid, title: impl Into<String>) -> bool {
        match self.songs.iter_mut().find(|song| song.id == id) {
            Some(song) => {
                song.title = title.into();
                true
            }
            None => false,
        }
    }

    /// Updates the BPM text. Edits longer than [`MAX_BPM_CHARS`] are refused.
    pub fn set_bpm_text(&mut self, id: Uuid, text: impl Into<String>) -> bool {
        let text = text.into();
        if text.chars().count() > MAX_BPM_CHARS {
            return false;
        }
        match self.songs.iter_mut().find(|song| song.id == id) {
            Some(song) => {
                song.bpm = text;
                true
            }
            None => false,
        }
    }

    pub fn load_from(store: &dyn SongStore) -> Result<Self, LibraryError> {
        Ok(Self::with_songs(store.load()?))
    }

    pub fn save_to(&self, store: &dyn SongStore) -> Result<(), LibraryError> {
        store.save(&self.songs)
    }
}

impl Default for SongLibrary {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for SongLibrary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SongLibrary")
            .field("songs", &self.songs)
            .finish()
    }
}

#[cfg(test)]
#[path = "test_library.rs"]
mod tests;
