use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use super::Song;

/// File name used by default for the song list.
pub const SONG_LIST_FILE: &str = "metronome_song_list";

#[derive(Debug, Error)]
pub enum LibraryError {
    #[error("song list I/O failed for {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("song list at {path} is not valid JSON: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Where the song list is persisted.
pub trait SongStore {
    fn save(&self, songs: &[Song]) -> Result<(), LibraryError>;
    fn load(&self) -> Result<Vec<Song>, LibraryError>;
}

#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: std::io::Error) -> LibraryError {
        LibraryError::Io {
            path: self.path.clone(),
            source,
        }
    }

    fn json_error(&self, source: serde_json::Error) -> LibraryError {
        LibraryError::Json {
            path: self.path.clone(),
            source,
        }
    }
}

impl SongStore for JsonFileStore {
    fn save(&self, songs: &[Song]) -> Result<(), LibraryError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| self.io_error(e))?;
            }
        }
        let json = serde_json::to_string_pretty(songs).map_err(|e| self.json_error(e))?;
        fs::write(&self.path, json).map_err(|e| self.io_error(e))
    }

    fn load(&self) -> Result<Vec<Song>, LibraryError> {
        let raw = fs::read_to_string(&self.path).map_err(|e| self.io_error(e))?;
        serde_json::from_str(&raw).map_err(|e| self.json_error(e))
    }
}
